//! YAML configuration for the sample command.
//!
//! Every key is optional; values given on the command line win over the file.
//!
//! ```yaml
//! split: "0.8,0.1,0.1"   # or a list: [0.8, 0.1, 0.1]
//! normalize: false
//! output: data/part
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Split weights written either as text or as a YAML list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeightsSpec {
    Text(String),
    List(Vec<f64>),
}

impl WeightsSpec {
    /// Comma-separated form, the same text accepted by `--split`
    pub fn to_text(&self) -> String {
        match self {
            WeightsSpec::Text(text) => text.clone(),
            WeightsSpec::List(values) => values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

/// Complete YAML configuration for sample command
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SampleYamlConfig {
    /// Keep each line with this probability
    pub probability: Option<f64>,
    /// Keep a uniform sample of this many lines
    pub reservoir: Option<usize>,
    /// Partition lines by these weights
    pub split: Option<WeightsSpec>,
    /// Output file, or the base name of split outputs
    pub output: Option<PathBuf>,
    /// Rescale split weights to sum to 1
    pub normalize: Option<bool>,
}

impl SampleYamlConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let config: SampleYamlConfig = serde_yaml_ng::from_str(content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_config() {
        let yaml = r#"
split: "0.8,0.1,0.1"
normalize: true
output: out/part
"#;

        let config = SampleYamlConfig::from_yaml(yaml).unwrap();

        assert_eq!(
            config.split,
            Some(WeightsSpec::Text("0.8,0.1,0.1".to_string()))
        );
        assert_eq!(config.normalize, Some(true));
        assert_eq!(config.output, Some(PathBuf::from("out/part")));
        assert_eq!(config.probability, None);
    }

    #[test]
    fn test_split_as_list() {
        let config = SampleYamlConfig::from_yaml("split: [0.5, 0.25, 0.25]\n").unwrap();
        let spec = config.split.unwrap();
        assert_eq!(spec, WeightsSpec::List(vec![0.5, 0.25, 0.25]));
        assert_eq!(spec.to_text(), "0.5,0.25,0.25");
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(SampleYamlConfig::from_yaml("rate: 0.5\n").is_err());
    }

    #[test]
    fn test_empty_document() {
        let config = SampleYamlConfig::from_yaml("{}").unwrap();
        assert!(config.reservoir.is_none());
        assert!(config.split.is_none());
    }
}
