//! Glob pattern expansion for input arguments.
//!
//! Expands patterns like `logs/*.txt` or `data/**/*.gz` into the matching
//! files, sorted. Literal paths and `-` pass through untouched; whether they
//! can be opened is decided when they are read.

use linesample::source::Locator;
use std::path::PathBuf;

/// Check if a path string contains glob pattern characters.
pub fn is_glob_pattern(path: &str) -> bool {
    path.contains('*') || path.contains('?') || path.contains('[')
}

/// Expand one argument into the inputs it names.
///
/// A pattern matching no files yields no inputs and a warning, the same
/// leniency applied to inputs that cannot be opened.
pub fn expand_input(arg: &str) -> anyhow::Result<Vec<Locator>> {
    if !is_glob_pattern(arg) {
        return Ok(vec![Locator::parse(arg)]);
    }

    let entries = glob::glob(arg)
        .map_err(|e| anyhow::anyhow!("invalid glob pattern '{}': {}", arg, e))?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    files.push(path);
                }
            }
            Err(e) => {
                log::warn!("error reading path for pattern '{}': {}", arg, e);
            }
        }
    }

    if files.is_empty() {
        log::warn!("no files match pattern: {}", arg);
    }

    files.sort();
    Ok(files.into_iter().map(Locator::Path).collect())
}

/// The result of expanding every input argument.
#[derive(Debug, Default, PartialEq)]
pub struct ExpandedInputs {
    /// Inputs to read, in argument order.
    pub locators: Vec<Locator>,
    /// Patterns that matched no file.
    pub unmatched: Vec<String>,
}

/// Expand all arguments, keeping argument order.
pub fn expand_inputs(args: &[String]) -> anyhow::Result<ExpandedInputs> {
    let mut expanded = ExpandedInputs::default();
    for arg in args {
        let locators = expand_input(arg)?;
        if locators.is_empty() {
            expanded.unmatched.push(arg.clone());
        }
        expanded.locators.extend(locators);
    }
    Ok(expanded)
}
