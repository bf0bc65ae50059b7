//! Sample command CLI handler.

use super::glob_util::expand_inputs;
use anyhow::Context;
use linesample::sample::{self, ModeOptions, SampleConfig, SampleStats, SampleYamlConfig};
use std::path::PathBuf;

#[allow(clippy::too_many_arguments)]
pub fn run(
    inputs: Vec<String>,
    probability: Option<f64>,
    reservoir: Option<usize>,
    split: Option<String>,
    output: Option<PathBuf>,
    normalize: bool,
    config: Option<PathBuf>,
    progress: bool,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let options = ModeOptions {
        probability,
        reservoir,
        split,
        output,
        normalize,
    };

    let options = match config {
        Some(ref path) => {
            let file = SampleYamlConfig::load(path)
                .with_context(|| format!("Cannot load config: {}", path.display()))?;
            options.with_file_defaults(&file)
        }
        None => options,
    };

    // Every configuration error surfaces here, before any input is opened.
    let (mode, output) = options.resolve()?;
    let expanded = expand_inputs(&inputs)?;

    let stats = sample::run(SampleConfig {
        inputs: expanded.locators,
        unmatched: expanded.unmatched,
        mode,
        output,
        dry_run,
        progress,
    })?;

    if json {
        eprintln!("{}", serde_json::to_string_pretty(&stats)?);
    } else if progress || dry_run {
        print_summary(&stats);
    }

    Ok(())
}

fn print_summary(stats: &SampleStats) {
    eprintln!();
    eprintln!("Sample Statistics:");
    eprintln!("  Mode: {}", stats.mode);

    let percent = if stats.lines_read > 0 {
        (stats.lines_emitted as f64 / stats.lines_read as f64) * 100.0
    } else {
        0.0
    };
    eprintln!(
        "  Lines: {} / {} ({:.1}%)",
        stats.lines_emitted, stats.lines_read, percent
    );

    if stats.destinations.len() > 1 {
        eprintln!();
        eprintln!("Per-destination breakdown:");
        for (index, count) in stats.destinations.iter().enumerate() {
            let name = stats
                .outputs
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("#{index}"));
            eprintln!("  {}: {} lines", name, count);
        }
        if stats.discarded > 0 {
            eprintln!("  (remainder): {} lines discarded", stats.discarded);
        }
    }

    if !stats.skipped_inputs.is_empty() {
        eprintln!();
        for input in &stats.skipped_inputs {
            eprintln!("  Warning: skipped unreadable input {}", input);
        }
    }

    if stats.dry_run {
        eprintln!();
        eprintln!("Dry run: no output written");
    }
}
