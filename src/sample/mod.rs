//! Sampling and partitioning of line streams.
//!
//! Three single-pass algorithms share one driver:
//!
//! - probability: keep each line independently with probability `p`
//! - reservoir: keep a uniform sample of exactly `min(n, k)` lines
//! - split: route each line to one of N weighted destinations
//!
//! Exactly one mode is active for a run. The algorithms only see materialized
//! lines and a [`LineSink`]; opening inputs and outputs happens here, around
//! them.

mod bernoulli;
mod config;
mod reservoir;
mod split;

pub use bernoulli::{validate_probability, BernoulliSampler};
pub use config::{SampleYamlConfig, WeightsSpec};
pub use reservoir::{reservoir_sample, Reservoir};
pub use split::{Route, WeightedSplitter, Weights};

use crate::draw::{RandomDraw, RngDraw};
use crate::error::{ConfigError, ConfigResult};
use crate::source::{LineSource, Locator};
use crate::writer::{LineSink, LineWriter, NullSink, WriterPool};
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Sampling mode, selected once for the whole run
#[derive(Debug, Clone, PartialEq)]
pub enum SampleMode {
    /// Keep each line with probability p
    Probability(f64),
    /// Keep a uniform sample of k lines
    Reservoir(usize),
    /// Partition lines across `{output_base}_{index}` files
    Split { weights: Weights, output_base: PathBuf },
}

impl SampleMode {
    pub fn name(&self) -> &'static str {
        match self {
            SampleMode::Probability(_) => "probability",
            SampleMode::Reservoir(_) => "reservoir",
            SampleMode::Split { .. } => "split",
        }
    }

    /// Number of output destinations the mode writes to.
    pub fn destinations(&self) -> usize {
        match self {
            SampleMode::Split { weights, .. } => weights.len(),
            _ => 1,
        }
    }
}

/// Mode-selecting options as given by the operator, before validation
#[derive(Debug, Clone, Default)]
pub struct ModeOptions {
    pub probability: Option<f64>,
    pub reservoir: Option<usize>,
    pub split: Option<String>,
    pub output: Option<PathBuf>,
    pub normalize: bool,
}

impl ModeOptions {
    /// Fill unset options from a config file.
    pub fn with_file_defaults(self, file: &SampleYamlConfig) -> Self {
        Self {
            probability: self.probability.or(file.probability),
            reservoir: self.reservoir.or(file.reservoir),
            split: self.split.or_else(|| file.split.as_ref().map(WeightsSpec::to_text)),
            output: self.output.or_else(|| file.output.clone()),
            normalize: self.normalize || file.normalize.unwrap_or(false),
        }
    }

    /// Select exactly one mode, or explain why that is impossible.
    ///
    /// Returns the mode and, for single-stream modes, the output file (None
    /// means standard output).
    pub fn resolve(self) -> ConfigResult<(SampleMode, Option<PathBuf>)> {
        let given: Vec<&str> = [
            self.probability.map(|_| "--probability"),
            self.reservoir.map(|_| "--reservoir"),
            self.split.as_ref().map(|_| "--split"),
        ]
        .into_iter()
        .flatten()
        .collect();

        if given.len() > 1 {
            return Err(ConfigError::ConflictingModes(given.join(" and ")));
        }

        if let Some(p) = self.probability {
            return Ok((SampleMode::Probability(validate_probability(p)?), self.output));
        }
        if let Some(k) = self.reservoir {
            return Ok((SampleMode::Reservoir(k), self.output));
        }
        if let Some(text) = self.split {
            let weights = Weights::parse(&text, self.normalize)?;
            let output_base = self.output.ok_or(ConfigError::MissingOutputBase)?;
            return Ok((
                SampleMode::Split {
                    weights,
                    output_base,
                },
                None,
            ));
        }

        Err(ConfigError::MissingMode)
    }
}

/// Configuration for the sample command
#[derive(Debug)]
pub struct SampleConfig {
    /// Inputs in reading order (empty reads standard input)
    pub inputs: Vec<Locator>,
    /// Named input patterns that matched no file; these count as skipped
    /// inputs, so standard input is not read in their place
    pub unmatched: Vec<String>,
    /// Sampling mode
    pub mode: SampleMode,
    /// Output file for single-stream modes (None for stdout)
    pub output: Option<PathBuf>,
    /// Dry run mode (show stats only)
    pub dry_run: bool,
    /// Show progress
    pub progress: bool,
}

/// Statistics from a sample run
#[derive(Debug, Default, Clone, Serialize)]
pub struct SampleStats {
    /// Mode name
    pub mode: String,
    /// Lines read from all inputs
    pub lines_read: u64,
    /// Lines written (or, in a dry run, that would have been written)
    pub lines_emitted: u64,
    /// Lines written per destination
    pub destinations: Vec<u64>,
    /// Lines routed to no destination
    pub discarded: u64,
    /// Output files written
    pub outputs: Vec<String>,
    /// Inputs that could not be opened
    pub skipped_inputs: Vec<String>,
    /// Dry run, nothing written
    pub dry_run: bool,
}

/// Per-destination line counts of one pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tally {
    pub seen: u64,
    pub per_destination: Vec<u64>,
    pub discarded: u64,
}

impl Tally {
    fn new(destinations: usize) -> Self {
        Self {
            seen: 0,
            per_destination: vec![0; destinations],
            discarded: 0,
        }
    }

    pub fn emitted(&self) -> u64 {
        self.per_destination.iter().sum()
    }
}

/// Write each line to destination 0 with probability `p`.
pub fn sample_at_rate<I, D, S>(
    lines: I,
    sampler: &mut BernoulliSampler<D>,
    sink: &mut S,
) -> io::Result<Tally>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
    D: RandomDraw,
    S: LineSink + ?Sized,
{
    let mut tally = Tally::new(1);
    for line in lines {
        tally.seen += 1;
        if sampler.keep() {
            sink.write_line(0, line.as_ref())?;
            tally.per_destination[0] += 1;
        } else {
            tally.discarded += 1;
        }
    }
    Ok(tally)
}

/// Write each line to the one destination its draw falls into.
pub fn split_weighted<I, D, S>(
    lines: I,
    splitter: &mut WeightedSplitter<D>,
    sink: &mut S,
) -> io::Result<Tally>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
    D: RandomDraw,
    S: LineSink + ?Sized,
{
    let mut tally = Tally::new(splitter.weights().len());
    for line in lines {
        tally.seen += 1;
        match splitter.next_route() {
            Route::Destination(dest) => {
                sink.write_line(dest, line.as_ref())?;
                tally.per_destination[dest] += 1;
            }
            Route::Discard => tally.discarded += 1,
        }
    }
    Ok(tally)
}

/// Run the sample command with an OS-seeded generator
pub fn run(config: SampleConfig) -> anyhow::Result<SampleStats> {
    run_with_draw(config, RngDraw::from_os_rng())
}

/// Run the sample command with the given draw source
pub fn run_with_draw<D: RandomDraw>(config: SampleConfig, draw: D) -> anyhow::Result<SampleStats> {
    log::info!("sampling mode: {}", describe_mode(&config.mode));

    let progress_bar = if config.progress {
        Some(make_progress_bar(&config.inputs))
    } else {
        None
    };

    let unmatched = config
        .unmatched
        .iter()
        .map(|pattern| {
            (
                Locator::Path(PathBuf::from(pattern)),
                "no files match pattern".to_string(),
            )
        })
        .collect();
    let mut source = LineSource::with_skipped(config.inputs.clone(), unmatched);
    if let Some(ref pb) = progress_bar {
        let pb = pb.clone();
        source = source.with_progress(Rc::new(move |bytes| pb.inc(bytes)));
    }

    let mut stats = SampleStats {
        mode: config.mode.name().to_string(),
        dry_run: config.dry_run,
        ..Default::default()
    };

    let tally = match &config.mode {
        SampleMode::Probability(p) => {
            let mut sampler = BernoulliSampler::new(*p, draw)?;
            let mut sink = open_single_output(&config, &mut stats)?;
            let tally = sample_at_rate(source.by_ref(), &mut sampler, sink.as_mut())?;
            sink.finish()?;
            tally
        }
        SampleMode::Split {
            weights,
            output_base,
        } => {
            let mut splitter = WeightedSplitter::new(weights.clone(), draw);
            let mut sink: Box<dyn LineSink> = if config.dry_run {
                Box::new(NullSink)
            } else {
                let pool = create_split_outputs(output_base, weights.len())?;
                stats.outputs = pool
                    .paths()
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect();
                Box::new(pool)
            };
            let tally = split_weighted(source.by_ref(), &mut splitter, sink.as_mut())?;
            sink.finish()?;
            tally
        }
        SampleMode::Reservoir(k) => {
            let mut reservoir = Reservoir::new(*k, draw);
            for line in source.by_ref() {
                reservoir.consider(line);
            }

            let mut tally = Tally::new(1);
            tally.seen = reservoir.total_seen() as u64;

            // A truncated stream is reported below without flushing a sample of it.
            if source.report().read_error.is_none() {
                let kept = reservoir.into_items();
                tally.per_destination[0] = kept.len() as u64;
                tally.discarded = tally.seen - kept.len() as u64;

                let mut sink = open_single_output(&config, &mut stats)?;
                for line in &kept {
                    sink.write_line(0, line)?;
                }
                sink.finish()?;
            }
            tally
        }
    };

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    let report = source.into_report();
    stats.lines_read = report.lines_read;
    stats.lines_emitted = tally.emitted();
    stats.destinations = tally.per_destination;
    stats.discarded = tally.discarded;
    stats.skipped_inputs = report
        .skipped
        .iter()
        .map(|(locator, _)| locator.to_string())
        .collect();

    if let Some((locator, err)) = report.read_error {
        return Err(anyhow::Error::new(err).context(format!(
            "failed reading {} after {} lines",
            locator, report.lines_read
        )));
    }

    log::info!(
        "{} of {} lines emitted, {} discarded",
        stats.lines_emitted,
        stats.lines_read,
        stats.discarded
    );

    Ok(stats)
}

fn describe_mode(mode: &SampleMode) -> String {
    match mode {
        SampleMode::Probability(p) => format!("probability p={p}"),
        SampleMode::Reservoir(k) => format!("reservoir k={k}"),
        SampleMode::Split {
            weights,
            output_base,
        } => format!(
            "split weights=[{}] remainder={:.4} into {}_N",
            weights,
            weights.remainder(),
            output_base.display()
        ),
    }
}

fn open_single_output(
    config: &SampleConfig,
    stats: &mut SampleStats,
) -> anyhow::Result<Box<dyn LineSink>> {
    if config.dry_run {
        return Ok(Box::new(NullSink));
    }

    let sink: Box<dyn LineSink> = match &config.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let file = File::create(path)
                .with_context(|| format!("Cannot create output file: {}", path.display()))?;
            stats.outputs.push(path.display().to_string());
            Box::new(LineWriter::new(file))
        }
        None => Box::new(LineWriter::new(io::stdout())),
    };
    Ok(sink)
}

fn create_split_outputs(base: &Path, count: usize) -> anyhow::Result<WriterPool> {
    if let Some(parent) = base.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    WriterPool::create(base, count)
        .with_context(|| format!("Cannot create split outputs: {}_N", base.display()))
}

fn make_progress_bar(inputs: &[Locator]) -> ProgressBar {
    let total: Option<u64> = if inputs.is_empty() {
        None
    } else {
        inputs
            .iter()
            .map(|locator| match locator {
                Locator::Stdin => None,
                Locator::Path(path) => Some(fs::metadata(path).map(|m| m.len()).unwrap_or(0)),
            })
            .sum()
    };

    let pb = match total {
        Some(len) => {
            let pb = ProgressBar::new(len);
            if let Ok(style) = ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%) {msg}",
            ) {
                pb.set_style(style.progress_chars("█▓▒░  ").tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
            }
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) =
                ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {bytes} {msg}")
            {
                pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
            }
            pb
        }
    };
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb.set_message("Sampling lines...");
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ModeOptions {
        ModeOptions::default()
    }

    #[test]
    fn test_resolve_single_modes() {
        let (mode, output) = ModeOptions {
            probability: Some(0.25),
            ..options()
        }
        .resolve()
        .unwrap();
        assert_eq!(mode, SampleMode::Probability(0.25));
        assert_eq!(output, None);

        let (mode, _) = ModeOptions {
            reservoir: Some(0),
            ..options()
        }
        .resolve()
        .unwrap();
        assert_eq!(mode, SampleMode::Reservoir(0));
    }

    #[test]
    fn test_resolve_conflicts() {
        let err = ModeOptions {
            probability: Some(0.5),
            reservoir: Some(10),
            ..options()
        }
        .resolve()
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::ConflictingModes("--probability and --reservoir".to_string())
        );

        let err = ModeOptions {
            reservoir: Some(10),
            split: Some("0.5,0.5".to_string()),
            output: Some(PathBuf::from("out")),
            ..options()
        }
        .resolve()
        .unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingModes(_)));
    }

    #[test]
    fn test_resolve_missing() {
        assert_eq!(options().resolve().unwrap_err(), ConfigError::MissingMode);
        assert_eq!(
            ModeOptions {
                split: Some("0.5".to_string()),
                ..options()
            }
            .resolve()
            .unwrap_err(),
            ConfigError::MissingOutputBase
        );
    }

    #[test]
    fn test_resolve_split() {
        let (mode, output) = ModeOptions {
            split: Some("1,1".to_string()),
            output: Some(PathBuf::from("parts/base")),
            normalize: true,
            ..options()
        }
        .resolve()
        .unwrap();
        assert_eq!(output, None);
        match mode {
            SampleMode::Split {
                weights,
                output_base,
            } => {
                assert_eq!(weights.weights(), &[0.5, 0.5]);
                assert_eq!(output_base, PathBuf::from("parts/base"));
            }
            other => panic!("unexpected mode {other:?}"),
        }
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = SampleYamlConfig {
            probability: Some(0.1),
            output: Some(PathBuf::from("from_file.txt")),
            ..Default::default()
        };
        let merged = ModeOptions {
            probability: Some(0.9),
            ..options()
        }
        .with_file_defaults(&file);
        assert_eq!(merged.probability, Some(0.9));
        assert_eq!(merged.output, Some(PathBuf::from("from_file.txt")));
    }

    #[test]
    fn test_file_and_cli_modes_conflict() {
        let file = SampleYamlConfig {
            reservoir: Some(5),
            ..Default::default()
        };
        let err = ModeOptions {
            probability: Some(0.5),
            ..options()
        }
        .with_file_defaults(&file)
        .resolve()
        .unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingModes(_)));
    }
}
