mod glob_util;
mod sample;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "linesample")]
#[command(version)]
#[command(
    about = "Sample, downsample or split line-oriented data in a single pass",
    long_about = None
)]
pub struct Cli {
    /// Log what is being read and written (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sample or split lines from files or standard input
    Sample {
        /// Input files or glob patterns, read in order ("-" or none for stdin)
        /// Supports .gz, .bz2, .xz, .zst compression
        inputs: Vec<String>,

        /// Keep each line with probability P in [0, 1]
        #[arg(short, long, value_name = "P")]
        probability: Option<f64>,

        /// Keep a uniform random sample of K lines
        #[arg(short, long, value_name = "K")]
        reservoir: Option<usize>,

        /// Split lines by comma-separated weights (e.g., 0.8,0.1,0.1)
        #[arg(short, long, value_name = "WEIGHTS")]
        split: Option<String>,

        /// Output file (default: stdout); base name of `{base}_{index}` files for --split
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Rescale split weights to sum to 1 instead of discarding the remainder
        #[arg(long)]
        normalize: bool,

        /// YAML config file with default settings
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show progress during sampling
        #[arg(long)]
        progress: bool,

        /// Preview counts without writing output (dry run)
        #[arg(long)]
        dry_run: bool,

        /// Print run statistics as JSON to stderr
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Sample {
            inputs,
            probability,
            reservoir,
            split,
            output,
            normalize,
            config,
            progress,
            dry_run,
            json,
        } => sample::run(
            inputs,
            probability,
            reservoir,
            split,
            output,
            normalize,
            config,
            progress,
            dry_run,
            json,
        ),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "linesample", &mut io::stdout());
            Ok(())
        }
    }
}
