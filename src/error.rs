//! Configuration errors reported before any input is consumed.

use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("only one of --probability, --reservoir or --split may be given (got {0})")]
    ConflictingModes(String),
    #[error("no sampling mode given: use --probability, --reservoir or --split")]
    MissingMode,
    #[error("--split requires an output base name (-o/--output)")]
    MissingOutputBase,
    #[error("probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),
    #[error("bad weight string: {0:?}")]
    InvalidWeight(String),
    #[error("weights must be finite and non-negative, got {0}")]
    NegativeWeight(f64),
    #[error("weight list is empty")]
    EmptyWeights,
    #[error("weights sum to zero and cannot be normalized")]
    ZeroWeightSum,
    #[error("weights sum to {0}, which exceeds 1; pass --normalize to rescale them")]
    WeightSumExceedsOne(f64),
}
