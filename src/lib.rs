//! Single-pass sampling and partitioning of line streams.
//!
//! The [`sample`] module holds the algorithms (Bernoulli sampling, Algorithm-R
//! reservoir sampling, weighted partitioning) and the run driver. [`source`]
//! turns inputs into one sequence of lines, [`writer`] receives the output,
//! and [`draw`] supplies the randomness every algorithm is handed explicitly.

pub mod draw;
pub mod error;
pub mod progress;
pub mod sample;
pub mod source;
pub mod writer;

pub use draw::{RandomDraw, RngDraw};
pub use error::ConfigError;
