//! Error taxonomy for the pathway test.
//!
//! Every structural check runs before any regression fit or permutation
//! replicate, so a returned error never comes with partial output.

use aspu_linalg::LinalgError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AspuError {
    #[error("Unknown trait kind '{0}' (expected binary/binomial or continuous/gaussian)")]
    InvalidTraitKind(String),

    #[error("Dimension mismatch for {what}: expected {expected}, got {got}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("No gene in the pathway received a mapped SNP")]
    EmptyGeneMapping,

    #[error("Statistic for gene {gene} at power {power} is not a real number")]
    DegenerateStatistic { gene: String, power: String },

    #[error("Permutation count must be at least 1, got {0}")]
    InvalidPermutationCount(usize),

    #[error("Power set is empty")]
    EmptyPowerSet,

    #[error("Invalid power exponent '{0}' (expected a positive number or inf)")]
    InvalidPower(String),

    #[error("Variance cutoff must lie in (0, 1], got {0}")]
    InvalidVarianceCutoff(f64),

    #[error("Regression did not converge after {iterations} iterations")]
    FitNotConverged { iterations: usize },

    #[error(transparent)]
    Linalg(#[from] LinalgError),
}

pub type Result<T> = std::result::Result<T, AspuError>;
