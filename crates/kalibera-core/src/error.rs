//! Error types for hierarchical benchmark analysis
//!
//! Provides a unified error type for all kalibera crates.

use thiserror::Error;

/// Core error type for benchmark analysis operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A leaf sequence implied by `reps` is absent at construction time
    #[error("Missing measurements for index prefix {prefix:?}")]
    MissingMeasurements { prefix: Vec<usize> },

    /// A leaf sequence has the wrong number of measurements
    #[error("Leaf sequence at {prefix:?} has {actual} measurements, expected {expected}")]
    LeafLength {
        prefix: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    /// Exact-index lookup failed
    #[error("Index error: {0}")]
    Index(String),

    /// Mathematical level index outside the valid bounds
    #[error("Level {level} out of range for an experiment with {levels} levels")]
    LevelOutOfRange { level: usize, levels: usize },

    /// Cost vector does not have one entry per level
    #[error("Expected {expected} level costs, got {actual}")]
    CostsLength { expected: usize, actual: usize },

    /// A confidence level was supplied in an inexact representation
    #[error("Precision error: {0}")]
    Precision(String),

    /// Paired dataset lists differ in length
    #[error("Length mismatch: {left} datasets paired with {right}")]
    LengthMismatch { left: usize, right: usize },

    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} values, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Memo table error
    #[error("Cache error: {0}")]
    Cache(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for empty input
    pub fn empty_input() -> Self {
        Self::InsufficientData {
            expected: 1,
            actual: 0,
        }
    }

    /// Create an error for a level outside `[1, levels]`
    pub fn level_out_of_range(level: usize, levels: usize) -> Self {
        Self::LevelOutOfRange { level, levels }
    }

    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::Index(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for a poisoned memo lock
    pub fn poisoned(context: &str) -> Self {
        Self::Cache(format!("{context} lock poisoned"))
    }
}
