//! Core types for rigorous benchmarking statistics
//!
//! This crate provides the hierarchical dataset abstraction that the variance
//! and confidence crates build on, together with the small capabilities they
//! share:
//!
//! - [`HierarchicalDataset`]: nested measurements with memoized level means
//! - [`UniformSource`]: injectable uniform-integer randomness for resampling
//! - [`QuantileTable`]: injectable Student-t quantile lookup
//! - [`Error`] / [`Result`]: the error type used across the workspace
//!
//! # Example
//!
//! ```rust
//! use kalibera_core::HierarchicalDataset;
//! use std::collections::HashMap;
//!
//! // Three compilations, two executions each, two iterations per execution
//! let dataset = HierarchicalDataset::new(
//!     HashMap::from([
//!         (vec![0, 0], vec![9.0, 5.0]),
//!         (vec![0, 1], vec![8.0, 3.0]),
//!         (vec![1, 0], vec![10.0, 6.0]),
//!         (vec![1, 1], vec![7.0, 11.0]),
//!         (vec![2, 0], vec![1.0, 12.0]),
//!         (vec![2, 1], vec![2.0, 4.0]),
//!     ]),
//!     vec![3, 2, 2],
//! )
//! .unwrap();
//!
//! assert_eq!(dataset.mean(&[]).unwrap(), 6.5);
//! assert_eq!(dataset.mean(&[1, 1]).unwrap(), 9.0);
//! ```

pub mod dataset;
pub mod error;
pub mod math;
pub mod memo;
pub mod quantile;
pub mod random;

// Re-export core types
pub use dataset::{HierarchicalDataset, IndexIter};
pub use error::{Error, Result};
pub use memo::{Memo, MemoStats};
pub use quantile::{
    student_t_975, QuantileTable, StudentTTable, DEFAULT_QUANTILE_PROBABILITY, DEFAULT_TABLE_SIZE,
};
pub use random::{thread_source, RngSource, SequenceSource, UniformSource};
