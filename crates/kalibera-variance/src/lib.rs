//! Per-level variance estimation for nested benchmark experiments
//!
//! This crate implements the variance side of rigorous benchmarking:
//!
//! - **Biased estimators** `S_i^2`: spread of the level-`i` means around
//!   their parents
//! - **Unbiased estimators** `T_i^2`: `S_i^2` with the contribution of the
//!   level below removed
//! - **Repetition advice**: optimal repetition counts per level given the
//!   cost of repeating each level
//! - **Analytic intervals**: Student-t half-width of the grand mean
//!
//! # Example
//!
//! ```rust
//! use kalibera_core::HierarchicalDataset;
//! use kalibera_variance::LevelVariance;
//!
//! let dataset = HierarchicalDataset::from_rows(
//!     vec![2, 2, 3],
//!     vec![
//!         vec![3.0, 4.0, 3.0],
//!         vec![1.2, 3.1, 3.0],
//!         vec![0.2, 1.0, 1.5],
//!         vec![1.0, 2.0, 3.0],
//!     ],
//! )
//! .unwrap();
//!
//! let variance = LevelVariance::new(&dataset);
//! let iterations = variance.optimal_reps_rounded(1, &[100.0, 20.0, 3.0]).unwrap();
//! assert_eq!(iterations, 5);
//! ```

mod analytic;
mod design;
mod estimator;

pub use design::{ExperimentDesign, LevelAdvice};
pub use estimator::LevelVariance;
