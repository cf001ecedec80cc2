//! Confidence intervals for nested benchmark experiments
//!
//! This crate turns a [`HierarchicalDataset`](kalibera_core::HierarchicalDataset)
//! into confidence intervals:
//!
//! - **Exact slicing**: boundary indices of a confidence slice computed from a
//!   rational [`ConfidenceLevel`], never from a binary float
//! - **Nested bootstrap**: every level resampled with replacement, keeping the
//!   shape of the original design
//! - **Comparisons**: intervals for the ratio of two experiments and for the
//!   geometric mean of several paired ratios
//!
//! # Examples
//!
//! ## Injected randomness
//!
//! ```rust
//! use kalibera_confidence::{bootstrap_quotient, ConfidenceLevel};
//! use kalibera_core::{HierarchicalDataset, SequenceSource};
//!
//! let before =
//!     HierarchicalDataset::from_rows(vec![2, 2], vec![vec![2.0, 4.0], vec![6.0, 8.0]]).unwrap();
//! let after =
//!     HierarchicalDataset::from_rows(vec![2, 2], vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
//!
//! let mut source = SequenceSource::new(vec![0, 1, 1, 0, 1, 0]);
//! let level = ConfidenceLevel::NINETY_FIVE;
//! let range = bootstrap_quotient(&before, &after, 100, level, &mut source).unwrap();
//! assert!(range.lower <= range.upper);
//! ```
//!
//! ## Seeded engine
//!
//! ```rust
//! use kalibera_confidence::{Bootstrap, BootstrapConfig};
//! use kalibera_core::HierarchicalDataset;
//!
//! let dataset = HierarchicalDataset::from_rows(
//!     vec![2, 3],
//!     vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
//! )
//! .unwrap();
//! let bootstrap = Bootstrap::new(BootstrapConfig::new().with_iterations(1000).with_seed(3));
//! let range = bootstrap.confidence_interval(&dataset).unwrap();
//! println!("mean {range}");
//! ```

mod bootstrap;
mod resample;
mod slice;
mod types;

// Re-exports
pub use bootstrap::{
    bootstrap_confidence_interval, bootstrap_geomean, bootstrap_means, bootstrap_quotient,
    Bootstrap, BootstrapConfig, DEFAULT_BOOTSTRAP_ITERATIONS, DEFAULT_MEANS_ITERATIONS,
};
pub use resample::{bootstrap_sample, random_measurement_sample};
pub use slice::{
    confidence_slice, confidence_slice_indices, confidence_slice_sorted, MedianIndices,
    SliceIndices,
};
pub use types::{ConfRange, ConfidenceLevel, IntoConfidenceLevel};
