//! Rigorous benchmarking statistics for nested experiments
//!
//! Benchmark measurements are rarely independent: iterations run inside an
//! execution, executions run on top of a compilation, and each level adds its
//! own variation. This crate re-exports the workspace crates that analyse such
//! designs:
//!
//! - [`kalibera_core`]: the hierarchical dataset, randomness and quantile
//!   capabilities
//! - [`kalibera_variance`]: per-level variance estimators, repetition advice
//!   and the analytic interval
//! - [`kalibera_confidence`]: exact confidence slicing and nested bootstrap
//!   intervals
//!
//! # Example
//!
//! ```rust
//! use kalibera::prelude::*;
//!
//! let dataset = HierarchicalDataset::from_rows(
//!     vec![3, 4],
//!     vec![
//!         vec![9.0, 5.0, 8.0, 3.0],
//!         vec![10.0, 6.0, 7.0, 11.0],
//!         vec![1.0, 12.0, 2.0, 4.0],
//!     ],
//! )
//! .unwrap();
//!
//! let variance = LevelVariance::new(&dataset);
//! let half_width = variance.confidence95().unwrap();
//!
//! let bootstrap = Bootstrap::new(BootstrapConfig::new().with_iterations(2000).with_seed(1));
//! let range = bootstrap.confidence_interval(&dataset).unwrap();
//! assert!(half_width > 0.0 && range.lower < range.upper);
//! ```

pub use kalibera_confidence;
pub use kalibera_core;
pub use kalibera_variance;

pub use kalibera_core::{Error, Result};

/// Commonly used types
pub mod prelude {
    pub use kalibera_confidence::{
        bootstrap_confidence_interval, bootstrap_geomean, bootstrap_means, bootstrap_quotient,
        confidence_slice, Bootstrap, BootstrapConfig, ConfRange, ConfidenceLevel,
    };
    pub use kalibera_core::{HierarchicalDataset, QuantileTable, StudentTTable, UniformSource};
    pub use kalibera_variance::{ExperimentDesign, LevelVariance};
}
