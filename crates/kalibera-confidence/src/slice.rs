//! Confidence slicing of sorted statistics
//!
//! Given a sorted sample of simulated statistics, a confidence slice keeps the
//! central `level` share of the sample: `sorted[lower..upper]`. The median of
//! the sample is reported alongside the bounds.

use crate::{ConfRange, IntoConfidenceLevel};
use kalibera_core::{math, Error, Result};
use tracing::debug;

/// Position(s) of the median in a sorted sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MedianIndices {
    /// Odd-length sample
    Single(usize),
    /// Even-length sample: the two middle positions
    Pair(usize, usize),
}

impl MedianIndices {
    fn for_length(length: usize) -> Self {
        if length % 2 == 0 {
            Self::Pair(length / 2 - 1, length / 2)
        } else {
            Self::Single(length / 2)
        }
    }

    /// Median of `sorted` at these positions
    pub fn median(&self, sorted: &[f64]) -> f64 {
        match *self {
            Self::Single(i) => sorted[i],
            Self::Pair(i, j) => math::mean(&[sorted[i], sorted[j]]),
        }
    }
}

/// Boundary and median indices of a confidence slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceIndices {
    /// First index inside the interval
    pub lower: usize,
    /// Median position(s)
    pub median: MedianIndices,
    /// Exclusive upper bound of the interval
    pub upper: usize,
}

/// Indices slicing `level` of a sorted sample of `length` statistics
///
/// # Examples
///
/// ```rust
/// use kalibera_confidence::{confidence_slice_indices, MedianIndices, SliceIndices};
///
/// let indices = confidence_slice_indices(10, "0.8").unwrap();
/// assert_eq!(indices, SliceIndices { lower: 1, median: MedianIndices::Pair(4, 5), upper: 9 });
///
/// // binary floats are rejected
/// assert!(confidence_slice_indices(10, 0.8).is_err());
/// ```
pub fn confidence_slice_indices<L: IntoConfidenceLevel>(
    length: usize,
    level: L,
) -> Result<SliceIndices> {
    let level = level.into_confidence_level()?;
    if length == 0 {
        return Err(Error::empty_input());
    }

    let indices = SliceIndices {
        lower: level.lower_index(length),
        median: MedianIndices::for_length(length),
        upper: level.upper_index(length),
    };
    debug!(length, %level, ?indices, "confidence slice indices");
    Ok(indices)
}

/// Confidence slice of `values`, which need not be sorted
pub fn confidence_slice<L: IntoConfidenceLevel>(values: &[f64], level: L) -> Result<ConfRange> {
    let level = level.into_confidence_level()?;
    confidence_slice_sorted(&math::sorted(values), level)
}

/// Confidence slice of values already sorted ascending
pub fn confidence_slice_sorted<L: IntoConfidenceLevel>(
    sorted: &[f64],
    level: L,
) -> Result<ConfRange> {
    let indices = confidence_slice_indices(sorted.len(), level)?;
    Ok(ConfRange::new(
        sorted[indices.lower],
        indices.median.median(sorted),
        sorted[indices.upper - 1],
    ))
}
