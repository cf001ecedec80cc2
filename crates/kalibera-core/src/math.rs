//! Numeric helpers shared by the estimators
//!
//! Every mean in the workspace goes through [`mean`], which uses compensated
//! summation so that the result does not depend on how many leaves a level
//! happens to aggregate.

use std::cmp::Ordering;

/// Sum a slice with Neumaier compensation
///
/// Non-finite running sums are returned as-is.
///
/// # Examples
///
/// ```rust
/// use kalibera_core::math::compensated_sum;
///
/// let data = [1e16, 1.0, -1e16];
/// assert_eq!(compensated_sum(&data), 1.0);
/// ```
pub fn compensated_sum(data: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut compensation = 0.0;
    for &x in data {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            compensation += (sum - t) + x;
        } else {
            compensation += (x - t) + sum;
        }
        sum = t;
    }
    if !sum.is_finite() {
        return sum;
    }
    sum + compensation
}

/// Arithmetic mean of a slice
///
/// Returns NaN for empty slices.
///
/// # Examples
///
/// ```rust
/// use kalibera_core::math::mean;
///
/// assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), 2.5);
/// ```
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    compensated_sum(data) / data.len() as f64
}

/// Geometric mean of a slice, computed as the n-th root of the product
///
/// Falls back to the mean of logarithms when the product overflows or
/// underflows. Returns NaN for empty slices.
///
/// # Examples
///
/// ```rust
/// use kalibera_core::math::geomean;
///
/// assert_eq!(geomean(&[10.0, 0.1]), 1.0);
/// ```
pub fn geomean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    let n = data.len() as f64;
    let product: f64 = data.iter().product();
    let underflowed = product == 0.0 && !data.contains(&0.0);
    if product.is_finite() && !underflowed {
        return product.powf(1.0 / n);
    }

    // log-space mean when the raw product leaves the f64 range
    (data.iter().map(|x| x.ln()).sum::<f64>() / n).exp()
}

/// Ordering for sorting statistics ascending
///
/// NaN values go after everything else, infinities keep their natural place.
pub fn ascending(a: &f64, b: &f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
    }
}

/// Sort a slice ascending in place (stable on ties)
pub fn sort_ascending(data: &mut [f64]) {
    data.sort_by(ascending);
}

/// Sort data and return a new vector
///
/// # Examples
///
/// ```rust
/// use kalibera_core::math::sorted;
///
/// let data = vec![3.0, f64::INFINITY, 1.0, 2.0];
/// assert_eq!(sorted(&data), vec![1.0, 2.0, 3.0, f64::INFINITY]);
/// ```
pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sort_ascending(&mut sorted);
    sorted
}
