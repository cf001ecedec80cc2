//! Student-t quantile lookup
//!
//! The analytic confidence interval needs the Student-t quantile for the
//! top-level degrees of freedom. Quantiles are looked up through the
//! [`QuantileTable`] trait so callers can inject their own table; the
//! default table is computed once from `statrs` and shared process-wide.

use crate::{Error, Result};
use lazy_static::lazy_static;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Number of degrees of freedom tabulated by the default table
pub const DEFAULT_TABLE_SIZE: usize = 1000;

/// Quantile probability of the default table (two-sided 95% interval)
pub const DEFAULT_QUANTILE_PROBABILITY: f64 = 0.975;

/// Read-only lookup of Student-t quantiles by degrees of freedom
pub trait QuantileTable {
    /// Quantile for `degrees_of_freedom`
    ///
    /// Degrees of freedom past the end of the table use the last entry, since
    /// the quantile converges as the degrees of freedom grow.
    fn lookup(&self, degrees_of_freedom: usize) -> Result<f64>;
}

impl<T: QuantileTable + ?Sized> QuantileTable for &T {
    fn lookup(&self, degrees_of_freedom: usize) -> Result<f64> {
        (**self).lookup(degrees_of_freedom)
    }
}

/// Precomputed quantile table; entry `d - 1` holds the quantile for `d` degrees of freedom
#[derive(Debug, Clone, PartialEq)]
pub struct StudentTTable {
    values: Vec<f64>,
}

impl StudentTTable {
    /// Tabulate the Student-t quantile at `probability` for `1..=size` degrees of freedom
    pub fn compute(probability: f64, size: usize) -> Result<Self> {
        if !(probability > 0.0 && probability < 1.0) {
            return Err(Error::InvalidParameter(format!(
                "Quantile probability {probability} must be in (0, 1)"
            )));
        }
        if size == 0 {
            return Err(Error::InvalidParameter(
                "Quantile table must have at least one entry".to_string(),
            ));
        }

        let values = (1..=size)
            .map(|df| {
                let t_dist = StudentsT::new(0.0, 1.0, df as f64).map_err(|e| {
                    Error::Computation(format!("Failed to create t-distribution: {e}"))
                })?;
                Ok(t_dist.inverse_cdf(probability))
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok(Self { values })
    }

    /// Use an externally supplied table
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::InvalidParameter(
                "Quantile table must have at least one entry".to_string(),
            ));
        }
        Ok(Self { values })
    }

    /// Number of tabulated degrees of freedom
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; construction rejects empty tables
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl QuantileTable for StudentTTable {
    fn lookup(&self, degrees_of_freedom: usize) -> Result<f64> {
        if degrees_of_freedom == 0 {
            return Err(Error::InvalidParameter(
                "Student-t quantile needs at least one degree of freedom".to_string(),
            ));
        }
        let index = (degrees_of_freedom - 1).min(self.values.len() - 1);
        Ok(self.values[index])
    }
}

lazy_static! {
    static ref STUDENT_T_975: Result<StudentTTable> =
        StudentTTable::compute(DEFAULT_QUANTILE_PROBABILITY, DEFAULT_TABLE_SIZE);
}

/// Process-wide table of 97.5% Student-t quantiles, built on first use
pub fn student_t_975() -> Result<&'static StudentTTable> {
    STUDENT_T_975.as_ref().map_err(Clone::clone)
}
