//! Analytic confidence half-width from the top-level variance

use crate::LevelVariance;
use kalibera_core::{student_t_975, Error, QuantileTable, Result};
use tracing::debug;

impl LevelVariance<'_> {
    /// 95% confidence half-width of the grand mean using the default Student-t table
    ///
    /// `t(r_n - 1) * sqrt(S_n^2 / r_n)` where `r_n` is the outermost
    /// repetition count.
    pub fn confidence95(&self) -> Result<f64> {
        self.confidence95_with(student_t_975()?)
    }

    /// 95% confidence half-width using an injected quantile table
    pub fn confidence95_with<Q: QuantileTable>(&self, table: Q) -> Result<f64> {
        let data = self.dataset();
        let top_reps = data.reps()[0];
        if top_reps < 2 {
            return Err(Error::InvalidParameter(
                "The outermost level needs at least two repetitions".to_string(),
            ));
        }

        let degrees_of_freedom = top_reps - 1;
        let quantile = table.lookup(degrees_of_freedom)?;
        let half_width = quantile * (self.si2(data.levels())? / top_reps as f64).sqrt();

        debug!(degrees_of_freedom, quantile, half_width, "analytic confidence half-width");
        Ok(half_width)
    }
}
