//! Biased and unbiased per-level variance estimators
//!
//! For an experiment with `n` levels, `S_i^2` is the biased variance of the
//! level-`i` means around their parent means, and `T_i^2` removes the share
//! of `S_i^2` that is inherited from the level below:
//!
//! ```text
//! T_1^2 = S_1^2
//! T_i^2 = S_i^2 - S_{i-1}^2 / r_{i-1}        (i > 1)
//! ```
//!
//! Levels use the 1-based mathematical index (`i = 1` is the leaf level).

use kalibera_core::{Error, HierarchicalDataset, Memo, Result};
use num_traits::ToPrimitive;
use tracing::debug;

/// Variance estimators over one dataset
///
/// Results are memoized per level; the dataset is immutable so entries never
/// go stale.
#[derive(Debug)]
pub struct LevelVariance<'a> {
    data: &'a HierarchicalDataset,
    si2: Memo<usize, f64>,
    ti2: Memo<usize, f64>,
}

impl<'a> LevelVariance<'a> {
    /// Create estimators for `data`
    pub fn new(data: &'a HierarchicalDataset) -> Self {
        Self {
            data,
            si2: Memo::new("Si2"),
            ti2: Memo::new("Ti2"),
        }
    }

    /// The dataset being analysed
    pub fn dataset(&self) -> &'a HierarchicalDataset {
        self.data
    }

    fn check_level(&self, level: usize) -> Result<()> {
        let n = self.data.levels();
        if level < 1 || level > n {
            return Err(Error::level_out_of_range(level, n));
        }
        Ok(())
    }

    /// Biased estimator `S_i^2` for mathematical level `level`
    ///
    /// A level with a single repetition divides by zero and yields a
    /// non-finite value.
    pub fn si2(&self, level: usize) -> Result<f64> {
        self.check_level(level)?;
        self.si2.get_or_try_compute(level, |&level| {
            let reps = self.data.reps();
            let index = self.data.levels() - level;

            // 1 / (r_0 * ... * r_{index-1} * (r_index - 1)), one division at a time
            let mut factor = 1.0;
            for &rep in &reps[..index] {
                factor /= rep as f64;
            }
            factor /= (reps[index] - 1) as f64;

            let mut sum = 0.0;
            for tuple in self.data.index_iterator(0, index + 1)? {
                let own = self.data.mean(&tuple)?;
                let parent = self.data.mean(&tuple[..tuple.len() - 1])?;
                sum += (own - parent).powi(2);
            }

            Ok(factor * sum)
        })
    }

    /// Unbiased estimator `T_i^2` for mathematical level `level`
    pub fn ti2(&self, level: usize) -> Result<f64> {
        self.check_level(level)?;
        self.ti2.get_or_try_compute(level, |&level| {
            if level == 1 {
                return self.si2(1);
            }
            Ok(self.si2(level)? - self.si2(level - 1)? / self.data.reps_at(level - 1)? as f64)
        })
    }

    /// Unrounded optimal repetition count for level `level` (`1 <= level < n`)
    ///
    /// `costs` holds one cost per level in the same outermost-first order as
    /// the dataset's `reps`. Negative `T_i^2` ratios give NaN; rounding is
    /// left to the caller (see [`optimal_reps_rounded`](Self::optimal_reps_rounded)).
    pub fn optimal_reps<C: ToPrimitive>(&self, level: usize, costs: &[C]) -> Result<f64> {
        let n = self.data.levels();
        if level < 1 || level >= n {
            return Err(Error::level_out_of_range(level, n));
        }
        if costs.len() != n {
            return Err(Error::CostsLength {
                expected: n,
                actual: costs.len(),
            });
        }

        let index = n - level;
        let cost = |k: usize| {
            costs[k].to_f64().ok_or_else(|| {
                Error::InvalidParameter(format!("Cost at position {k} is not representable as f64"))
            })
        };

        let ratio = cost(index - 1)? / cost(index)? * self.ti2(level)? / self.ti2(level + 1)?;
        Ok(ratio.sqrt())
    }

    /// Optimal repetition count for level `level`, rounded up
    pub fn optimal_reps_rounded<C: ToPrimitive>(&self, level: usize, costs: &[C]) -> Result<usize> {
        let reps = self.optimal_reps(level, costs)?;
        if !reps.is_finite() {
            debug!(level, reps, "optimal repetitions undefined");
            return Err(Error::Computation(format!(
                "Optimal repetitions for level {level} are undefined ({reps})"
            )));
        }
        Ok(reps.ceil() as usize)
    }
}
