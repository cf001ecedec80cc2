//! Repetition advice for the next run of an experiment

use crate::LevelVariance;
use kalibera_core::{Error, Result};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Advice for one non-outermost level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelAdvice {
    /// Mathematical level index (1 = leaf level)
    pub level: usize,
    /// Repetitions used in the analysed experiment
    pub current_reps: usize,
    /// Unbiased variance estimate `T_i^2`
    pub ti2: f64,
    /// Unrounded optimal repetitions
    pub optimal: f64,
    /// Optimal repetitions rounded up, if defined
    pub recommended: Option<usize>,
}

/// Variance breakdown and repetition advice for a whole experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentDesign {
    /// `T_i^2` for every level, leaf level first
    pub ti2: Vec<f64>,
    /// Advice for levels `1..n`, leaf level first
    pub levels: Vec<LevelAdvice>,
}

impl ExperimentDesign {
    /// Compute the advice for `variance` given one cost per level (outermost first)
    ///
    /// Levels whose optimal count is undefined (a negative `T_i^2` ratio) get
    /// `recommended: None`.
    pub fn advise<C: ToPrimitive>(variance: &LevelVariance<'_>, costs: &[C]) -> Result<Self> {
        let data = variance.dataset();
        let n = data.levels();
        if costs.len() != n {
            return Err(Error::CostsLength {
                expected: n,
                actual: costs.len(),
            });
        }

        let ti2 = (1..=n)
            .map(|level| variance.ti2(level))
            .collect::<Result<Vec<f64>>>()?;

        let levels = (1..n)
            .map(|level| {
                let optimal = variance.optimal_reps(level, costs)?;
                Ok(LevelAdvice {
                    level,
                    current_reps: data.reps_at(level)?,
                    ti2: ti2[level - 1],
                    optimal,
                    recommended: optimal.is_finite().then(|| optimal.ceil() as usize),
                })
            })
            .collect::<Result<Vec<LevelAdvice>>>()?;

        Ok(Self { ti2, levels })
    }
}

impl fmt::Display for ExperimentDesign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, ti2) in self.ti2.iter().enumerate() {
            writeln!(f, "T{}^2 = {:.4}", k + 1, ti2)?;
        }
        for advice in &self.levels {
            match advice.recommended {
                Some(reps) => writeln!(
                    f,
                    "level {}: {} reps -> {} (optimal {:.4})",
                    advice.level, advice.current_reps, reps, advice.optimal
                )?,
                None => writeln!(
                    f,
                    "level {}: {} reps -> undefined",
                    advice.level, advice.current_reps
                )?,
            }
        }
        Ok(())
    }
}
