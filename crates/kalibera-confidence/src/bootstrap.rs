//! Bootstrap confidence intervals for hierarchical datasets
//!
//! Two layers are provided:
//!
//! - Free functions taking an injected [`UniformSource`]. One source is
//!   consumed sequentially across all iterations, which makes results fully
//!   reproducible with a [`SequenceSource`](kalibera_core::SequenceSource).
//! - [`Bootstrap`], an engine configured by [`BootstrapConfig`] that derives
//!   one generator per iteration from a base seed. Iterations are then
//!   independent and can run on the rayon pool while producing the same
//!   statistics as a sequential run.

use crate::resample::{check_pairs, resampled_geomean, resampled_mean, resampled_quotient};
use crate::{slice, ConfRange, ConfidenceLevel, IntoConfidenceLevel};
use kalibera_core::{math, Error, HierarchicalDataset, Result, RngSource, UniformSource};
use rand::prelude::*;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default number of resamples behind a bootstrap interval
pub const DEFAULT_BOOTSTRAP_ITERATIONS: usize = 10_000;

/// Default number of simulated means
pub const DEFAULT_MEANS_ITERATIONS: usize = 1_000;

fn check_iterations(iterations: usize) -> Result<()> {
    if iterations == 0 {
        return Err(Error::InvalidParameter(
            "Number of bootstrap iterations must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Run `statistic` once per iteration and sort the results
fn simulate<S, F>(iterations: usize, source: &mut S, mut statistic: F) -> Result<Vec<f64>>
where
    S: UniformSource,
    F: FnMut(&mut S) -> Result<f64>,
{
    check_iterations(iterations)?;
    let mut values = (0..iterations)
        .map(|_| statistic(&mut *source))
        .collect::<Result<Vec<f64>>>()?;
    math::sort_ascending(&mut values);
    Ok(values)
}

/// Sorted means of `iterations` nested resamples
///
/// # Examples
///
/// ```rust
/// use kalibera_confidence::bootstrap_means;
/// use kalibera_core::{HierarchicalDataset, SequenceSource};
///
/// let dataset = HierarchicalDataset::from_rows(
///     vec![2, 2],
///     vec![vec![1.0, 2.0], vec![3.0, 4.0]],
/// ).unwrap();
///
/// let mut source = SequenceSource::new(vec![1]);
/// let means = bootstrap_means(&dataset, 3, &mut source).unwrap();
/// assert_eq!(means, vec![4.0, 4.0, 4.0]);
/// ```
#[instrument(
    level = "debug",
    skip_all,
    fields(iterations = iterations, leaves = dataset.leaf_count())
)]
pub fn bootstrap_means<S: UniformSource>(
    dataset: &HierarchicalDataset,
    iterations: usize,
    source: &mut S,
) -> Result<Vec<f64>> {
    simulate(iterations, source, |source| resampled_mean(dataset, source))
}

/// Confidence interval of the mean from `iterations` resamples
#[instrument(level = "debug", skip_all, fields(iterations = iterations))]
pub fn bootstrap_confidence_interval<L, S>(
    dataset: &HierarchicalDataset,
    iterations: usize,
    level: L,
    source: &mut S,
) -> Result<ConfRange>
where
    L: IntoConfidenceLevel,
    S: UniformSource,
{
    let level = level.into_confidence_level()?;
    let means = bootstrap_means(dataset, iterations, source)?;
    slice::confidence_slice_sorted(&means, level)
}

/// Confidence interval of `mean(a) / mean(b)`
///
/// Each iteration resamples `a` and then `b` from the same source. A
/// resampled denominator of exactly zero yields `+inf` for that iteration.
#[instrument(level = "debug", skip_all, fields(iterations = iterations))]
pub fn bootstrap_quotient<L, S>(
    a: &HierarchicalDataset,
    b: &HierarchicalDataset,
    iterations: usize,
    level: L,
    source: &mut S,
) -> Result<ConfRange>
where
    L: IntoConfidenceLevel,
    S: UniformSource,
{
    let level = level.into_confidence_level()?;
    let ratios = simulate(iterations, source, |source| resampled_quotient(a, b, source))?;
    slice::confidence_slice_sorted(&ratios, level)
}

/// Confidence interval of the geometric mean of paired mean ratios
///
/// `list_a[k]` is compared with `list_b[k]`. Unequal lengths fail before
/// any resampling takes place.
#[instrument(level = "debug", skip_all, fields(iterations = iterations, pairs = list_a.len()))]
pub fn bootstrap_geomean<L, S>(
    list_a: &[HierarchicalDataset],
    list_b: &[HierarchicalDataset],
    iterations: usize,
    level: L,
    source: &mut S,
) -> Result<ConfRange>
where
    L: IntoConfidenceLevel,
    S: UniformSource,
{
    check_pairs(list_a, list_b)?;
    let level = level.into_confidence_level()?;
    let geomeans = simulate(iterations, source, |source| {
        resampled_geomean(list_a, list_b, source)
    })?;
    slice::confidence_slice_sorted(&geomeans, level)
}

/// Configuration of the seeded bootstrap engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootstrapConfig {
    iterations: usize,
    confidence_level: ConfidenceLevel,
    seed: Option<u64>,
    parallel: bool,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_BOOTSTRAP_ITERATIONS,
            confidence_level: ConfidenceLevel::NINETY_FIVE,
            seed: None,
            parallel: cfg!(feature = "parallel"),
        }
    }
}

impl BootstrapConfig {
    /// Default configuration: 10 000 iterations at 95%
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of bootstrap iterations
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        assert!(iterations > 0, "Number of iterations must be positive");
        self.iterations = iterations;
        self
    }

    /// Set the confidence level
    pub fn with_confidence_level(mut self, confidence_level: ConfidenceLevel) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    /// Set random seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run iterations on the rayon pool
    ///
    /// Ignored unless the `parallel` feature is enabled.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn confidence_level(&self) -> ConfidenceLevel {
        self.confidence_level
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }
}

/// Seeded bootstrap engine
///
/// Iteration `i` draws from `StdRng::seed_from_u64(seed + i)`, so a fixed
/// seed gives the same interval whether iterations run sequentially or in
/// parallel.
///
/// # Examples
///
/// ```rust
/// use kalibera_confidence::{Bootstrap, BootstrapConfig};
/// use kalibera_core::HierarchicalDataset;
///
/// let dataset = HierarchicalDataset::from_rows(
///     vec![3, 2],
///     vec![vec![9.0, 5.0], vec![8.0, 3.0], vec![10.0, 6.0]],
/// ).unwrap();
///
/// let bootstrap = Bootstrap::new(BootstrapConfig::new().with_iterations(500).with_seed(42));
/// let range = bootstrap.confidence_interval(&dataset).unwrap();
/// assert!(range.lower <= range.median && range.median <= range.upper);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Bootstrap {
    config: BootstrapConfig,
}

impl Bootstrap {
    /// Create an engine from a configuration
    pub fn new(config: BootstrapConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Evaluate `statistic` once per iteration with its own generator
    fn simulate<F>(&self, statistic: F) -> Result<Vec<f64>>
    where
        F: Fn(&mut RngSource<StdRng>) -> Result<f64> + Sync + Send,
    {
        let iterations = self.config.iterations;
        check_iterations(iterations)?;
        let seed = self.config.seed.unwrap_or_else(|| thread_rng().gen());

        debug!(
            "Running {} bootstrap iterations (parallel: {})",
            iterations, self.config.parallel
        );

        let run = |i: usize| {
            let mut source = RngSource::new(StdRng::seed_from_u64(seed.wrapping_add(i as u64)));
            statistic(&mut source)
        };

        #[cfg(feature = "parallel")]
        let values: Result<Vec<f64>> = if self.config.parallel {
            (0..iterations).into_par_iter().map(run).collect()
        } else {
            (0..iterations).map(run).collect()
        };

        #[cfg(not(feature = "parallel"))]
        let values: Result<Vec<f64>> = (0..iterations).map(run).collect();

        let mut values = values?;
        math::sort_ascending(&mut values);
        Ok(values)
    }

    /// Sorted means of the configured number of resamples
    #[instrument(skip_all, fields(iterations = self.config.iterations))]
    pub fn means(&self, dataset: &HierarchicalDataset) -> Result<Vec<f64>> {
        self.simulate(|source| resampled_mean(dataset, source))
    }

    /// Confidence interval of the mean
    #[instrument(skip_all, fields(iterations = self.config.iterations))]
    pub fn confidence_interval(&self, dataset: &HierarchicalDataset) -> Result<ConfRange> {
        let means = self.means(dataset)?;
        slice::confidence_slice_sorted(&means, self.config.confidence_level)
    }

    /// Confidence interval of `mean(a) / mean(b)`
    #[instrument(skip_all, fields(iterations = self.config.iterations))]
    pub fn quotient(&self, a: &HierarchicalDataset, b: &HierarchicalDataset) -> Result<ConfRange> {
        let ratios = self.simulate(|source| resampled_quotient(a, b, source))?;
        slice::confidence_slice_sorted(&ratios, self.config.confidence_level)
    }

    /// Confidence interval of the geometric mean of paired mean ratios
    #[instrument(skip_all, fields(iterations = self.config.iterations, pairs = list_a.len()))]
    pub fn geomean(
        &self,
        list_a: &[HierarchicalDataset],
        list_b: &[HierarchicalDataset],
    ) -> Result<ConfRange> {
        check_pairs(list_a, list_b)?;
        let geomeans = self.simulate(|source| resampled_geomean(list_a, list_b, source))?;
        slice::confidence_slice_sorted(&geomeans, self.config.confidence_level)
    }
}
