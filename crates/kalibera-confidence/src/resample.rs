//! Nested resampling of hierarchical datasets
//!
//! Every level is resampled with replacement and with its original
//! cardinality, so a resample has exactly as many leaves as the dataset it was
//! drawn from. The indices of one level are all drawn before descending into
//! any of them.

use kalibera_core::{math, Error, HierarchicalDataset, Result, UniformSource};

/// Resample the subtree below `prefix`
///
/// With a full-length prefix the result is the single measurement it
/// addresses.
///
/// # Examples
///
/// ```rust
/// use kalibera_confidence::random_measurement_sample;
/// use kalibera_core::{HierarchicalDataset, SequenceSource};
///
/// let dataset = HierarchicalDataset::from_rows(
///     vec![2, 2],
///     vec![vec![1.0, 2.0], vec![3.0, 4.0]],
/// ).unwrap();
///
/// // outer draws 0, 1; then leaves 1, 0 under [0] and 0, 0 under [1]
/// let mut source = SequenceSource::new(vec![0, 1, 1, 0, 0, 0]);
/// let sample = random_measurement_sample(&dataset, &[], &mut source).unwrap();
/// assert_eq!(sample, vec![2.0, 1.0, 3.0, 3.0]);
/// ```
pub fn random_measurement_sample<S: UniformSource>(
    dataset: &HierarchicalDataset,
    prefix: &[usize],
    source: &mut S,
) -> Result<Vec<f64>> {
    let levels = dataset.levels();
    if prefix.len() > levels {
        return Err(Error::size_mismatch(levels, prefix.len(), "resample prefix"));
    }

    let below: usize = dataset.reps()[prefix.len()..].iter().product();
    let mut sample = Vec::with_capacity(below);
    let mut index = prefix.to_vec();
    sample_into(dataset, &mut index, source, &mut sample)?;
    Ok(sample)
}

fn sample_into<S: UniformSource>(
    dataset: &HierarchicalDataset,
    index: &mut Vec<usize>,
    source: &mut S,
    sample: &mut Vec<f64>,
) -> Result<()> {
    let depth = index.len();
    if depth == dataset.levels() {
        sample.push(dataset.at(index)?);
        return Ok(());
    }

    let count = dataset.reps()[depth];
    let drawn: Vec<usize> = (0..count).map(|_| source.next_index(count)).collect();
    for choice in drawn {
        index.push(choice);
        sample_into(dataset, index, source, sample)?;
        index.pop();
    }
    Ok(())
}

/// One nested bootstrap resample of the whole dataset
pub fn bootstrap_sample<S: UniformSource>(
    dataset: &HierarchicalDataset,
    source: &mut S,
) -> Result<Vec<f64>> {
    random_measurement_sample(dataset, &[], source)
}

/// Mean of one resample
pub(crate) fn resampled_mean<S: UniformSource>(
    dataset: &HierarchicalDataset,
    source: &mut S,
) -> Result<f64> {
    Ok(math::mean(&bootstrap_sample(dataset, source)?))
}

/// Ratio of resampled means, `a` drawn before `b`
///
/// A zero denominator gives `+inf`.
pub(crate) fn resampled_quotient<S: UniformSource>(
    a: &HierarchicalDataset,
    b: &HierarchicalDataset,
    source: &mut S,
) -> Result<f64> {
    let numerator = resampled_mean(a, source)?;
    let denominator = resampled_mean(b, source)?;
    if denominator == 0.0 {
        Ok(f64::INFINITY)
    } else {
        Ok(numerator / denominator)
    }
}

/// Geometric mean of the resampled quotients of each pair
pub(crate) fn resampled_geomean<S: UniformSource>(
    list_a: &[HierarchicalDataset],
    list_b: &[HierarchicalDataset],
    source: &mut S,
) -> Result<f64> {
    let ratios = list_a
        .iter()
        .zip(list_b)
        .map(|(a, b)| resampled_quotient(a, b, &mut *source))
        .collect::<Result<Vec<f64>>>()?;
    Ok(math::geomean(&ratios))
}

/// Validate paired dataset lists before any resampling
pub(crate) fn check_pairs(
    list_a: &[HierarchicalDataset],
    list_b: &[HierarchicalDataset],
) -> Result<()> {
    if list_a.len() != list_b.len() {
        return Err(Error::LengthMismatch {
            left: list_a.len(),
            right: list_b.len(),
        });
    }
    if list_a.is_empty() {
        return Err(Error::empty_input());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kalibera_core::SequenceSource;

    fn small() -> HierarchicalDataset {
        HierarchicalDataset::from_rows(vec![2, 2], vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap()
    }

    #[test]
    fn test_outer_indices_drawn_before_descending() {
        let dataset = small();
        let mut source = SequenceSource::new(vec![0, 1, 1, 0, 0, 0]);
        let sample = bootstrap_sample(&dataset, &mut source).unwrap();
        assert_eq!(sample, vec![2.0, 1.0, 3.0, 3.0]);
        assert_eq!(source.draws(), 6);
    }

    #[test]
    fn test_full_prefix_returns_single_measurement() {
        let dataset = small();
        let mut source = SequenceSource::new(vec![0]);
        let sample = random_measurement_sample(&dataset, &[1, 0], &mut source).unwrap();
        assert_eq!(sample, vec![3.0]);
        assert_eq!(source.draws(), 0);
    }

    #[test]
    fn test_partial_prefix_resamples_subtree() {
        let dataset = small();
        let mut source = SequenceSource::new(vec![1, 1]);
        let sample = random_measurement_sample(&dataset, &[0], &mut source).unwrap();
        assert_eq!(sample, vec![2.0, 2.0]);
    }

    #[test]
    fn test_prefix_too_long() {
        let dataset = small();
        let mut source = SequenceSource::new(vec![0]);
        assert!(random_measurement_sample(&dataset, &[0, 0, 0], &mut source).is_err());
    }

    #[test]
    fn test_sample_size_matches_leaf_count() {
        let dataset = HierarchicalDataset::from_rows(
            vec![3, 2],
            vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]],
        )
        .unwrap();
        let mut source = SequenceSource::new(vec![2, 0, 1, 1, 0, 1, 1]);
        let sample = bootstrap_sample(&dataset, &mut source).unwrap();
        assert_eq!(sample.len(), dataset.leaf_count());
    }

    #[test]
    fn test_quotient_zero_denominator() {
        let a = small();
        let b = HierarchicalDataset::from_rows(vec![2, 2], vec![vec![0.0, 0.0], vec![0.0, 0.0]])
            .unwrap();
        let mut source = SequenceSource::new(vec![0, 1]);
        assert_eq!(resampled_quotient(&a, &b, &mut source).unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_check_pairs() {
        assert_eq!(
            check_pairs(&[small()], &[]),
            Err(Error::LengthMismatch { left: 1, right: 0 })
        );
        assert!(matches!(
            check_pairs(&[], &[]),
            Err(Error::InsufficientData { .. })
        ));
        assert!(check_pairs(&[small()], &[small()]).is_ok());
    }
}
