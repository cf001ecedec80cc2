//! Hierarchical measurement datasets
//!
//! A [`HierarchicalDataset`] stores the measurements of a nested experiment,
//! for example repeated compilations, each with repeated executions, each with
//! repeated iteration timings.
//!
//! # Level indexing
//!
//! `reps` is ordered from the outermost level to the innermost (leaf) level.
//! Externally, levels are named by a 1-based *mathematical index* `i` where
//! `i = 1` is the leaf level and `i = n` the outermost; the storage position
//! of level `i` is `n - i`.

use crate::math;
use crate::memo::{Memo, MemoStats};
use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Nested measurements plus per-level repetition counts
///
/// Immutable after construction; level means are memoized.
pub struct HierarchicalDataset {
    reps: Vec<usize>,
    data: HashMap<Vec<usize>, Vec<f64>>,
    means: Memo<Vec<usize>, f64>,
}

impl HierarchicalDataset {
    /// Build a dataset from a map of index prefixes to leaf sequences
    ///
    /// Each key is a tuple of `n - 1` indices (one per non-leaf level) and
    /// each value holds `reps[n - 1]` leaf measurements. Every prefix implied
    /// by `reps` must be present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kalibera_core::HierarchicalDataset;
    /// use std::collections::HashMap;
    ///
    /// let data = HashMap::from([
    ///     (vec![0, 0], vec![1.0, 2.0, 3.0, 4.0, 5.0]),
    ///     (vec![0, 1], vec![3.0, 4.0, 5.0, 6.0, 7.0]),
    /// ]);
    /// let dataset = HierarchicalDataset::new(data, vec![1, 2, 5]).unwrap();
    ///
    /// assert_eq!(dataset.at(&[0, 1, 2]).unwrap(), 5.0);
    /// assert_eq!(dataset.reps_at(1).unwrap(), 5);
    /// ```
    pub fn new(data: HashMap<Vec<usize>, Vec<f64>>, reps: Vec<usize>) -> Result<Self> {
        Self::validate_reps(&reps)?;

        let n = reps.len();
        let leaf_reps = reps[n - 1];
        for prefix in IndexIter::new(&reps[..n - 1]) {
            match data.get(&prefix) {
                None => return Err(Error::MissingMeasurements { prefix }),
                Some(leaves) if leaves.len() != leaf_reps => {
                    return Err(Error::LeafLength {
                        expected: leaf_reps,
                        actual: leaves.len(),
                        prefix,
                    })
                }
                Some(_) => {}
            }
        }

        debug!(levels = n, ?reps, "constructed hierarchical dataset");

        Ok(Self {
            reps,
            data,
            means: Memo::new("level means"),
        })
    }

    /// Build a dataset from leaf rows given in index order
    ///
    /// Row `k` is stored under the `k`-th prefix produced by
    /// `index_iterator(0, n - 1)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kalibera_core::HierarchicalDataset;
    ///
    /// let dataset = HierarchicalDataset::from_rows(
    ///     vec![2, 2],
    ///     vec![vec![1.0, 2.0], vec![3.0, 4.0]],
    /// ).unwrap();
    /// assert_eq!(dataset.at(&[1, 0]).unwrap(), 3.0);
    /// ```
    pub fn from_rows(reps: Vec<usize>, rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::validate_reps(&reps)?;

        let n = reps.len();
        let expected_rows = checked_product(&reps[..n - 1])?;
        if rows.len() != expected_rows {
            return Err(Error::InsufficientData {
                expected: expected_rows,
                actual: rows.len(),
            });
        }

        let data = IndexIter::new(&reps[..n - 1]).zip(rows).collect();
        Self::new(data, reps)
    }

    fn validate_reps(reps: &[usize]) -> Result<()> {
        if reps.is_empty() {
            return Err(Error::InvalidParameter(
                "An experiment needs at least one level".to_string(),
            ));
        }
        if let Some(position) = reps.iter().position(|&r| r == 0) {
            return Err(Error::InvalidParameter(format!(
                "Repetition count at position {position} must be at least 1"
            )));
        }
        checked_product(reps)?;
        Ok(())
    }

    /// Number of levels `n`
    pub fn levels(&self) -> usize {
        self.reps.len()
    }

    /// Repetition counts, outermost level first
    pub fn reps(&self) -> &[usize] {
        &self.reps
    }

    /// Repetition count of the level with mathematical index `level`
    pub fn reps_at(&self, level: usize) -> Result<usize> {
        let n = self.levels();
        if level < 1 || level > n {
            return Err(Error::level_out_of_range(level, n));
        }
        Ok(self.reps[n - level])
    }

    /// Total number of leaf measurements (product of all `reps`)
    pub fn leaf_count(&self) -> usize {
        self.reps.iter().product()
    }

    /// Exact-index lookup of one leaf measurement
    pub fn at(&self, index: &[usize]) -> Result<f64> {
        let n = self.levels();
        if index.len() != n {
            return Err(Error::size_mismatch(n, index.len(), "index tuple"));
        }
        let (prefix, leaf) = index.split_at(n - 1);
        let leaves = self
            .data
            .get(prefix)
            .ok_or_else(|| Error::Index(format!("Unknown index prefix {prefix:?}")))?;
        leaves.get(leaf[0]).copied().ok_or_else(|| {
            Error::Index(format!(
                "Leaf index {} out of bounds at {prefix:?}",
                leaf[0]
            ))
        })
    }

    /// Cartesian product of the index ranges of storage levels `start..stop`
    ///
    /// The first coordinate varies slowest. `start == stop` yields a single
    /// empty tuple.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kalibera_core::HierarchicalDataset;
    ///
    /// let dataset = HierarchicalDataset::from_rows(
    ///     vec![2, 3],
    ///     vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
    /// ).unwrap();
    /// let tuples: Vec<Vec<usize>> = dataset.index_iterator(0, 1).unwrap().collect();
    /// assert_eq!(tuples, vec![vec![0], vec![1]]);
    /// ```
    pub fn index_iterator(&self, start: usize, stop: usize) -> Result<IndexIter> {
        if start > stop || stop > self.levels() {
            return Err(Error::Index(format!(
                "Invalid level range {start}..{stop} for {} levels",
                self.levels()
            )));
        }
        Ok(IndexIter::new(&self.reps[start..stop]))
    }

    /// Arithmetic mean of every leaf whose index begins with `prefix`
    ///
    /// The empty prefix gives the grand mean. Results are memoized per prefix.
    pub fn mean(&self, prefix: &[usize]) -> Result<f64> {
        let n = self.levels();
        if prefix.len() > n {
            return Err(Error::size_mismatch(n, prefix.len(), "mean prefix"));
        }
        if let Some((position, &index)) = prefix
            .iter()
            .enumerate()
            .find(|&(k, &index)| index >= self.reps[k])
        {
            return Err(Error::Index(format!(
                "Index {index} at position {position} exceeds {} repetitions",
                self.reps[position]
            )));
        }

        self.means.get_or_try_compute(prefix.to_vec(), |prefix| {
            let mut index = prefix.clone();
            let values = IndexIter::new(&self.reps[prefix.len()..])
                .map(|suffix| {
                    index.truncate(prefix.len());
                    index.extend_from_slice(&suffix);
                    self.at(&index)
                })
                .collect::<Result<Vec<f64>>>()?;
            Ok(math::mean(&values))
        })
    }

    /// All leaf measurements in index order
    pub fn values(&self) -> Vec<f64> {
        let n = self.levels();
        IndexIter::new(&self.reps[..n - 1])
            .flat_map(|prefix| self.data[&prefix].iter().copied())
            .collect()
    }

    /// Hit/miss statistics of the level-mean memo table
    pub fn memo_stats(&self) -> MemoStats {
        self.means.stats()
    }
}

/// Product of repetition counts, failing instead of overflowing
fn checked_product(reps: &[usize]) -> Result<usize> {
    reps.iter()
        .try_fold(1usize, |acc, &r| acc.checked_mul(r))
        .ok_or_else(|| {
            Error::InvalidParameter(format!(
                "Repetition counts {reps:?} overflow the leaf count"
            ))
        })
}

impl fmt::Debug for HierarchicalDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HierarchicalDataset")
            .field("reps", &self.reps)
            .field("leaf_count", &self.leaf_count())
            .finish()
    }
}

/// Lexicographic iterator over a box of index tuples
///
/// A clone continues independently from the same position; call
/// [`HierarchicalDataset::index_iterator`] again to start over.
#[derive(Debug, Clone)]
pub struct IndexIter {
    bounds: Vec<usize>,
    next: Option<Vec<usize>>,
}

impl IndexIter {
    /// Iterate over `[0, bounds[0]) x ... x [0, bounds[k-1])`
    pub fn new(bounds: &[usize]) -> Self {
        let next = if bounds.contains(&0) {
            None
        } else {
            Some(vec![0; bounds.len()])
        };
        Self {
            bounds: bounds.to_vec(),
            next,
        }
    }
}

impl Iterator for IndexIter {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;

        // odometer increment, last coordinate fastest
        let mut successor = current.clone();
        for position in (0..successor.len()).rev() {
            successor[position] += 1;
            if successor[position] < self.bounds[position] {
                self.next = Some(successor);
                break;
            }
            successor[position] = 0;
        }

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.next {
            None => (0, Some(0)),
            Some(next) => {
                let mut remaining = 0usize;
                for (position, &index) in next.iter().enumerate() {
                    let stride: usize = self.bounds[position + 1..].iter().product();
                    remaining += (self.bounds[position] - 1 - index) * stride;
                }
                (remaining + 1, Some(remaining + 1))
            }
        }
    }
}

impl ExactSizeIterator for IndexIter {}

#[cfg(test)]
mod tests {
    use super::*;

    fn five_wide() -> HierarchicalDataset {
        HierarchicalDataset::new(
            HashMap::from([
                (vec![0, 0], vec![1.0, 2.0, 3.0, 4.0, 5.0]),
                (vec![0, 1], vec![3.0, 4.0, 5.0, 6.0, 7.0]),
            ]),
            vec![1, 2, 5],
        )
        .unwrap()
    }

    #[test]
    fn test_indices() {
        let d = five_wide();
        assert_eq!(d.at(&[0, 0, 0]).unwrap(), 1.0);
        assert_eq!(d.at(&[0, 0, 4]).unwrap(), 5.0);
        assert_eq!(d.at(&[0, 1, 2]).unwrap(), 5.0);
    }

    #[test]
    fn test_at_faults() {
        let d = five_wide();
        assert!(matches!(d.at(&[0, 0]), Err(Error::Index(_))));
        assert!(matches!(d.at(&[0, 0, 0, 0]), Err(Error::Index(_))));
        assert!(matches!(d.at(&[1, 0, 0]), Err(Error::Index(_))));
        assert!(matches!(d.at(&[0, 0, 5]), Err(Error::Index(_))));
    }

    #[test]
    fn test_rep_levels() {
        let d = five_wide();
        assert_eq!(d.reps_at(1).unwrap(), 5);
        assert_eq!(d.reps_at(2).unwrap(), 2);
        assert_eq!(d.reps_at(3).unwrap(), 1);

        assert_eq!(d.reps_at(0), Err(Error::level_out_of_range(0, 3)));
        assert_eq!(d.reps_at(4), Err(Error::level_out_of_range(4, 3)));
        assert!(d.reps_at(666).is_err());
    }

    #[test]
    fn test_index_iter() {
        let d = five_wide();
        let all: Vec<Vec<usize>> = d.index_iterator(0, 3).unwrap().collect();
        assert_eq!(all.len(), 10);
        assert_eq!(all[0], vec![0, 0, 0]);
        assert_eq!(all[4], vec![0, 0, 4]);
        assert_eq!(all[5], vec![0, 1, 0]);
        assert_eq!(all[9], vec![0, 1, 4]);

        let tail: Vec<Vec<usize>> = d.index_iterator(1, 3).unwrap().collect();
        assert_eq!(tail.len(), 10);
        assert_eq!(tail[0], vec![0, 0]);
        assert_eq!(tail[9], vec![1, 4]);

        let first: Vec<Vec<usize>> = d.index_iterator(0, 1).unwrap().collect();
        assert_eq!(first, vec![vec![0]]);
        let second: Vec<Vec<usize>> = d.index_iterator(1, 2).unwrap().collect();
        assert_eq!(second, vec![vec![0], vec![1]]);
    }

    #[test]
    fn test_index_iter_empty_range_yields_empty_tuple() {
        let d = five_wide();
        let tuples: Vec<Vec<usize>> = d.index_iterator(2, 2).unwrap().collect();
        assert_eq!(tuples, vec![Vec::<usize>::new()]);
        assert!(d.index_iterator(2, 1).is_err());
        assert!(d.index_iterator(0, 4).is_err());
    }

    #[test]
    fn test_index_iter_size_hint() {
        let mut iter = IndexIter::new(&[2, 3]);
        assert_eq!(iter.len(), 6);
        iter.next();
        iter.next();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.count(), 4);
    }

    #[test]
    fn test_index_means() {
        let d =
            HierarchicalDataset::new(HashMap::from([(vec![0, 0], vec![0.0, 2.0])]), vec![1, 1, 2])
                .unwrap();

        assert_eq!(d.mean(&[]).unwrap(), 1.0);
        assert_eq!(d.mean(&[0, 0]).unwrap(), 1.0);
        assert_eq!(d.mean(&[0, 0, 0]).unwrap(), d.at(&[0, 0, 0]).unwrap());
        assert_eq!(d.mean(&[0, 0, 1]).unwrap(), d.at(&[0, 0, 1]).unwrap());
    }

    #[test]
    fn test_mean_rejects_bad_prefix() {
        let d = five_wide();
        assert!(matches!(d.mean(&[1]), Err(Error::Index(_))));
        assert!(matches!(d.mean(&[0, 0, 0, 0]), Err(Error::Index(_))));
    }

    #[test]
    fn test_mean_is_memoized() {
        let d = five_wide();
        let first = d.mean(&[0]).unwrap();
        let second = d.mean(&[0]).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
        let stats = d.memo_stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_construction_faults() {
        let missing = HierarchicalDataset::new(
            HashMap::from([(vec![0, 0], vec![1.0, 2.0])]),
            vec![1, 2, 2],
        );
        assert_eq!(
            missing.unwrap_err(),
            Error::MissingMeasurements { prefix: vec![0, 1] }
        );

        let short = HierarchicalDataset::new(
            HashMap::from([(vec![0], vec![1.0, 2.0]), (vec![1], vec![1.0])]),
            vec![2, 2],
        );
        assert_eq!(
            short.unwrap_err(),
            Error::LeafLength {
                prefix: vec![1],
                expected: 2,
                actual: 1
            }
        );

        assert!(HierarchicalDataset::new(HashMap::new(), vec![]).is_err());
        assert!(HierarchicalDataset::new(HashMap::new(), vec![2, 0]).is_err());
    }

    #[test]
    fn test_oversized_reps_rejected() {
        let huge = 1usize << 33;
        assert!(matches!(
            HierarchicalDataset::from_rows(vec![huge, huge, 1], vec![]),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            HierarchicalDataset::new(HashMap::new(), vec![huge, huge, 2]),
            Err(Error::InvalidParameter(_))
        ));
        assert_eq!(checked_product(&[3, 4, 5]).unwrap(), 60);
    }

    #[test]
    fn test_single_level_dataset() {
        let d = HierarchicalDataset::from_rows(vec![4], vec![vec![1.0, 2.0, 3.0, 6.0]]).unwrap();
        assert_eq!(d.levels(), 1);
        assert_eq!(d.at(&[3]).unwrap(), 6.0);
        assert_eq!(d.mean(&[]).unwrap(), 3.0);
    }

    #[test]
    fn test_from_rows_and_values() {
        let d = HierarchicalDataset::from_rows(
            vec![2, 2, 2],
            vec![
                vec![1.0, 2.0],
                vec![3.0, 4.0],
                vec![5.0, 6.0],
                vec![7.0, 8.0],
            ],
        )
        .unwrap();
        assert_eq!(d.at(&[1, 0, 1]).unwrap(), 6.0);
        assert_eq!(d.values(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(d.leaf_count(), 8);

        let wrong = HierarchicalDataset::from_rows(vec![2, 2], vec![vec![1.0, 2.0]]);
        assert!(matches!(wrong, Err(Error::InsufficientData { .. })));
    }
}
