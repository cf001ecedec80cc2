//! Integration tests for hierarchical datasets

mod common;

use common::*;
use kalibera_core::{Error, HierarchicalDataset};
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

#[test]
fn test_worked_example_level_means() {
    let data = worked_three_level();

    let correct = HashMap::from([
        (vec![0, 0], 7.0),
        (vec![0, 1], 5.5),
        (vec![1, 0], 8.0),
        (vec![1, 1], 9.0),
        (vec![2, 0], 6.5),
        (vec![2, 1], 3.0),
    ]);

    for index in data.index_iterator(0, 2).unwrap() {
        assert_eq!(data.mean(&index).unwrap(), correct[&index]);
    }
    assert_eq!(data.mean(&[]).unwrap(), 6.5);
}

#[test]
fn test_nested_means_by_level() {
    let d = compile_exec_iter();

    // grand mean over every timing
    let all = [
        3.0, 4.0, 4.0, 1.0, 2.0, 3.0, 3.0, 3.0, 3.0, 3.0, 1.0, 2.0, 3.0, 4.0, 5.0, 1.0, 1.0, 4.0,
        4.0, 1.0,
    ];
    let expect = all.iter().sum::<f64>() / all.len() as f64;
    assert_abs_diff_eq!(d.mean(&[]).unwrap(), expect, epsilon = EPSILON);

    // one compilation
    let second = [1.0, 2.0, 3.0, 4.0, 5.0, 1.0, 1.0, 4.0, 4.0, 1.0];
    let expect = second.iter().sum::<f64>() / second.len() as f64;
    assert_abs_diff_eq!(d.mean(&[1]).unwrap(), expect, epsilon = EPSILON);

    // one compilation/execution pair
    assert_eq!(d.mean(&[0, 1]).unwrap(), 3.0);
}

#[test]
fn test_shared_dataset_across_threads() {
    let data = Arc::new(worked_three_level());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let data = Arc::clone(&data);
            thread::spawn(move || {
                data.index_iterator(0, 2)
                    .unwrap()
                    .map(|index| data.mean(&index).unwrap())
                    .collect::<Vec<f64>>()
            })
        })
        .collect();

    let results: Vec<Vec<f64>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for result in &results[1..] {
        assert_eq!(result, &results[0]);
    }
    assert_eq!(data.memo_stats().entries, 6);
}

#[test]
fn test_index_iterator_is_restartable() {
    let data = worked_three_level();
    let first: Vec<_> = data.index_iterator(0, 3).unwrap().collect();
    let second: Vec<_> = data.index_iterator(0, 3).unwrap().collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), data.leaf_count());
}

fn reps_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..4, 1..5)
}

proptest! {
    // Property: the empty-prefix mean is the flat mean at any nesting depth
    #[test]
    fn prop_grand_mean_is_flat_mean(reps in reps_strategy(), scale in 0.5f64..100.0) {
        let data = generated(&reps, |k| ((k * 7919) % 101) as f64 * scale);
        let flat = data.values();
        let expect = flat.iter().sum::<f64>() / flat.len() as f64;
        prop_assert!((data.mean(&[]).unwrap() - expect).abs() <= 1e-9 * expect.abs().max(1.0));
    }

    // Property: construction fails iff a required leaf sequence is missing
    #[test]
    fn prop_construction_requires_every_prefix(
        reps in reps_strategy(),
        pick in any::<prop::sample::Index>(),
    ) {
        prop_assume!(reps.len() >= 2);
        let n = reps.len();
        let prefixes: Vec<Vec<usize>> = kalibera_core::IndexIter::new(&reps[..n - 1]).collect();
        let leaf = reps[n - 1];

        let complete: HashMap<Vec<usize>, Vec<f64>> = prefixes
            .iter()
            .map(|p| (p.clone(), vec![1.0; leaf]))
            .collect();
        prop_assert!(HierarchicalDataset::new(complete.clone(), reps.clone()).is_ok());

        let removed = pick.get(&prefixes).clone();
        let mut incomplete = complete;
        incomplete.remove(&removed);
        prop_assert_eq!(
            HierarchicalDataset::new(incomplete, reps.clone()).unwrap_err(),
            Error::MissingMeasurements { prefix: removed }
        );
    }

    // Property: every tuple from the full iterator resolves to a leaf
    #[test]
    fn prop_full_iterator_resolves(reps in reps_strategy()) {
        let data = generated(&reps, |k| k as f64);
        let values: Vec<f64> = data
            .index_iterator(0, reps.len())
            .unwrap()
            .map(|index| data.at(&index).unwrap())
            .collect();
        prop_assert_eq!(values, data.values());
    }
}
