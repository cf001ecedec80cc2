//! Shared fixtures for integration tests

#![allow(dead_code)]

pub use approx::assert_abs_diff_eq;

use kalibera_core::HierarchicalDataset;
use std::collections::HashMap;

pub const EPSILON: f64 = 1e-10;

/// Three compilations x two executions x two iterations
pub fn worked_three_level() -> HierarchicalDataset {
    HierarchicalDataset::new(
        HashMap::from([
            (vec![0, 0], vec![9.0, 5.0]),
            (vec![0, 1], vec![8.0, 3.0]),
            (vec![1, 0], vec![10.0, 6.0]),
            (vec![1, 1], vec![7.0, 11.0]),
            (vec![2, 0], vec![1.0, 12.0]),
            (vec![2, 1], vec![2.0, 4.0]),
        ]),
        vec![3, 2, 2],
    )
    .unwrap()
}

/// Two compilations x two executions x five iterations
pub fn compile_exec_iter() -> HierarchicalDataset {
    HierarchicalDataset::new(
        HashMap::from([
            (vec![0, 0], vec![3.0, 4.0, 4.0, 1.0, 2.0]),
            (vec![0, 1], vec![3.0, 3.0, 3.0, 3.0, 3.0]),
            (vec![1, 0], vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            (vec![1, 1], vec![1.0, 1.0, 4.0, 4.0, 1.0]),
        ]),
        vec![2, 2, 5],
    )
    .unwrap()
}

/// Build a dataset with `reps` whose leaves are `f(flat_position)`
pub fn generated(reps: &[usize], f: impl Fn(usize) -> f64) -> HierarchicalDataset {
    let leaf = reps[reps.len() - 1];
    let rows: usize = reps[..reps.len() - 1].iter().product();
    let rows = (0..rows)
        .map(|row| (0..leaf).map(|k| f(row * leaf + k)).collect::<Vec<f64>>())
        .collect::<Vec<_>>();
    HierarchicalDataset::from_rows(reps.to_vec(), rows).unwrap()
}
