//! Injectable sources of uniform random integers
//!
//! Resampling only ever needs "an integer in `[0, bound)`". [`UniformSource`]
//! is that capability; [`RngSource`] adapts any `rand` generator to it and
//! [`SequenceSource`] replays a fixed sequence so that bootstrap results are
//! reproducible in tests.

use rand::Rng;

/// Capability to draw uniform integers
pub trait UniformSource {
    /// Draw an integer uniformly from `[0, bound)`; `bound` is at least 1
    fn next_index(&mut self, bound: usize) -> usize;
}

impl<S: UniformSource + ?Sized> UniformSource for &mut S {
    fn next_index(&mut self, bound: usize) -> usize {
        (**self).next_index(bound)
    }
}

/// Adapter from a `rand` generator
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    /// Wrap a generator
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Recover the wrapped generator
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> UniformSource for RngSource<R> {
    fn next_index(&mut self, bound: usize) -> usize {
        self.rng.gen_range(0..bound)
    }
}

/// Source drawing from the thread-local generator
pub fn thread_source() -> RngSource<rand::rngs::ThreadRng> {
    RngSource::new(rand::thread_rng())
}

/// Deterministic source replaying a fixed sequence
///
/// Values are reduced modulo the requested bound and the sequence restarts
/// from the beginning once exhausted.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<usize>,
    position: usize,
}

impl SequenceSource {
    /// Create a source replaying `values`
    ///
    /// # Panics
    /// Panics if `values` is empty
    pub fn new(values: Vec<usize>) -> Self {
        assert!(!values.is_empty(), "Sequence must not be empty");
        Self {
            values,
            position: 0,
        }
    }

    /// Number of draws made so far
    pub fn draws(&self) -> usize {
        self.position
    }
}

impl UniformSource for SequenceSource {
    fn next_index(&mut self, bound: usize) -> usize {
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value % bound
    }
}
