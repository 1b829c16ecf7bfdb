//! Fork-join loop helpers used by the tiled engines
//!
//! Every engine is a data-parallel loop over independent tile coordinates.
//! These helpers hide the `rayon` feature gate: with the feature on, loops run
//! on the client's pool with its `min_len`; without it they run serially in
//! index order.

use super::client::TiledClient;
use crate::dtype::Element;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

impl TiledClient {
    /// Call `f(i)` for every `i` in `0..n`, in any order.
    #[cfg(feature = "rayon")]
    pub(crate) fn for_each_index<F>(&self, n: usize, f: F)
    where
        F: Fn(usize) + Send + Sync,
    {
        let min_len = self.rayon_min_len();
        self.install_parallelism(|| {
            (0..n).into_par_iter().with_min_len(min_len).for_each(&f);
        });
    }

    #[cfg(not(feature = "rayon"))]
    pub(crate) fn for_each_index<F>(&self, n: usize, f: F)
    where
        F: Fn(usize) + Send + Sync,
    {
        (0..n).for_each(f);
    }

    /// Consume `items`, calling `f` on each one, in any order.
    #[cfg(feature = "rayon")]
    pub(crate) fn for_each_item<I, F>(&self, items: Vec<I>, f: F)
    where
        I: Send,
        F: Fn(I) + Send + Sync,
    {
        let min_len = self.rayon_min_len();
        self.install_parallelism(|| {
            items.into_par_iter().with_min_len(min_len).for_each(&f);
        });
    }

    #[cfg(not(feature = "rayon"))]
    pub(crate) fn for_each_item<I, F>(&self, items: Vec<I>, f: F)
    where
        I: Send,
        F: Fn(I) + Send + Sync,
    {
        items.into_iter().for_each(f);
    }

    /// Sum `f(i)` over `0..n` with an associative tree reduction.
    ///
    /// The combination order depends on how work is split across threads, so
    /// floating point results may differ in the last bits between thread
    /// counts.
    #[cfg(feature = "rayon")]
    pub(crate) fn sum_indices<T, F>(&self, n: usize, f: F) -> T
    where
        T: Element,
        F: Fn(usize) -> T + Send + Sync,
    {
        let min_len = self.rayon_min_len();
        self.install_parallelism(|| {
            (0..n)
                .into_par_iter()
                .with_min_len(min_len)
                .map(&f)
                .reduce(T::zero, |acc, v| acc + v)
        })
    }

    #[cfg(not(feature = "rayon"))]
    pub(crate) fn sum_indices<T, F>(&self, n: usize, f: F) -> T
    where
        T: Element,
        F: Fn(usize) -> T + Send + Sync,
    {
        (0..n).map(f).fold(T::zero(), |acc, v| acc + v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::ParallelismConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_for_each_index_visits_all() {
        let client = TiledClient::new();
        let hits: Vec<AtomicUsize> = (0..100).map(|_| AtomicUsize::new(0)).collect();
        client.for_each_index(100, |i| {
            hits[i].fetch_add(1, Ordering::Relaxed);
        });
        assert!(hits.iter().all(|h| h.load(Ordering::Relaxed) == 1));
    }

    #[test]
    fn test_for_each_item_disjoint_slices() {
        let client = TiledClient::new()
            .with_parallelism(ParallelismConfig::new(Some(2), Some(2)))
            .unwrap();
        let mut data = vec![0usize; 10];
        let chunks: Vec<(usize, &mut [usize])> = data.chunks_mut(3).enumerate().collect();
        client.for_each_item(chunks, |(i, chunk)| chunk.fill(i + 1));
        assert_eq!(data, vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 4]);
    }

    #[test]
    fn test_sum_indices() {
        let client = TiledClient::new();
        let total: f64 = client.sum_indices(1000, |i| i as f64);
        assert_eq!(total, 499_500.0);
        let empty: f64 = client.sum_indices(0, |_| 1.0);
        assert_eq!(empty, 0.0);
    }
}
