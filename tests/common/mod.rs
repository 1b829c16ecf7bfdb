//! Common test utilities
#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tiled_linalg::ops::Transpose;
use tiled_linalg::runtime::{ParallelismConfig, TiledClient};
use tiled_linalg::tensor::DenseTensor;
use tiled_linalg::tiled::{TileGrid, TiledTensor};

/// Client on the global rayon pool
pub fn create_client() -> TiledClient {
    TiledClient::new()
}

/// Client on a dedicated pool with `threads` workers and per-task granularity 1
pub fn create_client_with_threads(threads: usize) -> TiledClient {
    TiledClient::new()
        .with_parallelism(ParallelismConfig::new(Some(threads), Some(1)))
        .expect("thread pool")
}

/// Client on a dedicated single-thread pool
pub fn create_serial_client() -> TiledClient {
    TiledClient::new()
        .with_parallelism(ParallelismConfig::serial())
        .expect("thread pool")
}

/// Deterministic RNG for reproducible fixtures
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Dense tensor with entries drawn uniformly from [-1, 1)
pub fn random_dense(rng: &mut StdRng, shape: &[usize]) -> DenseTensor<f64> {
    DenseTensor::from_fn(shape, |_| rng.random_range(-1.0..1.0))
}

/// Tiled tensor whose tiles are each stored with probability `density`
///
/// The returned dense tensor is the exact reconstruction (absent tiles zero).
pub fn random_tiled(
    rng: &mut StdRng,
    grid: &TileGrid,
    density: f64,
) -> (TiledTensor<f64>, DenseTensor<f64>) {
    let dense = random_dense(rng, &grid.extents());
    let tiled = TiledTensor::from_dense_filtered(grid.clone(), &dense, |_| rng.random_bool(density))
        .expect("dense shape matches grid");
    let reconstructed = tiled.to_dense();
    (tiled, reconstructed)
}

/// Reference `C = alpha * op(A) * op(B) + beta * C` on dense row-major matrices
pub fn reference_gemm(
    trans_a: Transpose,
    trans_b: Transpose,
    alpha: f64,
    a: &DenseTensor<f64>,
    b: &DenseTensor<f64>,
    beta: f64,
    c: &DenseTensor<f64>,
) -> Vec<f64> {
    let at = |i: usize, k: usize| match trans_a {
        Transpose::NoTrans => a.get(&[i, k]),
        Transpose::Trans => a.get(&[k, i]),
    };
    let bt = |k: usize, j: usize| match trans_b {
        Transpose::NoTrans => b.get(&[k, j]),
        Transpose::Trans => b.get(&[j, k]),
    };
    let (m, n) = (c.shape()[0], c.shape()[1]);
    let depth = if trans_a.is_trans() { a.shape()[0] } else { a.shape()[1] };

    let mut out = Vec::with_capacity(m * n);
    for i in 0..m {
        for j in 0..n {
            let mut acc = 0.0;
            for k in 0..depth {
                acc += at(i, k).unwrap() * bt(k, j).unwrap();
            }
            out.push(alpha * acc + beta * c.get(&[i, j]).unwrap());
        }
    }
    out
}

/// Reference `y = alpha * op(A) * x + beta * y`
pub fn reference_gemv(
    trans: Transpose,
    alpha: f64,
    a: &DenseTensor<f64>,
    x: &[f64],
    beta: f64,
    y: &[f64],
) -> Vec<f64> {
    let (rows, cols) = (a.shape()[0], a.shape()[1]);
    let (m, depth) = if trans.is_trans() { (cols, rows) } else { (rows, cols) };
    (0..m)
        .map(|i| {
            let acc: f64 = (0..depth)
                .map(|k| {
                    let v = if trans.is_trans() {
                        a.get(&[k, i])
                    } else {
                        a.get(&[i, k])
                    };
                    v.unwrap() * x[k]
                })
                .sum();
            alpha * acc + beta * y[i]
        })
        .collect()
}
