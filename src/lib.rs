//! # tiled-linalg
//!
//! **Block-sparse linear algebra over tensors partitioned into grids of tiles.**
//!
//! A [`TiledTensor`](tiled::TiledTensor) splits each dimension into a sequence
//! of tile sizes. Every coordinate of the resulting tile grid may hold a dense
//! tile, hold nothing, or describe a tile of zero extent. The engines in
//! [`ops`] run BLAS-style operations over such tensors by dispatching dense
//! kernels to the tiles that carry data, in parallel across output tiles.
//!
//! ## Features
//!
//! - **Engines**: dot, true_dot, gemm, gemv, direct product, ger, scale
//! - **Sparsity-aware**: absent and zero-size tiles are skipped, output tiles
//!   are created lazily and only where something contributes
//! - **Tile-aligned validation**: grid and tile-size mismatches are reported
//!   before any tile is touched
//! - **Element types**: f32, f64, i32, i64, Complex64, Complex128
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tiled_linalg::prelude::*;
//!
//! let grid = TileGrid::new(vec![vec![2, 3], vec![2, 3]])?;
//! let a = TiledTensor::from_dense(grid.clone(), &dense_a)?;
//! let b = TiledTensor::from_dense(grid.clone(), &dense_b)?;
//! let mut c = TiledTensor::zeros(grid);
//!
//! let client = TiledClient::new();
//! client.gemm(Transpose::NoTrans, Transpose::Trans, 1.0, &a, &b, 0.0, &mut c)?;
//! let norm2 = client.dot(&c, &c)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): run the engines on a rayon thread pool; without it
//!   every engine runs serially with the same results
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (`debug` per engine call and validation
//! failure, `trace` per created tile) and never installs a subscriber.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dtype;
pub mod error;
pub mod kernels;
pub mod ops;
pub mod runtime;
pub mod tensor;
pub mod tiled;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{Complex128, Complex64, DType, Element};
    pub use crate::error::{Error, GridMismatchKind, Result};
    pub use crate::ops::{TiledLinalgOps, Transpose};
    pub use crate::runtime::{ParallelismConfig, TiledClient};
    pub use crate::tensor::{DenseTensor, Shape};
    pub use crate::tiled::{TileGrid, TiledTensor, VectorMut, VectorRef};
}
