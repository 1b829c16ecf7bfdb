//! Tiled linear-algebra engines
//!
//! Operations are defined by the [`TiledLinalgOps`] trait, implemented by
//! [`TiledClient`](crate::runtime::TiledClient). Each engine reduces a tiled
//! operation to dense per-tile kernels from [`crate::kernels`], skipping tiles
//! that are absent or zero-size.
//!
//! ```text
//! TiledClient
//!   └── implements TiledLinalgOps<T>
//!         ├── dot, true_dot    parallel reduction over shared coordinates
//!         ├── gemm             C = α op(A) op(B) + β C
//!         ├── gemv             y = α op(A) x + β y  (tiled or dense x / y)
//!         ├── direct_product   C = α (A ∘ B) + β C
//!         ├── ger              A += α x yᵀ
//!         └── scale            A *= α on stored tiles
//! ```
//!
//! # Execution model
//!
//! 1. Validate ranks, tile counts and tile sizes sequentially. A failure
//!    returns before any tile is read or written.
//! 2. Run one parallel loop over independent output coordinates on the
//!    client's pool.
//! 3. Inside an iteration, take the output's map lock only to fetch or create
//!    the output tile, then do the arithmetic under that tile's own lock.
//!
//! Output tensors are taken by `&mut`, so no operand can alias an output and
//! each output tile is written by exactly one iteration.

mod direct_product;
mod dot;
mod gemm;
mod gemv;
mod ger;
mod scale;
mod tiled_ops;
mod validate;

pub use crate::kernels::Transpose;
pub use tiled_ops::TiledLinalgOps;
