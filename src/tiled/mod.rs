//! Tiled tensors
//!
//! A tiled tensor is a [`TileGrid`] (how each dimension is cut into tiles)
//! plus a map from tile coordinates to dense tiles. Only tiles that were
//! explicitly stored or created by an operation exist; every other coordinate
//! reads as zero.
//!
//! # Tile states
//!
//! | State      | `has_tile` | `has_zero_size` | Takes part in arithmetic |
//! |------------|------------|-----------------|--------------------------|
//! | absent     | false      | grid-dependent  | no                       |
//! | zero-size  | true       | true            | no                       |
//! | present    | true       | false           | yes                      |
//!
//! # Locking
//!
//! The tile map sits behind a `parking_lot::RwLock`. Sparsity queries take the
//! read side briefly; inserting a tile takes the write side through
//! [`TiledTensor::lock`]. Each tile has its own lock, so once a handle has
//! been obtained the map lock is released and arithmetic proceeds without
//! blocking other coordinates.

mod grid;
mod tensor;
mod vector;

pub use grid::{TileCoord, TileGrid};
pub use tensor::{TileHandle, TileMapGuard, TiledTensor};
pub use vector::{VectorMut, VectorRef};
