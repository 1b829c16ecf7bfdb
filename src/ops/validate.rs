//! Grid compatibility checks shared by the tiled engines
//!
//! All checks run sequentially before an engine's parallel region starts, so
//! a failing call returns without touching any tile.

use crate::dtype::Element;
use crate::error::{Error, GridMismatchKind, Result};
use crate::tiled::{TileGrid, TiledTensor};

fn reject<T>(err: Error) -> Result<T> {
    tracing::debug!(error = %err, "tiled operand validation failed");
    Err(err)
}

/// Require `tensor` to have exactly `rank` dimensions
pub(crate) fn require_rank<T: Element>(
    op: &'static str,
    tensor: &TiledTensor<T>,
    rank: usize,
) -> Result<()> {
    if tensor.rank() != rank {
        return reject(Error::rank_mismatch(op, rank, tensor.rank()));
    }
    Ok(())
}

/// Require two tensors to share a rank
pub(crate) fn require_same_rank<T: Element>(
    op: &'static str,
    reference: &TiledTensor<T>,
    other: &TiledTensor<T>,
) -> Result<()> {
    if reference.rank() != other.rank() {
        return reject(Error::rank_mismatch(op, reference.rank(), other.rank()));
    }
    Ok(())
}

/// Compare tile counts along one axis pair
pub(crate) fn check_grid_count(
    op: &'static str,
    kind: GridMismatchKind,
    expected: usize,
    got: usize,
) -> Result<()> {
    if expected != got {
        return reject(Error::grid_mismatch(op, kind, expected, got));
    }
    Ok(())
}

/// Compare tile sizes element by element; counts are assumed to agree
pub(crate) fn check_tile_sizes(op: &'static str, expected: &[usize], got: &[usize]) -> Result<()> {
    debug_assert_eq!(expected.len(), got.len());
    match expected.iter().zip(got).position(|(e, g)| e != g) {
        Some(index) => reject(Error::tile_dimension(op, index, expected[index], got[index])),
        None => Ok(()),
    }
}

/// Whole tiling of `other[other_dim]` against `reference[ref_dim]`
///
/// Both a count and a size difference are grid mismatches of `kind`; a size
/// difference reports the first differing pair of tile sizes.
pub(crate) fn check_vector_tiling(
    op: &'static str,
    kind: GridMismatchKind,
    reference: &TileGrid,
    ref_dim: usize,
    other: &TileGrid,
    other_dim: usize,
) -> Result<()> {
    check_grid_count(
        op,
        kind,
        reference.grid_dim(ref_dim),
        other.grid_dim(other_dim),
    )?;
    let (expected, got) = (reference.tile_sizes(ref_dim), other.tile_sizes(other_dim));
    match expected.iter().zip(got).find(|(e, g)| e != g) {
        Some((&e, &g)) => reject(Error::grid_mismatch(op, kind, e, g)),
        None => Ok(()),
    }
}

/// Every dimension of `other` tiled exactly like `reference`
pub(crate) fn check_same_grid(
    op: &'static str,
    kind: GridMismatchKind,
    reference: &TileGrid,
    other: &TileGrid,
) -> Result<()> {
    for d in 0..reference.rank() {
        check_grid_count(op, kind, reference.grid_dim(d), other.grid_dim(d))?;
    }
    for d in 0..reference.rank() {
        check_tile_sizes(op, reference.tile_sizes(d), other.tile_sizes(d))?;
    }
    Ok(())
}

/// Length of a dense vector operand against the extent it must cover
pub(crate) fn check_dense_len(expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return reject(Error::shape_mismatch(&[expected], &[got]));
    }
    Ok(())
}
