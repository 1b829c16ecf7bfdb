//! Tiled matrix product: `C = alpha * op(A) * op(B) + beta * C`
//!
//! # Algorithm
//!
//! ```text
//! validate grids (counts, then per-tile sizes)
//! parallel for (i, j) in C's grid:
//!     skip if C(i, j) is zero-size
//!     modified = any k with A'(i, k) and B'(k, j) present and non-zero-size
//!     if modified:
//!         lock C; fetch-or-create C(i, j); unlock
//!         zero C(i, j) if newly created or beta == 0, else scale by beta
//!         for each contributing k: C(i, j) += alpha * A'(i, k) * B'(k, j)
//!     else if C(i, j) is stored:
//!         zero it if beta == 0, else scale by beta
//! ```
//!
//! `A'` / `B'` are A and B after the transpose flags are applied; the tiles
//! are looked up at swapped coordinates rather than being transposed.
//!
//! The dry-run pass keeps output tiles that receive no contribution from
//! being allocated. An existing tile with no contribution and `beta == 0` is
//! zeroed in place; its slot stays in the map.

use super::validate;
use crate::dtype::Element;
use crate::error::{GridMismatchKind, Result};
use crate::kernels::{self, Transpose};
use crate::runtime::TiledClient;
use crate::tiled::TiledTensor;

const OP: &str = "gemm";

/// Stored coordinate of logical tile `(row, col)` of `op(X)`
#[inline]
fn stored_coord(trans: Transpose, row: usize, col: usize) -> [usize; 2] {
    match trans {
        Transpose::NoTrans => [row, col],
        Transpose::Trans => [col, row],
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn gemm<T: Element>(
    client: &TiledClient,
    trans_a: Transpose,
    trans_b: Transpose,
    alpha: T,
    a: &TiledTensor<T>,
    b: &TiledTensor<T>,
    beta: T,
    c: &mut TiledTensor<T>,
) -> Result<()> {
    validate::require_rank(OP, a, 2)?;
    validate::require_rank(OP, b, 2)?;
    validate::require_rank(OP, c, 2)?;

    let (a_rows, a_inner) = trans_a.axes();
    let (b_inner, b_cols) = trans_b.axes();

    validate::check_grid_count(
        OP,
        GridMismatchKind::OutputInput,
        a.grid_dim(a_rows),
        c.grid_dim(0),
    )?;
    validate::check_grid_count(
        OP,
        GridMismatchKind::OutputInput,
        b.grid_dim(b_cols),
        c.grid_dim(1),
    )?;
    validate::check_grid_count(
        OP,
        GridMismatchKind::InputInput,
        a.grid_dim(a_inner),
        b.grid_dim(b_inner),
    )?;
    validate::check_tile_sizes(OP, a.tile_sizes(a_rows), c.tile_sizes(0))?;
    validate::check_tile_sizes(OP, b.tile_sizes(b_cols), c.tile_sizes(1))?;
    validate::check_tile_sizes(OP, a.tile_sizes(a_inner), b.tile_sizes(b_inner))?;

    let c: &TiledTensor<T> = c;
    let (rows, cols, depth) = (c.grid_dim(0), c.grid_dim(1), a.grid_dim(a_inner));
    tracing::debug!(
        ?trans_a,
        ?trans_b,
        dtype = %T::DTYPE,
        rows,
        cols,
        depth,
        "tiled gemm"
    );

    let contributes = |i: usize, j: usize, k: usize| {
        a.has_nonzero_tile(&stored_coord(trans_a, i, k))
            && b.has_nonzero_tile(&stored_coord(trans_b, k, j))
    };

    client.for_each_index(rows * cols, |index| {
        let (i, j) = (index / cols, index % cols);
        let out_coord = [i, j];
        if c.has_zero_size(&out_coord) {
            return;
        }

        let modified = (0..depth).any(|k| contributes(i, j, k));

        if !modified {
            let existing = c.lock().get(&out_coord);
            if let Some(tile) = existing {
                let mut tile = tile.write();
                if beta.is_zero() {
                    tile.zero();
                } else {
                    tile.scale(beta);
                }
            }
            return;
        }

        let (tile, created) = c.lock().get_or_create(&out_coord);
        let mut c_tile = tile.write();
        if created || beta.is_zero() {
            c_tile.zero();
        } else {
            c_tile.scale(beta);
        }

        for k in 0..depth {
            if !contributes(i, j, k) {
                continue;
            }
            let (Some(a_tile), Some(b_tile)) = (
                a.tile(&stored_coord(trans_a, i, k)),
                b.tile(&stored_coord(trans_b, k, j)),
            ) else {
                continue;
            };
            let a_tile = a_tile.read_recursive();
            let b_tile = b_tile.read_recursive();
            kernels::gemm(trans_a, trans_b, alpha, &a_tile, &b_tile, T::one(), &mut c_tile);
        }
    });

    Ok(())
}
