//! Tiled dot and true_dot
//!
//! Both reduce over the full coordinate space of two identically tiled
//! tensors; a coordinate contributes only if both operands hold a present,
//! non-zero-size tile there. The two variants differ only in the per-tile
//! kernel (`true_dot` conjugates the first operand).

use super::validate;
use crate::dtype::Element;
use crate::error::{GridMismatchKind, Result};
use crate::kernels;
use crate::runtime::TiledClient;
use crate::tiled::TiledTensor;

pub(crate) fn dot<T: Element>(
    client: &TiledClient,
    a: &TiledTensor<T>,
    b: &TiledTensor<T>,
) -> Result<T> {
    reduce_tiles(client, "dot", a, b, kernels::dot::<T>)
}

pub(crate) fn true_dot<T: Element>(
    client: &TiledClient,
    a: &TiledTensor<T>,
    b: &TiledTensor<T>,
) -> Result<T> {
    reduce_tiles(client, "true_dot", a, b, kernels::true_dot::<T>)
}

fn reduce_tiles<T, K>(
    client: &TiledClient,
    op: &'static str,
    a: &TiledTensor<T>,
    b: &TiledTensor<T>,
    kernel: K,
) -> Result<T>
where
    T: Element,
    K: Fn(&[T], &[T]) -> T + Send + Sync,
{
    validate::require_same_rank(op, a, b)?;
    validate::check_same_grid(op, GridMismatchKind::InputInput, a.grid(), b.grid())?;

    let grid = a.grid();
    tracing::debug!(op, dtype = %T::DTYPE, grid = ?grid.dims(), "tiled reduction");

    Ok(client.sum_indices(grid.grid_size(), |index| {
        let coord = grid.unravel(index);
        if !a.has_nonzero_tile(&coord) || !b.has_nonzero_tile(&coord) {
            return T::zero();
        }
        match (a.tile(&coord), b.tile(&coord)) {
            (Some(a_tile), Some(b_tile)) => {
                let a_tile = a_tile.read_recursive();
                let b_tile = b_tile.read_recursive();
                kernel(a_tile.as_slice(), b_tile.as_slice())
            }
            _ => T::zero(),
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::Complex128;
    use crate::tensor::DenseTensor;
    use crate::tiled::TileGrid;

    #[test]
    fn test_dot_skips_missing_tiles() {
        let grid = TileGrid::new(vec![vec![2, 2]]).unwrap();
        let dense = DenseTensor::new([4], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let a = TiledTensor::from_dense(grid.clone(), &dense).unwrap();
        let b = TiledTensor::from_dense_filtered(grid, &dense, |c| c[0] == 1).unwrap();

        let client = TiledClient::new();
        assert_eq!(dot(&client, &a, &b).unwrap(), 25.0);
        assert_eq!(dot(&client, &a, &a).unwrap(), 30.0);
    }

    #[test]
    fn test_true_dot_conjugates_first_operand() {
        let grid = TileGrid::new(vec![vec![1]]).unwrap();
        let dense = DenseTensor::new([1], vec![Complex128::new(1.0, 1.0)]).unwrap();
        let a = TiledTensor::from_dense(grid, &dense).unwrap();

        let client = TiledClient::new();
        // (1+i)² = 2i, conj(1+i)(1+i) = 2
        assert_eq!(dot(&client, &a, &a).unwrap(), Complex128::new(0.0, 2.0));
        assert_eq!(true_dot(&client, &a, &a).unwrap(), Complex128::new(2.0, 0.0));
    }
}
