//! Tiled elementwise product: `C = alpha * (A ∘ B) + beta * C`
//!
//! Only coordinates where both A and B carry data are visited. Other C tiles
//! are left exactly as they were: no zeroing, no beta scaling.

use super::validate;
use crate::dtype::Element;
use crate::error::{GridMismatchKind, Result};
use crate::kernels;
use crate::runtime::TiledClient;
use crate::tiled::TiledTensor;

const OP: &str = "direct_product";

pub(crate) fn direct_product<T: Element>(
    client: &TiledClient,
    alpha: T,
    a: &TiledTensor<T>,
    b: &TiledTensor<T>,
    beta: T,
    c: &mut TiledTensor<T>,
) -> Result<()> {
    validate::require_same_rank(OP, a, b)?;
    validate::require_same_rank(OP, a, c)?;
    validate::check_same_grid(OP, GridMismatchKind::InputInput, a.grid(), b.grid())?;
    validate::check_same_grid(OP, GridMismatchKind::OutputInput, a.grid(), c.grid())?;

    let c: &TiledTensor<T> = c;
    let grid = a.grid();
    tracing::debug!(dtype = %T::DTYPE, grid = ?grid.dims(), "tiled direct product");

    client.for_each_index(grid.grid_size(), |index| {
        let coord = grid.unravel(index);
        if !a.has_nonzero_tile(&coord) || !b.has_nonzero_tile(&coord) {
            return;
        }
        let (Some(a_tile), Some(b_tile)) = (a.tile(&coord), b.tile(&coord)) else {
            return;
        };
        let (c_tile, _) = c.lock().get_or_create(&coord);
        let a_tile = a_tile.read_recursive();
        let b_tile = b_tile.read_recursive();
        let mut c_tile = c_tile.write();
        kernels::direct_product(
            alpha,
            a_tile.as_slice(),
            b_tile.as_slice(),
            beta,
            c_tile.as_mut_slice(),
        );
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::tensor::DenseTensor;
    use crate::tiled::TileGrid;

    #[test]
    fn test_only_shared_coordinates_written() {
        let client = TiledClient::new();
        let grid = TileGrid::new(vec![vec![2, 2]]).unwrap();
        let dense = DenseTensor::new([4], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let a = TiledTensor::from_dense(grid.clone(), &dense).unwrap();
        let b = TiledTensor::from_dense_filtered(grid.clone(), &dense, |c| c[0] == 0).unwrap();
        let mut c = TiledTensor::from_dense_filtered(grid, &dense, |c| c[0] == 1).unwrap();

        direct_product(&client, 2.0, &a, &b, 1.0, &mut c).unwrap();
        assert_eq!(c.to_dense().as_slice(), &[2.0, 8.0, 3.0, 4.0]);
    }

    #[test]
    fn test_output_grid_checked() {
        let client = TiledClient::new();
        let a = TiledTensor::<f64>::zeros(TileGrid::new(vec![vec![2, 2]]).unwrap());
        let mut c = TiledTensor::<f64>::zeros(TileGrid::new(vec![vec![4]]).unwrap());
        let err = direct_product(&client, 1.0, &a, &a, 0.0, &mut c).unwrap_err();
        assert_eq!(err.grid_mismatch_kind(), Some(GridMismatchKind::OutputInput));

        let mut c = TiledTensor::<f64>::zeros(TileGrid::new(vec![vec![2], vec![2]]).unwrap());
        let err = direct_product(&client, 1.0, &a, &a, 0.0, &mut c).unwrap_err();
        assert!(matches!(err, Error::RankMismatch { .. }));
    }
}
