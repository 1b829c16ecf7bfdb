//! Tiled rank-1 update: `A += alpha * x * yᵀ`

use super::validate;
use crate::dtype::Element;
use crate::error::{GridMismatchKind, Result};
use crate::kernels;
use crate::runtime::TiledClient;
use crate::tiled::TiledTensor;

const OP: &str = "ger";

pub(crate) fn ger<T: Element>(
    client: &TiledClient,
    alpha: T,
    x: &TiledTensor<T>,
    y: &TiledTensor<T>,
    a: &mut TiledTensor<T>,
) -> Result<()> {
    validate::require_rank(OP, x, 1)?;
    validate::require_rank(OP, y, 1)?;
    validate::require_rank(OP, a, 2)?;
    validate::check_grid_count(OP, GridMismatchKind::OutputInput, x.grid_dim(0), a.grid_dim(0))?;
    validate::check_grid_count(OP, GridMismatchKind::OutputInput, y.grid_dim(0), a.grid_dim(1))?;
    validate::check_tile_sizes(OP, x.tile_sizes(0), a.tile_sizes(0))?;
    validate::check_tile_sizes(OP, y.tile_sizes(0), a.tile_sizes(1))?;

    let a: &TiledTensor<T> = a;
    let (rows, cols) = (x.grid_dim(0), y.grid_dim(0));
    tracing::debug!(dtype = %T::DTYPE, rows, cols, "tiled ger");

    client.for_each_index(rows * cols, |index| {
        let (i, j) = (index / cols, index % cols);
        if !x.has_nonzero_tile(&[i]) || !y.has_nonzero_tile(&[j]) {
            return;
        }
        let (Some(x_tile), Some(y_tile)) = (x.tile(&[i]), y.tile(&[j])) else {
            return;
        };
        let (a_tile, _) = a.lock().get_or_create(&[i, j]);
        let x_tile = x_tile.read_recursive();
        let y_tile = y_tile.read_recursive();
        kernels::ger(alpha, x_tile.as_slice(), y_tile.as_slice(), &mut a_tile.write());
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::DenseTensor;
    use crate::tiled::TileGrid;

    #[test]
    fn test_ger_skips_absent_vector_tiles() {
        let client = TiledClient::new();
        let vgrid = TileGrid::new(vec![vec![1, 1]]).unwrap();
        let v = DenseTensor::new([2], vec![2.0, 3.0]).unwrap();
        let x = TiledTensor::from_dense(vgrid.clone(), &v).unwrap();
        let y = TiledTensor::from_dense_filtered(vgrid, &v, |c| c[0] == 1).unwrap();
        let mut a = TiledTensor::zeros(TileGrid::new(vec![vec![1, 1], vec![1, 1]]).unwrap());

        ger(&client, 1.0, &x, &y, &mut a).unwrap();
        assert_eq!(a.num_stored(), 2);
        assert!(!a.has_tile(&[0, 0]));
        assert_eq!(a.to_dense().as_slice(), &[0.0, 6.0, 0.0, 9.0]);
    }

    #[test]
    fn test_ger_column_mismatch_alone_fails() {
        let client = TiledClient::new();
        let x = TiledTensor::<f64>::zeros(TileGrid::new(vec![vec![1, 1]]).unwrap());
        let y = TiledTensor::<f64>::zeros(TileGrid::new(vec![vec![2]]).unwrap());
        let mut a = TiledTensor::zeros(TileGrid::new(vec![vec![1, 1], vec![1, 1]]).unwrap());
        let err = ger(&client, 1.0, &x, &y, &mut a).unwrap_err();
        assert_eq!(err.grid_mismatch_kind(), Some(GridMismatchKind::OutputInput));
    }
}
