//! Tiled matrix-vector product: `y = alpha * op(A) * x + beta * y`
//!
//! `x` and `y` may each be a rank-1 [`TiledTensor`] or a plain dense slice.
//! The `x` variant is resolved once per call into a [`VectorSource`] and the
//! row loop is monomorphized over it; the `y` variant picks between fetching
//! destination tiles and carving disjoint sub-slices.
//!
//! `y` is scaled by `beta` exactly once, before any accumulation. Row tile `i`
//! then receives `alpha * op(A)(i, j) * x(j)` for every `j` whose A tile is
//! present and non-zero-size.

use super::validate;
use crate::dtype::Element;
use crate::error::{GridMismatchKind, Result};
use crate::kernels::{self, Transpose};
use crate::runtime::TiledClient;
use crate::tiled::{TileGrid, TiledTensor, VectorMut, VectorRef};

const OP: &str = "gemv";

/// Per-tile view of the `x` operand
trait VectorSource<T: Element>: Sync {
    /// Call `f` with segment `j` of the vector, if it holds data
    fn with_segment<F: FnOnce(&[T])>(&self, j: usize, f: F);
}

struct TiledSource<'a, T: Element>(&'a TiledTensor<T>);

impl<T: Element> VectorSource<T> for TiledSource<'_, T> {
    fn with_segment<F: FnOnce(&[T])>(&self, j: usize, f: F) {
        if !self.0.has_nonzero_tile(&[j]) {
            return;
        }
        if let Some(tile) = self.0.tile(&[j]) {
            f(tile.read_recursive().as_slice());
        }
    }
}

struct DenseSource<'a, T: Element> {
    data: &'a [T],
    grid: &'a TileGrid,
    axis: usize,
}

impl<T: Element> VectorSource<T> for DenseSource<'_, T> {
    fn with_segment<F: FnOnce(&[T])>(&self, j: usize, f: F) {
        f(&self.data[self.grid.tile_range(self.axis, j)]);
    }
}

pub(crate) fn gemv<T: Element>(
    client: &TiledClient,
    trans: Transpose,
    alpha: T,
    a: &TiledTensor<T>,
    x: VectorRef<'_, T>,
    beta: T,
    y: VectorMut<'_, T>,
) -> Result<()> {
    validate::require_rank(OP, a, 2)?;
    let (out_axis, in_axis) = trans.axes();

    match x {
        VectorRef::Tiled(x) => {
            validate::require_rank(OP, x, 1)?;
            validate::check_vector_tiling(OP, GridMismatchKind::InputInput, a.grid(), in_axis, x.grid(), 0)?;
        }
        VectorRef::Dense(x) => validate::check_dense_len(a.grid().extent(in_axis), x.len())?,
    }
    match &y {
        VectorMut::Tiled(y) => {
            let y: &TiledTensor<T> = y;
            validate::require_rank(OP, y, 1)?;
            validate::check_vector_tiling(OP, GridMismatchKind::OutputInput, a.grid(), out_axis, y.grid(), 0)?;
        }
        VectorMut::Dense(y) => validate::check_dense_len(a.grid().extent(out_axis), y.len())?,
    }

    tracing::debug!(
        ?trans,
        dtype = %T::DTYPE,
        grid = ?a.grid().dims(),
        x_tiled = x.is_tiled(),
        y_tiled = y.is_tiled(),
        "tiled gemv"
    );

    match x {
        VectorRef::Tiled(x) => run(client, trans, alpha, a, &TiledSource(x), beta, y),
        VectorRef::Dense(data) => {
            let source = DenseSource {
                data,
                grid: a.grid(),
                axis: in_axis,
            };
            run(client, trans, alpha, a, &source, beta, y)
        }
    }
    Ok(())
}

fn run<T: Element, X: VectorSource<T>>(
    client: &TiledClient,
    trans: Transpose,
    alpha: T,
    a: &TiledTensor<T>,
    x: &X,
    beta: T,
    y: VectorMut<'_, T>,
) {
    let (out_axis, in_axis) = trans.axes();
    let depth = a.grid_dim(in_axis);

    let accumulate_row = |i: usize, dest: &mut [T]| {
        for j in 0..depth {
            let coord = match trans {
                Transpose::NoTrans => [i, j],
                Transpose::Trans => [j, i],
            };
            if !a.has_nonzero_tile(&coord) {
                continue;
            }
            let Some(a_tile) = a.tile(&coord) else {
                continue;
            };
            let a_tile = a_tile.read_recursive();
            x.with_segment(j, |x_seg| {
                kernels::gemv(trans, alpha, &a_tile, x_seg, T::one(), dest);
            });
        }
    };

    match y {
        VectorMut::Tiled(y) => {
            if beta != T::one() {
                super::scale::scale(client, beta, y);
            }
            let y: &TiledTensor<T> = y;
            client.for_each_index(y.grid_dim(0), |i| {
                if y.has_zero_size(&[i]) {
                    return;
                }
                let (tile, _) = y.lock().get_or_create(&[i]);
                let mut tile = tile.write();
                accumulate_row(i, tile.as_mut_slice());
            });
        }
        VectorMut::Dense(y) => {
            if beta != T::one() {
                kernels::scale(beta, y);
            }
            let segments = split_segments(y, a.tile_sizes(out_axis));
            client.for_each_item(segments, |(i, dest)| accumulate_row(i, dest));
        }
    }
}

/// Cut `data` into consecutive disjoint segments of the given lengths,
/// dropping empty ones
fn split_segments<'a, T>(data: &'a mut [T], sizes: &[usize]) -> Vec<(usize, &'a mut [T])> {
    let mut rest = data;
    let mut segments = Vec::with_capacity(sizes.len());
    for (i, &len) in sizes.iter().enumerate() {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(len);
        rest = tail;
        if len > 0 {
            segments.push((i, head));
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::tensor::DenseTensor;

    fn matrix() -> TiledTensor<f64> {
        let grid = TileGrid::new(vec![vec![1, 2], vec![2, 1]]).unwrap();
        let dense = DenseTensor::from_fn([3, 3], |idx| (idx[0] * 3 + idx[1] + 1) as f64);
        TiledTensor::from_dense(grid, &dense).unwrap()
    }

    #[test]
    fn test_split_segments() {
        let mut data = [1, 2, 3, 4, 5];
        let segments = split_segments(&mut data, &[2, 0, 3]);
        let indices: Vec<usize> = segments.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(segments[1].1.len(), 3);
    }

    #[test]
    fn test_dense_vectors() {
        let client = TiledClient::new();
        let a = matrix();
        let x = vec![1.0, 1.0, 1.0];
        let mut y = vec![1.0; 3];
        gemv(&client, Transpose::NoTrans, 1.0, &a, (&x).into(), 1.0, (&mut y).into()).unwrap();
        // row sums 6, 15, 24 plus the old y
        assert_eq!(y, vec![7.0, 16.0, 25.0]);

        let mut y = vec![f64::NAN; 3];
        gemv(&client, Transpose::Trans, 1.0, &a, (&x).into(), 0.0, (&mut y).into()).unwrap();
        // column sums
        assert_eq!(y, vec![12.0, 15.0, 18.0]);
    }

    #[test]
    fn test_tiled_destination_created_per_row_tile() {
        let client = TiledClient::new();
        let a = matrix();
        let x = vec![1.0, 0.0, 0.0];
        let mut y = TiledTensor::zeros(TileGrid::new(vec![vec![1, 2]]).unwrap());
        gemv(&client, Transpose::NoTrans, 2.0, &a, (&x).into(), 0.0, (&mut y).into()).unwrap();
        assert_eq!(y.num_stored(), 2);
        assert_eq!(y.to_dense().as_slice(), &[2.0, 8.0, 14.0]);
    }

    #[test]
    fn test_dense_length_checked() {
        let client = TiledClient::new();
        let a = matrix();
        let x = vec![1.0; 2];
        let mut y = vec![0.0; 3];
        let err = gemv(&client, Transpose::NoTrans, 1.0, &a, (&x).into(), 0.0, (&mut y).into())
            .unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_tiled_vector_grid_checked() {
        let client = TiledClient::new();
        let a = matrix();
        let x = TiledTensor::<f64>::zeros(TileGrid::new(vec![vec![3]]).unwrap());
        let mut y = vec![0.0; 3];
        let err = gemv(&client, Transpose::NoTrans, 1.0, &a, (&x).into(), 0.0, (&mut y).into())
            .unwrap_err();
        assert_eq!(err.grid_mismatch_kind(), Some(GridMismatchKind::InputInput));

        // right count, sizes reversed against A's columns
        let x = TiledTensor::<f64>::zeros(TileGrid::new(vec![vec![1, 2]]).unwrap());
        let err = gemv(&client, Transpose::NoTrans, 1.0, &a, (&x).into(), 0.0, (&mut y).into())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::TileGridMismatch {
                kind: GridMismatchKind::InputInput,
                expected: 2,
                got: 1,
                ..
            }
        ));

        // tiled y reversed against A's rows
        let x = vec![1.0; 3];
        let mut y = TiledTensor::<f64>::zeros(TileGrid::new(vec![vec![2, 1]]).unwrap());
        let err = gemv(&client, Transpose::NoTrans, 1.0, &a, (&x).into(), 0.0, (&mut y).into())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::TileGridMismatch {
                kind: GridMismatchKind::OutputInput,
                expected: 1,
                got: 2,
                ..
            }
        ));
        assert_eq!(y.num_stored(), 0);
    }
}
