//! Tiled linear-algebra operations trait and its client implementation.

use super::{direct_product, dot, gemm, gemv, ger, scale};
use crate::dtype::Element;
use crate::error::Result;
use crate::kernels::Transpose;
use crate::runtime::TiledClient;
use crate::tiled::{TiledTensor, VectorMut, VectorRef};

/// BLAS-style operations over block-sparse tiled tensors
///
/// Every method validates its operands sequentially before any tile is read
/// or written; an `Err` return means no tensor was mutated. Absent and
/// zero-size tiles contribute nothing.
pub trait TiledLinalgOps<T: Element> {
    /// Plain inner product `Σ a_i * b_i` over identically tiled tensors
    ///
    /// The summation order depends on the thread count, so floating point
    /// results are not bit-reproducible across configurations.
    ///
    /// # Errors
    ///
    /// - `RankMismatch` if the ranks differ
    /// - `TileGridMismatch` (input/input) if tile counts differ
    /// - `TileDimensionMismatch` if tile sizes differ
    fn dot(&self, a: &TiledTensor<T>, b: &TiledTensor<T>) -> Result<T>;

    /// Inner product conjugating the first operand: `Σ conj(a_i) * b_i`
    fn true_dot(&self, a: &TiledTensor<T>, b: &TiledTensor<T>) -> Result<T>;

    /// Matrix product: `C = alpha * op(A) * op(B) + beta * C`
    ///
    /// Output tiles are created only where at least one pair of input tiles
    /// contributes. A stored C tile with no contribution is scaled by `beta`,
    /// or zeroed in place when `beta` is zero.
    ///
    /// # Errors
    ///
    /// - `RankMismatch` unless all three operands are matrices
    /// - `TileGridMismatch` (output/input) if C's tile counts disagree with
    ///   `op(A)` rows or `op(B)` columns
    /// - `TileGridMismatch` (input/input) if the contracted tile counts differ
    /// - `TileDimensionMismatch` if counts agree but tile sizes differ
    #[allow(clippy::too_many_arguments)]
    fn gemm(
        &self,
        trans_a: Transpose,
        trans_b: Transpose,
        alpha: T,
        a: &TiledTensor<T>,
        b: &TiledTensor<T>,
        beta: T,
        c: &mut TiledTensor<T>,
    ) -> Result<()>;

    /// Matrix-vector product: `y = alpha * op(A) * x + beta * y`
    ///
    /// `x` and `y` may each be a rank-1 tiled tensor or a dense slice. A tiled
    /// `y` gets a tile for every non-zero-size row tile.
    ///
    /// # Errors
    ///
    /// - `TileGridMismatch` for a tiled vector whose tile count or tile sizes
    ///   differ from the matrix axis (input/input for `x`, output/input for `y`)
    /// - `ShapeMismatch` for a dense vector of the wrong length
    fn gemv<'x, 'y>(
        &self,
        trans: Transpose,
        alpha: T,
        a: &TiledTensor<T>,
        x: impl Into<VectorRef<'x, T>>,
        beta: T,
        y: impl Into<VectorMut<'y, T>>,
    ) -> Result<()>;

    /// Elementwise product: `C = alpha * (A ∘ B) + beta * C`
    ///
    /// Only coordinates where both A and B hold data are touched.
    fn direct_product(
        &self,
        alpha: T,
        a: &TiledTensor<T>,
        b: &TiledTensor<T>,
        beta: T,
        c: &mut TiledTensor<T>,
    ) -> Result<()>;

    /// Rank-1 update: `A += alpha * x * yᵀ`
    ///
    /// # Errors
    ///
    /// `TileGridMismatch` if A's row tiles disagree with `x` or its column
    /// tiles disagree with `y`.
    fn ger(
        &self,
        alpha: T,
        x: &TiledTensor<T>,
        y: &TiledTensor<T>,
        a: &mut TiledTensor<T>,
    ) -> Result<()>;

    /// `A *= alpha` on the stored tiles; never creates or removes tiles
    fn scale(&self, alpha: T, a: &mut TiledTensor<T>) -> Result<()>;
}

impl<T: Element> TiledLinalgOps<T> for TiledClient {
    fn dot(&self, a: &TiledTensor<T>, b: &TiledTensor<T>) -> Result<T> {
        dot::dot(self, a, b)
    }

    fn true_dot(&self, a: &TiledTensor<T>, b: &TiledTensor<T>) -> Result<T> {
        dot::true_dot(self, a, b)
    }

    fn gemm(
        &self,
        trans_a: Transpose,
        trans_b: Transpose,
        alpha: T,
        a: &TiledTensor<T>,
        b: &TiledTensor<T>,
        beta: T,
        c: &mut TiledTensor<T>,
    ) -> Result<()> {
        gemm::gemm(self, trans_a, trans_b, alpha, a, b, beta, c)
    }

    fn gemv<'x, 'y>(
        &self,
        trans: Transpose,
        alpha: T,
        a: &TiledTensor<T>,
        x: impl Into<VectorRef<'x, T>>,
        beta: T,
        y: impl Into<VectorMut<'y, T>>,
    ) -> Result<()> {
        gemv::gemv(self, trans, alpha, a, x.into(), beta, y.into())
    }

    fn direct_product(
        &self,
        alpha: T,
        a: &TiledTensor<T>,
        b: &TiledTensor<T>,
        beta: T,
        c: &mut TiledTensor<T>,
    ) -> Result<()> {
        direct_product::direct_product(self, alpha, a, b, beta, c)
    }

    fn ger(
        &self,
        alpha: T,
        x: &TiledTensor<T>,
        y: &TiledTensor<T>,
        a: &mut TiledTensor<T>,
    ) -> Result<()> {
        ger::ger(self, alpha, x, y, a)
    }

    fn scale(&self, alpha: T, a: &mut TiledTensor<T>) -> Result<()> {
        scale::scale(self, alpha, a);
        Ok(())
    }
}
