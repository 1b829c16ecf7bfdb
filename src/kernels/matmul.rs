//! Dense matrix kernels: gemm, gemv and ger on a single tile
//!
//! Matrices are row-major [`DenseTensor`]s of rank 2. Transposition is applied
//! logically through index mapping; no operand is ever copied or repacked.

use crate::dtype::Element;
use crate::tensor::DenseTensor;

/// Whether a matrix operand is used as stored or transposed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Transpose {
    /// Use the matrix as stored
    #[default]
    NoTrans,
    /// Use the transpose of the stored matrix
    Trans,
}

impl Transpose {
    /// Build from a boolean "is transposed" flag
    #[inline]
    pub fn from_flag(transposed: bool) -> Self {
        if transposed {
            Transpose::Trans
        } else {
            Transpose::NoTrans
        }
    }

    /// Whether this is [`Transpose::Trans`]
    #[inline]
    pub fn is_trans(self) -> bool {
        matches!(self, Transpose::Trans)
    }

    /// Stored axes of the logical (row, column) pair after applying the flag
    ///
    /// For `NoTrans` this is `(0, 1)`, for `Trans` it is `(1, 0)`.
    #[inline]
    pub fn axes(self) -> (usize, usize) {
        match self {
            Transpose::NoTrans => (0, 1),
            Transpose::Trans => (1, 0),
        }
    }
}

/// `C = alpha * op(A) * op(B) + beta * C`
///
/// `op(A)` is `m × k`, `op(B)` is `k × n` and `C` is `m × n`. When `beta` is
/// zero the previous contents of `C` are overwritten, not scaled.
///
/// Shapes are the caller's responsibility; the tiled engines validate tile
/// sizes before any kernel runs.
pub fn gemm<T: Element>(
    trans_a: Transpose,
    trans_b: Transpose,
    alpha: T,
    a: &DenseTensor<T>,
    b: &DenseTensor<T>,
    beta: T,
    c: &mut DenseTensor<T>,
) {
    let (m, n) = (c.rows(), c.cols());
    let k = if trans_a.is_trans() { a.rows() } else { a.cols() };
    debug_assert_eq!(if trans_a.is_trans() { a.cols() } else { a.rows() }, m);
    debug_assert_eq!(if trans_b.is_trans() { b.cols() } else { b.rows() }, k);
    debug_assert_eq!(if trans_b.is_trans() { b.rows() } else { b.cols() }, n);

    let a_data = a.as_slice();
    let b_data = b.as_slice();
    let c_data = c.as_mut_slice();

    if beta.is_zero() {
        super::zero(c_data);
    } else if beta != T::one() {
        super::scale(beta, c_data);
    }
    if alpha.is_zero() || k == 0 {
        return;
    }

    let a_at = |i: usize, p: usize| match trans_a {
        Transpose::NoTrans => a_data[i * k + p],
        Transpose::Trans => a_data[p * m + i],
    };
    let b_at = |p: usize, j: usize| match trans_b {
        Transpose::NoTrans => b_data[p * n + j],
        Transpose::Trans => b_data[j * k + p],
    };

    // ikj order: unit stride over C rows
    for i in 0..m {
        let c_row = &mut c_data[i * n..(i + 1) * n];
        for p in 0..k {
            let a_val = alpha * a_at(i, p);
            for (j, out) in c_row.iter_mut().enumerate() {
                *out = *out + a_val * b_at(p, j);
            }
        }
    }
}

/// `y = alpha * op(A) * x + beta * y`
///
/// With `NoTrans`, `x` has `A.cols()` elements and `y` has `A.rows()`; with
/// `Trans` the roles swap. No conjugation is applied.
pub fn gemv<T: Element>(trans: Transpose, alpha: T, a: &DenseTensor<T>, x: &[T], beta: T, y: &mut [T]) {
    let (rows, cols) = (a.rows(), a.cols());
    let a_data = a.as_slice();

    if beta.is_zero() {
        super::zero(y);
    } else if beta != T::one() {
        super::scale(beta, y);
    }
    if alpha.is_zero() {
        return;
    }

    match trans {
        Transpose::NoTrans => {
            debug_assert_eq!(x.len(), cols);
            debug_assert_eq!(y.len(), rows);
            for (i, out) in y.iter_mut().enumerate() {
                let row = &a_data[i * cols..(i + 1) * cols];
                let acc = row
                    .iter()
                    .zip(x)
                    .fold(T::zero(), |acc, (&av, &xv)| acc + av * xv);
                *out = *out + alpha * acc;
            }
        }
        Transpose::Trans => {
            debug_assert_eq!(x.len(), rows);
            debug_assert_eq!(y.len(), cols);
            for (i, &xv) in x.iter().enumerate() {
                let row = &a_data[i * cols..(i + 1) * cols];
                let scaled = alpha * xv;
                for (out, &av) in y.iter_mut().zip(row) {
                    *out = *out + av * scaled;
                }
            }
        }
    }
}

/// Rank-1 update: `A += alpha * x * yᵀ`
pub fn ger<T: Element>(alpha: T, x: &[T], y: &[T], a: &mut DenseTensor<T>) {
    let cols = a.cols();
    debug_assert_eq!(x.len(), a.rows());
    debug_assert_eq!(y.len(), cols);
    if alpha.is_zero() {
        return;
    }
    let a_data = a.as_mut_slice();
    for (i, &xv) in x.iter().enumerate() {
        let scaled = alpha * xv;
        let row = &mut a_data[i * cols..(i + 1) * cols];
        for (out, &yv) in row.iter_mut().zip(y) {
            *out = *out + scaled * yv;
        }
    }
}
