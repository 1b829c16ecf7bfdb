//! Dense per-tile kernels
//!
//! These are the single-tile building blocks the tiled engines reduce to. They
//! operate on contiguous buffers, are single-threaded (parallelism lives one
//! level up, across tiles) and never allocate.
//!
//! - [`dot`] / [`true_dot`]: plain and conjugated inner products
//! - [`gemm`], [`gemv`], [`ger`]: matrix kernels with transpose flags
//! - [`direct_product`]: elementwise (Hadamard) product with accumulation
//! - [`scale`] / [`zero`]: in-place scaling and clearing

mod matmul;

pub use matmul::{gemm, gemv, ger, Transpose};

use crate::dtype::Element;

/// Inner product without conjugation: `Σ a_i * b_i`
#[inline]
pub fn dot<T: Element>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .fold(T::zero(), |acc, (&x, &y)| acc + x * y)
}

/// Inner product conjugating the first operand: `Σ conj(a_i) * b_i`
///
/// Identical to [`dot`] for real element types.
#[inline]
pub fn true_dot<T: Element>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .fold(T::zero(), |acc, (&x, &y)| acc + x.conj() * y)
}

/// Elementwise product: `c_i = alpha * a_i * b_i + beta * c_i`
///
/// When `beta` is zero the previous contents of `c` are overwritten.
pub fn direct_product<T: Element>(alpha: T, a: &[T], b: &[T], beta: T, c: &mut [T]) {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), c.len());
    let overwrite = beta.is_zero();
    for ((out, &x), &y) in c.iter_mut().zip(a).zip(b) {
        let prod = alpha * x * y;
        *out = if overwrite { prod } else { prod + beta * *out };
    }
}

/// In-place scale: `x_i *= alpha`
///
/// A zero `alpha` writes exact zeros, so non-finite values do not survive.
#[inline]
pub fn scale<T: Element>(alpha: T, x: &mut [T]) {
    if alpha.is_zero() {
        zero(x);
        return;
    }
    for v in x.iter_mut() {
        *v = alpha * *v;
    }
}

/// Set every element to zero
#[inline]
pub fn zero<T: Element>(x: &mut [T]) {
    x.fill(T::zero());
}
