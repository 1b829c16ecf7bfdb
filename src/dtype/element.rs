//! Element trait for mapping Rust types to DType

use super::{Complex128, Complex64, DType};
use bytemuck::{Pod, Zeroable};
use std::fmt::Debug;
use std::ops::{Add, Mul, Sub};

/// Trait for types that can be elements of a tile
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - tiles are shared across worker threads
/// - `Pod + Zeroable` - tiles can be viewed as raw bytes and zero-initialized
/// - `Add + Sub + Mul` - arithmetic used by the dense kernels (Output = Self)
/// - `PartialEq` - kernels special-case `alpha == 0` / `beta == 0`
///
/// Division and ordering are not required; none of the tiled kernels need them.
pub trait Element:
    Copy
    + Send
    + Sync
    + Pod
    + Zeroable
    + Debug
    + PartialEq
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Zero value
    fn zero() -> Self;

    /// One value
    fn one() -> Self;

    /// Complex conjugate (identity for real types)
    fn conj(self) -> Self;

    /// Convert to f64
    ///
    /// For complex types this returns the **magnitude** (|z|), not the real part.
    fn to_f64(self) -> f64;

    /// Convert from f64 (complex types get a zero imaginary part)
    fn from_f64(v: f64) -> Self;

    /// Whether this value equals the additive identity
    #[inline]
    fn is_zero(self) -> bool {
        self == Self::zero()
    }
}

macro_rules! impl_real_element {
    ($ty:ty, $dtype:expr, $zero:expr, $one:expr) => {
        impl Element for $ty {
            const DTYPE: DType = $dtype;

            #[inline]
            fn zero() -> Self {
                $zero
            }

            #[inline]
            fn one() -> Self {
                $one
            }

            #[inline]
            fn conj(self) -> Self {
                self
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $ty
            }
        }
    };
}

impl_real_element!(f64, DType::F64, 0.0, 1.0);
impl_real_element!(f32, DType::F32, 0.0, 1.0);
impl_real_element!(i64, DType::I64, 0, 1);
impl_real_element!(i32, DType::I32, 0, 1);

impl Element for Complex64 {
    const DTYPE: DType = DType::Complex64;

    #[inline]
    fn zero() -> Self {
        Complex64::ZERO
    }

    #[inline]
    fn one() -> Self {
        Complex64::ONE
    }

    #[inline]
    fn conj(self) -> Self {
        Complex64::conj(self)
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self.magnitude() as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        Complex64::new(v as f32, 0.0)
    }
}

impl Element for Complex128 {
    const DTYPE: DType = DType::Complex128;

    #[inline]
    fn zero() -> Self {
        Complex128::ZERO
    }

    #[inline]
    fn one() -> Self {
        Complex128::ONE
    }

    #[inline]
    fn conj(self) -> Self {
        Complex128::conj(self)
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self.magnitude()
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        Complex128::new(v, 0.0)
    }
}
