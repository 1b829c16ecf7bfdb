//! Complex element types
//!
//! `Complex64` and `Complex128` are plain `#[repr(C)]` pairs stored in
//! interleaved (re, im) order, so a tile of complex values is a contiguous
//! buffer of alternating real and imaginary parts.
//!
//! Only the arithmetic the tiled kernels need is provided: addition,
//! subtraction, multiplication, negation and conjugation. Conjugation is what
//! distinguishes `true_dot` from `dot`.
//!
//! ```ignore
//! use tiled_linalg::dtype::Complex128;
//!
//! let z = Complex128::new(3.0, 4.0);
//! assert_eq!(z.magnitude(), 5.0);
//! assert_eq!(z.conj(), Complex128::new(3.0, -4.0));
//! ```

use bytemuck::{Pod, Zeroable};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

macro_rules! impl_complex {
    ($name:ident, $float:ty, $doc_bits:literal, $doc_float_bits:literal) => {
        #[doc = concat!($doc_bits, "-bit complex number with ", $doc_float_bits, " real and imaginary parts")]
        #[repr(C)]
        #[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
        pub struct $name {
            /// Real part
            pub re: $float,
            /// Imaginary part
            pub im: $float,
        }

        impl $name {
            /// Zero complex number
            pub const ZERO: Self = Self { re: 0.0, im: 0.0 };

            /// One (real unit)
            pub const ONE: Self = Self { re: 1.0, im: 0.0 };

            /// Imaginary unit i
            pub const I: Self = Self { re: 0.0, im: 1.0 };

            /// Create a new complex number
            #[inline]
            pub const fn new(re: $float, im: $float) -> Self {
                Self { re, im }
            }

            /// Magnitude (absolute value): |z| = sqrt(re² + im²)
            #[inline]
            pub fn magnitude(self) -> $float {
                self.magnitude_squared().sqrt()
            }

            /// Squared magnitude: |z|² = re² + im²
            #[inline]
            pub fn magnitude_squared(self) -> $float {
                self.re * self.re + self.im * self.im
            }

            /// Complex conjugate: conj(a + bi) = a - bi
            #[inline]
            pub fn conj(self) -> Self {
                Self {
                    re: self.re,
                    im: -self.im,
                }
            }
        }

        impl Add for $name {
            type Output = Self;

            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self {
                    re: self.re + rhs.re,
                    im: self.im + rhs.im,
                }
            }
        }

        impl Sub for $name {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self {
                    re: self.re - rhs.re,
                    im: self.im - rhs.im,
                }
            }
        }

        impl Mul for $name {
            type Output = Self;

            /// (a+bi)(c+di) = (ac-bd) + (ad+bc)i
            #[inline]
            fn mul(self, rhs: Self) -> Self {
                Self {
                    re: self.re * rhs.re - self.im * rhs.im,
                    im: self.re * rhs.im + self.im * rhs.re,
                }
            }
        }

        impl Neg for $name {
            type Output = Self;

            #[inline]
            fn neg(self) -> Self {
                Self {
                    re: -self.re,
                    im: -self.im,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.im >= 0.0 {
                    write!(f, "{}+{}i", self.re, self.im)
                } else {
                    write!(f, "{}{}i", self.re, self.im)
                }
            }
        }

        impl From<$float> for $name {
            #[inline]
            fn from(re: $float) -> Self {
                Self { re, im: 0.0 }
            }
        }

        impl From<($float, $float)> for $name {
            #[inline]
            fn from((re, im): ($float, $float)) -> Self {
                Self { re, im }
            }
        }
    };
}

impl_complex!(Complex64, f32, "64", "f32");
impl_complex!(Complex128, f64, "128", "f64");

impl From<Complex64> for Complex128 {
    #[inline]
    fn from(c: Complex64) -> Self {
        Self {
            re: c.re as f64,
            im: c.im as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complex_mul() {
        let a = Complex128::new(1.0, 2.0);
        let b = Complex128::new(3.0, -1.0);
        // (1+2i)(3-i) = 3 - i + 6i - 2i² = 5 + 5i
        assert_eq!(a * b, Complex128::new(5.0, 5.0));
    }

    #[test]
    fn test_conj_product_is_real() {
        let z = Complex64::new(3.0, 4.0);
        let p = z.conj() * z;
        assert_eq!(p, Complex64::new(25.0, 0.0));
        assert_eq!(z.magnitude(), 5.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Complex128::new(1.0, -2.0).to_string(), "1-2i");
        assert_eq!(Complex128::new(1.0, 2.0).to_string(), "1+2i");
    }

    #[test]
    fn test_interleaved_layout() {
        let z = [Complex128::new(1.0, 2.0), Complex128::new(3.0, 4.0)];
        let raw: &[f64] = bytemuck::cast_slice(&z);
        assert_eq!(raw, &[1.0, 2.0, 3.0, 4.0]);
    }
}
