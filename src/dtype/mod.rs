//! Data type system for tiled tensors
//!
//! This module provides the `DType` enum describing supported element types
//! and the [`Element`] trait that ties Rust types to it.

pub mod complex;
mod element;

pub use complex::{Complex128, Complex64};
pub use element::Element;

use std::fmt;

/// Element type of a tile
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DType {
    /// 64-bit float
    F64,
    /// 32-bit float
    F32,
    /// 64-bit signed integer
    I64,
    /// 32-bit signed integer
    I32,
    /// Complex number with f32 parts
    Complex64,
    /// Complex number with f64 parts
    Complex128,
}

impl DType {
    /// Size of one element in bytes
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            DType::F64 | DType::I64 | DType::Complex64 => 8,
            DType::F32 | DType::I32 => 4,
            DType::Complex128 => 16,
        }
    }

    /// Whether this is a complex type
    #[inline]
    pub const fn is_complex(self) -> bool {
        matches!(self, DType::Complex64 | DType::Complex128)
    }

    /// Whether this is a floating point type (real or complex)
    #[inline]
    pub const fn is_float(self) -> bool {
        !matches!(self, DType::I64 | DType::I32)
    }

    /// Short name used in diagnostics
    pub const fn name(self) -> &'static str {
        match self {
            DType::F64 => "f64",
            DType::F32 => "f32",
            DType::I64 => "i64",
            DType::I32 => "i32",
            DType::Complex64 => "c64",
            DType::Complex128 => "c128",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
