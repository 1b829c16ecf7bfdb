//! Vector operands for tiled matrix-vector products
//!
//! GEMV accepts its vectors either as rank-1 [`TiledTensor`]s or as plain
//! dense buffers. The variant is inspected once per call; the per-tile loop
//! then either fetches a tile or slices a sub-range.

use super::tensor::TiledTensor;
use crate::dtype::Element;
use crate::tensor::DenseTensor;

/// Read-only vector operand
#[derive(Debug, Clone, Copy)]
pub enum VectorRef<'a, T: Element> {
    /// Rank-1 tiled tensor
    Tiled(&'a TiledTensor<T>),
    /// Contiguous dense vector
    Dense(&'a [T]),
}

/// Mutable vector operand (the GEMV destination)
#[derive(Debug)]
pub enum VectorMut<'a, T: Element> {
    /// Rank-1 tiled tensor; tiles are created on demand
    Tiled(&'a mut TiledTensor<T>),
    /// Contiguous dense vector, updated through disjoint sub-ranges
    Dense(&'a mut [T]),
}

impl<'a, T: Element> VectorRef<'a, T> {
    /// Whether this operand is tiled
    #[inline]
    pub fn is_tiled(&self) -> bool {
        matches!(self, VectorRef::Tiled(_))
    }
}

impl<'a, T: Element> VectorMut<'a, T> {
    /// Whether this operand is tiled
    #[inline]
    pub fn is_tiled(&self) -> bool {
        matches!(self, VectorMut::Tiled(_))
    }
}

impl<'a, T: Element> From<&'a TiledTensor<T>> for VectorRef<'a, T> {
    fn from(value: &'a TiledTensor<T>) -> Self {
        VectorRef::Tiled(value)
    }
}

impl<'a, T: Element> From<&'a [T]> for VectorRef<'a, T> {
    fn from(value: &'a [T]) -> Self {
        VectorRef::Dense(value)
    }
}

impl<'a, T: Element> From<&'a Vec<T>> for VectorRef<'a, T> {
    fn from(value: &'a Vec<T>) -> Self {
        VectorRef::Dense(value.as_slice())
    }
}

impl<'a, T: Element> From<&'a DenseTensor<T>> for VectorRef<'a, T> {
    fn from(value: &'a DenseTensor<T>) -> Self {
        VectorRef::Dense(value.as_slice())
    }
}

impl<'a, T: Element> From<&'a mut TiledTensor<T>> for VectorMut<'a, T> {
    fn from(value: &'a mut TiledTensor<T>) -> Self {
        VectorMut::Tiled(value)
    }
}

impl<'a, T: Element> From<&'a mut [T]> for VectorMut<'a, T> {
    fn from(value: &'a mut [T]) -> Self {
        VectorMut::Dense(value)
    }
}

impl<'a, T: Element> From<&'a mut Vec<T>> for VectorMut<'a, T> {
    fn from(value: &'a mut Vec<T>) -> Self {
        VectorMut::Dense(value.as_mut_slice())
    }
}

impl<'a, T: Element> From<&'a mut DenseTensor<T>> for VectorMut<'a, T> {
    fn from(value: &'a mut DenseTensor<T>) -> Self {
        VectorMut::Dense(value.as_mut_slice())
    }
}
