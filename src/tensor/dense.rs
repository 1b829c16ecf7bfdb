//! Dense row-major tensor used as tile storage

use super::shape::Shape;
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::kernels;

/// Owned, contiguous, row-major n-dimensional array.
///
/// Every tile of a [`TiledTensor`](crate::tiled::TiledTensor) is a `DenseTensor`
/// whose shape is dictated by the tile grid. A tensor with a zero extent along
/// any dimension holds no elements.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseTensor<T: Element> {
    shape: Shape,
    data: Vec<T>,
}

impl<T: Element> DenseTensor<T> {
    /// Wrap an existing buffer.
    ///
    /// Returns `Error::ShapeMismatch` if `data.len()` differs from the number of
    /// elements implied by `shape`.
    pub fn new(shape: impl Into<Shape>, data: Vec<T>) -> Result<Self> {
        let shape = shape.into();
        if data.len() != shape.numel() {
            return Err(Error::shape_mismatch(&[shape.numel()], &[data.len()]));
        }
        Ok(Self { shape, data })
    }

    /// Zero-filled tensor.
    pub fn zeros(shape: impl Into<Shape>) -> Self {
        let shape = shape.into();
        let data = vec![T::zero(); shape.numel()];
        Self { shape, data }
    }

    /// Build a tensor by evaluating `f` at every multi-index, in row-major order.
    pub fn from_fn<F>(shape: impl Into<Shape>, mut f: F) -> Self
    where
        F: FnMut(&[usize]) -> T,
    {
        let shape = shape.into();
        let numel = shape.numel();
        let mut data = Vec::with_capacity(numel);
        let mut index = vec![0usize; shape.ndim()];
        for _ in 0..numel {
            data.push(f(&index));
            for d in (0..index.len()).rev() {
                index[d] += 1;
                if index[d] < shape[d] {
                    break;
                }
                index[d] = 0;
            }
        }
        Self { shape, data }
    }

    /// Shape of the tensor
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Number of dimensions
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    /// Number of elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Whether the tensor holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element type
    #[inline]
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Row-major view of the data
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable row-major view of the data
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the tensor, returning its buffer
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Element at a multi-index, or `None` when out of range
    pub fn get(&self, index: &[usize]) -> Option<T> {
        self.shape.offset_of(index).map(|off| self.data[off])
    }

    /// Overwrite the element at a multi-index
    pub fn set(&mut self, index: &[usize], value: T) -> Result<()> {
        match self.shape.offset_of(index) {
            Some(off) => {
                self.data[off] = value;
                Ok(())
            }
            None => Err(Error::shape_mismatch(self.shape.as_slice(), index)),
        }
    }

    /// Number of rows of a rank-2 tensor
    #[inline]
    pub(crate) fn rows(&self) -> usize {
        debug_assert_eq!(self.ndim(), 2);
        self.shape[0]
    }

    /// Number of columns of a rank-2 tensor
    #[inline]
    pub(crate) fn cols(&self) -> usize {
        debug_assert_eq!(self.ndim(), 2);
        self.shape[1]
    }

    /// Set every element to zero, keeping the allocation
    pub fn zero(&mut self) {
        kernels::zero(&mut self.data);
    }

    /// Multiply every element by `alpha` in place
    pub fn scale(&mut self, alpha: T) {
        kernels::scale(alpha, &mut self.data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_length() {
        assert!(DenseTensor::new([2, 2], vec![1.0f64; 4]).is_ok());
        let err = DenseTensor::new([2, 2], vec![1.0f64; 3]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_from_fn_row_major() {
        let t = DenseTensor::from_fn([2, 3], |ix| (ix[0] * 10 + ix[1]) as f64);
        assert_eq!(t.as_slice(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(t.get(&[1, 2]), Some(12.0));
        assert_eq!(t.get(&[2, 0]), None);
    }

    #[test]
    fn test_zero_extent_tensor() {
        let t = DenseTensor::<f32>::zeros([3, 0]);
        assert!(t.is_empty());
        assert_eq!(t.shape().as_slice(), &[3, 0]);
    }

    #[test]
    fn test_zero_and_scale() {
        let mut t = DenseTensor::new([3], vec![1.0f64, -2.0, 4.0]).unwrap();
        t.scale(0.5);
        assert_eq!(t.as_slice(), &[0.5, -1.0, 2.0]);
        t.zero();
        assert_eq!(t.as_slice(), &[0.0, 0.0, 0.0]);
        assert_eq!(t.numel(), 3);
    }

    #[test]
    fn test_set() {
        let mut t = DenseTensor::<i32>::zeros([2, 2]);
        t.set(&[1, 0], 7).unwrap();
        assert_eq!(t.as_slice(), &[0, 0, 7, 0]);
        assert!(t.set(&[2, 0], 1).is_err());
    }
}
