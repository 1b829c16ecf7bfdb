//! Shape type: dimensions of a dense tile

use smallvec::SmallVec;
use std::fmt;
use std::iter::FromIterator;
use std::ops::Deref;

/// Stack allocation threshold for dimensions
/// Most tiles have 4 or fewer dimensions, so we stack-allocate up to 4
pub(crate) const STACK_DIMS: usize = 4;

/// Shape type: dimensions of a dense tile
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape(SmallVec<[usize; STACK_DIMS]>);

impl Shape {
    /// Create an empty (rank-0) shape.
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// View shape as a slice.
    pub fn as_slice(&self) -> &[usize] {
        self.0.as_slice()
    }

    /// Number of dimensions in this shape.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Total number of elements (1 for a rank-0 shape).
    #[inline]
    pub fn numel(&self) -> usize {
        self.0.iter().product()
    }

    /// Whether any dimension has extent zero.
    #[inline]
    pub fn has_zero_extent(&self) -> bool {
        self.0.contains(&0)
    }

    /// Row-major (C order) element strides.
    pub fn row_major_strides(&self) -> SmallVec<[usize; STACK_DIMS]> {
        let mut strides: SmallVec<[usize; STACK_DIMS]> = SmallVec::from_elem(1, self.0.len());
        for d in (0..self.0.len().saturating_sub(1)).rev() {
            strides[d] = strides[d + 1] * self.0[d + 1];
        }
        strides
    }

    /// Flat row-major offset of a multi-index, or `None` if it is out of range.
    pub fn offset_of(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.0.len() {
            return None;
        }
        let mut offset = 0;
        for (&i, &dim) in index.iter().zip(self.0.iter()) {
            if i >= dim {
                return None;
            }
            offset = offset * dim + i;
        }
        Some(offset)
    }
}

impl Deref for Shape {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<[usize]> for Shape {
    fn as_ref(&self) -> &[usize] {
        self.0.as_slice()
    }
}

impl From<SmallVec<[usize; STACK_DIMS]>> for Shape {
    fn from(value: SmallVec<[usize; STACK_DIMS]>) -> Self {
        Self(value)
    }
}

impl From<Vec<usize>> for Shape {
    fn from(value: Vec<usize>) -> Self {
        Self(value.into_iter().collect())
    }
}

impl From<&[usize]> for Shape {
    fn from(value: &[usize]) -> Self {
        Self(value.iter().copied().collect())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(value: [usize; N]) -> Self {
        Self(value.into_iter().collect())
    }
}

impl FromIterator<usize> for Shape {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
