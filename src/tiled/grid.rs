//! Tile grid geometry
//!
//! A [`TileGrid`] describes how a tensor of rank R is cut into tiles: for each
//! dimension an ordered list of tile sizes, and the prefix-sum offsets derived
//! from it. The grid carries no data and no algebra.

use crate::error::{Error, Result};
use crate::tensor::{Shape, STACK_DIMS};
use smallvec::SmallVec;
use std::ops::Range;

/// Coordinate of a tile in the grid, one index per dimension
pub type TileCoord = SmallVec<[usize; STACK_DIMS]>;

/// Per-dimension partition of a tensor into tiles
///
/// Invariant: `tile_offsets(d)[k] == tile_sizes(d)[..k].iter().sum()` and
/// `extent(d) == tile_sizes(d).iter().sum()`.
///
/// Tile sizes of zero are allowed; the tiles at those positions are
/// *zero-size* and contribute nothing to any operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    sizes: Vec<Vec<usize>>,
    offsets: Vec<Vec<usize>>,
    // Row-major strides over tile counts, used to linearize coordinates
    strides: SmallVec<[usize; STACK_DIMS]>,
}

impl TileGrid {
    /// Build a grid from explicit per-dimension tile sizes.
    ///
    /// Every dimension must have at least one tile.
    pub fn new(sizes: Vec<Vec<usize>>) -> Result<Self> {
        if sizes.is_empty() {
            return Err(Error::invalid_argument(
                "sizes",
                "a tile grid needs at least one dimension",
            ));
        }
        if let Some(d) = sizes.iter().position(|s| s.is_empty()) {
            return Err(Error::invalid_argument(
                "sizes",
                format!("dimension {d} has no tiles"),
            ));
        }

        let offsets: Vec<Vec<usize>> = sizes
            .iter()
            .map(|dim| {
                let mut acc = 0;
                dim.iter()
                    .map(|&s| {
                        let off = acc;
                        acc += s;
                        off
                    })
                    .collect::<Vec<usize>>()
            })
            .collect();

        let mut strides: SmallVec<[usize; STACK_DIMS]> = SmallVec::from_elem(1, sizes.len());
        for d in (0..sizes.len() - 1).rev() {
            strides[d] = strides[d + 1] * sizes[d + 1].len();
        }

        Ok(Self {
            sizes,
            offsets,
            strides,
        })
    }

    /// Split each extent into tiles of `tile` elements, the last one possibly shorter.
    ///
    /// A zero extent yields a single zero-size tile along that dimension.
    pub fn uniform(extents: &[usize], tile: usize) -> Result<Self> {
        if tile == 0 {
            return Err(Error::invalid_argument("tile", "tile size must be positive"));
        }
        let sizes = extents
            .iter()
            .map(|&extent| {
                if extent == 0 {
                    return vec![0];
                }
                let full = extent / tile;
                let mut dim = vec![tile; full];
                if extent % tile != 0 {
                    dim.push(extent % tile);
                }
                dim
            })
            .collect();
        Self::new(sizes)
    }

    /// Number of dimensions
    #[inline]
    pub fn rank(&self) -> usize {
        self.sizes.len()
    }

    /// Total number of tile coordinates (product of per-dimension counts)
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.sizes.iter().map(Vec::len).product()
    }

    /// Number of tiles along dimension `dim`
    ///
    /// # Panics
    /// Panics if `dim >= self.rank()`.
    #[inline]
    pub fn grid_dim(&self, dim: usize) -> usize {
        self.sizes[dim].len()
    }

    /// Tile counts for every dimension
    pub fn dims(&self) -> Shape {
        self.sizes.iter().map(Vec::len).collect()
    }

    /// Ordered tile sizes along dimension `dim`
    #[inline]
    pub fn tile_sizes(&self, dim: usize) -> &[usize] {
        &self.sizes[dim]
    }

    /// Prefix-sum offsets of the tiles along dimension `dim`
    #[inline]
    pub fn tile_offsets(&self, dim: usize) -> &[usize] {
        &self.offsets[dim]
    }

    /// Element range covered by tile `k` along dimension `dim`
    #[inline]
    pub fn tile_range(&self, dim: usize, k: usize) -> Range<usize> {
        let start = self.offsets[dim][k];
        start..start + self.sizes[dim][k]
    }

    /// Total element extent along dimension `dim`
    #[inline]
    pub fn extent(&self, dim: usize) -> usize {
        self.sizes[dim].iter().sum()
    }

    /// Dense shape of the whole tensor
    pub fn extents(&self) -> Shape {
        (0..self.rank()).map(|d| self.extent(d)).collect()
    }

    /// Whether `coord` addresses a tile of this grid
    pub fn contains(&self, coord: &[usize]) -> bool {
        coord.len() == self.rank() && coord.iter().zip(&self.sizes).all(|(&c, dim)| c < dim.len())
    }

    /// Shape of the tile at `coord`
    pub fn tile_shape(&self, coord: &[usize]) -> Shape {
        coord
            .iter()
            .enumerate()
            .map(|(d, &c)| self.sizes[d][c])
            .collect()
    }

    /// Whether the tile at `coord` has zero extent along some dimension
    #[inline]
    pub fn is_zero_size(&self, coord: &[usize]) -> bool {
        coord
            .iter()
            .enumerate()
            .any(|(d, &c)| self.sizes[d][c] == 0)
    }

    /// Row-major linear index of a coordinate (last dimension fastest)
    pub fn ravel(&self, coord: &[usize]) -> usize {
        debug_assert!(self.contains(coord));
        coord.iter().zip(&self.strides).map(|(&c, &s)| c * s).sum()
    }

    /// Inverse of [`ravel`](Self::ravel)
    pub fn unravel(&self, index: usize) -> TileCoord {
        debug_assert!(index < self.grid_size());
        let mut rem = index;
        self.strides
            .iter()
            .map(|&s| {
                let c = rem / s;
                rem %= s;
                c
            })
            .collect()
    }

    /// Every coordinate of the grid in row-major order
    pub fn coords(&self) -> impl Iterator<Item = TileCoord> + '_ {
        (0..self.grid_size()).map(move |i| self.unravel(i))
    }

    /// Whether two grids partition dimensions `dim` / `other_dim` identically
    pub fn same_tiling(&self, dim: usize, other: &TileGrid, other_dim: usize) -> bool {
        self.sizes[dim] == other.sizes[other_dim]
    }
}
