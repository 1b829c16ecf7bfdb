//! Tiled tensor: a tile grid plus a lazily populated tile map

use super::grid::{TileCoord, TileGrid};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::tensor::DenseTensor;
use parking_lot::{RwLock, RwLockWriteGuard};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Shared handle to one tile.
///
/// The outer tile map only guards *which* coordinates exist; the contents of
/// each tile sit behind their own lock so that arithmetic on distinct tiles
/// never serializes on the map.
pub type TileHandle<T> = Arc<RwLock<DenseTensor<T>>>;

type TileMap<T> = HashMap<TileCoord, TileHandle<T>>;

/// Tensor partitioned into a regular grid of independently allocated tiles.
///
/// Each coordinate of the grid is in one of three states:
///
/// - **absent**: nothing stored, [`has_tile`](Self::has_tile) is false
/// - **zero-size**: stored, but the grid gives it zero extent along some
///   dimension ([`has_zero_size`](Self::has_zero_size) is true)
/// - **present**: stored and holding data
///
/// Absent tiles read as zeros. Tiles are created on demand, at most once per
/// coordinate; creation happens under the map's write lock (see
/// [`lock`](Self::lock)).
pub struct TiledTensor<T: Element> {
    grid: TileGrid,
    tiles: RwLock<TileMap<T>>,
}

impl<T: Element> TiledTensor<T> {
    /// Empty tensor over `grid` (no tiles stored)
    pub fn zeros(grid: TileGrid) -> Self {
        Self {
            grid,
            tiles: RwLock::new(HashMap::new()),
        }
    }

    /// Split a dense tensor into tiles, storing every coordinate of the grid
    pub fn from_dense(grid: TileGrid, dense: &DenseTensor<T>) -> Result<Self> {
        Self::from_dense_filtered(grid, dense, |_| true)
    }

    /// Split a dense tensor into tiles, storing only coordinates where `keep` is true
    ///
    /// Returns `Error::ShapeMismatch` if the dense shape differs from the grid's extents.
    pub fn from_dense_filtered<F>(grid: TileGrid, dense: &DenseTensor<T>, mut keep: F) -> Result<Self>
    where
        F: FnMut(&[usize]) -> bool,
    {
        let extents = grid.extents();
        if dense.shape().as_slice() != extents.as_slice() {
            return Err(Error::shape_mismatch(&extents, dense.shape()));
        }

        let mut map = HashMap::new();
        for coord in grid.coords() {
            if !keep(coord.as_slice()) {
                continue;
            }
            let origin: TileCoord = coord
                .iter()
                .enumerate()
                .map(|(d, &c)| grid.tile_offsets(d)[c])
                .collect();
            let tile = DenseTensor::from_fn(grid.tile_shape(&coord), |ix| {
                let global: TileCoord = ix.iter().zip(&origin).map(|(&i, &o)| i + o).collect();
                dense.get(&global).unwrap_or_else(T::zero)
            });
            map.insert(coord, Arc::new(RwLock::new(tile)));
        }

        Ok(Self {
            grid,
            tiles: RwLock::new(map),
        })
    }

    /// Tile grid geometry
    #[inline]
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Number of dimensions
    #[inline]
    pub fn rank(&self) -> usize {
        self.grid.rank()
    }

    /// Element type
    #[inline]
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Total number of tile coordinates
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.grid.grid_size()
    }

    /// Number of tiles along dimension `dim`
    #[inline]
    pub fn grid_dim(&self, dim: usize) -> usize {
        self.grid.grid_dim(dim)
    }

    /// Ordered tile sizes along dimension `dim`
    #[inline]
    pub fn tile_sizes(&self, dim: usize) -> &[usize] {
        self.grid.tile_sizes(dim)
    }

    /// Prefix-sum tile offsets along dimension `dim`
    #[inline]
    pub fn tile_offsets(&self, dim: usize) -> &[usize] {
        self.grid.tile_offsets(dim)
    }

    /// Whether a tile is stored at `coord`
    pub fn has_tile(&self, coord: &[usize]) -> bool {
        self.tiles.read().contains_key(coord)
    }

    /// Whether the tile at `coord` has zero extent
    ///
    /// Zero size is a property of the grid, so this answers for absent
    /// coordinates too. Out-of-range coordinates report `false`.
    pub fn has_zero_size(&self, coord: &[usize]) -> bool {
        self.grid.contains(coord) && self.grid.is_zero_size(coord)
    }

    /// Stored and not zero-size: the tile carries real data
    #[inline]
    pub fn has_nonzero_tile(&self, coord: &[usize]) -> bool {
        !self.has_zero_size(coord) && self.has_tile(coord)
    }

    /// Handle to the stored tile at `coord`, if any
    pub fn tile(&self, coord: &[usize]) -> Option<TileHandle<T>> {
        self.tiles.read().get(coord).cloned()
    }

    /// Handle to the tile at `coord`, creating a zero tile if absent
    ///
    /// Takes the map's write lock for the duration of the lookup.
    pub fn tile_or_create(&self, coord: &[usize]) -> Result<TileHandle<T>> {
        self.check_coord(coord)?;
        let (tile, _) = self.lock().get_or_create(coord);
        Ok(tile)
    }

    /// Exclusive access to the tile map for structural mutation.
    ///
    /// The map stays locked until the returned guard is dropped. Do not call
    /// any other method of this tensor while holding the guard.
    pub fn lock(&self) -> TileMapGuard<'_, T> {
        TileMapGuard {
            grid: &self.grid,
            map: self.tiles.write(),
        }
    }

    /// Store `tile` at `coord`, replacing any previous tile
    ///
    /// The tile's shape must equal the grid's tile shape at `coord`.
    pub fn insert_tile(&mut self, coord: &[usize], tile: DenseTensor<T>) -> Result<()> {
        self.check_coord(coord)?;
        let expected = self.grid.tile_shape(coord);
        if tile.shape() != &expected {
            return Err(Error::shape_mismatch(&expected, tile.shape()));
        }
        self.tiles
            .get_mut()
            .insert(coord.iter().copied().collect(), Arc::new(RwLock::new(tile)));
        Ok(())
    }

    /// Snapshot of all stored tiles, in row-major coordinate order
    pub fn tiles(&self) -> Vec<(TileCoord, TileHandle<T>)> {
        let mut entries: Vec<_> = self
            .tiles
            .read()
            .iter()
            .map(|(c, t)| (c.clone(), Arc::clone(t)))
            .collect();
        entries.sort_by_key(|(c, _)| self.grid.ravel(c));
        entries
    }

    /// Coordinates of all stored tiles, in row-major order
    pub fn stored_coords(&self) -> Vec<TileCoord> {
        let mut coords: Vec<TileCoord> = self.tiles.read().keys().cloned().collect();
        coords.sort_by_key(|c| self.grid.ravel(c));
        coords
    }

    /// Number of stored tiles (zero-size ones included)
    pub fn num_stored(&self) -> usize {
        self.tiles.read().len()
    }

    /// Fraction of the coordinate space holding a stored tile
    pub fn density(&self) -> f64 {
        let total = self.grid_size();
        if total == 0 {
            0.0
        } else {
            self.num_stored() as f64 / total as f64
        }
    }

    /// Bytes of element data held by stored tiles
    pub fn memory_usage(&self) -> usize {
        self.tiles
            .read()
            .values()
            .map(|t| t.read().numel() * T::DTYPE.size_in_bytes())
            .sum()
    }

    /// Zero the contents of every stored tile, keeping the slots
    pub fn zero(&mut self) {
        for tile in self.tiles.get_mut().values() {
            tile.write().zero();
        }
    }

    /// Reassemble the full dense tensor; absent tiles read as zeros
    pub fn to_dense(&self) -> DenseTensor<T> {
        let extents = self.grid.extents();
        let strides = extents.row_major_strides();
        let mut out = DenseTensor::zeros(extents);
        let out_data = out.as_mut_slice();
        for (coord, tile) in self.tiles() {
            let tile = tile.read();
            if tile.is_empty() {
                continue;
            }
            let origin: TileCoord = coord
                .iter()
                .enumerate()
                .map(|(d, &c)| self.grid.tile_offsets(d)[c])
                .collect();
            let mut ix: TileCoord = TileCoord::from_elem(0, tile.ndim());
            for &value in tile.as_slice() {
                let offset: usize = ix
                    .iter()
                    .zip(&origin)
                    .zip(&strides)
                    .map(|((&i, &o), &s)| (i + o) * s)
                    .sum();
                out_data[offset] = value;
                advance_index(&mut ix, tile.shape());
            }
        }
        out
    }

    fn check_coord(&self, coord: &[usize]) -> Result<()> {
        if coord.len() != self.rank() {
            return Err(Error::rank_mismatch("tile coordinate", self.rank(), coord.len()));
        }
        for (d, &c) in coord.iter().enumerate() {
            let size = self.grid.grid_dim(d);
            if c >= size {
                return Err(Error::IndexOutOfBounds { index: c, size });
            }
        }
        Ok(())
    }
}

impl<T: Element> fmt::Debug for TiledTensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TiledTensor")
            .field("dtype", &T::DTYPE)
            .field("grid", &self.grid.dims())
            .field("extents", &self.grid.extents())
            .field("stored", &self.num_stored())
            .finish()
    }
}

impl<T: Element> Clone for TiledTensor<T> {
    /// Deep copy: every stored tile is duplicated
    fn clone(&self) -> Self {
        let map = self
            .tiles
            .read()
            .iter()
            .map(|(c, t)| (c.clone(), Arc::new(RwLock::new(t.read().clone()))))
            .collect();
        Self {
            grid: self.grid.clone(),
            tiles: RwLock::new(map),
        }
    }
}

/// Step a row-major multi-index forward by one element
fn advance_index(index: &mut [usize], shape: &[usize]) {
    for d in (0..index.len()).rev() {
        index[d] += 1;
        if index[d] < shape[d] {
            return;
        }
        index[d] = 0;
    }
}

/// Write guard over a tensor's tile map; dropping it releases the lock
pub struct TileMapGuard<'a, T: Element> {
    grid: &'a TileGrid,
    map: RwLockWriteGuard<'a, TileMap<T>>,
}

impl<T: Element> TileMapGuard<'_, T> {
    /// Whether a tile is stored at `coord`
    pub fn has_tile(&self, coord: &[usize]) -> bool {
        self.map.contains_key(coord)
    }

    /// Handle to the stored tile at `coord`, if any
    pub fn get(&self, coord: &[usize]) -> Option<TileHandle<T>> {
        self.map.get(coord).cloned()
    }

    /// Fetch the tile at `coord`, inserting a zero tile if absent.
    ///
    /// The boolean is `true` when the tile was created by this call.
    pub fn get_or_create(&mut self, coord: &[usize]) -> (TileHandle<T>, bool) {
        debug_assert!(self.grid.contains(coord));
        if let Some(tile) = self.map.get(coord) {
            return (Arc::clone(tile), false);
        }
        let tile = Arc::new(RwLock::new(DenseTensor::zeros(self.grid.tile_shape(coord))));
        self.map.insert(coord.iter().copied().collect(), Arc::clone(&tile));
        tracing::trace!(coord = ?coord, "created tile");
        (tile, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_2x2() -> TileGrid {
        TileGrid::new(vec![vec![2, 3], vec![2, 3]]).unwrap()
    }

    #[test]
    fn test_tile_states() {
        let grid = TileGrid::new(vec![vec![2, 0], vec![3]]).unwrap();
        let t = TiledTensor::<f64>::zeros(grid);
        assert!(!t.has_tile(&[0, 0]));
        assert!(!t.has_zero_size(&[0, 0]));
        assert!(t.has_zero_size(&[1, 0]));

        t.tile_or_create(&[1, 0]).unwrap();
        assert!(t.has_tile(&[1, 0]));
        assert!(!t.has_nonzero_tile(&[1, 0]));

        t.tile_or_create(&[0, 0]).unwrap();
        assert!(t.has_nonzero_tile(&[0, 0]));
        assert_eq!(t.num_stored(), 2);
    }

    #[test]
    fn test_get_or_create_reports_creation() {
        let t = TiledTensor::<f32>::zeros(grid_2x2());
        let mut guard = t.lock();
        let (first, created) = guard.get_or_create(&[1, 0]);
        assert!(created);
        assert_eq!(first.read().shape().as_slice(), &[3, 2]);
        let (second, created) = guard.get_or_create(&[1, 0]);
        assert!(!created);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(guard.has_tile(&[1, 0]));
        drop(guard);
        assert!(t.has_tile(&[1, 0]));
    }

    #[test]
    fn test_tile_or_create_bounds() {
        let t = TiledTensor::<f64>::zeros(grid_2x2());
        assert!(matches!(
            t.tile_or_create(&[2, 0]),
            Err(Error::IndexOutOfBounds { index: 2, size: 2 })
        ));
        assert!(matches!(
            t.tile_or_create(&[0]),
            Err(Error::RankMismatch { .. })
        ));
    }

    #[test]
    fn test_dense_round_trip_with_holes() {
        let dense = DenseTensor::from_fn([5, 5], |ix| (ix[0] * 5 + ix[1]) as f64);
        let t = TiledTensor::from_dense_filtered(grid_2x2(), &dense, |c| c != [1, 0]).unwrap();
        assert_eq!(t.num_stored(), 3);
        let back = t.to_dense();
        for i in 0..5 {
            for j in 0..5 {
                let expected = if i >= 2 && j < 2 { 0.0 } else { (i * 5 + j) as f64 };
                assert_eq!(back.get(&[i, j]), Some(expected));
            }
        }
    }

    #[test]
    fn test_from_dense_shape_check() {
        let dense = DenseTensor::<f64>::zeros([4, 5]);
        assert!(TiledTensor::from_dense(grid_2x2(), &dense).is_err());
    }

    #[test]
    fn test_insert_tile_shape_check() {
        let mut t = TiledTensor::<f64>::zeros(grid_2x2());
        assert!(t.insert_tile(&[0, 1], DenseTensor::zeros([2, 3])).is_ok());
        assert!(t.insert_tile(&[0, 1], DenseTensor::zeros([3, 2])).is_err());
        assert_eq!(t.stored_coords(), vec![TileCoord::from_slice(&[0, 1])]);
    }

    #[test]
    fn test_memory_usage_and_density() {
        let t = TiledTensor::<f64>::zeros(grid_2x2());
        t.tile_or_create(&[0, 0]).unwrap();
        t.tile_or_create(&[1, 1]).unwrap();
        assert_eq!(t.memory_usage(), (4 + 9) * 8);
        assert!((t.density() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_clone_is_deep() {
        let mut t = TiledTensor::<f64>::zeros(grid_2x2());
        t.insert_tile(&[0, 0], DenseTensor::new([2, 2], vec![1.0; 4]).unwrap())
            .unwrap();
        let copy = t.clone();
        t.zero();
        let tile = copy.tile(&[0, 0]).unwrap();
        assert_eq!(tile.read().as_slice(), &[1.0; 4]);
    }
}
