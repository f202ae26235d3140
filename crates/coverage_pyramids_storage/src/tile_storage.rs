pub mod dense;
pub mod sparse;

pub use dense::*;
pub use sparse::*;

use crate::TileRef;

use coverage_pyramids_core::prelude::*;

use auto_impl::auto_impl;

/// Methods for reading tiles from storage.
#[auto_impl(&, Box, Arc)]
pub trait TileReadStorage {
    /// Clone the handle of the tile at `key`.
    fn get(&self, key: Point2i) -> Option<TileRef>;

    /// Returns `true` iff a tile occupies `key`.
    fn contains(&self, key: Point2i) -> bool;
}

/// Methods for writing tiles to storage.
///
/// Writers only need `&self`, so distinct slots can be written from many threads at once.
#[auto_impl(&, Box, Arc)]
pub trait TileWriteStorage {
    /// Replace the tile at `key` with `tile`, returning the old value.
    fn replace(&self, key: Point2i, tile: TileRef) -> Option<TileRef>;

    /// Overwrite the tile at `key` with `tile`. Drops the previous value.
    fn write(&self, key: Point2i, tile: TileRef);

    /// Removes and returns the tile at `key`.
    fn pop(&self, key: Point2i) -> Option<TileRef>;

    /// Removes and drops the tile at `key`. Does nothing if the slot is already empty.
    fn delete(&self, key: Point2i);

    /// Empties every slot.
    fn clear(&self);
}

#[auto_impl(&, Box, Arc)]
pub trait IterTileKeys {
    /// The keys of all occupied slots, in row-major order.
    fn tile_keys(&self) -> Vec<Point2i>;

    /// The number of occupied slots.
    fn num_tiles(&self) -> usize;
}

/// Storage for the tile slots of one mosaic.
pub trait TileStorage: TileReadStorage + TileWriteStorage + IterTileKeys + Send + Sync {
    /// Create empty storage for a grid of `grid_size` slots.
    fn for_grid(grid_size: Point2i) -> Self
    where
        Self: Sized;
}

/// Grids with more slots than this get `SparseTileGrid` storage from `AnyTileStorage`.
pub const DENSE_SLOT_LIMIT: i64 = 1 << 20;

/// Dense storage for modest grids, sparse storage for huge ones. Both behave identically.
pub enum AnyTileStorage {
    Dense(DenseTileGrid),
    Sparse(SparseTileGrid),
}

impl AnyTileStorage {
    pub fn is_dense(&self) -> bool {
        matches!(self, AnyTileStorage::Dense(_))
    }
}

macro_rules! dispatch {
    ($self:ident, $s:ident => $body:expr) => {
        match $self {
            AnyTileStorage::Dense($s) => $body,
            AnyTileStorage::Sparse($s) => $body,
        }
    };
}

impl TileReadStorage for AnyTileStorage {
    #[inline]
    fn get(&self, key: Point2i) -> Option<TileRef> {
        dispatch!(self, s => s.get(key))
    }

    #[inline]
    fn contains(&self, key: Point2i) -> bool {
        dispatch!(self, s => s.contains(key))
    }
}

impl TileWriteStorage for AnyTileStorage {
    #[inline]
    fn replace(&self, key: Point2i, tile: TileRef) -> Option<TileRef> {
        dispatch!(self, s => s.replace(key, tile))
    }

    #[inline]
    fn write(&self, key: Point2i, tile: TileRef) {
        dispatch!(self, s => s.write(key, tile))
    }

    #[inline]
    fn pop(&self, key: Point2i) -> Option<TileRef> {
        dispatch!(self, s => s.pop(key))
    }

    #[inline]
    fn delete(&self, key: Point2i) {
        dispatch!(self, s => s.delete(key))
    }

    #[inline]
    fn clear(&self) {
        dispatch!(self, s => s.clear())
    }
}

impl IterTileKeys for AnyTileStorage {
    fn tile_keys(&self) -> Vec<Point2i> {
        dispatch!(self, s => s.tile_keys())
    }

    fn num_tiles(&self) -> usize {
        dispatch!(self, s => s.num_tiles())
    }
}

impl TileStorage for AnyTileStorage {
    fn for_grid(grid_size: Point2i) -> Self {
        let slots = grid_size.x().max(0) as i64 * grid_size.y().max(0) as i64;
        if slots > DENSE_SLOT_LIMIT {
            AnyTileStorage::Sparse(SparseTileGrid::for_grid(grid_size))
        } else {
            AnyTileStorage::Dense(DenseTileGrid::for_grid(grid_size))
        }
    }
}
