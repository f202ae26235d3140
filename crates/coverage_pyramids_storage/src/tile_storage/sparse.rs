use super::{IterTileKeys, TileReadStorage, TileStorage, TileWriteStorage};

use crate::{SmallKeyBuildHasher, TileRef};

use coverage_pyramids_core::prelude::*;

use dashmap::DashMap;

/// Tile slots stored in a concurrent hash map keyed by grid position. Only occupied slots take memory.
///
/// Positions are not bounds-checked here; the owning `Mosaic` checks them.
pub struct SparseTileGrid {
    grid_size: Point2i,
    tiles: DashMap<Point2i, TileRef, SmallKeyBuildHasher>,
}

impl SparseTileGrid {
    pub fn new(grid_size: Point2i) -> Self {
        Self {
            grid_size,
            tiles: DashMap::with_hasher(SmallKeyBuildHasher::default()),
        }
    }

    #[inline]
    pub fn grid_size(&self) -> Point2i {
        self.grid_size
    }

    #[inline]
    fn debug_check(&self, key: Point2i) {
        debug_assert!(
            Point2i::ZERO <= key && key < self.grid_size,
            "tile position {:?} is outside of grid size {:?}",
            key,
            self.grid_size
        );
    }
}

impl TileReadStorage for SparseTileGrid {
    #[inline]
    fn get(&self, key: Point2i) -> Option<TileRef> {
        self.debug_check(key);

        self.tiles.get(&key).map(|entry| entry.value().clone())
    }

    #[inline]
    fn contains(&self, key: Point2i) -> bool {
        self.debug_check(key);

        self.tiles.contains_key(&key)
    }
}

impl TileWriteStorage for SparseTileGrid {
    #[inline]
    fn replace(&self, key: Point2i, tile: TileRef) -> Option<TileRef> {
        self.debug_check(key);

        self.tiles.insert(key, tile)
    }

    #[inline]
    fn write(&self, key: Point2i, tile: TileRef) {
        self.replace(key, tile);
    }

    #[inline]
    fn pop(&self, key: Point2i) -> Option<TileRef> {
        self.debug_check(key);

        self.tiles.remove(&key).map(|(_, tile)| tile)
    }

    #[inline]
    fn delete(&self, key: Point2i) {
        self.pop(key);
    }

    fn clear(&self) {
        self.tiles.clear();
    }
}

impl IterTileKeys for SparseTileGrid {
    fn tile_keys(&self) -> Vec<Point2i> {
        let mut keys: Vec<Point2i> = self.tiles.iter().map(|entry| *entry.key()).collect();
        keys.sort_by_key(|k| (k.y(), k.x()));

        keys
    }

    fn num_tiles(&self) -> usize {
        self.tiles.len()
    }
}

impl TileStorage for SparseTileGrid {
    fn for_grid(grid_size: Point2i) -> Self {
        Self::new(grid_size)
    }
}
