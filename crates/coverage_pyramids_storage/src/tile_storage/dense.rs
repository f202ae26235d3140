use super::{IterTileKeys, TileReadStorage, TileStorage, TileWriteStorage};

use crate::{sync, TileRef};

use coverage_pyramids_core::prelude::*;

use std::sync::RwLock;

/// Eagerly allocated tile slots for a whole grid, one lock per slot, laid out in row-major order.
///
/// Lookup is a single index computation. Writers to distinct slots never contend. The cost is `columns * rows` slots of
/// memory even for an empty mosaic; use `SparseTileGrid` for huge, mostly empty grids.
pub struct DenseTileGrid {
    grid_size: Point2i,
    slots: Vec<RwLock<Option<TileRef>>>,
}

impl DenseTileGrid {
    pub fn new(grid_size: Point2i) -> Self {
        let num_slots = Extent2i::from_min_and_shape(Point2i::ZERO, grid_size).num_points();
        let mut slots = Vec::with_capacity(num_slots);
        slots.resize_with(num_slots, || RwLock::new(None));

        Self { grid_size, slots }
    }

    #[inline]
    pub fn grid_size(&self) -> Point2i {
        self.grid_size
    }

    /// # Panics
    ///
    /// If `key` is outside of the grid.
    #[inline]
    fn slot(&self, key: Point2i) -> &RwLock<Option<TileRef>> {
        assert!(
            Point2i::ZERO <= key && key < self.grid_size,
            "tile position {:?} is outside of grid size {:?}",
            key,
            self.grid_size
        );

        &self.slots[key.y() as usize * self.grid_size.x() as usize + key.x() as usize]
    }

    #[inline]
    fn key_for_stride(&self, stride: usize) -> Point2i {
        let width = self.grid_size.x() as usize;

        PointN([(stride % width) as i32, (stride / width) as i32])
    }
}

impl TileReadStorage for DenseTileGrid {
    #[inline]
    fn get(&self, key: Point2i) -> Option<TileRef> {
        sync::read(self.slot(key)).clone()
    }

    #[inline]
    fn contains(&self, key: Point2i) -> bool {
        sync::read(self.slot(key)).is_some()
    }
}

impl TileWriteStorage for DenseTileGrid {
    #[inline]
    fn replace(&self, key: Point2i, tile: TileRef) -> Option<TileRef> {
        sync::write(self.slot(key)).replace(tile)
    }

    #[inline]
    fn write(&self, key: Point2i, tile: TileRef) {
        self.replace(key, tile);
    }

    #[inline]
    fn pop(&self, key: Point2i) -> Option<TileRef> {
        sync::write(self.slot(key)).take()
    }

    #[inline]
    fn delete(&self, key: Point2i) {
        self.pop(key);
    }

    fn clear(&self) {
        for slot in self.slots.iter() {
            sync::write(slot).take();
        }
    }
}

impl IterTileKeys for DenseTileGrid {
    fn tile_keys(&self) -> Vec<Point2i> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| sync::read(slot).is_some())
            .map(|(stride, _)| self.key_for_stride(stride))
            .collect()
    }

    fn num_tiles(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| sync::read(slot).is_some())
            .count()
    }
}

impl TileStorage for DenseTileGrid {
    fn for_grid(grid_size: Point2i) -> Self {
        Self::new(grid_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::TilePayload;

    use std::sync::Arc;

    #[test]
    fn slots_are_row_major() {
        let grid = DenseTileGrid::new(PointN([3, 2]));
        assert_eq!(grid.slots.len(), 6);

        let key = PointN([1, 1]);
        grid.write(
            key,
            Arc::new(TilePayload::filled(key, PointN([1, 1]), 1, 0u8).unwrap()),
        );

        assert!(sync::read(&grid.slots[4]).is_some());
        assert_eq!(grid.key_for_stride(4), key);
    }

    #[test]
    #[should_panic(expected = "outside of grid")]
    fn column_past_the_edge_does_not_alias_the_next_row() {
        let grid = DenseTileGrid::new(PointN([3, 2]));

        grid.contains(PointN([3, 0]));
    }

    #[test]
    #[should_panic(expected = "outside of grid")]
    fn negative_positions_are_rejected() {
        let grid = DenseTileGrid::new(PointN([3, 2]));

        grid.contains(PointN([-1, 0]));
    }
}
