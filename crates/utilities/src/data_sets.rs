use coverage_pyramids_core::prelude::*;
use coverage_pyramids_storage::{MosaicDescriptor, PyramidLayout, TilePayload};

/// A 4x4 grid of 256x256 tiles at 100 units per pixel, anchored at (-9500, 20500).
pub fn small_mosaic_descriptor() -> MosaicDescriptor {
    MosaicDescriptor::new(
        PointN([-9500.0, 20500.0]),
        PointN([4, 4]),
        PointN([256, 256]),
        100.0,
    )
}

/// A square grid of `grid_side x grid_side` tiles of 16x16 pixels.
pub fn square_mosaic_descriptor(grid_side: i32) -> MosaicDescriptor {
    MosaicDescriptor::new(
        PointN([0.0, 0.0]),
        PointN([grid_side, grid_side]),
        PointN([16, 16]),
        1.0,
    )
}

/// Whole-world WGS84 pyramid, 2x1 tiles at the coarsest level.
pub fn world_layout(num_levels: u8) -> PyramidLayout {
    let num_levels = num_levels.max(1);
    let coarsest_scale = 180.0 / 256.0;
    let finest_scale = coarsest_scale / f64::from(1u32 << (num_levels - 1));
    let base_grid = PointN([2, 1]) * (1i32 << (num_levels - 1));

    PyramidLayout::power_of_two(
        Crs::WGS84,
        PointN([-180.0, 90.0]),
        finest_scale,
        PointN([256, 256]),
        base_grid,
        num_levels,
    )
}

/// A single-band `u8` tile with every sample equal to `value`.
pub fn gray_tile(position: Point2i, shape: Point2i, value: u8) -> TilePayload {
    TilePayload::filled(position, shape, 1, value).unwrap()
}

/// A single-band `u16` tile whose samples count up from 0 in row-major order.
pub fn ramp_tile(position: Point2i, shape: Point2i) -> TilePayload {
    let samples: Vec<u16> = (0..shape.volume()).map(|i| i as u16).collect();

    TilePayload::new(position, shape, 1, samples.into()).unwrap()
}
