//! Multi-resolution tiled raster storage.
//!
//! A raster is stored as a set of pyramids. Each pyramid is a set of mosaics (resolution levels) in one coordinate reference
//! system, and each mosaic is a regular grid of fixed-size tiles anchored at a geographic upper-left corner.
//!
//! This library is organized into two crates:
//! - **core**: points, extents, identifiers and CRS tags
//! - **storage**: tiles, mosaics, pyramids, resources and the store that registers them
//!
//! ```
//! use coverage_pyramids::prelude::*;
//!
//! let store: CoverageStore = CoverageStore::new();
//! let resource = store.create("bathymetry").unwrap();
//!
//! let layout = PyramidLayout::power_of_two(
//!     Crs::WGS84,
//!     PointN([-180.0, 90.0]),
//!     0.1,
//!     PointN([256, 256]),
//!     PointN([15, 8]),
//!     4,
//! );
//! let pyramid = resource.create_model(&layout).unwrap();
//! let finest = pyramid.mosaics_by_scale()[0].clone();
//!
//! let position = finest.tile_containing(PointN([-70.5, 41.2])).unwrap();
//! let tile = TilePayload::filled(position, PointN([256, 256]), 1, -35.0f32).unwrap();
//! resource.write_tile(pyramid.id(), finest.id(), tile).unwrap();
//!
//! assert!(!finest.is_missing(position));
//! assert_eq!(resource.sample_model().unwrap().pixel_type, PixelType::F32);
//!
//! resource.remove_model(pyramid.id()).unwrap();
//! assert!(finest.is_missing(position));
//! ```

pub use coverage_pyramids_core as core;
pub use coverage_pyramids_storage as storage;

pub mod prelude {
    pub use super::core::prelude::*;
    pub use super::storage::prelude::*;
}
