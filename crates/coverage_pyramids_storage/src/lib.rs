#![allow(clippy::type_complexity, clippy::too_many_arguments)]

//! In-memory storage for pyramidal tiled rasters.
//!
//! The containers, from the top down:
//!   - `CoverageStore`: a registry of named resources
//!   - `Resource`: a set of pyramids plus the `RasterMetadata` (sample dimensions, color model, sample model) shared by every
//!     tile they hold
//!   - `Pyramid`: a set of mosaics in one CRS
//!   - `Mosaic`: one resolution level, a fixed grid of tile slots described by a `MosaicDescriptor`
//!   - `TilePayload`: an immutable block of samples, shared as a `TileRef`
//!
//! Every container locks only its own collection, and tile slots are written through `&self`, so many threads can fill a
//! pyramid at once. The slots of a mosaic live in a `TileStorage`: `DenseTileGrid` allocates every slot up front,
//! `SparseTileGrid` only the occupied ones, and the default `AnyTileStorage` picks one by grid size.
//!
//! Whole pyramid structures can be described as data with `PyramidLayout`, and `PyramidalBackend` abstracts over anything
//! that can create mosaics and read, write and delete tiles.

pub mod backend;
pub mod error;
pub mod layout;
pub mod metadata;
pub mod mosaic;
pub mod pyramid;
pub mod resource;
pub mod store;
pub mod tile;
pub mod tile_storage;

mod sync;

pub use backend::*;
pub use error::*;
pub use layout::*;
pub use metadata::*;
pub use mosaic::*;
pub use pyramid::*;
pub use resource::*;
pub use store::*;
pub use tile::*;
pub use tile_storage::*;

// Hash builder for small keys like `Point2i` and `Identifier`.
pub type SmallKeyBuildHasher = ahash::RandomState;

pub mod prelude {
    pub use super::{
        AnyTileStorage, ColorModel, CoverageStore, DenseTileGrid, ErrorKind, IterTileKeys, Mosaic,
        MosaicDescriptor, PixelType, Pyramid, PyramidError, PyramidLayout, PyramidModel,
        PyramidalBackend, RasterMetadata, Resource, SampleBuffer, SampleDimension, SampleModel,
        SparseTileGrid, TilePayload, TileReadStorage, TileRef, TileStorage, TileWriteStorage,
    };
}
