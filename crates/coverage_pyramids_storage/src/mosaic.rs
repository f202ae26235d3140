//! A single resolution level of a pyramid.
//!
//! A `Mosaic` is a `columns x rows` grid of tile slots. Every slot covers `tile_shape` pixels, and every pixel covers `scale`
//! ground units of the pyramid's CRS. The grid is anchored at `upper_left`, with columns increasing east and rows increasing
//! south.
//!
//! ```
//! use coverage_pyramids_core::prelude::*;
//! use coverage_pyramids_storage::MosaicDescriptor;
//!
//! let descriptor = MosaicDescriptor::new(PointN([-9500.0, 20500.0]), PointN([4, 4]), PointN([256, 256]), 100.0);
//!
//! // Each tile spans 256 pixels * 100 units.
//! assert_eq!(descriptor.tile_span(), PointN([25600.0, 25600.0]));
//! assert_eq!(descriptor.tile_containing(PointN([-9400.0, 20400.0])), Some(PointN([0, 0])));
//! assert_eq!(descriptor.tile_containing(PointN([-9600.0, 20400.0])), None);
//! ```

use crate::{
    IterTileKeys, PyramidError, RasterMetadata, Result, TileReadStorage, TileRef, TileStorage,
    TileWriteStorage,
};

use coverage_pyramids_core::prelude::*;

use either::Either;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The fixed structure of a mosaic. Copying a descriptor is how one mosaic serves as the template of another.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct MosaicDescriptor {
    /// Geographic position of the upper-left corner of tile `(0, 0)`.
    pub upper_left: Point2d,
    /// Number of tile columns and rows.
    pub grid_size: Point2i,
    /// Pixel width and height of every tile slot.
    pub tile_shape: Point2i,
    /// Ground units per pixel along X and Y.
    pub scale: Point2d,
}

impl MosaicDescriptor {
    /// A descriptor with square pixels.
    pub fn new(upper_left: Point2d, grid_size: Point2i, tile_shape: Point2i, scale: f64) -> Self {
        Self {
            upper_left,
            grid_size,
            tile_shape,
            scale: Point2d::fill(scale),
        }
    }

    /// Use a separate scale for each axis.
    pub fn with_scale(mut self, scale: Point2d) -> Self {
        self.scale = scale;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.grid_size.is_positive() {
            return Err(PyramidError::InvalidLayout(format!(
                "grid size {:?} must be positive",
                self.grid_size
            )));
        }
        if !self.tile_shape.is_positive() {
            return Err(PyramidError::InvalidLayout(format!(
                "tile shape {:?} must be positive",
                self.tile_shape
            )));
        }
        if self.pixel_shape().is_none() {
            return Err(PyramidError::InvalidLayout(format!(
                "grid size {:?} of {:?} tiles overflows the pixel range",
                self.grid_size, self.tile_shape
            )));
        }
        if !self.scale.is_positive() {
            return Err(PyramidError::InvalidLayout(format!(
                "scale {:?} must be finite and positive",
                self.scale
            )));
        }
        if !self.upper_left.is_finite() {
            return Err(PyramidError::InvalidLayout(format!(
                "upper-left corner {:?} must be finite",
                self.upper_left
            )));
        }

        Ok(())
    }

    /// The X component of the scale. For square pixels this is *the* scale.
    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale.x()
    }

    /// Ground size of one tile.
    #[inline]
    pub fn tile_span(&self) -> Point2d {
        Point2d::from(self.tile_shape) * self.scale
    }

    /// The extent of valid tile positions.
    #[inline]
    pub fn grid_extent(&self) -> Extent2i {
        Extent2i::from_min_and_shape(Point2i::ZERO, self.grid_size)
    }

    /// The size of the whole grid in pixels, or `None` if it does not fit in `i32`.
    #[inline]
    pub fn pixel_shape(&self) -> Option<Point2i> {
        self.grid_size.checked_mul(&self.tile_shape)
    }

    /// Geographic envelope of the whole grid.
    pub fn envelope(&self) -> Extent2d {
        let size = Point2d::from(self.grid_size) * self.tile_span();

        Extent2d::from_min_and_shape(
            PointN([self.upper_left.x(), self.upper_left.y() - size.y()]),
            size,
        )
    }

    /// Geographic envelope of the tile at `position`. Positions outside of the grid are extrapolated.
    pub fn tile_envelope(&self, position: Point2i) -> Extent2d {
        let span = self.tile_span();
        let min_x = self.upper_left.x() + position.x() as f64 * span.x();
        let max_y = self.upper_left.y() - position.y() as f64 * span.y();

        Extent2d::from_min_and_shape(PointN([min_x, max_y - span.y()]), span)
    }

    /// The position of the tile covering geographic point `p`, if that tile is within the grid. Non-finite points are
    /// covered by no tile.
    pub fn tile_containing(&self, p: Point2d) -> Option<Point2i> {
        let offset = self.grid_offset(p);
        if !offset.is_finite() {
            return None;
        }
        let position = offset.in_cell();

        self.grid_extent().contains(position).then(|| position)
    }

    /// All tile positions whose envelopes overlap `envelope`, clamped to the grid. Touching edges do not count, so a zero-area
    /// envelope lying on a tile edge intersects nothing and the result is empty. So is the result for an envelope with a NaN
    /// component.
    pub fn tiles_intersecting(&self, envelope: &Extent2d) -> Extent2i {
        let lub = envelope.least_upper_bound();
        // Rows run south, so the north edge of the envelope gives the first row.
        let first = self
            .grid_offset(PointN([envelope.minimum.x(), lub.y()]))
            .floor();
        let last = self
            .grid_offset(PointN([lub.x(), envelope.minimum.y()]))
            .ceil();
        if first.has_nan() || last.has_nan() {
            return Extent2i::from_min_and_shape(Point2i::ZERO, Point2i::ZERO);
        }

        Extent2i::from_min_and_lub(first.as_2i(), last.as_2i()).intersection(&self.grid_extent())
    }

    /// `p` in fractional tile units, relative to the upper-left corner.
    #[inline]
    fn grid_offset(&self, p: Point2d) -> Point2d {
        let span = self.tile_span();

        PointN([
            (p.x() - self.upper_left.x()) / span.x(),
            (self.upper_left.y() - p.y()) / span.y(),
        ])
    }
}

/// One resolution level: a fixed grid of tile slots stored in `S`.
///
/// Slots are written through `&self`, so many threads can fill a mosaic at once. The raw accessors (`is_missing`, `get_tile`,
/// `set_tile`, `delete_tile`) treat a position outside of the grid as an indexing bug and panic. `write_tile` is the checked
/// entry point for tiles coming from elsewhere.
pub struct Mosaic<S = crate::AnyTileStorage> {
    id: Identifier,
    pyramid_id: Identifier,
    crs: Crs,
    descriptor: MosaicDescriptor,
    storage: S,
    metadata: Arc<RasterMetadata>,
}

impl<S: TileStorage> Mosaic<S> {
    /// Creates a mosaic with every slot empty. The descriptor must already be validated.
    pub(crate) fn new(
        id: Identifier,
        pyramid_id: Identifier,
        crs: Crs,
        descriptor: MosaicDescriptor,
        metadata: Arc<RasterMetadata>,
    ) -> Self {
        Self {
            storage: S::for_grid(descriptor.grid_size),
            id,
            pyramid_id,
            crs,
            descriptor,
            metadata,
        }
    }
}

impl<S> Mosaic<S> {
    #[inline]
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// The id of the owning pyramid.
    #[inline]
    pub fn pyramid_id(&self) -> &Identifier {
        &self.pyramid_id
    }

    #[inline]
    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    #[inline]
    pub fn descriptor(&self) -> &MosaicDescriptor {
        &self.descriptor
    }

    #[inline]
    pub fn upper_left(&self) -> Point2d {
        self.descriptor.upper_left
    }

    #[inline]
    pub fn grid_size(&self) -> Point2i {
        self.descriptor.grid_size
    }

    #[inline]
    pub fn tile_shape(&self) -> Point2i {
        self.descriptor.tile_shape
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.descriptor.scale()
    }

    #[inline]
    pub fn grid_extent(&self) -> Extent2i {
        self.descriptor.grid_extent()
    }

    #[inline]
    pub fn pixel_shape(&self) -> Option<Point2i> {
        self.descriptor.pixel_shape()
    }

    #[inline]
    pub fn envelope(&self) -> Extent2d {
        self.descriptor.envelope()
    }

    #[inline]
    pub fn tile_envelope(&self, position: Point2i) -> Extent2d {
        self.descriptor.tile_envelope(position)
    }

    #[inline]
    pub fn tile_containing(&self, p: Point2d) -> Option<Point2i> {
        self.descriptor.tile_containing(p)
    }

    #[inline]
    pub fn tiles_intersecting(&self, envelope: &Extent2d) -> Extent2i {
        self.descriptor.tiles_intersecting(envelope)
    }

    /// The raster metadata shared with the rest of the resource.
    #[inline]
    pub fn metadata(&self) -> &Arc<RasterMetadata> {
        &self.metadata
    }

    #[inline]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns an error iff `position` is outside of the grid.
    pub fn check_position(&self, position: Point2i) -> Result<()> {
        if self.grid_extent().contains(position) {
            Ok(())
        } else {
            Err(PyramidError::TileOutOfGrid {
                position,
                grid_size: self.grid_size(),
            })
        }
    }

    #[inline]
    fn assert_in_grid(&self, position: Point2i) {
        assert!(
            self.grid_extent().contains(position),
            "tile position {:?} is outside of grid size {:?}",
            position,
            self.grid_size()
        );
    }
}

impl<S> Mosaic<S>
where
    S: TileReadStorage + IterTileKeys,
{
    /// Returns `true` iff no tile occupies `position`.
    ///
    /// # Panics
    ///
    /// If `position` is outside of the grid.
    #[inline]
    pub fn is_missing(&self, position: Point2i) -> bool {
        self.assert_in_grid(position);

        !self.storage.contains(position)
    }

    /// # Panics
    ///
    /// If `position` is outside of the grid.
    #[inline]
    pub fn get_tile(&self, position: Point2i) -> Option<TileRef> {
        self.assert_in_grid(position);

        self.storage.get(position)
    }

    /// Positions of all present tiles, in row-major order.
    pub fn tile_keys(&self) -> Vec<Point2i> {
        self.storage.tile_keys()
    }

    pub fn num_tiles(&self) -> usize {
        self.storage.num_tiles()
    }

    /// Calls `visitor` for every position of `extent` that lies in the grid, in row-major order, with either the tile or the
    /// position of the empty slot.
    pub fn visit_tiles(&self, extent: &Extent2i, mut visitor: impl FnMut(Either<TileRef, Point2i>)) {
        for position in extent.intersection(&self.grid_extent()).iter_points() {
            match self.storage.get(position) {
                Some(tile) => visitor(Either::Left(tile)),
                None => visitor(Either::Right(position)),
            }
        }
    }
}

impl<S> Mosaic<S>
where
    S: TileWriteStorage,
{
    /// Overwrites the slot at `position` with `tile`, or empties it for `None`. No size or metadata checks are performed.
    ///
    /// # Panics
    ///
    /// If `position` is outside of the grid.
    pub fn set_tile(&self, position: Point2i, tile: Option<TileRef>) {
        self.assert_in_grid(position);

        match tile {
            Some(tile) => {
                debug_assert_eq!(tile.position(), position);
                self.storage.write(position, tile);
            }
            None => self.storage.delete(position),
        }
    }

    /// Writes `tile` into the slot at its own position, last write wins.
    ///
    /// The tile must lie in the grid, must be no larger than the mosaic's tile shape, and must agree with the resource's color
    /// model and sample model. The first tile to carry a color model establishes it for the whole resource. On error, the slot
    /// is left unchanged.
    pub fn write_tile(&self, tile: impl Into<TileRef>) -> Result<()> {
        let tile = tile.into();
        let position = tile.position();

        self.check_position(position)?;
        let tile_shape = self.tile_shape();
        if !(tile.shape() <= tile_shape) {
            return Err(PyramidError::IncorrectTileSize {
                tile_shape: tile.shape(),
                max_shape: tile_shape,
            });
        }
        self.metadata.admit_tile(&tile)?;

        trace!(mosaic = %self.id, ?position, "write tile");
        self.storage.write(position, tile);

        Ok(())
    }

    /// Writes each tile in turn, returning one result per tile. Tiles are written independently, so a failure leaves earlier
    /// writes in place.
    pub fn write_tiles<T>(&self, tiles: impl IntoIterator<Item = T>) -> Vec<Result<()>>
    where
        T: Into<TileRef>,
    {
        tiles.into_iter().map(|tile| self.write_tile(tile)).collect()
    }

    /// Empties the slot at `position`. Emptying an empty slot does nothing.
    ///
    /// # Panics
    ///
    /// If `position` is outside of the grid.
    pub fn delete_tile(&self, position: Point2i) -> Option<TileRef> {
        self.assert_in_grid(position);

        trace!(mosaic = %self.id, ?position, "delete tile");
        self.storage.pop(position)
    }

    /// Empties every slot.
    pub fn clear(&self) {
        self.storage.clear();
    }
}

impl<S> fmt::Debug for Mosaic<S>
where
    S: IterTileKeys,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mosaic")
            .field("id", &self.id)
            .field("pyramid_id", &self.pyramid_id)
            .field("crs", &self.crs)
            .field("descriptor", &self.descriptor)
            .field("num_tiles", &self.storage.num_tiles())
            .finish()
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
