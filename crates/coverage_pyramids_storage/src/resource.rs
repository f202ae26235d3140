use crate::{
    sync, AnyTileStorage, ColorModel, Mosaic, MosaicDescriptor, Pyramid, PyramidError,
    PyramidModel, RasterMetadata, Result, SampleDimension, SampleModel, SmallKeyBuildHasher,
    TileRef, TileStorage,
};

use coverage_pyramids_core::prelude::*;

use float_ord::FloatOrd;
use indexmap::IndexMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::debug;

/// A monotonically increasing source of identifiers, shared by a resource and all of its pyramids.
#[derive(Clone, Debug, Default)]
pub struct IdSequence(Arc<AtomicU64>);

impl IdSequence {
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }

    /// Draws identifiers until one is not `taken`. Caller-chosen ids may collide with generated ones.
    pub fn next_unused(&self, taken: impl Fn(&Identifier) -> bool) -> Identifier {
        loop {
            let id = Identifier::new(self.next().to_string());
            if !taken(&id) {
                return id;
            }
        }
    }
}

type PyramidMap<S> = IndexMap<Identifier, Arc<Pyramid<S>>, SmallKeyBuildHasher>;

/// A pyramidal coverage: a set of `Pyramid`s plus the raster metadata all of their tiles share.
///
/// Reads and writes are addressed by `(pyramid id, mosaic id, position)`. Identifiers compare case-insensitively.
///
/// ```
/// use coverage_pyramids_core::prelude::*;
/// use coverage_pyramids_storage::prelude::*;
///
/// let resource: Resource = Resource::new("elevation");
/// let pyramid = resource.create_pyramid(Crs::WGS84);
/// let mosaic = resource
///     .create_mosaic(
///         pyramid.id(),
///         &MosaicDescriptor::new(PointN([-180.0, 90.0]), PointN([2, 1]), PointN([256, 256]), 0.703125),
///     )
///     .unwrap();
///
/// let tile = TilePayload::filled(PointN([1, 0]), PointN([256, 256]), 1, 0.0f32).unwrap();
/// resource.write_tile(pyramid.id(), mosaic.id(), tile).unwrap();
///
/// assert_eq!(resource.is_missing(pyramid.id(), mosaic.id(), PointN([1, 0])), Ok(false));
/// ```
pub struct Resource<S = AnyTileStorage> {
    name: Identifier,
    pyramids: RwLock<PyramidMap<S>>,
    ids: IdSequence,
    metadata: Arc<RasterMetadata>,
}

impl<S> Resource<S> {
    pub fn new(name: impl Into<Identifier>) -> Self {
        Self {
            name: name.into(),
            pyramids: RwLock::new(IndexMap::with_hasher(SmallKeyBuildHasher::default())),
            ids: IdSequence::default(),
            metadata: Arc::new(RasterMetadata::new()),
        }
    }

    #[inline]
    pub fn name(&self) -> &Identifier {
        &self.name
    }

    #[inline]
    pub fn metadata(&self) -> &Arc<RasterMetadata> {
        &self.metadata
    }

    pub fn sample_dimensions(&self) -> Vec<SampleDimension> {
        self.metadata.sample_dimensions()
    }

    pub fn set_sample_dimensions(&self, dimensions: Vec<SampleDimension>) {
        self.metadata.set_sample_dimensions(dimensions)
    }

    pub fn color_model(&self) -> Option<ColorModel> {
        self.metadata.color_model()
    }

    /// Fails with `ColorModelMismatch` if a different color model is already established.
    pub fn set_color_model(&self, color_model: ColorModel) -> Result<()> {
        self.metadata.set_color_model(color_model)
    }

    pub fn sample_model(&self) -> Option<SampleModel> {
        self.metadata.sample_model()
    }

    /// Fails with `SampleModelMismatch` if a different sample model is already established.
    pub fn set_sample_model(&self, sample_model: SampleModel) -> Result<()> {
        self.metadata.set_sample_model(sample_model)
    }

    /// A snapshot of the pyramids, in creation order.
    pub fn pyramids(&self) -> Vec<Arc<Pyramid<S>>> {
        sync::read(&self.pyramids).values().cloned().collect()
    }

    pub fn pyramid(&self, id: impl AsRef<IdStr>) -> Option<Arc<Pyramid<S>>> {
        sync::read(&self.pyramids).get(id.as_ref()).cloned()
    }

    pub fn num_pyramids(&self) -> usize {
        sync::read(&self.pyramids).len()
    }

    /// Creates an empty pyramid with a generated id.
    pub fn create_pyramid(&self, crs: Crs) -> Arc<Pyramid<S>> {
        let mut pyramids = sync::write(&self.pyramids);
        let id = self.ids.next_unused(|id| pyramids.contains_key(id));

        self.insert_pyramid(&mut pyramids, id, crs)
    }

    /// Creates an empty pyramid named `id`. Fails with `AlreadyExists` if the name is taken.
    pub fn create_pyramid_with_id(
        &self,
        id: impl Into<Identifier>,
        crs: Crs,
    ) -> Result<Arc<Pyramid<S>>> {
        let id = id.into();
        let mut pyramids = sync::write(&self.pyramids);
        if pyramids.contains_key(&id) {
            return Err(PyramidError::AlreadyExists(id));
        }

        Ok(self.insert_pyramid(&mut pyramids, id, crs))
    }

    fn insert_pyramid(&self, pyramids: &mut PyramidMap<S>, id: Identifier, crs: Crs) -> Arc<Pyramid<S>> {
        debug!(resource = %self.name, pyramid = %id, %crs, "created pyramid");

        let pyramid = Arc::new(Pyramid::new(
            id.clone(),
            crs,
            self.ids.clone(),
            Arc::clone(&self.metadata),
        ));
        pyramids.insert(id, Arc::clone(&pyramid));

        pyramid
    }

    /// Resolve the pyramid addressed by a read or write.
    fn resolve_pyramid(&self, id: impl AsRef<IdStr>) -> Result<Arc<Pyramid<S>>> {
        let id = id.as_ref();

        sync::read(&self.pyramids)
            .get(id)
            .cloned()
            .ok_or_else(|| PyramidError::UnresolvedPyramid(id.into()))
    }

    /// Resolve the mosaic addressed by a read or write.
    fn resolve_mosaic(
        &self,
        pyramid_id: impl AsRef<IdStr>,
        mosaic_id: impl AsRef<IdStr>,
    ) -> Result<Arc<Mosaic<S>>> {
        let pyramid = self.resolve_pyramid(pyramid_id)?;
        let mosaic_id = mosaic_id.as_ref();

        pyramid
            .mosaic(mosaic_id)
            .ok_or_else(|| PyramidError::UnresolvedMosaic {
                pyramid: pyramid.id().clone(),
                mosaic: mosaic_id.into(),
            })
    }

    pub fn mosaic(
        &self,
        pyramid_id: impl AsRef<IdStr>,
        mosaic_id: impl AsRef<IdStr>,
    ) -> Option<Arc<Mosaic<S>>> {
        self.resolve_mosaic(pyramid_id, mosaic_id).ok()
    }

    /// The mosaic, across all pyramids, whose scale is closest to `scale` and at most `tolerance` away from it.
    pub fn find_mosaic(&self, scale: f64, tolerance: f64) -> Option<Arc<Mosaic<S>>> {
        self.pyramids()
            .into_iter()
            .filter_map(|p| p.nearest_mosaic(scale))
            .filter(|m| (m.scale() - scale).abs() <= tolerance)
            .min_by_key(|m| FloatOrd((m.scale() - scale).abs()))
    }
}

impl<S: TileStorage> Resource<S> {
    /// Creates a pyramid with a fresh id, the CRS of `template`, and one empty mosaic per template mosaic. Tile contents are
    /// never copied. Nothing is created if any template mosaic is invalid.
    pub fn create_model(&self, template: &impl PyramidModel) -> Result<Arc<Pyramid<S>>> {
        let descriptors = template.mosaic_descriptors();
        descriptors.iter().try_for_each(MosaicDescriptor::validate)?;

        let mut pyramids = sync::write(&self.pyramids);
        let id = self.ids.next_unused(|id| pyramids.contains_key(id));
        let pyramid = Arc::new(Pyramid::new(
            id.clone(),
            template.model_crs(),
            self.ids.clone(),
            Arc::clone(&self.metadata),
        ));
        for descriptor in descriptors.iter() {
            pyramid.create_mosaic(descriptor)?;
        }
        pyramids.insert(id, Arc::clone(&pyramid));

        debug!(
            resource = %self.name,
            pyramid = %pyramid.id(),
            crs = %pyramid.crs(),
            num_mosaics = descriptors.len(),
            "created model"
        );

        Ok(pyramid)
    }

    /// Like `create_model`, using the existing pyramid `id` as the template. Fails with `PyramidNotFound` if there is none.
    pub fn create_model_like(&self, id: impl AsRef<IdStr>) -> Result<Arc<Pyramid<S>>> {
        let id = id.as_ref();
        let template = self
            .pyramid(id)
            .ok_or_else(|| PyramidError::PyramidNotFound(id.into()))?;

        self.create_model(&template)
    }

    /// Removes the pyramid and empties every slot of every one of its mosaics. Fails with `PyramidNotFound` if there is no such
    /// pyramid.
    pub fn remove_model(&self, id: impl AsRef<IdStr>) -> Result<Arc<Pyramid<S>>> {
        let id = id.as_ref();
        let removed = sync::write(&self.pyramids).shift_remove(id);
        let pyramid = removed.ok_or_else(|| PyramidError::PyramidNotFound(id.into()))?;
        pyramid.clear();

        debug!(resource = %self.name, pyramid = %pyramid.id(), "removed model");

        Ok(pyramid)
    }

    /// Removes every pyramid, emptying all slots.
    pub fn clear(&self) {
        let removed: Vec<_> = sync::write(&self.pyramids).drain(..).collect();
        for (_, pyramid) in removed {
            pyramid.clear();
        }
    }

    pub fn create_mosaic(
        &self,
        pyramid_id: impl AsRef<IdStr>,
        template: &MosaicDescriptor,
    ) -> Result<Arc<Mosaic<S>>> {
        self.resolve_pyramid(pyramid_id)?.create_mosaic(template)
    }

    /// Removes a mosaic and empties its slots. Unknown pyramids and mosaics are ignored.
    pub fn delete_mosaic(
        &self,
        pyramid_id: impl AsRef<IdStr>,
        mosaic_id: impl AsRef<IdStr>,
    ) -> Option<Arc<Mosaic<S>>> {
        self.pyramid(pyramid_id)?.delete_mosaic(mosaic_id)
    }

    pub fn write_tile(
        &self,
        pyramid_id: impl AsRef<IdStr>,
        mosaic_id: impl AsRef<IdStr>,
        tile: impl Into<TileRef>,
    ) -> Result<()> {
        self.resolve_mosaic(pyramid_id, mosaic_id)?.write_tile(tile)
    }

    /// Resolves the mosaic once, then writes each tile independently. See `Mosaic::write_tiles`.
    pub fn write_tiles<T>(
        &self,
        pyramid_id: impl AsRef<IdStr>,
        mosaic_id: impl AsRef<IdStr>,
        tiles: impl IntoIterator<Item = T>,
    ) -> Result<Vec<Result<()>>>
    where
        T: Into<TileRef>,
    {
        Ok(self.resolve_mosaic(pyramid_id, mosaic_id)?.write_tiles(tiles))
    }

    pub fn read_tile(
        &self,
        pyramid_id: impl AsRef<IdStr>,
        mosaic_id: impl AsRef<IdStr>,
        position: Point2i,
    ) -> Result<Option<TileRef>> {
        let mosaic = self.resolve_mosaic(pyramid_id, mosaic_id)?;
        mosaic.check_position(position)?;

        Ok(mosaic.get_tile(position))
    }

    pub fn is_missing(
        &self,
        pyramid_id: impl AsRef<IdStr>,
        mosaic_id: impl AsRef<IdStr>,
        position: Point2i,
    ) -> Result<bool> {
        let mosaic = self.resolve_mosaic(pyramid_id, mosaic_id)?;
        mosaic.check_position(position)?;

        Ok(mosaic.is_missing(position))
    }

    /// Empties a slot. Unknown pyramids and mosaics are ignored, but a position outside of an existing mosaic's grid is a
    /// `TileOutOfGrid` error.
    pub fn delete_tile(
        &self,
        pyramid_id: impl AsRef<IdStr>,
        mosaic_id: impl AsRef<IdStr>,
        position: Point2i,
    ) -> Result<Option<TileRef>> {
        match self.mosaic(pyramid_id, mosaic_id) {
            Some(mosaic) => {
                mosaic.check_position(position)?;

                Ok(mosaic.delete_tile(position))
            }
            None => Ok(None),
        }
    }
}

impl<S> fmt::Debug for Resource<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pyramids = sync::read(&self.pyramids);

        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("pyramids", &pyramids.values().collect::<Vec<_>>())
            .finish()
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
