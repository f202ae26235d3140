use crate::{
    sync, AnyTileStorage, IdSequence, Mosaic, MosaicDescriptor, RasterMetadata, Result,
    SmallKeyBuildHasher, TileStorage,
};

use coverage_pyramids_core::prelude::*;

use auto_impl::auto_impl;
use float_ord::FloatOrd;
use indexmap::IndexMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Anything that can serve as the structural template of a new pyramid: a CRS plus one descriptor per mosaic.
#[auto_impl(&, Box, Arc)]
pub trait PyramidModel {
    fn model_crs(&self) -> Crs;

    fn mosaic_descriptors(&self) -> Vec<MosaicDescriptor>;
}

pub(crate) type MosaicMap<S> = IndexMap<Identifier, Arc<Mosaic<S>>, SmallKeyBuildHasher>;

/// A named set of `Mosaic`s sharing one CRS.
///
/// Mosaics are enumerated in creation order. Every mosaic created here is stamped with the pyramid's CRS and id, and gets a
/// fresh id from the sequence of the owning resource.
pub struct Pyramid<S = AnyTileStorage> {
    id: Identifier,
    crs: Crs,
    mosaics: RwLock<MosaicMap<S>>,
    ids: IdSequence,
    metadata: Arc<RasterMetadata>,
}

impl<S> Pyramid<S> {
    pub(crate) fn new(
        id: Identifier,
        crs: Crs,
        ids: IdSequence,
        metadata: Arc<RasterMetadata>,
    ) -> Self {
        Self {
            id,
            crs,
            mosaics: RwLock::new(IndexMap::with_hasher(SmallKeyBuildHasher::default())),
            ids,
            metadata,
        }
    }

    #[inline]
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    #[inline]
    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    /// A snapshot of the mosaics, in creation order.
    pub fn mosaics(&self) -> Vec<Arc<Mosaic<S>>> {
        sync::read(&self.mosaics).values().cloned().collect()
    }

    pub fn mosaic(&self, id: impl AsRef<IdStr>) -> Option<Arc<Mosaic<S>>> {
        sync::read(&self.mosaics).get(id.as_ref()).cloned()
    }

    pub fn contains_mosaic(&self, id: impl AsRef<IdStr>) -> bool {
        sync::read(&self.mosaics).contains_key(id.as_ref())
    }

    pub fn num_mosaics(&self) -> usize {
        sync::read(&self.mosaics).len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_mosaics() == 0
    }

    pub fn descriptors(&self) -> Vec<MosaicDescriptor> {
        sync::read(&self.mosaics)
            .values()
            .map(|m| *m.descriptor())
            .collect()
    }

    /// The distinct mosaic scales, finest first.
    pub fn scales(&self) -> Vec<f64> {
        let mut scales: Vec<FloatOrd<f64>> = sync::read(&self.mosaics)
            .values()
            .map(|m| FloatOrd(m.scale()))
            .collect();
        scales.sort_unstable();
        scales.dedup();

        scales.into_iter().map(|s| s.0).collect()
    }

    /// A snapshot of the mosaics, finest scale first. Mosaics with equal scales keep their creation order.
    pub fn mosaics_by_scale(&self) -> Vec<Arc<Mosaic<S>>> {
        let mut mosaics = self.mosaics();
        mosaics.sort_by_key(|m| FloatOrd(m.scale()));

        mosaics
    }

    /// The mosaic whose scale is closest to `scale`. Ties go to the earliest created.
    pub fn nearest_mosaic(&self, scale: f64) -> Option<Arc<Mosaic<S>>> {
        sync::read(&self.mosaics)
            .values()
            .min_by_key(|m| FloatOrd((m.scale() - scale).abs()))
            .cloned()
    }

    /// The union of all mosaic envelopes, or `None` for an empty pyramid.
    pub fn envelope(&self) -> Option<Extent2d> {
        sync::read(&self.mosaics)
            .values()
            .map(|m| m.envelope())
            .reduce(|a, b| a.union(&b))
    }
}

impl<S: TileStorage> Pyramid<S> {
    /// Creates an empty mosaic with the structure of `template` and a fresh id.
    pub fn create_mosaic(&self, template: &MosaicDescriptor) -> Result<Arc<Mosaic<S>>> {
        template.validate()?;

        let mut mosaics = sync::write(&self.mosaics);
        let id = self.ids.next_unused(|id| mosaics.contains_key(id));
        let mosaic = Arc::new(Mosaic::new(
            id.clone(),
            self.id.clone(),
            self.crs.clone(),
            *template,
            Arc::clone(&self.metadata),
        ));
        mosaics.insert(id, Arc::clone(&mosaic));

        debug!(pyramid = %self.id, mosaic = %mosaic.id(), grid_size = ?template.grid_size, "created mosaic");

        Ok(mosaic)
    }

    /// Removes the mosaic and empties all of its slots. Removing an unknown mosaic does nothing.
    pub fn delete_mosaic(&self, id: impl AsRef<IdStr>) -> Option<Arc<Mosaic<S>>> {
        let removed = sync::write(&self.mosaics).shift_remove(id.as_ref());

        if let Some(mosaic) = &removed {
            mosaic.clear();
            debug!(pyramid = %self.id, mosaic = %mosaic.id(), "deleted mosaic");
        }

        removed
    }

    /// Removes every mosaic, emptying their slots.
    pub fn clear(&self) {
        let removed: Vec<_> = sync::write(&self.mosaics).drain(..).collect();
        for (_, mosaic) in removed {
            mosaic.clear();
        }
    }
}

impl<S> PyramidModel for Pyramid<S> {
    fn model_crs(&self) -> Crs {
        self.crs.clone()
    }

    fn mosaic_descriptors(&self) -> Vec<MosaicDescriptor> {
        self.descriptors()
    }
}

impl<S> fmt::Debug for Pyramid<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mosaics = sync::read(&self.mosaics);

        f.debug_struct("Pyramid")
            .field("id", &self.id)
            .field("crs", &self.crs)
            .field("mosaics", &mosaics.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{TilePayload, TileRef};

    use pretty_assertions::assert_eq;

    fn pyramid() -> Pyramid {
        Pyramid::new(
            "p".into(),
            Crs::WGS84,
            IdSequence::default(),
            Arc::new(RasterMetadata::new()),
        )
    }

    fn level(scale: f64) -> MosaicDescriptor {
        MosaicDescriptor::new(
            PointN([-9500.0, 20500.0]),
            PointN([4, 4]),
            PointN([256, 256]),
            scale,
        )
    }

    #[test]
    fn created_mosaics_are_stamped_and_enumerated_in_order() {
        let p = pyramid();
        let a = p.create_mosaic(&level(100.0)).unwrap();
        let b = p.create_mosaic(&level(50.0)).unwrap();

        assert_ne!(a.id(), b.id());
        assert_eq!(a.pyramid_id(), p.id());
        assert_eq!(b.crs(), &Crs::WGS84);

        let ids: Vec<_> = p.mosaics().iter().map(|m| m.id().clone()).collect();
        assert_eq!(ids, vec![a.id().clone(), b.id().clone()]);
        assert_eq!(ids, p.mosaics().iter().map(|m| m.id().clone()).collect::<Vec<_>>());
    }

    #[test]
    fn invalid_template_creates_nothing() {
        let p = pyramid();

        assert!(p.create_mosaic(&level(-1.0)).is_err());
        assert!(p.is_empty());
    }

    #[test]
    fn delete_mosaic_is_idempotent_and_releases_tiles() {
        let p = pyramid();
        let m = p.create_mosaic(&level(100.0)).unwrap();
        let tile: TileRef = TilePayload::filled(PointN([0, 0]), PointN([4, 4]), 1, 0u8)
            .unwrap()
            .into();
        m.write_tile(tile).unwrap();

        let removed = p.delete_mosaic(m.id()).unwrap();
        assert_eq!(removed.num_tiles(), 0);
        assert!(p.mosaic(m.id()).is_none());

        assert!(p.delete_mosaic(m.id()).is_none());
        assert!(p.delete_mosaic("never-existed").is_none());
    }

    #[test]
    fn scale_queries() {
        let p = pyramid();
        let coarse = p.create_mosaic(&level(400.0)).unwrap();
        let fine = p.create_mosaic(&level(100.0)).unwrap();
        p.create_mosaic(&level(100.0)).unwrap();
        let mid = p.create_mosaic(&level(200.0)).unwrap();

        assert_eq!(p.scales(), vec![100.0, 200.0, 400.0]);

        let by_scale: Vec<_> = p.mosaics_by_scale().iter().map(|m| m.scale()).collect();
        assert_eq!(by_scale, vec![100.0, 100.0, 200.0, 400.0]);

        assert_eq!(p.nearest_mosaic(90.0).unwrap().id(), fine.id());
        assert_eq!(p.nearest_mosaic(260.0).unwrap().id(), mid.id());
        assert_eq!(p.nearest_mosaic(1e6).unwrap().id(), coarse.id());
    }

    #[test]
    fn envelope_covers_every_mosaic() {
        let p = pyramid();
        assert_eq!(p.envelope(), None);

        let small = p.create_mosaic(&level(100.0)).unwrap();
        let big = p.create_mosaic(&level(200.0)).unwrap();

        assert_eq!(p.envelope(), Some(small.envelope().union(&big.envelope())));
        assert_eq!(p.envelope(), Some(big.envelope()));
    }

    #[test]
    fn clear_removes_every_mosaic() {
        let p = pyramid();
        p.create_mosaic(&level(100.0)).unwrap();
        p.create_mosaic(&level(200.0)).unwrap();

        p.clear();
        assert!(p.is_empty());
    }
}
