use crate::{MosaicDescriptor, Resource, Result, TileRef, TileStorage};

use coverage_pyramids_core::prelude::*;

use auto_impl::auto_impl;

/// The capability set of a pyramidal tile backend, addressed by `(pyramid id, mosaic id, position)`.
///
/// Every `Resource<S>` is a backend, so each `TileStorage` gives an in-memory variant. A persistent backend must translate its
/// I/O failures into the same errors, because callers never retry.
#[auto_impl(&, Box)]
pub trait PyramidalBackend {
    /// Creates an empty mosaic with the structure of `template`, returning its id.
    fn create_mosaic(&self, pyramid: &Identifier, template: &MosaicDescriptor) -> Result<Identifier>;

    fn write_tile(&self, pyramid: &Identifier, mosaic: &Identifier, tile: TileRef) -> Result<()>;

    fn read_tile(
        &self,
        pyramid: &Identifier,
        mosaic: &Identifier,
        position: Point2i,
    ) -> Result<Option<TileRef>>;

    /// Empties a slot. Unknown pyramids and mosaics are not errors.
    fn delete_tile(&self, pyramid: &Identifier, mosaic: &Identifier, position: Point2i) -> Result<()>;
}

impl<S: TileStorage> PyramidalBackend for Resource<S> {
    fn create_mosaic(&self, pyramid: &Identifier, template: &MosaicDescriptor) -> Result<Identifier> {
        Resource::create_mosaic(self, pyramid, template).map(|m| m.id().clone())
    }

    fn write_tile(&self, pyramid: &Identifier, mosaic: &Identifier, tile: TileRef) -> Result<()> {
        Resource::write_tile(self, pyramid, mosaic, tile)
    }

    fn read_tile(
        &self,
        pyramid: &Identifier,
        mosaic: &Identifier,
        position: Point2i,
    ) -> Result<Option<TileRef>> {
        Resource::read_tile(self, pyramid, mosaic, position)
    }

    fn delete_tile(&self, pyramid: &Identifier, mosaic: &Identifier, position: Point2i) -> Result<()> {
        Resource::delete_tile(self, pyramid, mosaic, position).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{DenseTileGrid, SparseTileGrid, TilePayload};

    use std::sync::Arc;

    fn round_trip(backend: &dyn PyramidalBackend, pyramid: &Identifier) {
        let descriptor =
            MosaicDescriptor::new(PointN([0.0, 0.0]), PointN([8, 8]), PointN([64, 64]), 2.0);
        let mosaic = backend.create_mosaic(pyramid, &descriptor).unwrap();
        let position = PointN([5, 6]);
        let tile: TileRef = TilePayload::filled(position, PointN([64, 64]), 3, 255u8)
            .unwrap()
            .into();

        backend.write_tile(pyramid, &mosaic, tile.clone()).unwrap();
        let read = backend.read_tile(pyramid, &mosaic, position).unwrap().unwrap();
        assert!(Arc::ptr_eq(&read, &tile));

        backend.delete_tile(pyramid, &mosaic, position).unwrap();
        backend.delete_tile(pyramid, &mosaic, position).unwrap();
        assert_eq!(backend.read_tile(pyramid, &mosaic, position), Ok(None));
    }

    #[test]
    fn dense_and_sparse_resources_are_interchangeable_backends() {
        let dense: Resource<DenseTileGrid> = Resource::new("dense");
        let p = dense.create_pyramid(Crs::WGS84);
        round_trip(&dense, p.id());

        let sparse: Arc<Resource<SparseTileGrid>> = Arc::new(Resource::new("sparse"));
        let p = sparse.create_pyramid(Crs::WGS84);
        round_trip(&*sparse, p.id());
    }

    #[test]
    fn unknown_pyramid_is_a_structural_error() {
        let r: Resource = Resource::new("r");
        let descriptor =
            MosaicDescriptor::new(PointN([0.0, 0.0]), PointN([1, 1]), PointN([1, 1]), 1.0);

        assert!(PyramidalBackend::create_mosaic(&r, &"nope".into(), &descriptor).is_err());
    }
}
