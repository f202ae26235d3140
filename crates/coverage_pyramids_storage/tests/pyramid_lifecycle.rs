use coverage_pyramids_core::prelude::*;
use coverage_pyramids_storage::prelude::*;

use pretty_assertions::assert_eq;
use std::sync::Arc;
use utilities::data_sets::{gray_tile, small_mosaic_descriptor};
use utilities::test::init_tracing;

#[test]
fn write_read_and_delete_through_the_whole_hierarchy() {
    init_tracing();

    let store: CoverageStore = CoverageStore::new();
    let resource = store.create("R").unwrap();

    let template = PyramidLayout::new(Crs::WGS84);
    let pyramid = resource.create_model(&template).unwrap();
    assert_eq!(pyramid.crs(), &Crs::WGS84);

    let mosaic = resource
        .create_mosaic(pyramid.id(), &small_mosaic_descriptor())
        .unwrap();
    assert_eq!(mosaic.grid_size(), PointN([4, 4]));
    assert_eq!(mosaic.tile_shape(), PointN([256, 256]));
    assert_eq!(mosaic.scale(), 100.0);
    assert_eq!(mosaic.upper_left(), PointN([-9500.0, 20500.0]));

    resource
        .write_tile(
            pyramid.id(),
            mosaic.id(),
            gray_tile(PointN([1, 2]), PointN([256, 256]), 9),
        )
        .unwrap();

    assert!(!mosaic.is_missing(PointN([1, 2])));
    assert!(mosaic.is_missing(PointN([0, 0])));

    let tile = mosaic.get_tile(PointN([1, 2])).unwrap();
    assert_eq!(tile.shape(), PointN([256, 256]));
    assert_eq!(tile.position(), PointN([1, 2]));

    assert!(pyramid.delete_mosaic(mosaic.id()).is_some());
    assert!(pyramid
        .mosaics()
        .iter()
        .all(|m| m.id() != mosaic.id()));
}

#[test]
fn fresh_mosaic_is_entirely_missing() {
    let resource: Resource<SparseTileGrid> = Resource::new("r");
    let pyramid = resource.create_pyramid(Crs::Epsg3857);

    for side in [1, 3, 17].iter() {
        let descriptor = MosaicDescriptor::new(
            PointN([0.0, 0.0]),
            PointN([*side, *side + 1]),
            PointN([8, 8]),
            1.0,
        );
        let mosaic = pyramid.create_mosaic(&descriptor).unwrap();

        assert!(mosaic
            .grid_extent()
            .iter_points()
            .all(|p| mosaic.is_missing(p)));
        assert_eq!(mosaic.num_tiles(), 0);
    }
}

#[test]
fn last_write_wins_and_deletes_are_idempotent() {
    let resource: Resource = Resource::new("r");
    let pyramid = resource.create_pyramid(Crs::WGS84);
    let mosaic = pyramid.create_mosaic(&small_mosaic_descriptor()).unwrap();
    let p = PointN([3, 0]);

    let first: TileRef = gray_tile(p, PointN([256, 256]), 1).into();
    let second: TileRef = gray_tile(p, PointN([256, 256]), 2).into();
    mosaic.set_tile(p, Some(first));
    mosaic.set_tile(p, Some(second.clone()));
    assert!(Arc::ptr_eq(&mosaic.get_tile(p).unwrap(), &second));
    assert_eq!(mosaic.get_tile(p).unwrap().sample(PointN([0, 0]), 0), Some(2.0));

    mosaic.set_tile(p, None);
    resource.delete_tile(pyramid.id(), mosaic.id(), p).unwrap();
    resource.delete_tile(pyramid.id(), mosaic.id(), p).unwrap();
    assert!(mosaic.is_missing(p));
}

#[test]
fn oversized_tiles_are_rejected_without_side_effects() {
    let resource: Resource = Resource::new("r");
    let pyramid = resource.create_pyramid(Crs::WGS84);
    let mosaic = pyramid.create_mosaic(&small_mosaic_descriptor()).unwrap();

    for shape in [PointN([257, 256]), PointN([256, 512])].iter() {
        let err = resource
            .write_tile(pyramid.id(), mosaic.id(), gray_tile(PointN([0, 0]), *shape, 0))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::StructuralMismatch);
        assert!(err.to_string().contains("incorrect image size"));
    }

    assert!(mosaic.is_missing(PointN([0, 0])));
    assert_eq!(resource.sample_model(), None);
}

#[test]
fn differing_color_models_fail_on_the_second_write() {
    let resource: Resource = Resource::new("r");
    let pyramid = resource.create_pyramid(Crs::WGS84);
    let fine = pyramid.create_mosaic(&small_mosaic_descriptor()).unwrap();
    let coarse = pyramid
        .create_mosaic(&small_mosaic_descriptor().with_scale(PointN([200.0, 200.0])))
        .unwrap();

    let gray = gray_tile(PointN([0, 0]), PointN([256, 256]), 0).with_color_model(ColorModel::Gray);
    resource.write_tile(pyramid.id(), fine.id(), gray).unwrap();

    let palette = ColorModel::Indexed {
        palette: vec![[0, 0, 0, 255], [255, 255, 255, 255]],
    };
    let indexed = gray_tile(PointN([0, 0]), PointN([256, 256]), 1).with_color_model(palette.clone());
    let err = resource
        .write_tile(pyramid.id(), coarse.id(), indexed)
        .unwrap_err();

    assert_eq!(
        err,
        PyramidError::ColorModelMismatch {
            expected: ColorModel::Gray,
            found: palette,
        }
    );
    assert_eq!(resource.color_model(), Some(ColorModel::Gray));
    assert!(coarse.is_missing(PointN([0, 0])));
}

#[test]
fn differing_sample_models_are_rejected() {
    let resource: Resource = Resource::new("r");
    let pyramid = resource.create_pyramid(Crs::WGS84);
    let mosaic = pyramid.create_mosaic(&small_mosaic_descriptor()).unwrap();

    resource
        .write_tile(pyramid.id(), mosaic.id(), gray_tile(PointN([0, 0]), PointN([16, 16]), 0))
        .unwrap();

    let rgb = TilePayload::filled(PointN([1, 0]), PointN([16, 16]), 3, 0u8).unwrap();
    assert!(matches!(
        resource.write_tile(pyramid.id(), mosaic.id(), rgb),
        Err(PyramidError::SampleModelMismatch { .. })
    ));
}

#[test]
fn removing_a_model_makes_its_tiles_unreachable() {
    let resource: Resource = Resource::new("r");
    let pyramid = resource.create_pyramid_with_id("Pyr", Crs::WGS84).unwrap();
    let mosaic = pyramid.create_mosaic(&small_mosaic_descriptor()).unwrap();
    let p = PointN([2, 2]);
    resource
        .write_tile("pyr", mosaic.id(), gray_tile(p, PointN([256, 256]), 0))
        .unwrap();

    resource.remove_model("PYR").unwrap();

    assert!(resource.pyramid("pyr").is_none());
    assert!(resource.mosaic("pyr", mosaic.id()).is_none());
    assert_eq!(
        resource.read_tile("pyr", mosaic.id(), p).unwrap_err(),
        PyramidError::UnresolvedPyramid("pyr".into())
    );
    assert_eq!(
        resource.remove_model("pyr").unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(mosaic.num_tiles(), 0);
}

#[test]
fn cloned_models_share_structure_only() {
    let resource: Resource = Resource::new("r");
    let original = resource
        .create_model(&utilities::data_sets::world_layout(3))
        .unwrap();
    let finest = original.mosaics_by_scale()[0].clone();
    finest
        .write_tile(gray_tile(PointN([0, 0]), PointN([256, 256]), 5))
        .unwrap();

    let copy = resource.create_model(&original).unwrap();

    assert_eq!(copy.num_mosaics(), 3);
    assert_eq!(copy.scales(), original.scales());
    for (a, b) in original.mosaics().iter().zip(copy.mosaics().iter()) {
        assert_eq!(a.descriptor(), b.descriptor());
        assert_ne!(a.id(), b.id());
        assert_eq!(b.num_tiles(), 0);
    }
}

#[test]
fn store_removal_detaches_resource() {
    let store: CoverageStore<DenseTileGrid> = CoverageStore::new();
    let resource = store.create("dem").unwrap();
    let pyramid = resource.create_pyramid(Crs::WGS84);
    let mosaic = pyramid.create_mosaic(&small_mosaic_descriptor()).unwrap();
    mosaic
        .write_tile(gray_tile(PointN([0, 0]), PointN([256, 256]), 0))
        .unwrap();

    let weak = Arc::downgrade(&resource);
    drop(resource);
    drop(pyramid);
    drop(mosaic);

    store.remove("DEM").unwrap();
    assert!(weak.upgrade().is_none());
    assert!(store.remove("dem").unwrap_err().is_not_found());
}

#[test]
fn tiles_can_be_found_by_location() {
    let resource: Resource = Resource::new("r");
    let pyramid = resource
        .create_model(&utilities::data_sets::world_layout(2))
        .unwrap();
    let finest = pyramid.nearest_mosaic(0.0).unwrap();

    let paris = PointN([2.35, 48.85]);
    let position = finest.tile_containing(paris).unwrap();
    assert_eq!(position, PointN([2, 0]));
    assert!(finest.tile_envelope(position).contains(paris));

    let europe = Extent2d::from_min_and_shape(PointN([-10.0, 35.0]), PointN([40.0, 35.0]));
    assert_eq!(
        finest.tiles_intersecting(&europe),
        Extent2i::from_min_and_shape(PointN([1, 0]), PointN([2, 1]))
    );
}
