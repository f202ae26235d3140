use coverage_pyramids_core::prelude::*;
use coverage_pyramids_storage::prelude::*;

use std::sync::{Arc, Barrier};
use std::thread;
use utilities::data_sets::{gray_tile, square_mosaic_descriptor};
use utilities::test::init_tracing;

const NUM_THREADS: i32 = 8;
const GRID_SIDE: i32 = 32;

fn fill_in_parallel<S: TileStorage>() {
    init_tracing();

    let resource: Resource<S> = Resource::new("r");
    let pyramid = resource.create_pyramid(Crs::WGS84);
    let mosaic = pyramid
        .create_mosaic(&square_mosaic_descriptor(GRID_SIDE))
        .unwrap();

    // Each thread owns the rows congruent to its index.
    thread::scope(|s| {
        for t in 0..NUM_THREADS {
            let resource = &resource;
            let pyramid_id = pyramid.id();
            let mosaic_id = mosaic.id();
            s.spawn(move || {
                for row in (t..GRID_SIDE).step_by(NUM_THREADS as usize) {
                    for col in 0..GRID_SIDE {
                        let tile = gray_tile(PointN([col, row]), PointN([16, 16]), t as u8);
                        resource.write_tile(pyramid_id, mosaic_id, tile).unwrap();
                    }
                }
            });
        }
    });

    assert_eq!(mosaic.num_tiles(), (GRID_SIDE * GRID_SIDE) as usize);
    for p in mosaic.grid_extent().iter_points() {
        let tile = mosaic.get_tile(p).unwrap();
        assert_eq!(tile.position(), p);
        assert_eq!(tile.sample(PointN([0, 0]), 0), Some((p.y() % NUM_THREADS) as f64));
    }
}

#[test]
fn dense_slots_fill_in_parallel() {
    fill_in_parallel::<DenseTileGrid>();
}

#[test]
fn sparse_slots_fill_in_parallel() {
    fill_in_parallel::<SparseTileGrid>();
}

#[test]
fn exactly_one_color_model_wins_a_race() {
    let resource: Arc<Resource> = Arc::new(Resource::new("r"));
    let pyramid = resource.create_pyramid(Crs::WGS84);
    let mosaic = pyramid.create_mosaic(&square_mosaic_descriptor(4)).unwrap();
    let models = [ColorModel::Gray, ColorModel::Rgb];
    let barrier = Barrier::new(models.len());

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = models
            .iter()
            .enumerate()
            .map(|(i, model)| {
                let mosaic = &mosaic;
                let barrier = &barrier;
                s.spawn(move || {
                    let tile = gray_tile(PointN([i as i32, 0]), PointN([16, 16]), 0)
                        .with_color_model(model.clone());
                    barrier.wait();
                    mosaic.write_tile(tile)
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert_eq!(mosaic.num_tiles(), 1);

    let winner = mosaic.tile_keys()[0];
    assert_eq!(resource.color_model(), Some(models[winner.x() as usize].clone()));
}

#[test]
fn structural_changes_do_not_disturb_readers() {
    let resource: Resource = Resource::new("r");
    let pyramid = resource.create_pyramid(Crs::WGS84);
    let stable = pyramid.create_mosaic(&square_mosaic_descriptor(4)).unwrap();
    stable
        .write_tile(gray_tile(PointN([0, 0]), PointN([16, 16]), 1))
        .unwrap();

    thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..200 {
                let m = pyramid.create_mosaic(&square_mosaic_descriptor(2)).unwrap();
                pyramid.delete_mosaic(m.id());
            }
        });
        s.spawn(|| {
            for _ in 0..200 {
                let snapshot = pyramid.mosaics();
                assert!(snapshot.iter().any(|m| m.id() == stable.id()));
                assert!(!resource
                    .is_missing(pyramid.id(), stable.id(), PointN([0, 0]))
                    .unwrap());
            }
        });
    });

    assert_eq!(pyramid.num_mosaics(), 1);
}
