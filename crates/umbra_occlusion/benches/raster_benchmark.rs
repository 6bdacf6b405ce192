//! # Occluder Raster Benchmark
//!
//! Measures:
//! 1. Drawing a frame's worth of occluders into a 1024×768 hierarchy
//! 2. Visibility queries against a populated hierarchy
//! 3. Single-tile classification and mask building
//!
//! Run with: cargo bench -p umbra_occlusion

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use umbra_occlusion::{Occluder, OcclusionConfig, Polygon, Tile};

const WIDTH: i32 = 1024;
const HEIGHT: i32 = 768;

/// Deterministic screen-space quads and triangles.
fn generate_polygons(count: usize, max_size: i32, seed: u64) -> Vec<Polygon> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut polygons = Vec::with_capacity(count);

    while polygons.len() < count {
        let x = rng.gen_range(-32..WIDTH);
        let y = rng.gen_range(-32..HEIGHT);
        let w = rng.gen_range(4..max_size);
        let h = rng.gen_range(4..max_size);

        let polygon = if rng.gen_bool(0.5) {
            Polygon::rectangle(x, y, x + w, y + h)
        } else {
            Polygon::from_vertices(&[[x, y], [x + w, y + h / 3], [x + w / 3, y + h]])
        };
        if let Ok(polygon) = polygon {
            polygons.push(polygon);
        }
    }

    polygons
}

fn occluder(levels: u8) -> Occluder {
    let config = OcclusionConfig::new(WIDTH as u32, HEIGHT as u32, levels)
        .unwrap_or_else(|e| panic!("bench config: {e}"));
    Occluder::new(config).unwrap_or_else(|e| panic!("bench occluder: {e}"))
}

// =============================================================================
// DRAW
// =============================================================================

fn bench_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("occluder_draw");

    for count in [64, 256, 1024] {
        let polygons = generate_polygons(count, 160, 0xB0CC);
        let mut occ = occluder(2);

        group.bench_with_input(BenchmarkId::from_parameter(count), &polygons, |b, polygons| {
            b.iter(|| {
                occ.reset();
                for polygon in polygons {
                    black_box(occ.draw(polygon));
                }
            });
        });
    }

    group.finish();
}

// =============================================================================
// QUERY
// =============================================================================

fn bench_is_visible(c: &mut Criterion) {
    let occluders = generate_polygons(256, 240, 0x0CC1);
    let queries = generate_polygons(1024, 64, 0x9E11);

    let mut group = c.benchmark_group("occluder_is_visible");
    for levels in [1u8, 2] {
        let mut occ = occluder(levels);
        for polygon in &occluders {
            occ.draw(polygon);
        }

        group.bench_with_input(BenchmarkId::new("levels", levels), &queries, |b, queries| {
            b.iter(|| {
                let mut visible = 0u32;
                for polygon in queries {
                    visible += u32::from(occ.is_visible(polygon));
                }
                black_box(visible)
            });
        });
    }
    group.finish();
}

// =============================================================================
// TILE KERNEL
// =============================================================================

fn bench_tile_coverage(c: &mut Criterion) {
    let polygon = Polygon::from_vertices(&[[3, 2], [61, 17], [20, 59], [1, 40]])
        .unwrap_or_else(|e| panic!("bench polygon: {e}"));
    let mut tile = Tile::new(0);
    tile.load(&polygon);

    c.bench_function("leaf_tile_grid_8x8", |b| {
        b.iter(|| {
            let mut bits = 0u32;
            for ty in 0..8 {
                tile.move_to(0, ty * 8);
                for tx in 0..8 {
                    if tx > 0 {
                        tile.move_right();
                    }
                    bits += tile.coverage().mask().count_ones();
                }
            }
            black_box(bits)
        });
    });
}

criterion_group!(benches, bench_draw, bench_is_visible, bench_tile_coverage);
criterion_main!(benches);
