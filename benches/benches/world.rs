// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `mapview_world` transforms and window commits.

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::{Point, Vec2};
use mapview_world::{Direction, Subset, World};

fn realized(observers: usize) -> World {
    let mut world = World::aspect_preserving();
    world
        .set_world(Subset::from_coords(-180.0, 90.0, 180.0, -90.0))
        .unwrap();
    world.set_viewport(1920, 1080).unwrap();
    for _ in 0..observers {
        world.register_viewer(|state, changed| {
            black_box((state.revision, changed));
        });
    }
    world
}

fn pixel_grid(n: u32) -> Vec<Point> {
    (0..n * n)
        .map(|i| Point::new(f64::from(i % n) * 7.5, f64::from(i / n) * 4.25))
        .collect()
}

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("world/transform");
    let world = realized(0);
    for &n in &[16_u32, 256_u32] {
        let pixels = pixel_grid(n);
        group.throughput(Throughput::Elements(pixels.len() as u64));
        group.bench_with_input(BenchmarkId::new("round_trip", n), &pixels, |b, pixels| {
            b.iter(|| {
                let mut acc = Vec2::ZERO;
                for &p in pixels {
                    let there = world.transform(p, Direction::Inverse).unwrap();
                    let back = world.transform(there, Direction::Forward).unwrap();
                    acc += back - p;
                }
                black_box(acc)
            });
        });
    }
    group.finish();
}

fn bench_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("world/commit");
    for &observers in &[0_usize, 4, 32] {
        group.bench_function(format!("zoom_round_trip(observers={observers})"), |b| {
            b.iter_batched(
                || realized(observers),
                |mut world| {
                    world.zoom_in(300.0, 200.0, 2.0).unwrap();
                    black_box(world.zoom_out(300.0, 200.0, 2.0).unwrap());
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("batched_pan(observers={observers})"), |b| {
            b.iter_batched(
                || realized(observers),
                |mut world| {
                    let mut batch = world.begin_batch();
                    for _ in 0..64 {
                        batch.translate_window(Vec2::new(0.5, -0.25)).unwrap();
                    }
                    batch.end();
                    black_box(world.revision());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_transform, bench_commit);
criterion_main!(benches);
