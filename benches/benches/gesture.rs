// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for rubber‑band previews and pan feedback.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use mapview_gesture::{PanGesture, PointerButton, ZoomGesture, preview_subset};
use mapview_world::{Subset, ViewportSize, World};

fn bench_preview(c: &mut Criterion) {
    let mut group = c.benchmark_group("gesture/preview");
    let viewport = ViewportSize::new(1280, 720);

    group.bench_function("preview_subset", |b| {
        let start = Point::new(100.0, 80.0);
        let mut i = 0_u32;
        b.iter(|| {
            i = i.wrapping_add(1);
            let current = Point::new(110.0 + f64::from(i % 500), 95.0 + f64::from(i % 300));
            black_box(preview_subset(start, current, viewport))
        });
    });

    let mut world = World::aspect_preserving();
    world
        .set_world(Subset::from_coords(0.0, 0.0, 1280.0, 720.0))
        .unwrap();
    world.set_viewport(viewport.width, viewport.height).unwrap();
    let state = world.state();

    group.bench_function("zoom_drag_100_moves", |b| {
        b.iter(|| {
            let mut zoom = ZoomGesture::default();
            zoom.on_pointer_down(Point::new(10.0, 10.0), PointerButton::Primary);
            for i in 1..=100 {
                let t = f64::from(i);
                black_box(zoom.on_pointer_move(Point::new(10.0 + 3.0 * t, 10.0 + 2.0 * t), &state));
            }
            zoom.reset();
        });
    });

    group.bench_function("pan_drag_100_moves", |b| {
        b.iter(|| {
            let mut pan = PanGesture::new();
            pan.on_begin_drag(Point::new(640.0, 360.0));
            for i in 1..=100 {
                let t = f64::from(i);
                black_box(pan.on_drag(Point::new(640.0 + 0.7 * t, 360.0 - 0.3 * t)));
            }
            pan.cancel();
        });
    });
    group.finish();
}

criterion_group!(benches, bench_preview);
criterion_main!(benches);
