// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for debounced resize and scroll bursts.

use std::time::Duration;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Vec2;
use mapview_schedule::{Debouncer, UpdateScheduler};
use mapview_world::{Subset, World};

fn world() -> World {
    let mut world = World::aspect_preserving();
    world
        .set_world(Subset::from_coords(0.0, 0.0, 1000.0, 1000.0))
        .unwrap();
    world.set_viewport(800, 600).unwrap();
    world
}

fn bench_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("schedule");
    let ms = Duration::from_millis;

    group.bench_function("debouncer_trigger_1000", |b| {
        b.iter(|| {
            let mut debouncer = Debouncer::new(ms(250));
            for i in 0..1000 {
                debouncer.trigger(ms(i));
            }
            black_box(debouncer.fire(ms(2000)))
        });
    });

    for &events in &[10_u64, 1000_u64] {
        group.bench_function(format!("resize_burst(n={events})"), |b| {
            b.iter_batched(
                || (world(), UpdateScheduler::default()),
                |(mut world, mut scheduler)| {
                    for i in 0..events {
                        scheduler.on_resize(ms(i), 800 + (i % 400) as u32, 600);
                        black_box(scheduler.tick(ms(i), &mut world));
                    }
                    black_box(scheduler.tick(ms(events + 250), &mut world))
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("scroll_burst(n={events})"), |b| {
            b.iter_batched(
                || (world(), UpdateScheduler::default()),
                |(mut world, mut scheduler)| {
                    for i in 0..events {
                        scheduler.on_scroll(ms(i), Vec2::new(1.0, -0.5));
                    }
                    black_box(scheduler.tick(ms(events + 250), &mut world))
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_schedule);
criterion_main!(benches);
