use criterion::*;
use std::hint::black_box;

mod common;
use common::*;

use archegraph::engine::mask::build_mask;

fn iterate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate");

    group.bench_function("cursor_read_position_100k", |b| {
        b.iter_batched(
            || {
                let mut world = make_world(AGENTS_MED);
                populate(&mut world, AGENTS_MED);
                world
            },
            |world| {
                let mut total = 0.0f32;
                let mut cursor = world.query(build_mask(&[POSITION]));
                while cursor.next() {
                    let position = cursor.component(POSITION) as *const Position;
                    total += unsafe { (*position).x };
                }
                black_box(total);
                black_box(world);
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("cursor_integrate_velocity_100k", |b| {
        b.iter_batched(
            || {
                let mut world = make_world(AGENTS_MED);
                populate(&mut world, AGENTS_MED);
                world
            },
            |world| {
                let mut cursor = world.query(build_mask(&[POSITION, VELOCITY]));
                while cursor.next() {
                    let position = cursor.component(POSITION) as *mut Position;
                    let velocity = cursor.component(VELOCITY) as *const Velocity;
                    unsafe {
                        (*position).x += (*velocity).dx;
                        (*position).y += (*velocity).dy;
                    }
                }
                black_box(world);
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, iterate_benchmark);
criterion_main!(benches);
