use criterion::*;
use std::hint::black_box;

mod common;
use common::*;

fn transition_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("transition");

    group.bench_function("add_rem_component_10k", |b| {
        b.iter_batched(
            || {
                let mut world = make_world(AGENTS_SMALL);
                let entities = populate(&mut world, AGENTS_SMALL);
                (world, entities)
            },
            |(mut world, entities)| {
                // Cached edges make the second and later passes cheap.
                for &entity in &entities {
                    world.add_component(entity, TAG);
                }
                for &entity in &entities {
                    world.rem_component(entity, TAG);
                }
                black_box(world);
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("rem_entity_compress_10k", |b| {
        b.iter_batched(
            || {
                let mut world = make_world(AGENTS_SMALL);
                let entities = populate(&mut world, AGENTS_SMALL);
                (world, entities)
            },
            |(mut world, entities)| {
                for entity in entities {
                    world.rem_entity(entity);
                }
                black_box(world);
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, transition_benchmark);
criterion_main!(benches);
