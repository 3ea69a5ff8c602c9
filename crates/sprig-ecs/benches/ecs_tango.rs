//! Store benchmarks using tango-bench for paired comparison testing.

use std::hint::black_box;

use sprig_ecs::{Entity, ViewStrategy, World};
use tango_bench::{IntoBenchmarks, benchmark_fn, tango_benchmarks, tango_main};

#[derive(Clone, Copy)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Clone, Copy)]
struct Velocity {
    x: f32,
    y: f32,
}

#[derive(Clone, Copy)]
struct Health(u32);

fn populated(count: u32) -> (World, Vec<Entity>) {
    let mut world = World::new();
    let entities = (0..count)
        .map(|i| {
            let entity = world.create_entity();
            world.add(
                entity,
                Position {
                    x: i as f32,
                    y: 0.0,
                },
            );
            if i % 2 == 0 {
                world.add(entity, Velocity { x: 1.0, y: 0.5 });
            }
            if i % 10 == 0 {
                world.add(entity, Health(100));
            }
            entity
        })
        .collect();
    (world, entities)
}

fn create_benchmarks() -> impl IntoBenchmarks {
    [
        benchmark_fn("create_empty/1000", |b| {
            b.iter(|| {
                let mut world = World::new();
                for _ in 0..1000 {
                    black_box(world.create_entity());
                }
            })
        }),
        benchmark_fn("create_with_component/1000", |b| {
            b.iter(|| {
                let mut world = World::new();
                for i in 0..1000 {
                    let entity = world.create_entity();
                    world.add(
                        entity,
                        Position {
                            x: i as f32,
                            y: 0.0,
                        },
                    );
                }
                black_box(world.entity_count())
            })
        }),
    ]
}

fn component_benchmarks() -> impl IntoBenchmarks {
    [
        benchmark_fn("get_component/1000", |b| {
            let (world, entities) = populated(1000);
            b.iter(move || {
                for &entity in &entities {
                    black_box(world.get::<Position>(entity));
                }
            })
        }),
        benchmark_fn("find_mut_component/1000", |b| {
            let (mut world, entities) = populated(1000);
            b.iter(move || {
                for &entity in &entities {
                    if let Some(health) = world.find_mut::<Health>(entity) {
                        health.0 = health.0.wrapping_add(1);
                    }
                }
            })
        }),
    ]
}

fn view_benchmarks() -> impl IntoBenchmarks {
    [
        benchmark_fn("view_groups/10000", |b| {
            let (mut world, _) = populated(10_000);
            b.iter(move || {
                world
                    .view::<(Position, Velocity)>()
                    .with_strategy(ViewStrategy::Groups)
                    .for_each(|(pos, vel)| {
                        pos.x += vel.x;
                        pos.y += vel.y;
                    });
            })
        }),
        benchmark_fn("view_smallest_pool/10000", |b| {
            let (mut world, _) = populated(10_000);
            b.iter(move || {
                world
                    .view::<(Position, Velocity)>()
                    .with_strategy(ViewStrategy::SmallestPool)
                    .for_each(|(pos, vel)| {
                        pos.x += vel.x;
                        pos.y += vel.y;
                    });
            })
        }),
        benchmark_fn("view_entities/10000", |b| {
            let (mut world, _) = populated(10_000);
            b.iter(move || black_box(world.view::<(Health, Position)>().entities().len()))
        }),
    ]
}

fn delete_benchmarks() -> impl IntoBenchmarks {
    [benchmark_fn("delete/1000", |b| {
        b.iter(|| {
            let (mut world, entities) = populated(1000);
            for mut entity in entities {
                world.delete_entity(&mut entity);
            }
        })
    })]
}

tango_benchmarks!(
    create_benchmarks(),
    component_benchmarks(),
    view_benchmarks(),
    delete_benchmarks()
);
tango_main!();
