//! Sprig store walkthrough
//!
//! This binary:
//! 1. Registers a handful of component types
//! 2. Creates five entities with overlapping component sets
//! 3. Runs a two-component view and dumps the grouping table
//! 4. Spawns a larger batch, then culls half of it with deferred deletion
//!
//! Environment:
//! - `SPRIG_DEMO_ENTITIES` - size of the batch in step 4 (default 1000)
//! - `SPRIG_PAGE_SIZE` - entity ids per sparse page (default 1024)
//! - `RUST_LOG` - log filter

use sprig_ecs::{DEFAULT_PAGE_SIZE, World, WorldConfig};
use tracing::info;

#[derive(Debug, Clone, Copy, Default)]
struct A {
    x: i32,
}

#[derive(Debug, Clone, Copy, Default)]
struct B {
    y: i32,
}

#[derive(Debug, Clone, Copy, Default)]
struct C {
    z: i32,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sprig_demo=info".parse()?)
                .add_directive("sprig_ecs=info".parse()?),
        )
        .init();

    let batch: u32 = env_or("SPRIG_DEMO_ENTITIES", 1000);
    let page_size: usize = env_or("SPRIG_PAGE_SIZE", DEFAULT_PAGE_SIZE);

    let mut world = World::with_config(WorldConfig::new().with_page_size(page_size))?;
    info!(?world, "created world");

    world.try_register::<A>()?;
    world.try_register::<B>()?;
    world.try_register::<C>()?;
    world.try_register::<i32>()?;
    world.try_register::<f64>()?;

    let e1 = world.try_create_entity()?;
    let e2 = world.try_create_named_entity("e2")?;
    let e3 = world.try_create_entity()?;
    let e4 = world.try_create_entity()?;
    let e5 = world.try_create_entity()?;

    world.try_add(e1, A { x: 5 })?;
    world.try_add(e1, B::default())?;
    world.try_add(e1, C::default())?;

    world.try_add(e2, A::default())?;

    world.try_add(e3, A::default())?;
    world.try_add(e3, C::default())?;

    world.try_add(e4, B::default())?;

    world.try_add(e5, A::default())?;
    world.try_add(e5, C::default())?;

    world
        .try_view::<(A, B)>()?
        .for_each_with_id(|entity, (a, b)| {
            b.y = a.x * 2;
            info!(%entity, x = a.x, y = b.y, "matched A and B");
        });

    world.log_groupings();
    world.log_entity_components(e1);
    world.log_entity_mask(e3);

    let spawned = spawn_batch(&mut world, batch)?;
    info!(spawned, total = world.entity_count(), "spawned batch");

    world
        .try_view::<(A, C)>()?
        .for_each_deferred(|deferred, entity, (a, c)| {
            c.z += 1;
            if a.x % 2 == 1 {
                deferred.flag(entity);
            }
        });
    let deleted = world.delete_flagged();

    info!(
        deleted,
        remaining = world.entity_count(),
        groups = world.groups().count(),
        "culled odd entities"
    );
    world.log_groupings();

    Ok(())
}

/// Create `count` entities with `A` and `C`, giving every third one a `B`.
fn spawn_batch(world: &mut World, count: u32) -> eyre::Result<u32> {
    for i in 0..count {
        let entity = world.try_create_entity()?;
        world.try_add(entity, A { x: i as i32 })?;
        world.try_add(entity, C::default())?;
        if i % 3 == 0 {
            world.try_add(entity, B::default())?;
        }
    }
    Ok(count)
}
