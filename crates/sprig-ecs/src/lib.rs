// Raw pool pointers back the multi-component views
#![allow(unsafe_code)]
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_safety_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::float_cmp)]

//! Sprig ECS - sparse-set Entity Component System
//!
//! Components of one type live packed in a sparse set, keyed by entity id
//! through lazily allocated pages. Each entity carries a presence mask, and
//! entities with identical masks are grouped so multi-component views can
//! skip everything that cannot match.
//!
//! # Key Concepts
//!
//! - **Entity**: an id plus a generation; stale handles are detected
//! - **Component**: any `Send + Sync + 'static` type
//! - **Slot**: a component type's bit in the mask and index of its pool
//! - **Group**: the entities sharing one exact mask
//! - **View**: a snapshot of the entities holding a set of components
//!
//! # Example
//!
//! ```ignore
//! let mut world = World::new();
//! let e = world.create_entity();
//! world.add(e, Position { x: 0.0, y: 0.0 });
//! world.add(e, Velocity { x: 1.0, y: 0.0 });
//!
//! world.view::<(Position, Velocity)>().for_each(|(pos, vel)| {
//!     pos.x += vel.x;
//! });
//! ```

mod component;
mod config;
mod deferred;
mod diagnostics;
mod entity;
mod error;
mod group;
mod mask;
mod paged;
mod sparse_set;
mod view;
mod world;

pub use component::{Component, ComponentInfo, ComponentRegistry, ComponentSlot};
pub use config::{DEFAULT_MAX_ENTITIES, DEFAULT_PAGE_SIZE, MAX_COMPONENTS, WorldConfig};
pub use deferred::Deferred;
pub use entity::{Entity, EntityAllocator, EntityId, Generation};
pub use error::{EcsError, EcsResult};
pub use group::GroupIndex;
pub use mask::ComponentMask;
pub use paged::PagedIndex;
pub use sparse_set::{ErasedPool, SparseSet};
pub use view::{MAX_QUERY_LEN, Query, QuerySlots, View, ViewStrategy};
pub use world::World;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Component, Deferred, Entity, EcsError, View, ViewStrategy, World, WorldConfig};
}
