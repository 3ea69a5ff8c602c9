//! World - the coordinator that owns every entity, pool and group.
//!
//! All mutation goes through the world so that the presence masks, the
//! component pools and the grouping index always agree:
//!
//! - bit `s` of an entity's mask is set iff pool `s` holds the entity
//! - every live entity with a non-empty mask sits in exactly one group
//!
//! Each fallible operation comes in two forms. `try_*` returns an
//! [`EcsResult`]; the plain form logs the error and panics.

use std::any::type_name;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::{
    component::{Component, ComponentRegistry, ComponentSlot},
    config::WorldConfig,
    deferred::Deferred,
    entity::{Entity, EntityAllocator, EntityId},
    error::{EcsError, EcsResult, OrFatal},
    group::GroupIndex,
    mask::ComponentMask,
    sparse_set::SparseSet,
    view::{Query, View},
};

/// The store: entities, their component pools, and the grouping index.
pub struct World {
    config: WorldConfig,
    /// Entity id allocator.
    entities: EntityAllocator,
    /// Presence mask per live entity. Membership here defines liveness.
    masks: SparseSet<ComponentMask>,
    /// Component type registry and pools.
    components: ComponentRegistry,
    /// Exact-mask groups for view queries.
    groups: GroupIndex,
    /// Debug names, only for entities created with one.
    names: FxHashMap<EntityId, String>,
    /// Entities waiting for [`World::delete_flagged`].
    deferred: Deferred,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create a world with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::build(WorldConfig::default())
    }

    /// Create a world with a custom configuration.
    pub fn with_config(config: WorldConfig) -> EcsResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: WorldConfig) -> Self {
        Self {
            config,
            entities: EntityAllocator::new(config.max_entities),
            masks: SparseSet::new(config.page_size),
            components: ComponentRegistry::new(config.page_size),
            groups: GroupIndex::new(config.page_size),
            names: FxHashMap::default(),
            deferred: Deferred::new(config.page_size),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    // ==================== Registration ====================

    /// Register a component type, assigning it a slot and an empty pool.
    ///
    /// # Panics
    ///
    /// Panics if `T` is already registered or every slot is taken.
    #[track_caller]
    pub fn register<T: Component>(&mut self) -> ComponentSlot {
        self.try_register::<T>().or_fatal()
    }

    pub fn try_register<T: Component>(&mut self) -> EcsResult<ComponentSlot> {
        self.components.register::<T>()
    }

    /// The slot of `T`, if it has one in this world.
    #[must_use]
    pub fn component_slot<T: Component>(&self) -> Option<ComponentSlot> {
        self.components.slot_of::<T>()
    }

    /// Get the component registry.
    #[must_use]
    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    // ==================== Entity Operations ====================

    /// Create an entity with no components.
    ///
    /// # Panics
    ///
    /// Panics if the entity limit is reached.
    #[track_caller]
    pub fn create_entity(&mut self) -> Entity {
        self.try_create_entity().or_fatal()
    }

    pub fn try_create_entity(&mut self) -> EcsResult<Entity> {
        let entity = self.entities.allocate()?;
        self.masks.insert(entity, ComponentMask::EMPTY);
        trace!(%entity, "created entity");
        Ok(entity)
    }

    /// Create an entity carrying a debug name.
    ///
    /// # Panics
    ///
    /// Panics if the entity limit is reached.
    #[track_caller]
    pub fn create_named_entity(&mut self, name: impl Into<String>) -> Entity {
        self.try_create_named_entity(name).or_fatal()
    }

    pub fn try_create_named_entity(&mut self, name: impl Into<String>) -> EcsResult<Entity> {
        let entity = self.try_create_entity()?;
        let name = name.into();
        trace!(%entity, name = %name, "named entity");
        self.names.insert(entity.id(), name);
        Ok(entity)
    }

    /// The debug name given at creation, if any.
    #[must_use]
    pub fn entity_name(&self, entity: Entity) -> Option<&str> {
        if !self.is_alive(entity) {
            return None;
        }
        self.names.get(&entity.id()).map(String::as_str)
    }

    /// Delete an entity and every component it holds, then overwrite the
    /// handle with [`Entity::NULL`].
    ///
    /// Not for use on an entity currently being visited by a view; flag it
    /// with [`World::flag_for_deletion`] instead.
    ///
    /// # Panics
    ///
    /// Panics if the handle is null or not alive.
    #[track_caller]
    pub fn delete_entity(&mut self, entity: &mut Entity) {
        self.try_delete_entity(entity).or_fatal();
    }

    pub fn try_delete_entity(&mut self, entity: &mut Entity) -> EcsResult<()> {
        let target = *entity;
        let mask = self.live_mask(target)?;

        self.groups.remove(mask, target);
        for slot in mask.iter_slots() {
            if let Some(pool) = self.components.erased_mut(slot) {
                pool.remove_entity(target);
            }
        }
        self.masks.remove(target);
        self.names.remove(&target.id());
        self.deferred.unflag(target);
        self.entities.deallocate(target);

        trace!(entity = %target, components = mask.count(), "deleted entity");
        *entity = Entity::NULL;
        Ok(())
    }

    /// Check if an entity is alive.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.masks.contains(entity)
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.masks.len()
    }

    /// Every live entity, in creation/swap order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        self.masks.entities()
    }

    /// The presence mask of a live entity.
    #[must_use]
    pub fn mask_of(&self, entity: Entity) -> Option<ComponentMask> {
        self.masks.get(entity).copied()
    }

    pub(crate) fn live_mask(&self, entity: Entity) -> EcsResult<ComponentMask> {
        if entity.is_null() {
            return Err(EcsError::NullEntity);
        }
        self.mask_of(entity).ok_or(EcsError::DeadEntity(entity))
    }

    /// Slot of `T` if `mask` holds it, otherwise the matching misuse error.
    fn held_slot<T: Component>(
        &self,
        entity: Entity,
        mask: ComponentMask,
    ) -> EcsResult<ComponentSlot> {
        let component = type_name::<T>();
        match self.components.slot_of::<T>() {
            Some(slot) if mask.contains(slot) => Ok(slot),
            None if !self.config.auto_register => Err(EcsError::Unregistered(component)),
            _ => Err(EcsError::MissingComponent { entity, component }),
        }
    }

    // ==================== Deferred Deletion ====================

    /// Mark a live entity for deletion by the next [`World::delete_flagged`].
    ///
    /// # Panics
    ///
    /// Panics if the handle is null or not alive.
    #[track_caller]
    pub fn flag_for_deletion(&mut self, entity: Entity) {
        self.try_flag_for_deletion(entity).or_fatal();
    }

    /// Returns `false` if the entity was already flagged.
    pub fn try_flag_for_deletion(&mut self, entity: Entity) -> EcsResult<bool> {
        self.live_mask(entity)?;
        Ok(self.deferred.flag(entity))
    }

    /// Clear the deletion flag on a live entity.
    ///
    /// # Panics
    ///
    /// Panics if the handle is null or not alive.
    #[track_caller]
    pub fn unflag_for_deletion(&mut self, entity: Entity) {
        self.try_unflag_for_deletion(entity).or_fatal();
    }

    /// Returns `false` if the entity was not flagged.
    pub fn try_unflag_for_deletion(&mut self, entity: Entity) -> EcsResult<bool> {
        self.live_mask(entity)?;
        Ok(self.deferred.unflag(entity))
    }

    /// Entities currently flagged for deletion.
    #[must_use]
    pub fn flagged(&self) -> &Deferred {
        &self.deferred
    }

    /// Delete every flagged entity that is still alive.
    ///
    /// Returns how many entities were deleted.
    pub fn delete_flagged(&mut self) -> usize {
        let mut deleted = 0;
        for mut entity in self.deferred.drain() {
            if self.is_alive(entity) && self.try_delete_entity(&mut entity).is_ok() {
                deleted += 1;
            }
        }
        debug!(deleted, "deleted flagged entities");
        deleted
    }

    // ==================== Component Operations ====================

    /// Attach a component, or overwrite the one already held.
    ///
    /// # Panics
    ///
    /// Panics if the entity is null or not alive, or if `T` is unregistered
    /// while auto-registration is off.
    #[track_caller]
    pub fn add<T: Component>(&mut self, entity: Entity, value: T) -> &mut T {
        self.try_add(entity, value).or_fatal()
    }

    pub fn try_add<T: Component>(&mut self, entity: Entity, value: T) -> EcsResult<&mut T> {
        let old = self.live_mask(entity)?;
        let (slot, pool) = self
            .components
            .resolve_pool_mut::<T>(self.config.auto_register)?;

        if old.contains(slot) {
            let stored = pool.get_mut(entity).ok_or(EcsError::MissingComponent {
                entity,
                component: type_name::<T>(),
            })?;
            *stored = value;
            trace!(%entity, component = type_name::<T>(), "overwrote component");
            return Ok(stored);
        }

        let new = old.with(slot);
        self.groups.reassign(old, new, entity);
        self.masks.replace(entity, new);

        trace!(%entity, component = type_name::<T>(), "attached component");
        Ok(pool.insert(entity, value))
    }

    /// Detach a component and return it.
    ///
    /// # Panics
    ///
    /// Panics if the entity is null, not alive, or does not hold `T`.
    #[track_caller]
    pub fn remove<T: Component>(&mut self, entity: Entity) -> T {
        self.try_remove(entity).or_fatal()
    }

    pub fn try_remove<T: Component>(&mut self, entity: Entity) -> EcsResult<T> {
        let old = self.live_mask(entity)?;
        let slot = self.held_slot::<T>(entity, old)?;

        let value = self
            .components
            .pool_mut::<T>()
            .and_then(|pool| pool.remove(entity))
            .ok_or(EcsError::MissingComponent {
                entity,
                component: type_name::<T>(),
            })?;

        let new = old.without(slot);
        self.groups.reassign(old, new, entity);
        self.masks.replace(entity, new);

        trace!(%entity, component = type_name::<T>(), "removed component");
        Ok(value)
    }

    /// Borrow a component the entity is known to hold.
    ///
    /// # Panics
    ///
    /// Panics if the entity is null, not alive, or does not hold `T`.
    #[track_caller]
    pub fn get<T: Component>(&self, entity: Entity) -> &T {
        self.try_get(entity).or_fatal()
    }

    pub fn try_get<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        let mask = self.live_mask(entity)?;
        self.held_slot::<T>(entity, mask)?;
        self.find::<T>(entity).ok_or(EcsError::MissingComponent {
            entity,
            component: type_name::<T>(),
        })
    }

    /// Mutably borrow a component the entity is known to hold.
    ///
    /// # Panics
    ///
    /// Panics if the entity is null, not alive, or does not hold `T`.
    #[track_caller]
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> &mut T {
        self.try_get_mut(entity).or_fatal()
    }

    pub fn try_get_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        let mask = self.live_mask(entity)?;
        self.held_slot::<T>(entity, mask)?;
        self.find_mut::<T>(entity).ok_or(EcsError::MissingComponent {
            entity,
            component: type_name::<T>(),
        })
    }

    /// Borrow a component if the entity is alive and holds it.
    #[must_use]
    pub fn find<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.components.pool::<T>()?.get(entity)
    }

    pub fn find_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.components.pool_mut::<T>()?.get_mut(entity)
    }

    /// Whether a live entity holds `T`. False for dead handles and unknown types.
    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        match (self.components.slot_of::<T>(), self.mask_of(entity)) {
            (Some(slot), Some(mask)) => mask.contains(slot),
            _ => false,
        }
    }

    /// Whether a live entity holds every component in `Q`.
    #[must_use]
    pub fn has_all<Q: Query>(&self, entity: Entity) -> bool {
        let Some(mask) = self.mask_of(entity) else {
            return false;
        };
        Q::lookup_slots(&self.components)
            .into_iter()
            .all(|slot| slot.is_some_and(|slot| mask.contains(slot)))
    }

    /// Whether a live entity holds at least one component in `Q`.
    #[must_use]
    pub fn has_any<Q: Query>(&self, entity: Entity) -> bool {
        let Some(mask) = self.mask_of(entity) else {
            return false;
        };
        Q::lookup_slots(&self.components)
            .into_iter()
            .flatten()
            .any(|slot| mask.contains(slot))
    }

    /// Read-only access to the pool for `T`.
    #[must_use]
    pub fn pool<T: Component>(&self) -> Option<&SparseSet<T>> {
        self.components.pool::<T>()
    }

    // ==================== Views ====================

    /// View every entity holding all components in `Q`.
    ///
    /// # Panics
    ///
    /// Panics if `Q` names a type twice, or names an unregistered type while
    /// auto-registration is off.
    #[track_caller]
    pub fn view<Q: Query>(&mut self) -> View<'_, Q> {
        self.try_view().or_fatal()
    }

    pub fn try_view<Q: Query>(&mut self) -> EcsResult<View<'_, Q>> {
        View::new(
            &mut self.components,
            &self.groups,
            &mut self.deferred,
            self.config.auto_register,
            self.config.strategy,
        )
    }

    /// Groups by exact mask.
    pub fn groups(&self) -> impl Iterator<Item = (&ComponentMask, &[Entity])> {
        self.groups.iter()
    }

    pub(crate) fn group_index(&self) -> &GroupIndex {
        &self.groups
    }

    pub(crate) fn entity_names(&self) -> &FxHashMap<EntityId, String> {
        &self.names
    }

    // ==================== Reset ====================

    /// Delete every entity and empty every pool.
    ///
    /// Component slots survive. Handles from before the reset stay dead.
    pub fn clear(&mut self) {
        let count = self.entity_count();
        self.components.clear_pools();
        self.groups.clear();
        self.masks.clear();
        self.names.clear();
        self.deferred.clear();
        self.entities.release_all();
        debug!(entities = count, "cleared world");
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("entity_count", &self.entity_count())
            .field("component_types", &self.components.len())
            .field("group_count", &self.groups.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    struct Velocity {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Health(u32);

    #[test]
    fn test_create_and_add() {
        let mut world = World::new();

        let entity = world.create_entity();
        assert!(world.is_alive(entity));
        assert_eq!(world.entity_count(), 1);
        assert_eq!(world.mask_of(entity), Some(ComponentMask::EMPTY));

        world.add(entity, Position { x: 1.0, y: 2.0 });
        let pos = world.get::<Position>(entity);
        assert_eq!(pos.x, 1.0);
        assert_eq!(pos.y, 2.0);
        assert!(world.has::<Position>(entity));
    }

    #[test]
    fn test_add_overwrites() {
        let mut world = World::new();
        let entity = world.create_entity();

        world.add(entity, Health(10));
        let groups_before = world.groups().count();
        world.add(entity, Health(20)).0 += 1;

        assert_eq!(world.get::<Health>(entity), &Health(21));
        assert_eq!(world.pool::<Health>().unwrap().len(), 1);
        assert_eq!(world.groups().count(), groups_before);
    }

    #[test]
    fn test_remove_component() {
        let mut world = World::new();

        let entity = world.create_entity();
        world.add(entity, Position { x: 1.0, y: 2.0 });
        world.add(entity, Velocity { x: 0.5, y: 0.5 });

        let removed = world.remove::<Velocity>(entity);
        assert_eq!(removed, Velocity { x: 0.5, y: 0.5 });

        assert!(world.has::<Position>(entity));
        assert!(!world.has::<Velocity>(entity));
        assert_eq!(world.find::<Velocity>(entity), None);
    }

    #[test]
    fn test_get_mut() {
        let mut world = World::new();
        let entity = world.create_entity();
        world.add(entity, Position::default());

        world.get_mut::<Position>(entity).x = 4.0;
        if let Some(pos) = world.find_mut::<Position>(entity) {
            pos.y = 5.0;
        }

        assert_eq!(world.get::<Position>(entity), &Position { x: 4.0, y: 5.0 });
    }

    #[test]
    fn test_delete_entity_nulls_handle() {
        let mut world = World::new();

        let mut entity = world.create_entity();
        let original = entity;
        world.add(entity, Position::default());
        world.delete_entity(&mut entity);

        assert!(entity.is_null());
        assert!(!world.is_alive(original));
        assert_eq!(world.entity_count(), 0);
        assert!(world.pool::<Position>().unwrap().is_empty());
        assert_eq!(world.groups().count(), 0);
    }

    #[test]
    fn test_delete_maintains_others() {
        let mut world = World::new();

        let e1 = world.create_entity();
        let mut e2 = world.create_entity();
        let e3 = world.create_entity();
        for (entity, x) in [(e1, 1.0), (e2, 2.0), (e3, 3.0)] {
            world.add(entity, Position { x, y: x });
        }

        world.delete_entity(&mut e2);

        assert_eq!(world.get::<Position>(e1).x, 1.0);
        assert_eq!(world.get::<Position>(e3).x, 3.0);
    }

    #[test]
    fn test_recycled_entity_starts_empty() {
        let mut world = World::new();

        let mut old = world.create_entity();
        let stale = old;
        world.add(old, Health(1));
        world.delete_entity(&mut old);

        let fresh = world.create_entity();
        assert_eq!(fresh.id(), stale.id());
        assert_ne!(fresh, stale);
        assert!(!world.has::<Health>(fresh));
        assert_eq!(world.mask_of(fresh), Some(ComponentMask::EMPTY));
        assert!(!world.is_alive(stale));
    }

    #[test]
    fn test_stale_handle_is_rejected() {
        let mut world = World::new();

        let mut entity = world.create_entity();
        let stale = entity;
        world.delete_entity(&mut entity);
        world.create_entity();

        assert_eq!(
            world.try_add(stale, Health(1)).unwrap_err(),
            EcsError::DeadEntity(stale)
        );
        assert_eq!(world.find::<Health>(stale), None);
    }

    #[test]
    fn test_null_entity_is_rejected() {
        let mut world = World::new();
        assert_eq!(
            world.try_get::<Health>(Entity::NULL).unwrap_err(),
            EcsError::NullEntity
        );
        assert!(!world.has::<Health>(Entity::NULL));
    }

    #[test]
    #[should_panic(expected = "has no")]
    fn test_get_missing_component_panics() {
        let mut world = World::new();
        let entity = world.create_entity();
        world.register::<Health>();
        let _ = world.get::<Health>(entity);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_double_register_panics() {
        let mut world = World::new();
        world.register::<Health>();
        world.register::<Health>();
    }

    #[test]
    fn test_remove_missing_leaves_state_intact() {
        let mut world = World::new();
        let entity = world.create_entity();
        world.add(entity, Position::default());

        let err = world.try_remove::<Velocity>(entity).unwrap_err();
        assert!(matches!(err, EcsError::MissingComponent { .. }));
        assert!(world.has::<Position>(entity));
        assert_eq!(world.groups().count(), 1);
    }

    #[test]
    fn test_auto_register_disabled() {
        let config = WorldConfig::new().with_auto_register(false);
        let mut world = World::with_config(config).unwrap();
        let entity = world.create_entity();

        assert_eq!(
            world.try_add(entity, Health(1)).unwrap_err(),
            EcsError::Unregistered(type_name::<Health>())
        );
        assert_eq!(
            world.try_remove::<Health>(entity).unwrap_err(),
            EcsError::Unregistered(type_name::<Health>())
        );

        world.register::<Health>();
        world.add(entity, Health(1));
        assert!(world.has::<Health>(entity));
    }

    #[test]
    fn test_entity_limit() {
        let config = WorldConfig::new().with_max_entities(2);
        let mut world = World::with_config(config).unwrap();

        world.create_entity();
        let mut second = world.create_entity();
        assert_eq!(
            world.try_create_entity(),
            Err(EcsError::EntityLimit { max: 2 })
        );

        world.delete_entity(&mut second);
        assert!(world.try_create_entity().is_ok());
    }

    #[test]
    fn test_has_all_and_any() {
        let mut world = World::new();
        let entity = world.create_entity();
        world.add(entity, Position::default());
        world.add(entity, Velocity::default());

        assert!(world.has_all::<(Position, Velocity)>(entity));
        assert!(!world.has_all::<(Position, Health)>(entity));
        assert!(world.has_any::<(Health, Velocity)>(entity));
        assert!(!world.has_any::<(Health,)>(entity));
    }

    #[test]
    fn test_named_entities() {
        let mut world = World::new();

        let mut named = world.create_named_entity("player");
        let plain = world.create_entity();
        assert_eq!(world.entity_name(named), Some("player"));
        assert_eq!(world.entity_name(plain), None);

        let id = named.id();
        world.delete_entity(&mut named);
        let reused = world.create_entity();
        assert_eq!(reused.id(), id);
        assert_eq!(world.entity_name(reused), None);
    }

    #[test]
    fn test_flagged_deletion() {
        let mut world = World::new();
        let entities: Vec<_> = (0..5).map(|_| world.create_entity()).collect();

        world.flag_for_deletion(entities[1]);
        world.flag_for_deletion(entities[3]);
        world.flag_for_deletion(entities[3]);

        assert_eq!(world.delete_flagged(), 2);
        assert_eq!(world.entity_count(), 3);
        assert!(!world.is_alive(entities[1]));
        assert!(world.is_alive(entities[2]));
        assert_eq!(world.delete_flagged(), 0);
    }

    #[test]
    fn test_flag_twice_and_unflag() {
        let mut world = World::new();
        let a = world.create_entity();
        let b = world.create_entity();

        assert!(world.try_flag_for_deletion(a).unwrap());
        assert!(!world.try_flag_for_deletion(a).unwrap());
        assert_eq!(world.flagged().len(), 1);

        world.flag_for_deletion(b);
        assert!(world.try_unflag_for_deletion(a).unwrap());
        assert!(!world.try_unflag_for_deletion(a).unwrap());

        assert_eq!(world.delete_flagged(), 1);
        assert!(world.is_alive(a));
        assert!(!world.is_alive(b));
    }

    #[test]
    fn test_flag_rejects_dead_and_null() {
        let mut world = World::new();
        let mut entity = world.create_entity();
        let stale = entity;
        world.delete_entity(&mut entity);

        assert_eq!(
            world.try_flag_for_deletion(stale),
            Err(EcsError::DeadEntity(stale))
        );
        assert_eq!(
            world.try_flag_for_deletion(Entity::NULL),
            Err(EcsError::NullEntity)
        );
        assert_eq!(
            world.try_unflag_for_deletion(stale),
            Err(EcsError::DeadEntity(stale))
        );
        assert!(world.flagged().is_empty());
    }

    #[test]
    #[should_panic(expected = "not alive")]
    fn test_flag_dead_entity_panics() {
        let mut world = World::new();
        let mut entity = world.create_entity();
        let stale = entity;
        world.delete_entity(&mut entity);
        world.flag_for_deletion(stale);
    }

    #[test]
    fn test_delete_clears_flag() {
        let mut world = World::new();
        let mut entity = world.create_entity();
        world.flag_for_deletion(entity);

        world.delete_entity(&mut entity);
        let recycled = world.create_entity();

        assert!(world.flagged().is_empty());
        assert_eq!(world.delete_flagged(), 0);
        assert!(world.is_alive(recycled));
    }

    #[test]
    fn test_clear_keeps_slots() {
        let mut world = World::new();
        let slot = world.register::<Position>();
        let entity = world.create_named_entity("a");
        world.add(entity, Position::default());

        world.clear();

        assert_eq!(world.entity_count(), 0);
        assert!(!world.is_alive(entity));
        assert_eq!(world.groups().count(), 0);
        assert_eq!(world.component_slot::<Position>(), Some(slot));
        assert!(world.pool::<Position>().unwrap().is_empty());

        let fresh = world.create_entity();
        assert_eq!(fresh.id(), 0);
        assert_eq!(world.entity_name(fresh), None);
    }

    #[test]
    fn test_separate_worlds_have_separate_slots() {
        let mut a = World::new();
        let mut b = World::new();

        a.register::<Position>();
        b.register::<Velocity>();
        b.register::<Position>();

        assert_ne!(a.component_slot::<Position>(), b.component_slot::<Position>());
    }

    #[test]
    fn test_invalid_config() {
        let config = WorldConfig::new().with_page_size(3);
        assert!(matches!(
            World::with_config(config),
            Err(EcsError::InvalidConfig(_))
        ));
    }
}
