//! Structured dumps of world state for debugging.
//!
//! Nothing here changes the world. Output goes to `tracing` at `info`.

use tracing::info;

use crate::{
    entity::Entity,
    error::{EcsResult, OrFatal},
    world::World,
};

fn join(entities: &[Entity]) -> String {
    entities
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl World {
    /// One event per group: its mask and members.
    pub fn log_groupings(&self) {
        for (mask, members) in self.group_index().iter() {
            info!(%mask, count = members.len(), members = %join(members), "group");
        }
    }

    /// The presence mask of one entity.
    ///
    /// # Panics
    ///
    /// Panics if the handle is null or not alive.
    #[track_caller]
    pub fn log_entity_mask(&self, entity: Entity) {
        self.try_log_entity_mask(entity).or_fatal();
    }

    pub fn try_log_entity_mask(&self, entity: Entity) -> EcsResult<()> {
        let mask = self.live_mask(entity)?;
        info!(%entity, %mask, "entity mask");
        Ok(())
    }

    /// Every entity that holds at least one component.
    pub fn log_active(&self) {
        let active: Vec<Entity> = self
            .group_index()
            .iter()
            .flat_map(|(_, members)| members.iter().copied())
            .collect();
        info!(count = active.len(), entities = %join(&active), "active entities");
    }

    /// Names of the component types an entity holds.
    ///
    /// # Panics
    ///
    /// Panics if the handle is null or not alive.
    #[track_caller]
    pub fn log_entity_components(&self, entity: Entity) {
        self.try_log_entity_components(entity).or_fatal();
    }

    pub fn try_log_entity_components(&self, entity: Entity) -> EcsResult<()> {
        let mask = self.live_mask(entity)?;
        let components: Vec<&str> = mask
            .iter_slots()
            .map(|slot| self.components().name_of(slot))
            .collect();
        let name = self
            .entity_names()
            .get(&entity.id())
            .map_or("Entity", String::as_str);
        info!(
            %entity,
            name,
            components = %components.join(", "),
            "entity components"
        );
        Ok(())
    }
}
