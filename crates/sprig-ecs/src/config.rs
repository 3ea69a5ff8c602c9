//! Build-time limits and per-world configuration.

use crate::{
    entity::EntityId,
    error::{EcsError, EcsResult},
    view::ViewStrategy,
};

/// Maximum number of distinct component types in one world.
///
/// Must be a multiple of 64; it sizes every [`ComponentMask`](crate::ComponentMask).
pub const MAX_COMPONENTS: usize = 64;

/// Default number of entity ids covered by one sparse page.
pub const DEFAULT_PAGE_SIZE: usize = 1024;

/// Default entity ceiling. `EntityId::MAX` is reserved for `Entity::NULL`.
pub const DEFAULT_MAX_ENTITIES: u32 = EntityId::MAX - 1;

const _: () = assert!(MAX_COMPONENTS > 0 && MAX_COMPONENTS % 64 == 0);

/// Settings fixed when a [`World`](crate::World) is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldConfig {
    /// Ceiling on entity ids ever issued (recycled ids do not count twice).
    pub max_entities: u32,
    /// Entity ids per sparse page. Must be a power of two.
    pub page_size: usize,
    /// Register component types on first use instead of failing.
    pub auto_register: bool,
    /// Default iteration strategy for views.
    pub strategy: ViewStrategy,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            max_entities: DEFAULT_MAX_ENTITIES,
            page_size: DEFAULT_PAGE_SIZE,
            auto_register: true,
            strategy: ViewStrategy::Auto,
        }
    }
}

impl WorldConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_max_entities(mut self, max_entities: u32) -> Self {
        self.max_entities = max_entities;
        self
    }

    #[must_use]
    pub const fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub const fn with_auto_register(mut self, auto_register: bool) -> Self {
        self.auto_register = auto_register;
        self
    }

    #[must_use]
    pub const fn with_strategy(mut self, strategy: ViewStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Check the settings for values the store cannot honour.
    pub fn validate(&self) -> EcsResult<()> {
        if self.max_entities == 0 {
            return Err(EcsError::InvalidConfig(
                "max_entities must be at least 1".into(),
            ));
        }
        if self.max_entities == EntityId::MAX {
            return Err(EcsError::InvalidConfig(format!(
                "max_entities must stay below the null entity id ({})",
                EntityId::MAX
            )));
        }
        if !self.page_size.is_power_of_two() {
            return Err(EcsError::InvalidConfig(format!(
                "page_size must be a non-zero power of two, got {}",
                self.page_size
            )));
        }
        Ok(())
    }
}
