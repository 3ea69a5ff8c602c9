//! Entity identifiers with generational indices.
//!
//! An entity is just an index plus a generation. Deleting an entity bumps
//! the generation of its slot, so a stale handle to a recycled index is
//! detected instead of silently aliasing the new occupant.

use std::fmt;

use crate::error::{EcsError, EcsResult};

/// Generation counter to detect stale entity references.
/// Incremented each time an entity slot is recycled.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u32);

impl Generation {
    /// Create a new generation (starts at 0).
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Increment the generation counter.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Get the raw generation value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen{}", self.0)
    }
}

/// Raw entity index. Also the key into every sparse page.
pub type EntityId = u32;

/// A handle to an entity in a [`World`](crate::World).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    id: EntityId,
    generation: Generation,
}

impl Entity {
    /// The "no entity" sentinel. Never issued by the allocator.
    pub const NULL: Entity = Entity {
        id: EntityId::MAX,
        generation: Generation(u32::MAX),
    };

    /// Create a new entity with the given ID and generation.
    #[must_use]
    pub const fn new(id: EntityId, generation: Generation) -> Self {
        Self { id, generation }
    }

    #[must_use]
    pub const fn id(self) -> EntityId {
        self.id
    }

    #[must_use]
    pub const fn generation(self) -> Generation {
        self.generation
    }

    #[must_use]
    pub const fn is_null(self) -> bool {
        self.id == EntityId::MAX
    }

    /// Pack entity into a single u64.
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        ((self.generation.0 as u64) << 32) | (self.id as u64)
    }

    /// Unpack entity from a u64.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            id: bits as u32,
            generation: Generation((bits >> 32) as u32),
        }
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("Entity(null)");
        }
        write!(f, "Entity({}v{})", self.id, self.generation.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("null");
        }
        write!(f, "{}v{}", self.id, self.generation.0)
    }
}

/// Issues entity ids, recycles deleted ones, and enforces the entity ceiling.
///
/// `generations.len()` is the high-water mark: every index below it has
/// been issued at least once.
pub struct EntityAllocator {
    /// Generation for each entity slot.
    generations: Vec<Generation>,
    /// Recycle list, popped LIFO.
    free_list: Vec<EntityId>,
    /// Number of currently alive entities.
    alive_count: u32,
    /// Highest number of distinct ids this allocator may issue.
    max_entities: u32,
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_ENTITIES)
    }
}

impl EntityAllocator {
    #[must_use]
    pub const fn new(max_entities: u32) -> Self {
        Self {
            generations: Vec::new(),
            free_list: Vec::new(),
            alive_count: 0,
            max_entities,
        }
    }

    /// Allocate an entity, reusing a recycled id when one is available.
    pub fn allocate(&mut self) -> EcsResult<Entity> {
        if let Some(id) = self.free_list.pop() {
            self.alive_count += 1;
            return Ok(Entity::new(id, self.generations[id as usize]));
        }

        let next = self.generations.len();
        if next >= self.max_entities as usize {
            return Err(EcsError::EntityLimit {
                max: self.max_entities,
            });
        }

        let generation = Generation::new();
        self.generations.push(generation);
        self.alive_count += 1;
        Ok(Entity::new(next as EntityId, generation))
    }

    /// Deallocate an entity, making its slot available for reuse.
    ///
    /// Returns `true` if the entity was valid and deallocated.
    pub fn deallocate(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        let id = entity.id() as usize;
        // Invalidate outstanding handles to this slot.
        self.generations[id] = self.generations[id].next();
        self.free_list.push(entity.id());
        self.alive_count -= 1;
        true
    }

    /// Check if an entity is currently alive.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        let id = entity.id() as usize;
        id < self.generations.len() && self.generations[id] == entity.generation()
    }

    /// Get the number of currently alive entities.
    #[must_use]
    pub const fn alive_count(&self) -> u32 {
        self.alive_count
    }

    /// Number of distinct ids issued so far.
    #[must_use]
    pub fn high_water_mark(&self) -> usize {
        self.generations.len()
    }

    #[must_use]
    pub const fn max_entities(&self) -> u32 {
        self.max_entities
    }

    /// Release every issued id at once.
    ///
    /// Every slot's generation is bumped, so handles from before the call
    /// stay stale. Recycled ids come back lowest first.
    pub fn release_all(&mut self) {
        for generation in &mut self.generations {
            *generation = generation.next();
        }
        self.free_list.clear();
        self.free_list
            .extend((0..self.generations.len() as EntityId).rev());
        self.alive_count = 0;
    }
}
