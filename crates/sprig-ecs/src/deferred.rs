//! Deferred deletion.
//!
//! Deleting an entity swap-removes its values out of every pool, so it must
//! not happen while a view is handing out references. Views instead pass a
//! [`Deferred`] to their callback; entities flagged there are deleted by
//! [`World::delete_flagged`](crate::World::delete_flagged) once the view is
//! done.

use crate::{entity::Entity, sparse_set::SparseSet};

/// Entities waiting to be deleted, each at most once.
pub struct Deferred {
    flagged: SparseSet<()>,
}

impl Deferred {
    pub(crate) fn new(page_size: usize) -> Self {
        Self {
            flagged: SparseSet::new(page_size),
        }
    }

    /// Flag `entity` for deletion. Returns `false` if it was already flagged
    /// or is the null handle.
    ///
    /// A flag left by an older handle with the same id is replaced.
    pub fn flag(&mut self, entity: Entity) -> bool {
        if entity.is_null() || self.flagged.contains(entity) {
            return false;
        }
        if let Some(stale) = self.flagged.handle_for(entity.id()) {
            self.flagged.remove(stale);
        }
        self.flagged.insert(entity, ());
        true
    }

    /// Clear the flag on `entity`. Returns `false` if it was not flagged.
    pub fn unflag(&mut self, entity: Entity) -> bool {
        self.flagged.remove(entity).is_some()
    }

    #[must_use]
    pub fn is_flagged(&self, entity: Entity) -> bool {
        self.flagged.contains(entity)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.flagged.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flagged.is_empty()
    }

    /// Flagged entities, oldest flag first until the first unflag.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        self.flagged.entities()
    }

    /// Remove and return every flag.
    pub(crate) fn drain(&mut self) -> Vec<Entity> {
        let drained = self.flagged.entities().to_vec();
        self.flagged.clear();
        drained
    }

    pub(crate) fn clear(&mut self) {
        self.flagged.clear();
    }
}

impl std::fmt::Debug for Deferred {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deferred")
            .field("flagged", &self.flagged.len())
            .finish()
    }
}
