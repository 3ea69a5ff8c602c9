//! Sparse-set component pools.
//!
//! A [`SparseSet<T>`] keeps its values packed in a dense `Vec<T>` with a
//! parallel dense-to-entity list, and finds them through a [`PagedIndex`]
//! keyed by entity id. Removal swaps the last element into the hole, so
//! dense order is insertion order until the first removal and arbitrary
//! after it.

use std::{any::Any, ptr::NonNull};

use crate::{
    component::Component,
    entity::{Entity, EntityId},
    paged::PagedIndex,
};

/// Dense storage for one component type.
///
/// Invariant: for every `i < len`, `sparse[entities[i].id()] == i`.
pub struct SparseSet<T> {
    sparse: PagedIndex,
    dense: Vec<T>,
    entities: Vec<Entity>,
}

impl<T> SparseSet<T> {
    /// Create an empty set whose sparse pages cover `page_size` ids each.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            sparse: PagedIndex::new(page_size),
            dense: Vec::new(),
            entities: Vec::new(),
        }
    }

    /// Dense position of `entity`, if this exact handle is stored.
    #[inline]
    fn index_of(&self, entity: Entity) -> Option<usize> {
        let index = self.sparse.get(entity.id())?;
        (self.entities[index] == entity).then_some(index)
    }

    /// Append a value for `entity` and return it.
    ///
    /// # Panics
    ///
    /// Panics if the entity's id already has an entry. Callers check the
    /// presence mask first.
    pub fn insert(&mut self, entity: Entity, value: T) -> &mut T {
        assert!(
            !self.sparse.contains(entity.id()),
            "{entity} already has an entry in this pool"
        );

        let index = self.dense.len();
        self.sparse.set(entity.id(), index);
        self.dense.push(value);
        self.entities.push(entity);
        &mut self.dense[index]
    }

    /// Overwrite the value stored for `entity`, returning the old one.
    ///
    /// Does nothing and returns `None` if the entity has no entry.
    pub fn replace(&mut self, entity: Entity, value: T) -> Option<T> {
        let index = self.index_of(entity)?;
        Some(std::mem::replace(&mut self.dense[index], value))
    }

    #[inline]
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.index_of(entity).map(|index| &self.dense[index])
    }

    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.index_of(entity).map(|index| &mut self.dense[index])
    }

    /// Swap-remove the entry for `entity`.
    ///
    /// The last dense element moves into the vacated position, so any
    /// reference into this pool is invalid afterwards.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let index = self.index_of(entity)?;
        let last = self.dense.len() - 1;

        let value = self.dense.swap_remove(index);
        self.entities.swap_remove(index);

        if index != last {
            let moved = self.entities[index];
            self.sparse.set(moved.id(), index);
        }
        self.sparse.remove(entity.id());

        Some(value)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.index_of(entity).is_some()
    }

    /// Whether any handle with this id has an entry.
    #[inline]
    #[must_use]
    pub fn contains_id(&self, id: EntityId) -> bool {
        self.sparse.contains(id)
    }

    /// The handle stored under `id`, whatever its generation.
    #[must_use]
    pub fn handle_for(&self, id: EntityId) -> Option<Entity> {
        self.sparse.get(id).map(|index| self.entities[index])
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Owning entities, in dense order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Stored values, in dense order.
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.dense
    }

    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.dense
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(&self.dense)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entities.iter().copied().zip(self.dense.iter_mut())
    }

    /// Remove every entry and release all sparse pages.
    pub fn clear(&mut self) {
        self.dense.clear();
        self.entities.clear();
        self.sparse.clear();
    }

    /// Pointer to the value stored for `entity`.
    ///
    /// Only the sparse index and entity list are read through shared
    /// borrows and the dense buffer is reached through its raw pointer,
    /// so pointers handed out earlier for other entities stay valid.
    ///
    /// # Safety
    ///
    /// `this` must point to a live pool with no outstanding `&mut SparseSet<T>`.
    pub(crate) unsafe fn get_ptr(this: NonNull<Self>, entity: Entity) -> Option<NonNull<T>> {
        let raw = this.as_ptr();
        // SAFETY: field places of a live pool; no unique borrow of the whole pool exists.
        let (sparse, entities) = unsafe { (&(*raw).sparse, &(*raw).entities) };

        let index = sparse.get(entity.id())?;
        if entities[index] != entity {
            return None;
        }

        // SAFETY: index < len because the sparse/dense invariant holds.
        unsafe {
            let dense = &mut (*raw).dense;
            Some(NonNull::new_unchecked(dense.as_mut_ptr().add(index)))
        }
    }
}

impl<T> std::fmt::Debug for SparseSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparseSet")
            .field("len", &self.dense.len())
            .field("sparse", &self.sparse)
            .finish()
    }
}

/// Operations the world needs on a pool without knowing its value type.
pub trait ErasedPool: Any + Send + Sync {
    /// Drop the entry for `entity`. Returns `false` if there was none.
    fn remove_entity(&mut self, entity: Entity) -> bool;

    fn clear(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, entity: Entity) -> bool;

    fn entities(&self) -> &[Entity];

    fn as_any(&self) -> &dyn Any;
}

impl<T: Component> ErasedPool for SparseSet<T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn clear(&mut self) {
        Self::clear(self);
    }

    fn len(&self) -> usize {
        Self::len(self)
    }

    fn contains(&self, entity: Entity) -> bool {
        Self::contains(self, entity)
    }

    fn entities(&self) -> &[Entity] {
        Self::entities(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Generation;

    fn entity(id: EntityId) -> Entity {
        Entity::new(id, Generation::new())
    }

    #[test]
    fn test_insert_and_get() {
        let mut set = SparseSet::new(16);
        assert!(set.is_empty());

        *set.insert(entity(3), 30) += 1;
        set.insert(entity(700), 7000);

        assert_eq!(set.len(), 2);
        assert_eq!(set.get(entity(3)), Some(&31));
        assert_eq!(set.get(entity(700)), Some(&7000));
        assert_eq!(set.get(entity(4)), None);
        assert_eq!(set.entities(), &[entity(3), entity(700)]);
    }

    #[test]
    fn test_stale_generation_is_absent() {
        let mut set = SparseSet::new(16);
        set.insert(entity(1), "a");

        let stale = Entity::new(1, Generation::new().next());
        assert!(!set.contains(stale));
        assert!(set.contains_id(1));
        assert_eq!(set.handle_for(1), Some(entity(1)));
        assert_eq!(set.handle_for(2), None);
        assert_eq!(set.remove(stale), None);
        assert_eq!(set.len(), 1);
    }

    #[test]
    #[should_panic(expected = "already has an entry")]
    fn test_double_insert_panics() {
        let mut set = SparseSet::new(16);
        set.insert(entity(1), 1);
        set.insert(entity(1), 2);
    }

    #[test]
    fn test_replace() {
        let mut set = SparseSet::new(16);
        assert_eq!(set.replace(entity(1), 5), None);
        assert!(set.is_empty());

        set.insert(entity(1), 5);
        assert_eq!(set.replace(entity(1), 6), Some(5));
        assert_eq!(set.get(entity(1)), Some(&6));
    }

    #[test]
    fn test_swap_remove_keeps_others() {
        let mut set = SparseSet::new(4);
        for id in 0..10 {
            set.insert(entity(id), id * 10);
        }

        assert_eq!(set.remove(entity(2)), Some(20));
        assert_eq!(set.len(), 9);
        assert!(!set.contains(entity(2)));

        // Last element moved into the hole
        assert_eq!(set.entities()[2], entity(9));
        for id in (0..10).filter(|&id| id != 2) {
            assert_eq!(set.get(entity(id)), Some(&(id * 10)));
        }
    }

    #[test]
    fn test_remove_last_and_absent() {
        let mut set = SparseSet::new(4);
        set.insert(entity(0), 'a');
        set.insert(entity(1), 'b');

        assert_eq!(set.remove(entity(1)), Some('b'));
        assert_eq!(set.remove(entity(1)), None);
        assert_eq!(set.remove(entity(99)), None);
        assert_eq!(set.values(), &['a']);
    }

    #[test]
    fn test_dense_matches_contains_after_churn() {
        let mut set = SparseSet::new(8);
        for id in 0..64 {
            set.insert(entity(id), id);
        }
        for id in (0..64).step_by(3) {
            set.remove(entity(id));
        }

        let contained = (0..64).filter(|&id| set.contains(entity(id))).count();
        assert_eq!(contained, set.len());
        for (owner, &value) in set.iter() {
            assert_eq!(owner.id(), value);
        }
    }

    #[test]
    fn test_erased_interface() {
        let mut set: SparseSet<u32> = SparseSet::new(8);
        set.insert(entity(5), 1);

        let erased: &mut dyn ErasedPool = &mut set;
        assert_eq!(erased.len(), 1);
        assert!(erased.contains(entity(5)));
        assert!(erased.as_any().is::<SparseSet<u32>>());
        assert!(erased.remove_entity(entity(5)));
        assert!(!erased.remove_entity(entity(5)));
        assert!(erased.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut set = SparseSet::new(8);
        set.insert(entity(1), 1);
        set.insert(entity(100), 2);
        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(entity(1)));
    }
}
