//! Grouping index: entities bucketed by their exact presence mask.
//!
//! A superset query only has to visit the buckets whose mask contains the
//! query mask, which is cheap while the number of distinct masks in use
//! stays small.

use hashbrown::HashMap;
use rustc_hash::FxBuildHasher;

use crate::{entity::Entity, mask::ComponentMask, sparse_set::SparseSet};

/// `mask -> entities holding exactly that mask`.
///
/// Every live entity with a non-empty mask is in exactly one group. Empty
/// masks are never grouped and empty groups are dropped on the spot.
pub struct GroupIndex {
    groups: HashMap<ComponentMask, SparseSet<()>, FxBuildHasher>,
    page_size: usize,
}

impl GroupIndex {
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            groups: HashMap::default(),
            page_size,
        }
    }

    /// Put `entity` in the group for `mask`, creating it if needed.
    pub fn assign(&mut self, mask: ComponentMask, entity: Entity) {
        if mask.is_empty() {
            return;
        }
        let page_size = self.page_size;
        self.groups
            .entry(mask)
            .or_insert_with(|| SparseSet::new(page_size))
            .insert(entity, ());
    }

    /// Take `entity` out of the group for `mask`, dropping the group if it empties.
    pub fn remove(&mut self, mask: ComponentMask, entity: Entity) {
        let Some(group) = self.groups.get_mut(&mask) else {
            return;
        };
        group.remove(entity);
        if group.is_empty() {
            self.groups.remove(&mask);
        }
    }

    /// Move `entity` from the `from` group to the `to` group.
    pub fn reassign(&mut self, from: ComponentMask, to: ComponentMask, entity: Entity) {
        self.remove(from, entity);
        self.assign(to, entity);
    }

    /// Every entity whose mask is a superset of `target`.
    #[must_use]
    pub fn collect_matching(&self, target: &ComponentMask) -> Vec<Entity> {
        let mut out = Vec::new();
        for (mask, group) in &self.groups {
            if mask.contains_all(target) {
                out.extend_from_slice(group.entities());
            }
        }
        out
    }

    /// Members of the group for exactly `mask`.
    #[must_use]
    pub fn group(&self, mask: &ComponentMask) -> Option<&[Entity]> {
        self.groups.get(mask).map(SparseSet::entities)
    }

    /// Number of groups, i.e. distinct non-empty masks in use.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ComponentMask, &[Entity])> {
        self.groups
            .iter()
            .map(|(mask, group)| (mask, group.entities()))
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

impl std::fmt::Debug for GroupIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.groups.iter().map(|(mask, group)| (mask, group.len())))
            .finish()
    }
}
