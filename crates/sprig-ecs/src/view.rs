//! Multi-component views.
//!
//! A view resolves its component types to slots once, snapshots the list of
//! matching entities, and then hands out `&mut` references into the pools
//! for each entity in the snapshot.
//!
//! ```ignore
//! world
//!     .view::<(Position, Velocity)>()
//!     .for_each(|(pos, vel)| {
//!         pos.x += vel.x;
//!         pos.y += vel.y;
//!     });
//! ```
//!
//! Callbacks cannot reach the world while a view runs. To delete matches,
//! flag them through the [`Deferred`] handed to [`View::for_each_deferred`]
//! and call [`World::delete_flagged`](crate::World::delete_flagged) afterwards.

use std::{any::type_name, marker::PhantomData, ptr::NonNull};

use smallvec::{SmallVec, smallvec};
use tracing::trace;

use crate::{
    component::{Component, ComponentRegistry, ComponentSlot},
    deferred::Deferred,
    entity::Entity,
    error::{EcsError, EcsResult},
    group::GroupIndex,
    mask::ComponentMask,
    sparse_set::{ErasedPool, SparseSet},
};

/// Largest number of component types one view can request.
pub const MAX_QUERY_LEN: usize = 8;

/// Slot of each component type in a query, in tuple order.
pub type QuerySlots = SmallVec<[ComponentSlot; MAX_QUERY_LEN]>;

/// How a view finds its matching entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewStrategy {
    /// Concatenate every group whose mask is a superset of the view mask.
    Groups,
    /// Walk the smallest requested pool and keep entities present in all others.
    SmallestPool,
    /// `Groups` while there are no more groups than entries in the smallest
    /// requested pool, `SmallestPool` otherwise.
    #[default]
    Auto,
}

mod sealed {
    pub trait Sealed {}
}

/// A set of component types that can be viewed together.
///
/// Implemented for tuples of one to eight [`Component`] types, and sealed to
/// those: views trust the slots it resolves when forming pool pointers.
pub trait Query: sealed::Sealed {
    /// What the callback receives per entity.
    type Item<'w>;

    /// Raw pool handles used to fetch items.
    type Pools: Copy;

    /// Slot of each type, in tuple order.
    fn resolve_slots(registry: &mut ComponentRegistry, auto_register: bool) -> EcsResult<QuerySlots>;

    /// Slot of each type if it is registered, in tuple order.
    fn lookup_slots(registry: &ComponentRegistry) -> SmallVec<[Option<ComponentSlot>; MAX_QUERY_LEN]>;

    /// # Safety
    ///
    /// `slots` must come from [`Query::resolve_slots`] on the same registry.
    unsafe fn pools(registry: &mut ComponentRegistry, slots: &[ComponentSlot]) -> Self::Pools;

    /// # Safety
    ///
    /// `pools` must be live, the slots behind them pairwise distinct, and no
    /// other reference to `entity`'s values may exist for `'w`.
    unsafe fn fetch<'w>(pools: Self::Pools, entity: Entity) -> Option<Self::Item<'w>>;
}

macro_rules! impl_query {
    ($(($name:ident, $index:tt)),+) => {
        impl<$($name: Component),+> sealed::Sealed for ($($name,)+) {}

        impl<$($name: Component),+> Query for ($($name,)+) {
            type Item<'w> = ($(&'w mut $name,)+);
            type Pools = ($(NonNull<SparseSet<$name>>,)+);

            fn resolve_slots(
                registry: &mut ComponentRegistry,
                auto_register: bool,
            ) -> EcsResult<QuerySlots> {
                Ok(smallvec![$(registry.resolve::<$name>(auto_register)?),+])
            }

            fn lookup_slots(
                registry: &ComponentRegistry,
            ) -> SmallVec<[Option<ComponentSlot>; MAX_QUERY_LEN]> {
                smallvec![$(registry.slot_of::<$name>()),+]
            }

            unsafe fn pools(
                registry: &mut ComponentRegistry,
                slots: &[ComponentSlot],
            ) -> Self::Pools {
                // SAFETY: slots were resolved for these types, in this order.
                unsafe { ($(registry.pool_ptr::<$name>(slots[$index]),)+) }
            }

            unsafe fn fetch<'w>(pools: Self::Pools, entity: Entity) -> Option<Self::Item<'w>> {
                // SAFETY: distinct pools and a single visit per entity keep the
                // returned references disjoint.
                unsafe { Some(($(SparseSet::get_ptr(pools.$index, entity)?.as_mut(),)+)) }
            }
        }
    };
}

impl_query!((A, 0));
impl_query!((A, 0), (B, 1));
impl_query!((A, 0), (B, 1), (C, 2));
impl_query!((A, 0), (B, 1), (C, 2), (D, 3));
impl_query!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4));
impl_query!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5));
impl_query!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5), (G, 6));
impl_query!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5), (G, 6), (H, 7));

/// Entities holding every component in `Q`, with mutable access to those components.
///
/// The view borrows the world mutably, so structural changes wait until it
/// is consumed. Deletions can be queued with [`View::for_each_deferred`].
pub struct View<'w, Q: Query> {
    registry: &'w mut ComponentRegistry,
    groups: &'w GroupIndex,
    deferred: &'w mut Deferred,
    slots: QuerySlots,
    mask: ComponentMask,
    strategy: ViewStrategy,
    _query: PhantomData<fn() -> Q>,
}

impl<'w, Q: Query> View<'w, Q> {
    pub(crate) fn new(
        registry: &'w mut ComponentRegistry,
        groups: &'w GroupIndex,
        deferred: &'w mut Deferred,
        auto_register: bool,
        strategy: ViewStrategy,
    ) -> EcsResult<Self> {
        let slots = Q::resolve_slots(registry, auto_register)?;
        for (i, slot) in slots.iter().enumerate() {
            if slots[..i].contains(slot) {
                return Err(EcsError::DuplicateViewComponent(registry.name_of(*slot)));
            }
        }

        Ok(Self {
            mask: slots.iter().copied().collect(),
            registry,
            groups,
            deferred,
            slots,
            strategy,
            _query: PhantomData,
        })
    }

    /// Override the world's default strategy for this view.
    #[must_use]
    pub fn with_strategy(mut self, strategy: ViewStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// OR of the requested components' bits.
    #[must_use]
    pub fn mask(&self) -> ComponentMask {
        self.mask
    }

    /// The concrete strategy this view will run, with `Auto` decided.
    #[must_use]
    pub fn resolved_strategy(&self) -> ViewStrategy {
        match self.strategy {
            ViewStrategy::Auto => {
                let smallest = self.pools().map(|pool| pool.len()).min().unwrap_or(0);
                if self.groups.len() <= smallest {
                    ViewStrategy::Groups
                } else {
                    ViewStrategy::SmallestPool
                }
            }
            fixed => fixed,
        }
    }

    fn pools(&self) -> impl Iterator<Item = &dyn ErasedPool> + '_ {
        self.slots
            .iter()
            .filter_map(|&slot| self.registry.erased(slot))
    }

    fn scan_smallest_pool(&self) -> Vec<Entity> {
        let Some(smallest) = self.pools().min_by_key(|pool| pool.len()) else {
            return Vec::new();
        };
        smallest
            .entities()
            .iter()
            .copied()
            .filter(|&entity| self.pools().all(|pool| pool.contains(entity)))
            .collect()
    }

    /// Snapshot of every matching entity, without duplicates.
    ///
    /// Order depends on the strategy and on pool history.
    #[must_use]
    pub fn entities(&self) -> Vec<Entity> {
        let strategy = self.resolved_strategy();
        let matched = match strategy {
            ViewStrategy::SmallestPool => self.scan_smallest_pool(),
            ViewStrategy::Groups | ViewStrategy::Auto => self.groups.collect_matching(&self.mask),
        };
        trace!(
            query = type_name::<Q>(),
            ?strategy,
            matched = matched.len(),
            "view snapshot"
        );
        matched
    }

    /// Call `f` with the components of every matching entity.
    pub fn for_each<F>(self, mut f: F)
    where
        F: FnMut(Q::Item<'w>),
    {
        self.for_each_with_id(|_, item| f(item));
    }

    /// Call `f` with each matching entity and its components.
    pub fn for_each_with_id<F>(self, mut f: F)
    where
        F: FnMut(Entity, Q::Item<'w>),
    {
        self.for_each_deferred(|_, entity, item| f(entity, item));
    }

    /// Like [`View::for_each_with_id`], with a [`Deferred`] the callback can
    /// flag entities in for a later [`World::delete_flagged`](crate::World::delete_flagged).
    pub fn for_each_deferred<F>(self, mut f: F)
    where
        F: FnMut(&mut Deferred, Entity, Q::Item<'w>),
    {
        let entities = self.entities();
        let Self {
            registry,
            deferred,
            slots,
            ..
        } = self;

        // SAFETY: slots were resolved against this registry and checked distinct.
        let pools = unsafe { Q::pools(registry, &slots) };
        for entity in entities {
            // SAFETY: the snapshot holds each entity once and the registry stays
            // exclusively borrowed for 'w.
            if let Some(item) = unsafe { Q::fetch(pools, entity) } {
                f(&mut *deferred, entity, item);
            }
        }
    }

    /// Every matching entity paired with its components.
    #[must_use]
    pub fn packed(self) -> Vec<(Entity, Q::Item<'w>)> {
        let mut out = Vec::new();
        self.for_each_with_id(|entity, item| out.push((entity, item)));
        out
    }
}

impl<Q: Query> std::fmt::Debug for View<'_, Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("query", &type_name::<Q>())
            .field("mask", &self.mask)
            .field("strategy", &self.strategy)
            .finish()
    }
}
