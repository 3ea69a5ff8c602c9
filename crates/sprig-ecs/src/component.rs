//! Component type registration and pool ownership.
//!
//! Each component type gets a small, stable slot the first time it is
//! registered with a world. The slot is both the type's bit in every
//! [`ComponentMask`](crate::ComponentMask) and the index of its pool.
//! Slots are per registry, so two worlds never share assignments.

use std::{
    any::{TypeId, type_name},
    fmt,
    ptr::NonNull,
};

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{
    config::MAX_COMPONENTS,
    error::{EcsError, EcsResult},
    sparse_set::{ErasedPool, SparseSet},
};

/// Marker trait for types that can be used as components.
pub trait Component: Send + Sync + 'static {}

// Blanket implementation for all suitable types
impl<T: Send + Sync + 'static> Component for T {}

/// Bit position and pool index of a registered component type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentSlot(u32);

impl ComponentSlot {
    #[must_use]
    pub const fn from_raw(slot: u32) -> Self {
        Self(slot)
    }

    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ComponentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentSlot({})", self.0)
    }
}

/// Runtime information about a registered component type.
#[derive(Clone, Debug)]
pub struct ComponentInfo {
    slot: ComponentSlot,
    name: &'static str,
    type_id: TypeId,
}

impl ComponentInfo {
    fn of<T: Component>(slot: ComponentSlot) -> Self {
        Self {
            slot,
            name: type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }

    #[must_use]
    pub const fn slot(&self) -> ComponentSlot {
        self.slot
    }

    /// Type name for diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Check if this info is for the given type.
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

/// Maps Rust types to slots and owns one pool per slot.
///
/// `pools[s]` is always a `SparseSet<T>` for the `T` that was assigned
/// slot `s`. Typed access relies on this and skips the type check outside
/// debug builds.
pub struct ComponentRegistry {
    type_to_slot: FxHashMap<TypeId, ComponentSlot>,
    infos: Vec<ComponentInfo>,
    pools: Vec<Box<dyn ErasedPool>>,
    page_size: usize,
}

impl ComponentRegistry {
    /// Create an empty registry whose pools use `page_size` sparse pages.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            type_to_slot: FxHashMap::default(),
            infos: Vec::new(),
            pools: Vec::new(),
            page_size,
        }
    }

    /// Assign a fresh slot and pool to `T`.
    ///
    /// Fails if `T` already has a slot or every slot is taken.
    pub fn register<T: Component>(&mut self) -> EcsResult<ComponentSlot> {
        let name = type_name::<T>();
        if self.type_to_slot.contains_key(&TypeId::of::<T>()) {
            return Err(EcsError::AlreadyRegistered { name });
        }
        if self.pools.len() >= MAX_COMPONENTS {
            return Err(EcsError::ComponentLimit {
                name,
                max: MAX_COMPONENTS,
            });
        }

        let slot = ComponentSlot(self.pools.len() as u32);
        self.type_to_slot.insert(TypeId::of::<T>(), slot);
        self.infos.push(ComponentInfo::of::<T>(slot));
        self.pools
            .push(Box::new(SparseSet::<T>::new(self.page_size)));

        debug!(component = name, slot = slot.0, "registered component");
        Ok(slot)
    }

    /// The slot for `T`, registering it first if needed.
    pub fn get_or_register<T: Component>(&mut self) -> EcsResult<ComponentSlot> {
        match self.slot_of::<T>() {
            Some(slot) => Ok(slot),
            None => self.register::<T>(),
        }
    }

    /// The slot for `T`, registering on first use only when `auto_register` is set.
    pub fn resolve<T: Component>(&mut self, auto_register: bool) -> EcsResult<ComponentSlot> {
        if auto_register {
            self.get_or_register::<T>()
        } else {
            self.slot_of::<T>()
                .ok_or(EcsError::Unregistered(type_name::<T>()))
        }
    }

    #[must_use]
    pub fn slot_of<T: Component>(&self) -> Option<ComponentSlot> {
        self.type_to_slot.get(&TypeId::of::<T>()).copied()
    }

    #[must_use]
    pub fn info(&self, slot: ComponentSlot) -> Option<&ComponentInfo> {
        self.infos.get(slot.index())
    }

    /// Type name registered at `slot`, or `"?"`.
    #[must_use]
    pub fn name_of(&self, slot: ComponentSlot) -> &'static str {
        self.info(slot).map_or("?", ComponentInfo::name)
    }

    /// The pool for `T`, if registered.
    #[must_use]
    pub fn pool<T: Component>(&self) -> Option<&SparseSet<T>> {
        let slot = self.slot_of::<T>()?;
        // SAFETY: the slot was looked up by T's TypeId.
        Some(unsafe { self.pool_at::<T>(slot) })
    }

    /// The mutable pool for `T`, if registered.
    pub fn pool_mut<T: Component>(&mut self) -> Option<&mut SparseSet<T>> {
        let slot = self.slot_of::<T>()?;
        // SAFETY: the slot was looked up by T's TypeId.
        Some(unsafe { self.pool_at_mut::<T>(slot) })
    }

    /// Resolve `T` and return its slot together with its pool.
    pub fn resolve_pool_mut<T: Component>(
        &mut self,
        auto_register: bool,
    ) -> EcsResult<(ComponentSlot, &mut SparseSet<T>)> {
        let slot = self.resolve::<T>(auto_register)?;
        // SAFETY: the slot was resolved for T.
        Ok((slot, unsafe { self.pool_at_mut::<T>(slot) }))
    }

    /// # Safety
    ///
    /// `slot` must have been assigned to `T` by this registry.
    pub(crate) unsafe fn pool_at<T: Component>(&self, slot: ComponentSlot) -> &SparseSet<T> {
        let pool: &dyn ErasedPool = &*self.pools[slot.index()];
        debug_assert!(
            pool.as_any().is::<SparseSet<T>>(),
            "slot {} is not a pool of `{}`",
            slot.0,
            type_name::<T>()
        );
        // SAFETY: the caller guarantees the concrete type behind the slot.
        unsafe { &*std::ptr::from_ref(pool).cast::<SparseSet<T>>() }
    }

    /// # Safety
    ///
    /// `slot` must have been assigned to `T` by this registry.
    pub(crate) unsafe fn pool_at_mut<T: Component>(
        &mut self,
        slot: ComponentSlot,
    ) -> &mut SparseSet<T> {
        // SAFETY: forwarded to the caller.
        unsafe { self.pool_ptr::<T>(slot).as_mut() }
    }

    /// Raw pointer to the pool at `slot`, for handing out references into
    /// several pools at once.
    ///
    /// # Safety
    ///
    /// `slot` must have been assigned to `T` by this registry.
    pub(crate) unsafe fn pool_ptr<T: Component>(
        &mut self,
        slot: ComponentSlot,
    ) -> NonNull<SparseSet<T>> {
        let pool: &mut dyn ErasedPool = &mut *self.pools[slot.index()];
        debug_assert!(
            pool.as_any().is::<SparseSet<T>>(),
            "slot {} is not a pool of `{}`",
            slot.0,
            type_name::<T>()
        );
        NonNull::from(pool).cast::<SparseSet<T>>()
    }

    /// Type-erased pool at `slot`.
    #[must_use]
    pub fn erased(&self, slot: ComponentSlot) -> Option<&dyn ErasedPool> {
        self.pools.get(slot.index()).map(|pool| &**pool)
    }

    pub(crate) fn erased_mut(&mut self, slot: ComponentSlot) -> Option<&mut dyn ErasedPool> {
        match self.pools.get_mut(slot.index()) {
            Some(pool) => Some(&mut **pool),
            None => None,
        }
    }

    /// Empty every pool. Slot assignments are kept.
    pub fn clear_pools(&mut self) {
        for pool in &mut self.pools {
            pool.clear();
        }
    }

    /// Get the number of registered components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Iterate over all registered component infos.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentInfo> {
        self.infos.iter()
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("count", &self.len())
            .field("components", &self.infos)
            .finish()
    }
}
