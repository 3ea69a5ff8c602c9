//! Paged sparse index - maps entity ids to dense positions.
//!
//! The id space is cut into fixed-size pages that are allocated the first
//! time an id inside them is written. Memory therefore grows with the
//! number of pages touched, not with the largest id seen. Pages are only
//! released by [`PagedIndex::clear`].

use crate::entity::EntityId;

/// Marker stored in a page slot that maps to nothing.
pub const TOMBSTONE: usize = usize::MAX;

/// A lazily paged `EntityId -> usize` map.
pub struct PagedIndex {
    /// `None` until an id in the page range is first written.
    pages: Vec<Option<Box<[usize]>>>,
    page_size: usize,
    shift: u32,
    mask: usize,
}

impl PagedIndex {
    /// Create an empty index.
    ///
    /// # Panics
    ///
    /// Panics if `page_size` is not a power of two. [`WorldConfig`](crate::WorldConfig)
    /// validates this before any index is built.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        assert!(
            page_size.is_power_of_two(),
            "page size must be a non-zero power of two, got {page_size}"
        );
        Self {
            pages: Vec::new(),
            page_size,
            shift: page_size.trailing_zeros(),
            mask: page_size - 1,
        }
    }

    #[inline]
    const fn page_of(&self, id: EntityId) -> usize {
        (id as usize) >> self.shift
    }

    #[inline]
    const fn local_of(&self, id: EntityId) -> usize {
        (id as usize) & self.mask
    }

    /// Record `index` for `id`, allocating the page if needed.
    pub fn set(&mut self, id: EntityId, index: usize) {
        let page = self.page_of(id);
        let local = self.local_of(id);

        if page >= self.pages.len() {
            self.pages.resize_with(page + 1, || None);
        }

        let page_size = self.page_size;
        let slots = self.pages[page]
            .get_or_insert_with(|| vec![TOMBSTONE; page_size].into_boxed_slice());
        slots[local] = index;
    }

    /// The recorded index for `id`, or `None`.
    #[inline]
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<usize> {
        let slots = self.pages.get(self.page_of(id))?.as_deref()?;
        match slots[self.local_of(id)] {
            TOMBSTONE => None,
            index => Some(index),
        }
    }

    /// Tombstone `id`. Never allocates.
    pub fn remove(&mut self, id: EntityId) {
        let page = self.page_of(id);
        let local = self.local_of(id);
        if let Some(Some(slots)) = self.pages.get_mut(page) {
            slots[local] = TOMBSTONE;
        }
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages currently backed by memory.
    #[must_use]
    pub fn allocated_pages(&self) -> usize {
        self.pages.iter().filter(|page| page.is_some()).count()
    }

    /// Drop every page.
    pub fn clear(&mut self) {
        self.pages.clear();
    }
}

impl std::fmt::Debug for PagedIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedIndex")
            .field("page_size", &self.page_size)
            .field("allocated_pages", &self.allocated_pages())
            .finish()
    }
}
