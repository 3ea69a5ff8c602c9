//! Per-entity component presence bits.

use std::fmt;

use crate::{component::ComponentSlot, config::MAX_COMPONENTS};

const WORDS: usize = MAX_COMPONENTS / 64;

/// Fixed-width bit set with one bit per component slot.
///
/// Bit `s` is set exactly when the entity holds a value in the pool for slot `s`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ComponentMask([u64; WORDS]);

impl ComponentMask {
    pub const EMPTY: Self = Self([0; WORDS]);

    #[inline]
    const fn locate(slot: ComponentSlot) -> (usize, u64) {
        let index = slot.index();
        (index / 64, 1 << (index % 64))
    }

    #[inline]
    pub fn set(&mut self, slot: ComponentSlot) {
        let (word, bit) = Self::locate(slot);
        self.0[word] |= bit;
    }

    #[inline]
    pub fn clear(&mut self, slot: ComponentSlot) {
        let (word, bit) = Self::locate(slot);
        self.0[word] &= !bit;
    }

    /// Copy of this mask with `slot` set.
    #[must_use]
    pub fn with(mut self, slot: ComponentSlot) -> Self {
        self.set(slot);
        self
    }

    /// Copy of this mask with `slot` cleared.
    #[must_use]
    pub fn without(mut self, slot: ComponentSlot) -> Self {
        self.clear(slot);
        self
    }

    #[inline]
    #[must_use]
    pub const fn contains(&self, slot: ComponentSlot) -> bool {
        let (word, bit) = Self::locate(slot);
        self.0[word] & bit != 0
    }

    /// Whether every bit of `other` is also set here.
    #[inline]
    #[must_use]
    pub fn contains_all(&self, other: &Self) -> bool {
        self.0.iter().zip(&other.0).all(|(a, b)| a & b == *b)
    }

    /// Whether the two masks share any bit.
    #[inline]
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.0.iter().zip(&other.0).any(|(a, b)| a & b != 0)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&word| word == 0)
    }

    /// Number of set bits.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.0.iter().map(|word| word.count_ones()).sum()
    }

    /// Set slots in ascending order.
    pub fn iter_slots(&self) -> impl Iterator<Item = ComponentSlot> + '_ {
        self.0.iter().enumerate().flat_map(|(w, &word)| {
            (0..64u32)
                .filter(move |bit| word & (1 << bit) != 0)
                .map(move |bit| ComponentSlot::from_raw(w as u32 * 64 + bit))
        })
    }
}

impl FromIterator<ComponentSlot> for ComponentMask {
    fn from_iter<I: IntoIterator<Item = ComponentSlot>>(iter: I) -> Self {
        let mut mask = Self::EMPTY;
        for slot in iter {
            mask.set(slot);
        }
        mask
    }
}

/// Binary, most significant slot first, leading zeros trimmed.
impl fmt::Display for ComponentMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(top) = self.0.iter().rposition(|&word| word != 0) else {
            return f.write_str("0");
        };
        write!(f, "{:b}", self.0[top])?;
        for word in self.0[..top].iter().rev() {
            write!(f, "{word:064b}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ComponentMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentMask({self})")
    }
}
