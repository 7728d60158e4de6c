use core::fmt;
use core::num::NonZero;

// Unit tests use a narrow handle so that exhausting the handle space is cheap.
#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// A stable reference to one occupied slot of a [`Pool`](super::Pool).
///
/// Handles are global slot numbers: the block created `b`-th owns the range
/// `b * capacity .. (b + 1) * capacity`. A handle stays valid until its slot
/// is deallocated, after which the same handle may be handed out again.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Handle(NonZero<RawHandle>);

impl Handle {
    /// Number of distinct slots a pool can address.
    pub(crate) const SLOTS: usize = RawHandle::MAX as usize;

    #[inline]
    pub(crate) const fn new(slot: usize) -> Self {
        assert!(slot < Self::SLOTS, "`Handle::new()` - `slot` is outside the handle space!");
        // Stored off by one so that `Option<Handle>` needs no extra tag.
        #[allow(clippy::cast_possible_truncation)]
        match NonZero::new((slot + 1) as RawHandle) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        (self.0.get() - 1) as usize
    }

    /// Returns the position of this handle inside `base .. base + len`, if any.
    #[inline]
    pub(crate) const fn offset_in(self, base: usize, len: usize) -> Option<usize> {
        let slot = self.slot();
        if slot >= base && slot - base < len { Some(slot - base) } else { None }
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle(#{})", self.slot())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    // Every structural link is an `Option<Handle>`.
    assert_eq_size!(Handle, Option<Handle>);
    assert_eq_size!(Handle, RawHandle);

    #[test]
    #[should_panic(expected = "`Handle::new()` - `slot` is outside the handle space!")]
    fn slot_past_handle_space() {
        let _ = Handle::new(Handle::SLOTS);
    }

    #[test]
    fn offset_in_block_range() {
        let handle = Handle::new(37);
        assert_eq!(handle.offset_in(32, 16), Some(5));
        assert_eq!(handle.offset_in(0, 32), None);
        assert_eq!(handle.offset_in(38, 16), None);
        assert_eq!(handle.offset_in(37, 1), Some(0));
    }

    proptest! {
        #[test]
        fn slot_survives_encoding(slot in 0..Handle::SLOTS) {
            prop_assert_eq!(Handle::new(slot).slot(), slot);
        }
    }
}
