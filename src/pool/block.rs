use alloc::boxed::Box;
use alloc::vec::Vec;
use core::mem::MaybeUninit;

use fixedbitset::FixedBitSet;

use super::handle::Handle;
use crate::error::{Error, Result};

/// A fixed number of value slots plus a bitmap of which ones are vacant.
///
/// A set bit in `vacant` means the slot holds no value. `has_vacant` caches
/// whether any bit is set so the pool can skip full blocks without a scan.
pub(crate) struct Block<T> {
    base: usize,
    slots: Box<[MaybeUninit<T>]>,
    vacant: FixedBitSet,
    has_vacant: bool,
}

impl<T> Block<T> {
    /// Creates an empty block owning the handles `base .. base + capacity`.
    pub(crate) fn try_new(base: usize, capacity: usize) -> Result<Self> {
        debug_assert!(capacity > 0, "`Block::try_new()` - `capacity` must be non-zero!");

        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity).map_err(|_| Error::OutOfMemory)?;
        slots.resize_with(capacity, MaybeUninit::uninit);

        let mut vacant = FixedBitSet::with_capacity(capacity);
        vacant.insert_range(..);

        Ok(Self {
            base,
            slots: slots.into_boxed_slice(),
            vacant,
            has_vacant: true,
        })
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn has_vacant(&self) -> bool {
        self.has_vacant
    }

    /// Returns the slot offset of `handle` if it falls inside this block's range.
    pub(crate) fn offset_of(&self, handle: Handle) -> Option<usize> {
        handle.offset_in(self.base, self.capacity())
    }

    /// Stores `value` in the lowest vacant slot.
    ///
    /// # Panics
    ///
    /// Panics if the block is full; callers check [`has_vacant`](Self::has_vacant) first.
    pub(crate) fn claim(&mut self, value: T) -> Handle {
        let Some(offset) = self.vacant.ones().next() else {
            panic!("`Block::claim()` - block has no vacant slot!");
        };
        self.slots[offset].write(value);
        self.vacant.set(offset, false);
        self.has_vacant = !self.vacant.is_clear();
        Handle::new(self.base + offset)
    }

    /// Moves the value out of the slot at `offset`, or returns `None` if it is vacant.
    pub(crate) fn vacate(&mut self, offset: usize) -> Option<T> {
        if self.vacant.contains(offset) {
            return None;
        }
        self.vacant.insert(offset);
        self.has_vacant = true;
        // SAFETY: the bit was clear, so the slot was initialized by `claim()`, and the bit
        // is now set so the value is never read or dropped through the slot again.
        Some(unsafe { self.slots[offset].assume_init_read() })
    }

    pub(crate) fn get(&self, offset: usize) -> Option<&T> {
        if self.vacant.contains(offset) {
            return None;
        }
        // SAFETY: a clear bit means the slot is initialized.
        Some(unsafe { self.slots[offset].assume_init_ref() })
    }

    pub(crate) fn get_mut(&mut self, offset: usize) -> Option<&mut T> {
        if self.vacant.contains(offset) {
            return None;
        }
        // SAFETY: a clear bit means the slot is initialized.
        Some(unsafe { self.slots[offset].assume_init_mut() })
    }
}

impl<T> Drop for Block<T> {
    fn drop(&mut self) {
        if core::mem::needs_drop::<T>() {
            for offset in self.vacant.zeroes() {
                // SAFETY: every clear bit marks an initialized slot, and the block is going away.
                unsafe { self.slots[offset].assume_init_drop() };
            }
        }
    }
}
