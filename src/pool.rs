//! A growable pool of fixed-capacity blocks handing out single-object slots.
//!
//! The pool never returns block memory to the system: a vacated slot is reused by
//! the next allocation, and blocks live as long as the pool does.

use alloc::vec::Vec;
use core::fmt;

use log::{debug, trace, warn};

use crate::error::{Error, Result};

mod block;
mod handle;

use block::Block;
pub use handle::Handle;

#[cfg(test)]
const DEFAULT_BLOCK_CAPACITY: usize = 16;
#[cfg(not(test))]
const DEFAULT_BLOCK_CAPACITY: usize = 1024;

/// Sizing parameters for a [`Pool`].
///
/// # Examples
///
/// ```
/// use pool_bintree::PoolConfig;
///
/// let config = PoolConfig::new().block_capacity(64).max_blocks(4);
/// assert_eq!(config.capacity_limit(), Some(256));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    block_capacity: usize,
    max_blocks: Option<usize>,
}

impl PoolConfig {
    /// The default configuration: 1024 slots per block and no block limit.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            block_capacity: DEFAULT_BLOCK_CAPACITY,
            max_blocks: None,
        }
    }

    /// Sets the number of slots in every block.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub const fn block_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "`PoolConfig::block_capacity()` - `capacity` must be non-zero!");
        self.block_capacity = capacity;
        self
    }

    /// Caps the number of blocks the pool may create. Allocations that would need
    /// another block fail with [`Error::OutOfMemory`].
    #[must_use]
    pub const fn max_blocks(mut self, max_blocks: usize) -> Self {
        self.max_blocks = Some(max_blocks);
        self
    }

    /// Returns the number of slots in every block.
    #[must_use]
    pub const fn slots_per_block(&self) -> usize {
        self.block_capacity
    }

    /// Returns the block limit, if any.
    #[must_use]
    pub const fn block_limit(&self) -> Option<usize> {
        self.max_blocks
    }

    /// Returns the most slots a pool with this configuration can ever hold.
    #[must_use]
    pub const fn capacity_limit(&self) -> Option<usize> {
        match self.max_blocks {
            Some(blocks) => blocks.checked_mul(self.block_capacity),
            None => None,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A single-object allocator built from fixed-capacity blocks.
///
/// Allocation claims the lowest vacant slot of the first block that has one,
/// creating a new block when every existing block is full. Deallocation finds
/// the block whose handle range contains the handle and marks the slot vacant.
///
/// # Examples
///
/// ```
/// use pool_bintree::{Pool, PoolConfig};
///
/// let mut pool = Pool::with_config(PoolConfig::new().block_capacity(2));
/// let a = pool.allocate("a")?;
/// let b = pool.allocate("b")?;
/// let c = pool.allocate("c")?;
/// assert_eq!(pool.block_count(), 2);
///
/// assert_eq!(pool.deallocate(b)?, "b");
/// let d = pool.allocate("d")?;
/// assert_eq!(d, b);
/// assert_eq!(pool.block_count(), 2);
/// assert_eq!(pool.get(a), Some(&"a"));
/// assert_eq!(pool.get(c), Some(&"c"));
/// # Ok::<(), pool_bintree::Error>(())
/// ```
pub struct Pool<T> {
    blocks: Vec<Block<T>>,
    config: PoolConfig,
    len: usize,
}

impl<T> Pool<T> {
    /// Creates an empty pool with the default configuration.
    ///
    /// Does not allocate anything on its own.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_config(PoolConfig::new())
    }

    /// Creates an empty pool with the given configuration.
    ///
    /// Does not allocate anything on its own.
    #[must_use]
    pub const fn with_config(config: PoolConfig) -> Self {
        Self {
            blocks: Vec::new(),
            config,
            len: 0,
        }
    }

    /// Returns the configuration this pool was created with.
    #[must_use]
    pub const fn config(&self) -> PoolConfig {
        self.config
    }

    /// Returns the number of occupied slots.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no slot is occupied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of blocks created so far.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the total number of slots across all blocks.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.blocks.len() * self.config.block_capacity
    }

    /// Stores `value` in a vacant slot and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if every block is full and no new block can be created.
    ///
    /// # Complexity
    ///
    /// O(blocks + capacity) worst case; a linear scan finds the first vacant slot.
    pub fn allocate(&mut self, value: T) -> Result<Handle> {
        let index = match self.blocks.iter().position(Block::has_vacant) {
            Some(index) => index,
            None => self.grow()?,
        };

        self.len += 1;
        Ok(self.blocks[index].claim(value))
    }

    /// Batch form of [`allocate`](Self::allocate). Only `count == 1` is supported.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedBatchSize`] for any other `count`, otherwise as
    /// [`allocate`](Self::allocate).
    pub fn allocate_n(&mut self, count: usize, value: T) -> Result<Handle> {
        if count != 1 {
            return Err(Error::UnsupportedBatchSize(count));
        }
        self.allocate(value)
    }

    /// Vacates the slot behind `handle` and returns the value it held.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFree`] if no block owns `handle` or its slot is already vacant.
    ///
    /// # Complexity
    ///
    /// O(blocks) to find the owning block.
    pub fn deallocate(&mut self, handle: Handle) -> Result<T> {
        let value = self
            .blocks
            .iter_mut()
            .find_map(|block| block.offset_of(handle).map(|offset| (block, offset)))
            .and_then(|(block, offset)| block.vacate(offset));

        if let Some(value) = value {
            trace!("pool: released {handle:?}");
            self.len -= 1;
            Ok(value)
        } else {
            warn!("pool: rejected release of {handle:?}, not a live slot");
            Err(Error::InvalidFree(handle))
        }
    }

    /// Batch form of [`deallocate`](Self::deallocate). Only `count == 1` is supported.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedBatchSize`] for any other `count`, otherwise as
    /// [`deallocate`](Self::deallocate).
    pub fn deallocate_n(&mut self, handle: Handle, count: usize) -> Result<T> {
        if count != 1 {
            return Err(Error::UnsupportedBatchSize(count));
        }
        self.deallocate(handle)
    }

    /// Returns the value behind `handle`, or `None` if the slot is vacant or foreign.
    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<&T> {
        let block = self.blocks.get(handle.slot() / self.config.block_capacity)?;
        block.get(block.offset_of(handle)?)
    }

    /// Returns the value behind `handle` mutably, or `None` if the slot is vacant or foreign.
    #[must_use]
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        let block = self.blocks.get_mut(handle.slot() / self.config.block_capacity)?;
        let offset = block.offset_of(handle)?;
        block.get_mut(offset)
    }

    /// Appends an empty block and returns its index.
    fn grow(&mut self) -> Result<usize> {
        let index = self.blocks.len();
        if self.config.max_blocks.is_some_and(|max| index >= max) {
            debug!("pool: block limit of {index} reached");
            return Err(Error::OutOfMemory);
        }

        let capacity = self.config.block_capacity;
        let base = index * capacity;
        if base.checked_add(capacity).is_none_or(|end| end > Handle::SLOTS) {
            debug!("pool: handle space exhausted at block {index}");
            return Err(Error::OutOfMemory);
        }

        self.blocks.try_reserve(1).map_err(|_| Error::OutOfMemory)?;
        self.blocks.push(Block::try_new(base, capacity)?);
        debug!("pool: created block {index} with {capacity} slots");
        Ok(index)
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("len", &self.len)
            .field("blocks", &self.blocks.len())
            .field("config", &self.config)
            .finish()
    }
}
