use core::fmt;
use core::iter::FusedIterator;

use crate::error::{Error, Result};
use crate::pool::{Handle, Pool, PoolConfig};
use crate::raw::{Node, RawBinTree, Side, Visit};

mod cursor;

pub use cursor::{Cursor, Hint};

/// An ordered multiset stored as an unbalanced [binary search tree].
///
/// Nodes are allocated from a per-tree [`Pool`] rather than one by one from the
/// global allocator. Each node keeps a back-link to its parent, which lets
/// [`Cursor`]s step to neighbours and the traversal methods walk the whole tree
/// without an auxiliary stack.
///
/// Values smaller than a node go to its left, and values greater than *or equal
/// to* it go to its right, so duplicates are kept. The tree is never rebalanced:
/// inserting already-sorted input degenerates it into a list, and operations
/// cost O(depth), which is O(n) in that case.
///
/// It is a logic error for a value to be modified in such a way that its
/// ordering relative to any other value changes while it is in the tree.
///
/// [binary search tree]: https://en.wikipedia.org/wiki/Binary_search_tree
///
/// # Examples
///
/// ```
/// use pool_bintree::BinTree;
///
/// let mut tree = BinTree::new();
/// for value in [5, 3, 8, 1, 4, 7, 9] {
///     tree.insert(value)?;
/// }
///
/// assert!(tree.contains(&4));
/// assert_eq!(tree.min_value(), Ok(&1));
/// assert_eq!(tree.depth(), 3);
///
/// let mut pre = Vec::new();
/// tree.pre_order(|v| pre.push(*v));
/// assert_eq!(pre, [5, 3, 1, 4, 8, 7, 9]);
///
/// tree.remove(&5);
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 3, 4, 7, 8, 9]);
/// # Ok::<(), pool_bintree::Error>(())
/// ```
pub struct BinTree<T> {
    raw: RawBinTree<T>,
}

/// An iterator over the values of a [`BinTree`] in ascending order.
///
/// This `struct` is created by the [`iter`] method on [`BinTree`].
///
/// # Examples
///
/// ```
/// use pool_bintree::BinTree;
///
/// let tree = BinTree::from([3, 1, 2]);
/// let mut iter = tree.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.next(), Some(&2));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: BinTree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    tree: &'a RawBinTree<T>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<T> BinTree<T> {
    /// Makes a new, empty `BinTree` backed by a pool with the default configuration.
    ///
    /// Does not allocate anything on its own.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_pool(Pool::new())
    }

    /// Makes a new, empty `BinTree` whose pool uses `config`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pool_bintree::{BinTree, Error, PoolConfig};
    ///
    /// let mut tree = BinTree::with_config(PoolConfig::new().block_capacity(2).max_blocks(1));
    /// tree.insert(1)?;
    /// tree.insert(2)?;
    /// assert_eq!(tree.insert(3), Err(Error::OutOfMemory));
    /// assert_eq!(tree.len(), 2);
    /// # Ok::<(), pool_bintree::Error>(())
    /// ```
    #[must_use]
    pub const fn with_config(config: PoolConfig) -> Self {
        Self::with_pool(Pool::with_config(config))
    }

    /// Makes a new, empty `BinTree` that allocates its nodes from `pool`.
    ///
    /// Combined with [`into_pool`](Self::into_pool) this lets a pool that has
    /// already grown be handed from one tree to the next.
    #[must_use]
    pub const fn with_pool(pool: Pool<Node<T>>) -> Self {
        Self {
            raw: RawBinTree::with_pool(pool),
        }
    }

    /// Returns the pool the nodes are allocated from.
    #[must_use]
    pub const fn pool(&self) -> &Pool<Node<T>> {
        self.raw.pool()
    }

    /// Releases every node and returns the pool, keeping the blocks it has created.
    ///
    /// # Examples
    ///
    /// ```
    /// use pool_bintree::{BinTree, PoolConfig};
    ///
    /// let mut tree = BinTree::with_config(PoolConfig::new().block_capacity(8));
    /// tree.extend(0..20);
    /// let pool = tree.into_pool();
    /// assert!(pool.is_empty());
    /// assert_eq!(pool.block_count(), 3);
    ///
    /// let tree: BinTree<i32> = BinTree::with_pool(pool);
    /// assert!(tree.is_empty());
    /// ```
    #[must_use]
    pub fn into_pool(self) -> Pool<Node<T>> {
        self.raw.into_pool()
    }

    /// Returns the number of values in the tree.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.raw.count()
    }

    /// Returns the number of values in the tree, as a `usize`.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.pool().len()
    }

    /// Returns true if the tree contains no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of nodes on the longest path from the root to a leaf.
    ///
    /// An empty tree has depth 0 and a tree holding one value has depth 1.
    ///
    /// # Complexity
    ///
    /// O(n) time, O(1) extra space.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.raw.depth()
    }

    /// Removes every value, releasing each node back to the pool.
    ///
    /// The pool keeps its blocks for later insertions.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns a cursor at the smallest value, or at the end if the tree is empty.
    #[must_use]
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(&self.raw, self.raw.first())
    }

    /// Returns a cursor at the end. Retreating it reaches the largest value.
    #[must_use]
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::new(&self.raw, None)
    }

    /// Gets an iterator over the values in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            tree: &self.raw,
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.len(),
        }
    }

    /// Calls `visit` on every value, each node before its subtrees, left subtree first.
    ///
    /// # Complexity
    ///
    /// O(n) time, O(1) extra space.
    pub fn pre_order(&self, mut visit: impl FnMut(&T)) {
        self.raw.walk(Side::Left, |value, at, _| {
            if at == Visit::Pre {
                visit(value);
            }
        });
    }

    /// Calls `visit` on every value in ascending order.
    ///
    /// # Complexity
    ///
    /// O(n) time, O(1) extra space.
    pub fn in_order(&self, mut visit: impl FnMut(&T)) {
        self.raw.walk(Side::Left, |value, at, _| {
            if at == Visit::In {
                visit(value);
            }
        });
    }

    /// Calls `visit` on every value, each node after its subtrees, left subtree first.
    ///
    /// # Complexity
    ///
    /// O(n) time, O(1) extra space.
    pub fn post_order(&self, mut visit: impl FnMut(&T)) {
        self.raw.walk(Side::Left, |value, at, _| {
            if at == Visit::Post {
                visit(value);
            }
        });
    }

    /// Calls `visit` on every value in descending order.
    ///
    /// # Complexity
    ///
    /// O(n) time, O(1) extra space.
    pub fn reverse_in_order(&self, mut visit: impl FnMut(&T)) {
        self.raw.walk(Side::Right, |value, at, _| {
            if at == Visit::In {
                visit(value);
            }
        });
    }
}

impl<T: Ord> BinTree<T> {
    /// Adds a value to the tree and returns a reference to the stored value.
    ///
    /// Equal values are kept; a new value equal to an existing one is placed in
    /// that node's right subtree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if the pool cannot provide a node. The tree
    /// is left unchanged.
    ///
    /// # Complexity
    ///
    /// O(depth)
    pub fn insert(&mut self, value: T) -> Result<&T> {
        let handle = self.raw.insert(value)?;
        Ok(self.raw.node(handle).value())
    }

    /// Adds a value, starting the search for its place at `hint` instead of at the root.
    ///
    /// The hint is checked against the two nearest ancestors that bound its
    /// subtree, which costs at most two comparisons. If the subtree cannot hold
    /// `value`, the search starts from the root instead, so a poor hint never
    /// breaks the ordering. A hint whose node has been removed is ignored. A hint
    /// taken before other removals may point at a different node than it used to;
    /// it is still only a starting point.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if the pool cannot provide a node.
    ///
    /// # Examples
    ///
    /// ```
    /// use pool_bintree::BinTree;
    ///
    /// let mut tree = BinTree::from([50, 25, 75]);
    /// let hint = tree.find(&75).hint().unwrap();
    /// tree.insert_with_hint(hint, 80)?;
    /// tree.insert_with_hint(hint, 10)?;
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [10, 25, 50, 75, 80]);
    /// # Ok::<(), pool_bintree::Error>(())
    /// ```
    pub fn insert_with_hint(&mut self, hint: Hint, value: T) -> Result<&T> {
        let handle = self.raw.insert_hinted(hint.0, value)?;
        Ok(self.raw.node(handle).value())
    }

    /// Removes one value equal to `value` and returns it.
    ///
    /// Returns `None`, leaving the tree untouched, if no value is equal.
    ///
    /// # Complexity
    ///
    /// O(depth)
    ///
    /// # Examples
    ///
    /// ```
    /// use pool_bintree::BinTree;
    ///
    /// let mut tree = BinTree::from([2, 1, 2]);
    /// assert_eq!(tree.remove(&2), Some(2));
    /// assert_eq!(tree.remove(&3), None);
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn remove(&mut self, value: &T) -> Option<T> {
        self.raw.remove(value)
    }

    /// Returns true if the tree holds a value equal to `value`.
    ///
    /// # Complexity
    ///
    /// O(depth)
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.raw.search(value).is_some()
    }

    /// Returns a cursor at a value equal to `value`, or at the end if there is none.
    ///
    /// With duplicates, the cursor lands on the equal value closest to the root,
    /// which need not be the first of them in ascending order.
    #[must_use]
    pub fn find(&self, value: &T) -> Cursor<'_, T> {
        Cursor::new(&self.raw, self.raw.search(value))
    }

    /// Returns the smallest value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTree`] if the tree is empty.
    pub fn min_value(&self) -> Result<&T> {
        let handle = self.raw.first().ok_or(Error::EmptyTree)?;
        Ok(self.raw.node(handle).value())
    }

    /// Returns the largest value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTree`] if the tree is empty.
    pub fn max_value(&self) -> Result<&T> {
        let handle = self.raw.last().ok_or(Error::EmptyTree)?;
        Ok(self.raw.node(handle).value())
    }

    /// Inserts every value of `iter`, stopping at the first allocation failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if the pool cannot provide a node; values
    /// inserted before the failure stay in the tree.
    pub fn try_extend<I: IntoIterator<Item = T>>(&mut self, iter: I) -> Result<()> {
        for value in iter {
            self.raw.insert(value)?;
        }
        Ok(())
    }

    fn insert_or_panic(&mut self, value: T) {
        if let Err(err) = self.raw.insert(value) {
            panic!("`BinTree` - insertion failed: {err}");
        }
    }
}

impl<T> Default for BinTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Ord> Clone for BinTree<T> {
    /// Rebuilds the tree with the same shape by re-inserting in pre-order.
    ///
    /// # Panics
    ///
    /// Panics if the new pool cannot allocate the nodes.
    fn clone(&self) -> Self {
        let mut tree = Self::with_config(self.pool().config());
        self.pre_order(|value| tree.insert_or_panic(value.clone()));
        tree
    }
}

impl<T: fmt::Debug> fmt::Debug for BinTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Ord> Extend<T> for BinTree<T> {
    /// # Panics
    ///
    /// Panics if the pool cannot allocate a node; use [`BinTree::try_extend`] to
    /// handle that case.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert_or_panic(value);
        }
    }
}

impl<'a, T: Ord + Copy + 'a> Extend<&'a T> for BinTree<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T: Ord> FromIterator<T> for BinTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for BinTree<T> {
    /// Inserts the values in array order, so the first element becomes the root.
    ///
    /// ```
    /// use pool_bintree::BinTree;
    ///
    /// let tree = BinTree::from([2, 1, 3]);
    /// assert_eq!(tree.depth(), 2);
    /// ```
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a BinTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front?;
        self.remaining -= 1;
        self.front = self.tree.next(handle);
        Some(self.tree.node(handle).value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back?;
        self.remaining -= 1;
        self.back = self.tree.prev(handle);
        Some(self.tree.node(handle).value())
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
