use core::cmp::Ordering;
use core::fmt;

use crate::pool::Handle;
use crate::raw::RawBinTree;

/// A position inside a [`BinTree`](super::BinTree): either one element or the end.
///
/// A cursor moves to the in-order successor or predecessor using only the
/// parent back-links of the tree, so it holds nothing but its current position.
///
/// Comparing two cursors compares the values they point at. A cursor at the end
/// has no value, so it is neither equal to nor ordered against any cursor,
/// including another end cursor: test for the end with [`is_end`](Self::is_end).
///
/// The borrow checker keeps a cursor from outliving a structural change to its
/// tree. A [`Hint`] taken from a cursor carries no such guarantee (see
/// [`BinTree::insert_with_hint`](super::BinTree::insert_with_hint)).
///
/// # Examples
///
/// ```
/// use pool_bintree::BinTree;
///
/// let tree = BinTree::from([5, 3, 8]);
/// let mut cursor = tree.begin();
/// assert_eq!(cursor.get(), Some(&3));
/// cursor.advance();
/// assert_eq!(cursor.get(), Some(&5));
/// cursor.advance_by(2);
/// assert!(cursor.is_end());
/// cursor.retreat();
/// assert_eq!(cursor.get(), Some(&8));
/// ```
pub struct Cursor<'a, T> {
    tree: &'a RawBinTree<T>,
    current: Option<Handle>,
}

/// A remembered insertion point, taken from a [`Cursor`].
///
/// See [`BinTree::insert_with_hint`](super::BinTree::insert_with_hint).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Hint(pub(crate) Handle);

impl<'a, T> Cursor<'a, T> {
    pub(crate) const fn new(tree: &'a RawBinTree<T>, current: Option<Handle>) -> Self {
        Self {
            tree,
            current,
        }
    }

    /// Returns the value under the cursor, or `None` at the end.
    #[must_use]
    pub fn get(&self) -> Option<&'a T> {
        let tree = self.tree;
        self.current.map(|handle| tree.node(handle).value())
    }

    /// Returns true if the cursor is past the last element.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Moves to the in-order successor. Moving past the largest element reaches
    /// the end; advancing from the end stays there.
    ///
    /// # Complexity
    ///
    /// O(depth) worst case, amortized O(1) across a full traversal.
    pub fn advance(&mut self) {
        if let Some(handle) = self.current {
            self.current = self.tree.next(handle);
        }
    }

    /// Moves to the in-order predecessor. Retreating from the end reaches the
    /// largest element; retreating from the smallest element reaches the end.
    ///
    /// # Complexity
    ///
    /// O(depth) worst case, amortized O(1) across a full traversal.
    pub fn retreat(&mut self) {
        self.current = match self.current {
            Some(handle) => self.tree.prev(handle),
            None => self.tree.last(),
        };
    }

    /// Advances `n` times.
    pub fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    /// Retreats `n` times.
    pub fn retreat_by(&mut self, n: usize) {
        for _ in 0..n {
            self.retreat();
        }
    }

    /// Returns a hint for inserting near the current element, or `None` at the end.
    #[must_use]
    pub fn hint(&self) -> Option<Hint> {
        self.current.map(Hint)
    }
}

// Derived impls would require `T: Clone`.
#[allow(clippy::expl_impl_clone_on_copy)]
impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T: PartialEq> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        match (self.get(), other.get()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl<T: PartialOrd> PartialOrd for Cursor<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.get(), other.get()) {
            (Some(a), Some(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}
