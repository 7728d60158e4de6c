use core::cmp::Ordering;
use core::mem;

use log::trace;

use super::node::{Node, Side};
use crate::error::Result;
use crate::pool::{Handle, Pool};

/// The point at which a walk reports a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Visit {
    /// Arrived from the parent, before either subtree.
    Pre,
    /// Between the leading and the trailing subtree.
    In,
    /// After both subtrees, about to climb back to the parent.
    Post,
}

/// The unbalanced binary search tree backing `BinTree`.
///
/// Every node lives in `pool`. The tree owns `root`, each node owns its children,
/// and the parent back-links are maintained by every structural change so that
/// stepping and walking never need an explicit stack.
pub(crate) struct RawBinTree<T> {
    /// Storage for all nodes.
    pool: Pool<Node<T>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Number of nodes reachable from `root`.
    count: u64,
}

impl<T> RawBinTree<T> {
    pub(crate) const fn with_pool(pool: Pool<Node<T>>) -> Self {
        Self {
            pool,
            root: None,
            count: 0,
        }
    }

    pub(crate) const fn pool(&self) -> &Pool<Node<T>> {
        &self.pool
    }

    /// Releases every node and hands back the pool with its blocks intact.
    pub(crate) fn into_pool(mut self) -> Pool<Node<T>> {
        self.clear();
        let config = self.pool.config();
        mem::replace(&mut self.pool, Pool::with_config(config))
    }

    pub(crate) const fn count(&self) -> u64 {
        self.count
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    #[cfg(test)]
    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<T> {
        self.pool.get(handle).expect("`RawBinTree::node()` - `handle` is invalid!")
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<T> {
        self.pool.get_mut(handle).expect("`RawBinTree::node_mut()` - `handle` is invalid!")
    }

    /// Returns true if `handle` refers to a live node of this tree.
    pub(crate) fn is_live(&self, handle: Handle) -> bool {
        self.pool.get(handle).is_some()
    }

    /// Follows `side` links from `from` until there are none left.
    pub(crate) fn extreme(&self, from: Handle, side: Side) -> Handle {
        let mut current = from;
        while let Some(child) = self.node(current).child(side) {
            current = child;
        }
        current
    }

    /// The node holding the smallest value.
    pub(crate) fn first(&self) -> Option<Handle> {
        Some(self.extreme(self.root?, Side::Left))
    }

    /// The node holding the largest value.
    pub(crate) fn last(&self) -> Option<Handle> {
        Some(self.extreme(self.root?, Side::Right))
    }

    /// Returns the in-order neighbour of `from` in the direction `toward`:
    /// `Side::Right` gives the successor, `Side::Left` the predecessor.
    ///
    /// # Complexity
    ///
    /// O(depth) for one step, amortized O(1) over a full traversal.
    pub(crate) fn step(&self, from: Handle, toward: Side) -> Option<Handle> {
        if let Some(child) = self.node(from).child(toward) {
            return Some(self.extreme(child, toward.opposite()));
        }

        // Climb until we leave a subtree that lies on the far side of its parent.
        let mut child = from;
        while let Some(parent) = self.node(child).parent() {
            let side = self.node(parent).side_of(child);
            debug_assert!(side.is_some(), "`RawBinTree::step()` - broken parent back-link!");
            if side == Some(toward.opposite()) {
                return Some(parent);
            }
            child = parent;
        }
        None
    }

    pub(crate) fn next(&self, from: Handle) -> Option<Handle> {
        self.step(from, Side::Right)
    }

    pub(crate) fn prev(&self, from: Handle) -> Option<Handle> {
        self.step(from, Side::Left)
    }

    /// Walks the whole tree once, descending into the `lead` subtree before the
    /// other one, and reports every node three times (see [`Visit`]) together with
    /// its level (the root is level 1).
    ///
    /// Only the current node and the node just departed from are tracked: if the
    /// departed node is one of our children we are climbing back up, otherwise we
    /// arrived from the parent.
    pub(crate) fn walk<'a>(&'a self, lead: Side, mut visit: impl FnMut(&'a T, Visit, usize)) {
        let Some(mut current) = self.root else {
            return;
        };
        let mut departed: Option<Handle> = None;
        let mut level = 1;

        loop {
            let node = self.node(current);
            let leading = node.child(lead);
            let trailing = node.child(lead.opposite());
            let from_leading = departed.is_some() && departed == leading;
            let from_trailing = departed.is_some() && departed == trailing;

            if !from_leading && !from_trailing {
                visit(node.value(), Visit::Pre, level);
                if let Some(child) = leading {
                    departed = Some(current);
                    current = child;
                    level += 1;
                    continue;
                }
            }

            if !from_trailing {
                visit(node.value(), Visit::In, level);
                if let Some(child) = trailing {
                    departed = Some(current);
                    current = child;
                    level += 1;
                    continue;
                }
            }

            visit(node.value(), Visit::Post, level);
            departed = Some(current);
            match node.parent() {
                Some(parent) => {
                    current = parent;
                    level -= 1;
                }
                None => return,
            }
        }
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub(crate) fn depth(&self) -> usize {
        let mut deepest = 0;
        self.walk(Side::Left, |_, visit, level| {
            if visit == Visit::Pre {
                deepest = deepest.max(level);
            }
        });
        deepest
    }

    /// Releases every node to the pool, leaves before their parents.
    pub(crate) fn clear(&mut self) {
        let mut current = self.root.take();
        while let Some(handle) = current {
            let node = self.node(handle);
            if let Some(child) = node.left().or(node.right()) {
                current = Some(child);
                continue;
            }

            let parent = node.parent();
            drop(self.release(handle));
            if let Some(parent) = parent {
                let node = self.node_mut(parent);
                if let Some(side) = node.side_of(handle) {
                    node.set_child(side, None);
                }
            }
            current = parent;
        }
        self.count = 0;
    }

    fn release(&mut self, handle: Handle) -> Node<T> {
        match self.pool.deallocate(handle) {
            Ok(node) => node,
            Err(err) => panic!("`RawBinTree::release()` - {err}"),
        }
    }

    /// Points the link that held `old` (in `parent`, or the root link) at `new`.
    fn replace_link(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        let Some(parent) = parent else {
            self.root = new;
            return;
        };
        let node = self.node_mut(parent);
        match node.side_of(old) {
            Some(side) => node.set_child(side, new),
            None => panic!("`RawBinTree::replace_link()` - broken parent back-link!"),
        }
    }
}

impl<T: Ord> RawBinTree<T> {
    /// Finds the first node on the search path whose value equals `value`.
    pub(crate) fn search(&self, value: &T) -> Option<Handle> {
        let mut current = self.root?;
        loop {
            let node = self.node(current);
            current = match value.cmp(node.value()) {
                Ordering::Equal => return Some(current),
                Ordering::Less => node.left()?,
                Ordering::Greater => node.right()?,
            };
        }
    }

    /// Descends from `start` and returns the empty slot where `value` belongs.
    /// Smaller values go left; equal and larger values go right.
    fn insertion_point(&self, start: Handle, value: &T) -> (Handle, Side) {
        let mut current = start;
        loop {
            let node = self.node(current);
            let side = if value < node.value() { Side::Left } else { Side::Right };
            match node.child(side) {
                Some(child) => current = child,
                None => return (current, side),
            }
        }
    }

    /// Inserts `value` and returns the handle of its node.
    pub(crate) fn insert(&mut self, value: T) -> Result<Handle> {
        match self.root {
            Some(root) => self.attach_below(root, value),
            None => {
                let handle = self.pool.allocate(Node::new(value, None))?;
                self.root = Some(handle);
                self.count += 1;
                Ok(handle)
            }
        }
    }

    /// Inserts `value`, starting the descent near `hint` instead of at the root.
    pub(crate) fn insert_hinted(&mut self, hint: Handle, value: T) -> Result<Handle> {
        if !self.is_live(hint) {
            return self.insert(value);
        }
        let start = self.hint_start(hint, &value);
        self.attach_below(start, value)
    }

    /// Returns where the descent for `value` should start: `hint` itself if its
    /// subtree's range admits `value`, otherwise the root.
    ///
    /// The range of a subtree is bounded by the nearest ancestor it hangs to the
    /// right of and the nearest one it hangs to the left of, so at most two values
    /// are compared no matter how far up those ancestors are.
    fn hint_start(&self, hint: Handle, value: &T) -> Handle {
        let mut lower_checked = false;
        let mut upper_checked = false;
        let mut child = hint;
        while let Some(parent) = self.node(child).parent() {
            let node = self.node(parent);
            let admits = match node.side_of(child) {
                Some(Side::Left) if !upper_checked => {
                    upper_checked = true;
                    value < node.value()
                }
                Some(Side::Right) if !lower_checked => {
                    lower_checked = true;
                    value >= node.value()
                }
                _ => true,
            };
            if !admits {
                trace!("bintree: hint {hint:?} does not admit the value, descending from the root");
                return self.root.unwrap_or(hint);
            }
            if lower_checked && upper_checked {
                break;
            }
            child = parent;
        }
        hint
    }

    fn attach_below(&mut self, start: Handle, value: T) -> Result<Handle> {
        let (parent, side) = self.insertion_point(start, &value);
        let handle = self.pool.allocate(Node::new(value, Some(parent)))?;
        self.node_mut(parent).set_child(side, Some(handle));
        self.count += 1;
        Ok(handle)
    }

    /// Removes the first node on the search path equal to `value` and returns its value.
    ///
    /// A node with two children is replaced by its right child; its left subtree is
    /// then hung back into the tree wherever a descent from the root places it.
    pub(crate) fn remove(&mut self, value: &T) -> Option<T> {
        let target = self.search(value)?;
        let node = self.node(target);
        let (left, right, parent) = (node.left(), node.right(), node.parent());

        let promoted = right.or(left);
        if let Some(child) = promoted {
            self.node_mut(child).set_parent(parent);
        }
        self.replace_link(parent, target, promoted);

        match (left, right) {
            (Some(orphan), Some(_)) => {
                trace!("bintree: removing {target:?} with two children, reattaching {orphan:?}");
                self.reattach(orphan);
            }
            (None, None) => trace!("bintree: removing leaf {target:?}"),
            _ => trace!("bintree: removing {target:?}, promoting {promoted:?}"),
        }

        self.count -= 1;
        Some(self.release(target).into_value())
    }

    /// Hangs the detached subtree rooted at `subtree` back into the tree.
    ///
    /// Every value of the subtree falls into the same gap between existing values,
    /// so descending by the subtree root's value alone finds a valid slot.
    fn reattach(&mut self, subtree: Handle) {
        let Some(root) = self.root else {
            self.node_mut(subtree).set_parent(None);
            self.root = Some(subtree);
            return;
        };
        let (parent, side) = self.insertion_point(root, self.node(subtree).value());
        self.node_mut(parent).set_child(side, Some(subtree));
        self.node_mut(subtree).set_parent(Some(parent));
    }
}

impl<T> Drop for RawBinTree<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
impl<T: Ord + core::fmt::Debug> RawBinTree<T> {
    /// Checks links, ordering and the node count.
    pub(crate) fn validate(&self) {
        use alloc::vec::Vec;

        let Some(root) = self.root else {
            assert_eq!(self.count, 0);
            assert!(self.pool.is_empty());
            return;
        };
        assert_eq!(self.node(root).parent(), None, "root has a parent");

        let mut handles = Vec::new();
        let mut current = self.first();
        while let Some(handle) = current {
            assert!(handles.len() <= self.pool.len(), "cycle in the tree");
            handles.push(handle);
            current = self.next(handle);
        }
        assert_eq!(handles.len() as u64, self.count, "count mismatch");
        assert_eq!(handles.len(), self.pool.len(), "unreachable nodes in the pool");

        for &handle in &handles {
            let node = self.node(handle);
            for side in [Side::Left, Side::Right] {
                if let Some(child) = node.child(side) {
                    assert_eq!(self.node(child).parent(), Some(handle), "broken back-link");
                }
            }
            if let Some(left) = node.left() {
                let largest = self.node(self.extreme(left, Side::Right)).value();
                assert!(largest < node.value(), "{largest:?} left of {:?}", node.value());
            }
            if let Some(right) = node.right() {
                let smallest = self.node(self.extreme(right, Side::Left)).value();
                assert!(smallest >= node.value(), "{smallest:?} right of {:?}", node.value());
            }
        }
    }
}
