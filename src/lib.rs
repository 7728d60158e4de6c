//! An unbalanced binary search tree over a block pool allocator.
//!
//! This crate provides [`BinTree`], an ordered multiset whose nodes come from a
//! [`Pool`]: a growable list of fixed-capacity blocks with an occupancy bitmap.
//! Every node keeps a back-link to its parent, so that:
//!
//! - [`Cursor`]s step to the in-order successor or predecessor without a stack
//! - [`pre_order`](BinTree::pre_order), [`in_order`](BinTree::in_order),
//!   [`post_order`](BinTree::post_order) and [`reverse_in_order`](BinTree::reverse_in_order)
//!   walk the whole tree in O(n) time and O(1) extra space
//!
//! # Example
//!
//! ```
//! use pool_bintree::{BinTree, Error, PoolConfig};
//!
//! let mut tree = BinTree::with_config(PoolConfig::new().block_capacity(64));
//! for value in [50, 25, 75, 12, 37] {
//!     tree.insert(value)?;
//! }
//!
//! assert_eq!(tree.count(), 5);
//! assert_eq!(tree.max_value(), Ok(&75));
//! assert_eq!(tree.pool().block_count(), 1);
//!
//! let mut cursor = tree.find(&37);
//! cursor.advance();
//! assert_eq!(cursor.get(), Some(&50));
//!
//! tree.clear();
//! assert_eq!(tree.min_value(), Err(Error::EmptyTree));
//! # Ok::<(), Error>(())
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Pooled nodes** - One allocation per block of nodes instead of one per node
//! - **Handles, not pointers** - Nodes refer to each other through pool handles,
//!   and only the tree and child links own nodes
//!
//! # Implementation
//!
//! The tree is deliberately never rebalanced. Removing a node with two children
//! promotes its right child and hangs its left subtree back into the tree from the
//! root, which keeps every operation simple at the price of no height guarantee.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
// NOTE: The pool stores nodes in uninitialized slots, which needs unsafe code.
// #![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod raw;

pub mod bintree;
pub mod pool;

pub use bintree::{BinTree, Cursor, Hint};
pub use error::{Error, Result};
pub use pool::{Handle, Pool, PoolConfig};
pub use raw::Node;
