mod node;
mod raw_bintree;

pub use node::Node;
pub(crate) use node::Side;
pub(crate) use raw_bintree::{RawBinTree, Visit};
