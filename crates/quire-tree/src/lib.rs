//! Quire document tree
//!
//! A persistent tree of text and placeholder leaves under style containers.
//! Nodes are immutable: every edit path-copies from the edited node up to the
//! root and returns the edited node's counterpart in the new tree, sharing
//! every untouched subtree with the old one.

mod error;
mod json;
mod node;

pub use error::TreeError;
pub use json::{register_node_types, tags};
pub use node::{Node, NodeKind};
