//! Concrete pipeline node kinds. Each embeds a
//! [ChainNode](crate::types::ChainNode) and implements [Node](crate::node::Node).

mod from_node;
mod source_node;
mod union_node;
#[cfg(test)]
mod union_node_test;
mod where_node;
mod window_node;

pub use from_node::{FROM, FromNode};
pub use source_node::SourceNode;
pub use union_node::{UNION, UnionNode};
pub use where_node::{WHERE, WhereNode};
pub use window_node::{WINDOW, WindowNode};
