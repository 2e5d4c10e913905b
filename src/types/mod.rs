//! Value types shared by every pipeline node: edge typing, identity and the
//! embedded linkage state.

mod chain_node;
mod edge_type;
mod node_id;

pub use chain_node::ChainNode;
pub use edge_type::EdgeType;
pub use node_id::{IdAllocator, NodeId};
