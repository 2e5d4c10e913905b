//! # streamweave-tick
//!
//! Definition-time model of a stream/batch processing pipeline.
//!
//! Nodes are built into a [Pipeline], which owns them, hands out their
//! [NodeId]s and keeps parent/child links acyclic. Any node, and the subgraph
//! below it, renders two ways:
//!
//! - script form via [Pipeline::tick] (TICKscript, e.g. `|union(...).rename('x')`);
//! - structured form via [Pipeline::marshal] (a JSON tree for execution planning).
//!
//! Node kinds implement the [Node] trait around an embedded
//! [ChainNode](types::ChainNode); see the [nodes] module.

pub mod definition;
#[cfg(test)]
mod definition_test;
pub mod duration;
pub mod error;
pub mod node;
pub mod nodes;
pub mod pipeline;
pub mod render;
pub mod script;
#[cfg(test)]
mod script_test;
pub mod types;

pub use definition::{BuiltPipeline, NodeDefinition, NodeKind, PipelineDefinition};
pub use error::{PipelineError, Result};
pub use node::{Node, Walk};
pub use nodes::{FromNode, SourceNode, UnionNode, WhereNode, WindowNode};
pub use pipeline::Pipeline;
pub use render::{OutputFormat, RenderOptions, render_definition};
pub use types::{ChainNode, EdgeType, IdAllocator, NodeId};
