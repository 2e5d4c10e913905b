//! Pipeline roots: `stream` and `batch`.

use std::any::Any;

use crate::error::Result;
use crate::node::{Node, Walk, tick_children};
use crate::types::{ChainNode, EdgeType, NodeId};

/// Root of a pipeline; everything else hangs below a source.
#[derive(Debug, Clone)]
pub struct SourceNode {
  chain: ChainNode,
}

impl SourceNode {
  pub fn new(id: NodeId, edge: EdgeType) -> Self {
    let desc = match edge {
      EdgeType::Stream => "stream",
      EdgeType::Batch => "batch",
    };
    Self {
      chain: ChainNode::new(id, desc, edge, edge),
    }
  }
}

impl Node for SourceNode {
  fn chain(&self) -> &ChainNode {
    &self.chain
  }

  fn chain_mut(&mut self) -> &mut ChainNode {
    &mut self.chain
  }

  fn tick(&self, walk: Walk<'_>, buf: &mut String) -> Result<()> {
    buf.push_str(self.desc());
    tick_children(self.children(), walk, buf)
  }

  fn as_any(&self) -> &dyn Any {
    self
  }

  fn as_any_mut(&mut self) -> &mut dyn Any {
    self
  }
}
