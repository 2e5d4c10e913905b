//! Takes the union of all of its parents.
//!
//! The union is a pass-through merge point: points from every parent reach the
//! children unchanged. Only the stream name may change, via `rename`.
//!
//! ```text
//! logins
//!     |union(logouts, frontpage)
//!         .rename('user_actions')
//! ```

use std::any::Any;

use serde_json::{Map, Value};
use tracing::instrument;

use crate::error::Result;
use crate::node::{Node, Walk};
use crate::script::{property, single_quote};
use crate::types::{ChainNode, EdgeType, NodeId};

pub const UNION: &str = "union";

/// Merge point of several pipelines.
#[derive(Debug, Clone)]
pub struct UnionNode {
  chain: ChainNode,
  /// New name of the merged stream. Empty keeps the receiver's name.
  pub rename: String,
}

impl UnionNode {
  /// Unlinked union; edge type is the same on both sides.
  pub fn new(id: NodeId, edge: EdgeType) -> Self {
    Self {
      chain: ChainNode::new(id, UNION, edge, edge),
      rename: String::new(),
    }
  }

  pub fn rename(&mut self, name: impl Into<String>) -> &mut Self {
    self.rename = name.into();
    self
  }
}

impl Node for UnionNode {
  fn chain(&self) -> &ChainNode {
    &self.chain
  }

  fn chain_mut(&mut self) -> &mut ChainNode {
    &mut self.chain
  }

  /// Children are the call's arguments, each rendered on its own.
  #[instrument(level = "trace", skip(self, walk, buf), fields(node = %self.chain.id()))]
  fn tick(&self, walk: Walk<'_>, buf: &mut String) -> Result<()> {
    buf.push_str("|union(");

    let mut args = Vec::with_capacity(self.children().len());
    for child in self.children() {
      let (node, below) = walk.descend(*child)?;
      let mut b = String::new();
      node.tick(below, &mut b)?;
      args.push(b);
    }

    buf.push_str(&args.join(", "));
    buf.push(')');

    if !self.rename.is_empty() {
      property(buf, "rename", &single_quote(&self.rename));
    }
    Ok(())
  }

  fn properties(&self) -> Map<String, Value> {
    let mut props = Map::new();
    props.insert("rename".to_string(), Value::from(self.rename.clone()));
    props
  }

  fn as_any(&self) -> &dyn Any {
    self
  }

  fn as_any_mut(&mut self) -> &mut dyn Any {
    self
  }
}
