//! Filters points with a lambda expression.

use std::any::Any;

use serde_json::{Map, Value};

use crate::error::Result;
use crate::node::{Node, Walk, tick_children};
use crate::types::{ChainNode, EdgeType, NodeId};

pub const WHERE: &str = "where";

/// `|where(lambda: <expr>)`. The expression is kept as written.
#[derive(Debug, Clone)]
pub struct WhereNode {
  chain: ChainNode,
  pub lambda: String,
}

impl WhereNode {
  pub fn new(id: NodeId, edge: EdgeType, lambda: impl Into<String>) -> Self {
    Self {
      chain: ChainNode::new(id, WHERE, edge, edge),
      lambda: lambda.into(),
    }
  }
}

impl Node for WhereNode {
  fn chain(&self) -> &ChainNode {
    &self.chain
  }

  fn chain_mut(&mut self) -> &mut ChainNode {
    &mut self.chain
  }

  fn tick(&self, walk: Walk<'_>, buf: &mut String) -> Result<()> {
    buf.push_str("|where(lambda: ");
    buf.push_str(&self.lambda);
    buf.push(')');
    tick_children(self.children(), walk, buf)
  }

  fn properties(&self) -> Map<String, Value> {
    let mut props = Map::new();
    props.insert("lambda".to_string(), Value::from(self.lambda.clone()));
    props
  }

  fn as_any(&self) -> &dyn Any {
    self
  }

  fn as_any_mut(&mut self) -> &mut dyn Any {
    self
  }
}
