//! The capability set every pipeline node implements.

use std::any::Any;
use std::cell::Cell;
use std::fmt;

use serde_json::{Map, Value};

use crate::error::{PipelineError, Result};
use crate::pipeline::Pipeline;
use crate::types::{ChainNode, EdgeType, NodeId};

/// Deepest nesting a single render follows before giving up.
pub const MAX_RENDER_DEPTH: usize = 256;

/// Most nodes a single render visits. A node below several paths is visited
/// once per path, so stacked fan-out/fan-in grows renders exponentially.
pub const MAX_RENDER_VISITS: usize = 100_000;

/// Position of a render inside the pipeline: the owning pipeline, how deep
/// the render is, and how many nodes it has visited so far.
#[derive(Debug, Clone, Copy)]
pub struct Walk<'a> {
  pipeline: &'a Pipeline,
  depth: usize,
  visits: &'a Cell<usize>,
}

impl<'a> Walk<'a> {
  /// Walk starting above the root; `visits` counts every node entered.
  pub fn new(pipeline: &'a Pipeline, visits: &'a Cell<usize>) -> Self {
    Self {
      pipeline,
      depth: 0,
      visits,
    }
  }

  pub fn pipeline(&self) -> &'a Pipeline {
    self.pipeline
  }

  pub fn depth(&self) -> usize {
    self.depth
  }

  /// Looks up `id` and returns it with the walk one level deeper.
  pub fn descend(&self, id: NodeId) -> Result<(&'a dyn Node, Walk<'a>)> {
    let node = self.pipeline.node(id)?;
    let depth = self.depth + 1;
    if depth > MAX_RENDER_DEPTH {
      return Err(PipelineError::TooDeep {
        node: id,
        limit: MAX_RENDER_DEPTH,
      });
    }
    let visits = self.visits.get() + 1;
    if visits > MAX_RENDER_VISITS {
      return Err(PipelineError::TooLarge {
        limit: MAX_RENDER_VISITS,
      });
    }
    self.visits.set(visits);
    Ok((node, Walk { depth, ..*self }))
  }
}

/// A vertex of the pipeline graph.
///
/// Implementors embed a [ChainNode] for identity and linkage and add their own
/// configuration plus the two renderers: [Node::tick] (script form) and
/// [Node::marshal] (structured form). Both reach children through a [Walk].
pub trait Node: fmt::Debug + Send + Sync + 'static {
  fn chain(&self) -> &ChainNode;

  /// Only the pipeline links nodes; it rejects configuration that changes this.
  fn chain_mut(&mut self) -> &mut ChainNode;

  fn id(&self) -> NodeId {
    self.chain().id()
  }

  /// Kind tag, e.g. `union`.
  fn desc(&self) -> &'static str {
    self.chain().desc()
  }

  fn children(&self) -> &[NodeId] {
    self.chain().children()
  }

  fn parents(&self) -> &[NodeId] {
    self.chain().parents()
  }

  fn input_edge_type(&self) -> EdgeType {
    self.chain().wants()
  }

  fn output_edge_type(&self) -> EdgeType {
    self.chain().provides()
  }

  /// Writes the script form of this node and the subgraph below it to `buf`.
  fn tick(&self, walk: Walk<'_>, buf: &mut String) -> Result<()>;

  /// Kind-specific fields of the structured form.
  fn properties(&self) -> Map<String, Value> {
    Map::new()
  }

  /// Structured form of this node without its children.
  fn document(&self) -> Map<String, Value> {
    let mut doc = self.properties();
    doc.insert("type".to_string(), Value::from(self.desc()));
    doc.insert("nodeID".to_string(), Value::from(self.id().to_string()));
    doc
  }

  /// Structured form of this node and the subgraph below it.
  fn marshal(&self, walk: Walk<'_>) -> Result<Value> {
    let mut doc = self.document();
    doc.insert(
      "children".to_string(),
      Value::Array(marshal_children(self.children(), walk)?),
    );
    Ok(Value::Object(doc))
  }

  fn as_any(&self) -> &dyn Any;

  fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Renders each child in order directly after the parent's own call.
///
/// The result is lossy for fan-out: a node with children `[a, b]` renders the
/// same text as the chain `node -> a -> b`. Use the structured form when the
/// shape matters.
pub fn tick_children(children: &[NodeId], walk: Walk<'_>, buf: &mut String) -> Result<()> {
  for child in children {
    let (node, below) = walk.descend(*child)?;
    node.tick(below, buf)?;
  }
  Ok(())
}

/// Structured documents of `children`, in order.
pub fn marshal_children(children: &[NodeId], walk: Walk<'_>) -> Result<Vec<Value>> {
  children
    .iter()
    .map(|child| {
      let (node, below) = walk.descend(*child)?;
      node.marshal(below)
    })
    .collect()
}
