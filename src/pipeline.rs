//! The pipeline graph: owns every node, wires parent/child links and renders
//! any subgraph in script or structured form.

use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use serde_json::{Map, Value, json};
use tracing::{debug, instrument, trace};

use crate::error::{PipelineError, Result};
use crate::node::{Node, Walk};
use crate::nodes::{FromNode, SourceNode, UnionNode, WhereNode, WindowNode};
use crate::types::{EdgeType, IdAllocator, NodeId};

/// Arena of pipeline nodes keyed by identity.
///
/// Nodes reference each other only by [NodeId]; the pipeline owns them all and
/// drops them together.
#[derive(Debug)]
pub struct Pipeline {
  ids: Arc<IdAllocator>,
  nodes: BTreeMap<NodeId, Box<dyn Node>>,
}

impl Default for Pipeline {
  fn default() -> Self {
    Self::new()
  }
}

/// Last path segment of a type name (`UnionNode`).
fn short_type_name<T>() -> &'static str {
  let full = std::any::type_name::<T>();
  full.rsplit("::").next().unwrap_or(full)
}

impl Pipeline {
  /// Empty pipeline with its own allocator starting at 0.
  pub fn new() -> Self {
    Self::with_allocator(Arc::new(IdAllocator::new()))
  }

  /// Empty pipeline drawing ids from a shared allocator.
  pub fn with_allocator(ids: Arc<IdAllocator>) -> Self {
    Self {
      ids,
      nodes: BTreeMap::new(),
    }
  }

  pub fn allocator(&self) -> &Arc<IdAllocator> {
    &self.ids
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn contains(&self, id: NodeId) -> bool {
    self.nodes.contains_key(&id)
  }

  /// Node ids in allocation order.
  pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
    self.nodes.keys().copied()
  }

  pub fn node(&self, id: NodeId) -> Result<&dyn Node> {
    self
      .nodes
      .get(&id)
      .map(|n| n.as_ref())
      .ok_or(PipelineError::UnknownNode(id))
  }

  /// Typed access to a node, e.g. to read a union's configuration.
  pub fn get<T: Node>(&self, id: NodeId) -> Result<&T> {
    let node = self.node(id)?;
    let found = node.desc();
    node
      .as_any()
      .downcast_ref::<T>()
      .ok_or(PipelineError::WrongKind {
        id,
        expected: short_type_name::<T>(),
        found,
      })
  }

  /// Builder-style configuration of a typed node:
  /// `pipeline.configure(u, |u: &mut UnionNode| { u.rename("user_actions"); })`.
  ///
  /// `f` works on a copy that replaces the node only if its embedded
  /// [ChainNode](crate::types::ChainNode) is untouched: identity, edge types
  /// and links belong to the pipeline. Otherwise the node is left as it was.
  pub fn configure<T, R, F>(&mut self, id: NodeId, f: F) -> Result<R>
  where
    T: Node + Clone,
    F: FnOnce(&mut T) -> R,
  {
    let node = self
      .nodes
      .get_mut(&id)
      .ok_or(PipelineError::UnknownNode(id))?;
    let found = node.desc();
    let typed = node
      .as_any_mut()
      .downcast_mut::<T>()
      .ok_or(PipelineError::WrongKind {
        id,
        expected: short_type_name::<T>(),
        found,
      })?;

    let mut draft = typed.clone();
    let out = f(&mut draft);
    if draft.chain() != typed.chain() {
      return Err(PipelineError::ChainModified(id));
    }
    *typed = draft;
    Ok(out)
  }

  /// Allocates an id, builds the node with it and links it below every
  /// parent in order. Nothing is inserted if a parent is unknown, or if the
  /// built node ignores its id or arrives already linked.
  #[instrument(level = "trace", skip(self, make))]
  pub fn add<N, F>(&mut self, make: F, parents: &[NodeId]) -> Result<NodeId>
  where
    N: Node,
    F: FnOnce(NodeId) -> N,
  {
    if let Some(missing) = parents.iter().find(|p| !self.contains(**p)) {
      return Err(PipelineError::UnknownNode(*missing));
    }
    let id = self.ids.next();
    let node = make(id);
    if node.id() != id {
      return Err(PipelineError::IdMismatch {
        allocated: id,
        found: node.id(),
      });
    }
    if !node.children().is_empty() || !node.parents().is_empty() {
      return Err(PipelineError::PreLinked(id));
    }
    debug!(node = %id, kind = node.desc(), parents = parents.len(), "node added");
    self.nodes.insert(id, Box::new(node));
    for parent in parents {
      self.link_child(*parent, id)?;
    }
    Ok(id)
  }

  /// Adds `child` to the end of `parent`'s children and `parent` to the end
  /// of `child`'s parents.
  ///
  /// Rejects links that would make a node its own descendant.
  #[instrument(level = "trace", skip(self))]
  pub fn link_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
    if !self.contains(parent) {
      return Err(PipelineError::UnknownNode(parent));
    }
    if !self.contains(child) {
      return Err(PipelineError::UnknownNode(child));
    }
    if self.reaches(child, parent) {
      return Err(PipelineError::Cycle { parent, child });
    }

    if let Some(p) = self.nodes.get_mut(&parent) {
      p.chain_mut().push_child(child);
    }
    if let Some(c) = self.nodes.get_mut(&child) {
      c.chain_mut().push_parent(parent);
    }
    trace!(parent = %parent, child = %child, "linked");
    Ok(())
  }

  /// True if `to` is `from` or one of its descendants.
  pub fn reaches(&self, from: NodeId, to: NodeId) -> bool {
    let mut seen = HashSet::new();
    let mut stack = vec![from];
    while let Some(id) = stack.pop() {
      if id == to {
        return true;
      }
      if !seen.insert(id) {
        continue;
      }
      if let Some(node) = self.nodes.get(&id) {
        stack.extend(node.children().iter().copied());
      }
    }
    false
  }

  /// New union of `parents`; the union becomes a child of each, in order.
  pub fn new_union(&mut self, edge: EdgeType, parents: &[NodeId]) -> Result<NodeId> {
    self.add(|id| UnionNode::new(id, edge), parents)
  }

  /// `receiver|union(others...)`: a union below `receiver` and every node in
  /// `others`, carrying the receiver's output edge type.
  pub fn union(&mut self, receiver: NodeId, others: &[NodeId]) -> Result<NodeId> {
    let edge = self.node(receiver)?.output_edge_type();
    let mut parents = Vec::with_capacity(others.len() + 1);
    parents.push(receiver);
    parents.extend_from_slice(others);
    self.new_union(edge, &parents)
  }

  /// New `stream` root.
  pub fn stream(&mut self) -> Result<NodeId> {
    self.add(|id| SourceNode::new(id, EdgeType::Stream), &[])
  }

  /// New `batch` root.
  pub fn batch(&mut self) -> Result<NodeId> {
    self.add(|id| SourceNode::new(id, EdgeType::Batch), &[])
  }

  pub fn from(&mut self, parent: NodeId) -> Result<NodeId> {
    self.add(FromNode::new, &[parent])
  }

  /// `where` is reserved, hence the underscore.
  pub fn where_(&mut self, parent: NodeId, lambda: impl Into<String>) -> Result<NodeId> {
    let edge = self.node(parent)?.output_edge_type();
    let lambda = lambda.into();
    self.add(|id| WhereNode::new(id, edge, lambda), &[parent])
  }

  pub fn window(&mut self, parent: NodeId) -> Result<NodeId> {
    self.add(WindowNode::new, &[parent])
  }

  /// Nodes without parents, in id order.
  pub fn roots(&self) -> Vec<NodeId> {
    self
      .nodes
      .values()
      .filter(|n| n.parents().is_empty())
      .map(|n| n.id())
      .collect()
  }

  /// Topological order; among ready nodes the lowest id comes first.
  pub fn sorted(&self) -> Vec<NodeId> {
    let mut pending: BTreeMap<NodeId, usize> = self
      .nodes
      .values()
      .map(|n| (n.id(), n.parents().len()))
      .collect();
    let mut ready: BTreeSet<NodeId> = pending
      .iter()
      .filter(|(_, count)| **count == 0)
      .map(|(id, _)| *id)
      .collect();

    let mut order = Vec::with_capacity(self.nodes.len());
    while let Some(id) = ready.pop_first() {
      order.push(id);
      for child in self.nodes[&id].children() {
        if let Some(count) = pending.get_mut(child) {
          *count -= 1;
          if *count == 0 {
            ready.insert(*child);
          }
        }
      }
    }
    order
  }

  /// Checks that every parent provides the edge type its children want.
  #[instrument(level = "trace", skip(self))]
  pub fn validate(&self) -> Result<()> {
    for node in self.nodes.values() {
      for child in node.children() {
        let c = self.node(*child)?;
        if c.input_edge_type() != node.output_edge_type() {
          return Err(PipelineError::EdgeMismatch {
            parent: node.id(),
            child: c.id(),
            provides: node.output_edge_type(),
            wants: c.input_edge_type(),
          });
        }
      }
    }
    Ok(())
  }

  /// Script form of the subgraph rooted at `id`.
  ///
  /// Fails with [PipelineError::TooDeep] or [PipelineError::TooLarge] past the
  /// render limits in [crate::node]; no partial text is returned.
  #[instrument(level = "trace", skip(self))]
  pub fn tick(&self, id: NodeId) -> Result<String> {
    let visits = Cell::new(0);
    let (node, walk) = Walk::new(self, &visits).descend(id)?;
    let mut buf = String::new();
    node.tick(walk, &mut buf)?;
    Ok(buf)
  }

  /// Script form of every root, one per line.
  pub fn script(&self) -> Result<String> {
    let scripts = self
      .roots()
      .into_iter()
      .map(|root| self.tick(root))
      .collect::<Result<Vec<_>>>()?;
    Ok(scripts.join("\n"))
  }

  /// Structured form of the subgraph rooted at `id`.
  #[instrument(level = "trace", skip(self))]
  pub fn marshal(&self, id: NodeId) -> Result<Value> {
    let visits = Cell::new(0);
    let (node, walk) = Walk::new(self, &visits).descend(id)?;
    node.marshal(walk)
  }

  /// Structured form of the subgraph rooted at `id`, encoded as JSON text.
  pub fn marshal_json(&self, id: NodeId, pretty: bool) -> Result<String> {
    let doc = self.marshal(id)?;
    let text = if pretty {
      serde_json::to_string_pretty(&doc)?
    } else {
      serde_json::to_string(&doc)?
    };
    Ok(text)
  }

  /// Flat structured form of the whole pipeline: each node once, in
  /// topological order, plus the edge list.
  #[instrument(level = "trace", skip(self))]
  pub fn marshal_pipeline(&self) -> Result<Value> {
    let order = self.sorted();
    let mut nodes = Vec::with_capacity(order.len());
    let mut edges = Vec::new();
    for id in order {
      let node = self.node(id)?;
      nodes.push(Value::Object(node.document()));
      for child in node.children() {
        let mut edge = Map::new();
        edge.insert("parent".to_string(), Value::from(id.to_string()));
        edge.insert("child".to_string(), Value::from(child.to_string()));
        edges.push(Value::Object(edge));
      }
    }
    Ok(json!({ "nodes": nodes, "edges": edges }))
  }
}
