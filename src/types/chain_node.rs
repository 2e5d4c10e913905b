//! Shared linkage state embedded in every node kind.

use super::{EdgeType, NodeId};

/// Identity, edge typing and parent/child links common to all node kinds.
///
/// Concrete kinds embed a `ChainNode` and expose it through
/// [crate::node::Node::chain]. Links are only added by
/// [crate::pipeline::Pipeline::link_child], which keeps both sides in step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainNode {
  id: NodeId,
  /// Kind tag used by both renderers (e.g. `union`).
  desc: &'static str,
  wants: EdgeType,
  provides: EdgeType,
  children: Vec<NodeId>,
  parents: Vec<NodeId>,
}

impl ChainNode {
  pub fn new(id: NodeId, desc: &'static str, wants: EdgeType, provides: EdgeType) -> Self {
    Self {
      id,
      desc,
      wants,
      provides,
      children: Vec::new(),
      parents: Vec::new(),
    }
  }

  pub fn id(&self) -> NodeId {
    self.id
  }

  pub fn desc(&self) -> &'static str {
    self.desc
  }

  /// Edge type this node accepts from its parents.
  pub fn wants(&self) -> EdgeType {
    self.wants
  }

  /// Edge type this node hands to its children.
  pub fn provides(&self) -> EdgeType {
    self.provides
  }

  /// Children in link order.
  pub fn children(&self) -> &[NodeId] {
    &self.children
  }

  /// Parents in link order.
  pub fn parents(&self) -> &[NodeId] {
    &self.parents
  }

  pub(crate) fn push_child(&mut self, child: NodeId) {
    self.children.push(child);
  }

  pub(crate) fn push_parent(&mut self, parent: NodeId) {
    self.parents.push(parent);
  }
}
