//! Errors raised while building or rendering a pipeline.

use thiserror::Error;

use crate::types::{EdgeType, NodeId};

/// Errors raised while building or rendering a pipeline.
///
/// Construction errors surface at the linking/builder call that caused them.
/// Rendering errors abort the whole render; no partial output is returned.
#[derive(Debug, Error)]
pub enum PipelineError {
  /// A node id that does not belong to this pipeline.
  #[error("unknown node {0}")]
  UnknownNode(NodeId),

  /// Typed access to a node of a different kind.
  #[error("node {id} is a '{found}' node, expected {expected}")]
  WrongKind {
    id: NodeId,
    expected: &'static str,
    found: &'static str,
  },

  /// A freshly built node that does not carry the id allocated for it.
  #[error("node built with id {found}, but {allocated} was allocated for it")]
  IdMismatch { allocated: NodeId, found: NodeId },

  /// A freshly built node that already has parents or children.
  #[error("node {0} arrived with links already set")]
  PreLinked(NodeId),

  /// Configuration that tried to change a node's identity, edge types or links.
  #[error("configuring node {0} changed its identity or links")]
  ChainModified(NodeId),

  /// Linking `child` under `parent` would make a node its own descendant.
  #[error("linking {child} under {parent} would create a cycle")]
  Cycle { parent: NodeId, child: NodeId },

  /// An edge whose endpoints disagree on the data they exchange.
  #[error("mismatched edge type: node {parent} provides {provides} but child {child} wants {wants}")]
  EdgeMismatch {
    parent: NodeId,
    child: NodeId,
    provides: EdgeType,
    wants: EdgeType,
  },

  /// The structured form could not be encoded.
  #[error("encoding failed: {0}")]
  Encoding(#[from] serde_json::Error),

  /// A render nested deeper than `limit` levels.
  #[error("rendering node {node} exceeds the nesting limit of {limit}")]
  TooDeep { node: NodeId, limit: usize },

  /// A render that visits more than `limit` nodes.
  #[error("rendering visits more than {limit} nodes")]
  TooLarge { limit: usize },

  #[error("invalid duration literal '{0}'")]
  InvalidDuration(String),

  /// A pipeline definition document that cannot be replayed.
  #[error("invalid pipeline definition: {0}")]
  Definition(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PipelineError>;
