//! Classification of the data flowing along a pipeline edge.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of the data flowing along a pipeline edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
  /// A continuous, ordered sequence of points.
  Stream,
  /// Bounded or windowed collections of points.
  Batch,
}

impl fmt::Display for EdgeType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EdgeType::Stream => write!(f, "stream"),
      EdgeType::Batch => write!(f, "batch"),
    }
  }
}
