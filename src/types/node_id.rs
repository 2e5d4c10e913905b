//! Node identity and the allocator that hands it out.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Stable identity of a pipeline node, unique within its allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

impl NodeId {
  pub fn get(self) -> u64 {
    self.0
  }
}

impl fmt::Display for NodeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Monotonic source of [NodeId]s.
///
/// Each pipeline owns one (or shares one behind an `Arc` with other
/// pipelines built concurrently). Ids are never reused.
#[derive(Debug, Default)]
pub struct IdAllocator {
  next: AtomicU64,
}

impl IdAllocator {
  pub fn new() -> Self {
    Self::starting_at(0)
  }

  /// Allocator whose first id is `seed`.
  pub fn starting_at(seed: u64) -> Self {
    Self {
      next: AtomicU64::new(seed),
    }
  }

  /// Returns a fresh id, strictly greater than every id returned before.
  pub fn next(&self) -> NodeId {
    NodeId(self.next.fetch_add(1, Ordering::Relaxed))
  }

  /// The id the next call to [IdAllocator::next] will return.
  pub fn peek(&self) -> NodeId {
    NodeId(self.next.load(Ordering::Relaxed))
  }
}
