//! Collects stream points into batches covering `period`, emitted every `every`.

use std::any::Any;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::duration::format_duration;
use crate::error::Result;
use crate::node::{Node, Walk, tick_children};
use crate::script::property;
use crate::types::{ChainNode, EdgeType, NodeId};

pub const WINDOW: &str = "window";

/// `|window()`: turns a stream into batches.
#[derive(Debug, Clone)]
pub struct WindowNode {
  chain: ChainNode,
  pub period: Duration,
  pub every: Duration,
  /// Align window edges to multiples of `every`.
  pub align: bool,
}

impl WindowNode {
  pub fn new(id: NodeId) -> Self {
    Self {
      chain: ChainNode::new(id, WINDOW, EdgeType::Stream, EdgeType::Batch),
      period: Duration::ZERO,
      every: Duration::ZERO,
      align: false,
    }
  }

  pub fn period(&mut self, period: Duration) -> &mut Self {
    self.period = period;
    self
  }

  pub fn every(&mut self, every: Duration) -> &mut Self {
    self.every = every;
    self
  }

  pub fn align(&mut self) -> &mut Self {
    self.align = true;
    self
  }
}

impl Node for WindowNode {
  fn chain(&self) -> &ChainNode {
    &self.chain
  }

  fn chain_mut(&mut self) -> &mut ChainNode {
    &mut self.chain
  }

  fn tick(&self, walk: Walk<'_>, buf: &mut String) -> Result<()> {
    buf.push_str("|window()");
    if !self.period.is_zero() {
      property(buf, "period", &format_duration(self.period));
    }
    if !self.every.is_zero() {
      property(buf, "every", &format_duration(self.every));
    }
    if self.align {
      property(buf, "align", "");
    }
    tick_children(self.children(), walk, buf)
  }

  fn properties(&self) -> Map<String, Value> {
    let mut props = Map::new();
    props.insert("period".to_string(), Value::from(format_duration(self.period)));
    props.insert("every".to_string(), Value::from(format_duration(self.every)));
    props.insert("align".to_string(), Value::from(self.align));
    props
  }

  fn as_any(&self) -> &dyn Any {
    self
  }

  fn as_any_mut(&mut self) -> &mut dyn Any {
    self
  }
}
