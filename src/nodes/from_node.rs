//! Selects a subset of the incoming stream by database, retention policy and
//! measurement, optionally grouping it by tags.

use std::any::Any;

use serde_json::{Map, Value};

use crate::error::Result;
use crate::node::{Node, Walk, tick_children};
use crate::script::{property, quoted_list, single_quote};
use crate::types::{ChainNode, EdgeType, NodeId};

pub const FROM: &str = "from";

/// `|from()` with its optional selectors.
#[derive(Debug, Clone)]
pub struct FromNode {
  chain: ChainNode,
  pub database: String,
  pub retention_policy: String,
  pub measurement: String,
  pub group_by: Vec<String>,
}

impl FromNode {
  pub fn new(id: NodeId) -> Self {
    Self {
      chain: ChainNode::new(id, FROM, EdgeType::Stream, EdgeType::Stream),
      database: String::new(),
      retention_policy: String::new(),
      measurement: String::new(),
      group_by: Vec::new(),
    }
  }

  pub fn database(&mut self, name: impl Into<String>) -> &mut Self {
    self.database = name.into();
    self
  }

  pub fn retention_policy(&mut self, name: impl Into<String>) -> &mut Self {
    self.retention_policy = name.into();
    self
  }

  pub fn measurement(&mut self, name: impl Into<String>) -> &mut Self {
    self.measurement = name.into();
    self
  }

  /// Appends tags to group by.
  pub fn group_by<I, S>(&mut self, tags: I) -> &mut Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.group_by.extend(tags.into_iter().map(Into::into));
    self
  }
}

impl Node for FromNode {
  fn chain(&self) -> &ChainNode {
    &self.chain
  }

  fn chain_mut(&mut self) -> &mut ChainNode {
    &mut self.chain
  }

  fn tick(&self, walk: Walk<'_>, buf: &mut String) -> Result<()> {
    buf.push_str("|from()");
    if !self.database.is_empty() {
      property(buf, "database", &single_quote(&self.database));
    }
    if !self.retention_policy.is_empty() {
      property(buf, "retentionPolicy", &single_quote(&self.retention_policy));
    }
    if !self.measurement.is_empty() {
      property(buf, "measurement", &single_quote(&self.measurement));
    }
    if !self.group_by.is_empty() {
      property(buf, "groupBy", &quoted_list(&self.group_by));
    }
    tick_children(self.children(), walk, buf)
  }

  fn properties(&self) -> Map<String, Value> {
    let mut props = Map::new();
    props.insert("database".to_string(), Value::from(self.database.clone()));
    props.insert(
      "retentionPolicy".to_string(),
      Value::from(self.retention_policy.clone()),
    );
    props.insert(
      "measurement".to_string(),
      Value::from(self.measurement.clone()),
    );
    props.insert("groupBy".to_string(), Value::from(self.group_by.clone()));
    props
  }

  fn as_any(&self) -> &dyn Any {
    self
  }

  fn as_any_mut(&mut self) -> &mut dyn Any {
    self
  }
}
