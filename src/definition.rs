//! JSON pipeline definitions: a declarative list of nodes replayed through the
//! pipeline builder in the order they are written.
//!
//! ```json
//! {"nodes": [
//!   {"name": "src", "kind": "stream"},
//!   {"name": "logins", "kind": "from", "parents": ["src"], "measurement": "logins"},
//!   {"name": "logouts", "kind": "from", "parents": ["src"], "measurement": "logouts"},
//!   {"name": "all", "kind": "union", "parents": ["logins", "logouts"], "rename": "user_actions"}
//! ]}
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::duration::parse_duration;
use crate::error::{PipelineError, Result};
use crate::nodes::{FromNode, UnionNode, WindowNode};
use crate::pipeline::Pipeline;
use crate::types::{IdAllocator, NodeId};

/// Ordered node declarations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineDefinition {
  pub nodes: Vec<NodeDefinition>,
}

/// One declared node. Parents must be declared before it.
///
/// Fields a kind does not know are rejected rather than dropped, so a
/// misspelled `measurment` fails the load instead of rendering `''`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNode")]
pub struct NodeDefinition {
  pub name: String,
  #[serde(default)]
  pub parents: Vec<String>,
  #[serde(flatten)]
  pub kind: NodeKind,
}

/// Node kind plus its configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
  Stream,
  Batch,
  From {
    #[serde(default)]
    database: String,
    #[serde(default, rename = "retentionPolicy")]
    retention_policy: String,
    #[serde(default)]
    measurement: String,
    #[serde(default, rename = "groupBy")]
    group_by: Vec<String>,
  },
  Where {
    lambda: String,
  },
  Window {
    #[serde(default)]
    period: Option<String>,
    #[serde(default)]
    every: Option<String>,
    #[serde(default)]
    align: bool,
  },
  /// The first parent is the receiver; the rest are unioned with it.
  Union {
    #[serde(default)]
    rename: String,
  },
}

/// Strict wire shape of a [NodeDefinition]. serde cannot combine `flatten`
/// with `deny_unknown_fields`, so `name`/`parents` are repeated per kind.
#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
enum RawNode {
  Stream {
    name: String,
    #[serde(default)]
    parents: Vec<String>,
  },
  Batch {
    name: String,
    #[serde(default)]
    parents: Vec<String>,
  },
  From {
    name: String,
    #[serde(default)]
    parents: Vec<String>,
    #[serde(default)]
    database: String,
    #[serde(default, rename = "retentionPolicy")]
    retention_policy: String,
    #[serde(default)]
    measurement: String,
    #[serde(default, rename = "groupBy")]
    group_by: Vec<String>,
  },
  Where {
    name: String,
    #[serde(default)]
    parents: Vec<String>,
    lambda: String,
  },
  Window {
    name: String,
    #[serde(default)]
    parents: Vec<String>,
    #[serde(default)]
    period: Option<String>,
    #[serde(default)]
    every: Option<String>,
    #[serde(default)]
    align: bool,
  },
  Union {
    name: String,
    #[serde(default)]
    parents: Vec<String>,
    #[serde(default)]
    rename: String,
  },
}

impl From<RawNode> for NodeDefinition {
  fn from(raw: RawNode) -> Self {
    let (name, parents, kind) = match raw {
      RawNode::Stream { name, parents } => (name, parents, NodeKind::Stream),
      RawNode::Batch { name, parents } => (name, parents, NodeKind::Batch),
      RawNode::From {
        name,
        parents,
        database,
        retention_policy,
        measurement,
        group_by,
      } => (
        name,
        parents,
        NodeKind::From {
          database,
          retention_policy,
          measurement,
          group_by,
        },
      ),
      RawNode::Where {
        name,
        parents,
        lambda,
      } => (name, parents, NodeKind::Where { lambda }),
      RawNode::Window {
        name,
        parents,
        period,
        every,
        align,
      } => (
        name,
        parents,
        NodeKind::Window {
          period,
          every,
          align,
        },
      ),
      RawNode::Union {
        name,
        parents,
        rename,
      } => (name, parents, NodeKind::Union { rename }),
    };
    NodeDefinition {
      name,
      parents,
      kind,
    }
  }
}

/// A pipeline built from a definition, with its declared names.
#[derive(Debug)]
pub struct BuiltPipeline {
  pub pipeline: Pipeline,
  pub names: BTreeMap<String, NodeId>,
}

impl BuiltPipeline {
  /// Id of the node declared as `name`.
  pub fn id(&self, name: &str) -> Result<NodeId> {
    self
      .names
      .get(name)
      .copied()
      .ok_or_else(|| PipelineError::Definition(format!("no node named '{}'", name)))
  }
}

fn expect_parents(def: &NodeDefinition, kind: &str, min: usize, max: usize) -> Result<()> {
  let n = def.parents.len();
  if n < min || n > max {
    let wanted = if min == max {
      format!("{}", min)
    } else {
      format!("at least {}", min)
    };
    return Err(PipelineError::Definition(format!(
      "{} node '{}' needs {} parent(s), got {}",
      kind, def.name, wanted, n
    )));
  }
  Ok(())
}

impl PipelineDefinition {
  pub fn from_json(text: &str) -> Result<Self> {
    serde_json::from_str(text).map_err(|e| PipelineError::Definition(e.to_string()))
  }

  /// Builds with a fresh allocator starting at 0.
  pub fn build(&self) -> Result<BuiltPipeline> {
    self.build_with(Arc::new(IdAllocator::new()))
  }

  #[instrument(level = "trace", skip(self, ids), fields(nodes = self.nodes.len()))]
  pub fn build_with(&self, ids: Arc<IdAllocator>) -> Result<BuiltPipeline> {
    let mut pipeline = Pipeline::with_allocator(ids);
    let mut names: BTreeMap<String, NodeId> = BTreeMap::new();

    for def in &self.nodes {
      if names.contains_key(&def.name) {
        return Err(PipelineError::Definition(format!(
          "node '{}' declared twice",
          def.name
        )));
      }
      let parents = def
        .parents
        .iter()
        .map(|p| {
          names.get(p).copied().ok_or_else(|| {
            PipelineError::Definition(format!(
              "node '{}' references unknown parent '{}'",
              def.name, p
            ))
          })
        })
        .collect::<Result<Vec<_>>>()?;

      let id = match &def.kind {
        NodeKind::Stream => {
          expect_parents(def, "stream", 0, 0)?;
          pipeline.stream()?
        }
        NodeKind::Batch => {
          expect_parents(def, "batch", 0, 0)?;
          pipeline.batch()?
        }
        NodeKind::From {
          database,
          retention_policy,
          measurement,
          group_by,
        } => {
          expect_parents(def, "from", 1, 1)?;
          let id = pipeline.from(parents[0])?;
          pipeline.configure(id, |f: &mut FromNode| {
            f.database(database.as_str())
              .retention_policy(retention_policy.as_str())
              .measurement(measurement.as_str())
              .group_by(group_by.iter().cloned());
          })?;
          id
        }
        NodeKind::Where { lambda } => {
          expect_parents(def, "where", 1, 1)?;
          pipeline.where_(parents[0], lambda.as_str())?
        }
        NodeKind::Window {
          period,
          every,
          align,
        } => {
          expect_parents(def, "window", 1, 1)?;
          let period = period.as_deref().map(parse_duration).transpose()?;
          let every = every.as_deref().map(parse_duration).transpose()?;
          let id = pipeline.window(parents[0])?;
          pipeline.configure(id, |w: &mut WindowNode| {
            if let Some(period) = period {
              w.period(period);
            }
            if let Some(every) = every {
              w.every(every);
            }
            if *align {
              w.align();
            }
          })?;
          id
        }
        NodeKind::Union { rename } => {
          expect_parents(def, "union", 1, usize::MAX)?;
          let id = pipeline.union(parents[0], &parents[1..])?;
          pipeline.configure(id, |u: &mut UnionNode| {
            u.rename(rename.as_str());
          })?;
          id
        }
      };
      debug!(name = %def.name, node = %id, "declared");
      names.insert(def.name.clone(), id);
    }

    Ok(BuiltPipeline { pipeline, names })
  }
}
