//! Tests for `definition`.

use std::sync::Arc;
use std::time::Duration;

use crate::definition::{NodeKind, PipelineDefinition};
use crate::error::PipelineError;
use crate::nodes::{FromNode, UnionNode, WindowNode};
use crate::types::{IdAllocator, NodeId};

const USER_ACTIONS: &str = r#"{
  "nodes": [
    {"name": "src", "kind": "stream"},
    {"name": "logins", "kind": "from", "parents": ["src"], "measurement": "logins"},
    {"name": "logouts", "kind": "from", "parents": ["src"], "measurement": "logouts"},
    {"name": "frontpage", "kind": "from", "parents": ["src"], "measurement": "frontpage"},
    {"name": "all", "kind": "union", "parents": ["logins", "logouts", "frontpage"], "rename": "user_actions"},
    {"name": "w", "kind": "window", "parents": ["all"], "period": "10m", "every": "1m", "align": true}
  ]
}"#;

fn definition_error(text: &str) -> String {
  let def = PipelineDefinition::from_json(text).unwrap();
  match def.build().unwrap_err() {
    PipelineError::Definition(msg) => msg,
    other => panic!("unexpected error {:?}", other),
  }
}

#[test]
fn from_json_parses_kinds() {
  let def = PipelineDefinition::from_json(USER_ACTIONS).unwrap();
  assert_eq!(def.nodes.len(), 6);
  assert_eq!(def.nodes[0].kind, NodeKind::Stream);
  assert!(def.nodes[0].parents.is_empty());
  assert_eq!(
    def.nodes[4].kind,
    NodeKind::Union {
      rename: "user_actions".to_string()
    }
  );
}

#[test]
fn from_json_rejects_unknown_kind() {
  let err = PipelineDefinition::from_json(r#"{"nodes":[{"name":"x","kind":"shift"}]}"#).unwrap_err();
  assert!(matches!(err, PipelineError::Definition(_)));
}

#[test]
fn build_replays_in_order() {
  let built = PipelineDefinition::from_json(USER_ACTIONS)
    .unwrap()
    .build()
    .unwrap();
  let p = &built.pipeline;
  assert_eq!(built.id("src").unwrap(), NodeId(0));
  assert_eq!(built.id("w").unwrap(), NodeId(5));

  let all = built.id("all").unwrap();
  assert_eq!(
    p.node(all).unwrap().parents(),
    &[
      built.id("logins").unwrap(),
      built.id("logouts").unwrap(),
      built.id("frontpage").unwrap()
    ]
  );
  assert_eq!(p.get::<UnionNode>(all).unwrap().rename, "user_actions");
  assert_eq!(
    p.get::<FromNode>(built.id("logouts").unwrap()).unwrap().measurement,
    "logouts"
  );

  let w = p.get::<WindowNode>(built.id("w").unwrap()).unwrap();
  assert_eq!(w.period, Duration::from_secs(600));
  assert_eq!(w.every, Duration::from_secs(60));
  assert!(w.align);
  assert!(p.validate().is_ok());
}

#[test]
fn build_with_seeded_allocator() {
  let built = PipelineDefinition::from_json(USER_ACTIONS)
    .unwrap()
    .build_with(Arc::new(IdAllocator::starting_at(100)))
    .unwrap();
  assert_eq!(built.id("src").unwrap(), NodeId(100));
}

#[test]
fn union_children_become_arguments() {
  let text = r#"{"nodes":[
    {"name": "src", "kind": "stream"},
    {"name": "a", "kind": "from", "parents": ["src"], "measurement": "a"},
    {"name": "u", "kind": "union", "parents": ["a"]},
    {"name": "b", "kind": "where", "parents": ["u"], "lambda": "TRUE"}
  ]}"#;
  let built = PipelineDefinition::from_json(text).unwrap().build().unwrap();
  assert_eq!(
    built.pipeline.tick(built.id("u").unwrap()).unwrap(),
    "|union(|where(lambda: TRUE))"
  );
}

#[test]
fn unknown_name_lookup() {
  let built = PipelineDefinition::default().build().unwrap();
  assert!(built.pipeline.is_empty());
  assert!(matches!(built.id("nope"), Err(PipelineError::Definition(_))));
}

#[test]
fn rejects_unknown_parent() {
  let msg = definition_error(r#"{"nodes":[{"name":"f","kind":"from","parents":["src"]}]}"#);
  assert_eq!(msg, "node 'f' references unknown parent 'src'");
}

#[test]
fn rejects_forward_reference() {
  let msg = definition_error(
    r#"{"nodes":[
      {"name":"f","kind":"from","parents":["src"]},
      {"name":"src","kind":"stream"}
    ]}"#,
  );
  assert!(msg.contains("unknown parent 'src'"));
}

#[test]
fn rejects_duplicate_name() {
  let msg = definition_error(
    r#"{"nodes":[{"name":"s","kind":"stream"},{"name":"s","kind":"batch"}]}"#,
  );
  assert_eq!(msg, "node 's' declared twice");
}

#[test]
fn rejects_wrong_parent_count() {
  let msg = definition_error(
    r#"{"nodes":[{"name":"s","kind":"stream"},{"name":"t","kind":"stream","parents":["s"]}]}"#,
  );
  assert_eq!(msg, "stream node 't' needs 0 parent(s), got 1");

  let msg = definition_error(r#"{"nodes":[{"name":"u","kind":"union"}]}"#);
  assert_eq!(msg, "union node 'u' needs at least 1 parent(s), got 0");
}

#[test]
fn rejects_bad_duration() {
  let def = PipelineDefinition::from_json(
    r#"{"nodes":[
      {"name":"s","kind":"stream"},
      {"name":"w","kind":"window","parents":["s"],"period":"ten minutes"}
    ]}"#,
  )
  .unwrap();
  assert!(matches!(
    def.build().unwrap_err(),
    PipelineError::InvalidDuration(_)
  ));
}

#[test]
fn from_json_rejects_misspelled_field() {
  let err = PipelineDefinition::from_json(
    r#"{"nodes":[
      {"name":"s","kind":"stream"},
      {"name":"f","kind":"from","parents":["s"],"measurment":"cpu"}
    ]}"#,
  )
  .unwrap_err();
  match err {
    PipelineError::Definition(msg) => {
      assert!(msg.contains("unknown field `measurment`"), "{}", msg)
    }
    other => panic!("unexpected error {:?}", other),
  }
}

#[test]
fn from_json_rejects_field_of_another_kind() {
  let err = PipelineDefinition::from_json(
    r#"{"nodes":[{"name":"s","kind":"stream","rename":"x"}]}"#,
  )
  .unwrap_err();
  assert!(matches!(err, PipelineError::Definition(msg) if msg.contains("unknown field `rename`")));
}

#[test]
fn serialized_definition_reads_back() {
  let def = PipelineDefinition::from_json(USER_ACTIONS).unwrap();
  let text = serde_json::to_string(&def).unwrap();
  assert!(text.contains(r#""retentionPolicy":"""#));
  assert_eq!(PipelineDefinition::from_json(&text).unwrap(), def);
}
