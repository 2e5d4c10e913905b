//! Tests for `UnionNode`.

use std::sync::Arc;

use serde_json::json;

use super::{FromNode, UnionNode};
use crate::node::Node;
use crate::pipeline::Pipeline;
use crate::types::{EdgeType, IdAllocator, NodeId};

/// stream with three `from` nodes below it: logins, logouts, frontpage.
fn user_actions() -> (Pipeline, NodeId, NodeId, NodeId) {
  let mut p = Pipeline::new();
  let stream = p.stream().unwrap();
  let mut from = |name: &str| {
    let id = p.from(stream).unwrap();
    p.configure(id, |f: &mut FromNode| {
      f.measurement(name);
    })
    .unwrap();
    id
  };
  let a = from("logins");
  let b = from("logouts");
  let c = from("frontpage");
  (p, a, b, c)
}

#[test]
fn new_uses_same_edge_type_both_sides() {
  let u = UnionNode::new(NodeId(4), EdgeType::Batch);
  assert_eq!(u.id(), NodeId(4));
  assert_eq!(u.desc(), "union");
  assert_eq!(u.input_edge_type(), EdgeType::Batch);
  assert_eq!(u.output_edge_type(), EdgeType::Batch);
  assert!(u.rename.is_empty());
}

#[test]
fn rename_chains() {
  let mut u = UnionNode::new(NodeId(0), EdgeType::Stream);
  u.rename("first").rename("second");
  assert_eq!(u.rename, "second");
}

#[test]
fn new_union_becomes_child_of_every_parent_in_order() {
  let (mut p, a, b, c) = user_actions();
  let u = p.new_union(EdgeType::Stream, &[c, a, b]).unwrap();
  assert_eq!(p.node(u).unwrap().parents(), &[c, a, b]);
  for parent in [a, b, c] {
    assert_eq!(p.node(parent).unwrap().children(), &[u]);
  }
}

#[test]
fn new_union_with_unknown_parent_inserts_nothing() {
  let (mut p, a, _, _) = user_actions();
  let before = p.len();
  let next = p.allocator().peek();
  assert!(p.new_union(EdgeType::Stream, &[a, NodeId(999)]).is_err());
  assert_eq!(p.len(), before);
  assert_eq!(p.allocator().peek(), next);
  assert!(p.node(a).unwrap().children().is_empty());
}

#[test]
fn empty_union_ticks_bare_call() {
  let (mut p, a, _, _) = user_actions();
  let u = p.new_union(EdgeType::Stream, &[a]).unwrap();
  assert_eq!(p.tick(u).unwrap(), "|union()");
}

#[test]
fn union_ticks_children_as_arguments() {
  let (mut p, a, b, c) = user_actions();
  let u = p.new_union(EdgeType::Stream, &[a]).unwrap();
  p.link_child(u, b).unwrap();
  p.link_child(u, c).unwrap();
  p.configure(u, |u: &mut UnionNode| {
    u.rename("user_actions");
  })
  .unwrap();

  let tb = p.tick(b).unwrap();
  let tc = p.tick(c).unwrap();
  assert_eq!(
    p.tick(u).unwrap(),
    format!("|union({}, {}).rename('user_actions')", tb, tc)
  );
  assert_eq!(
    p.tick(u).unwrap(),
    "|union(|from().measurement('logouts'), |from().measurement('frontpage')).rename('user_actions')"
  );
}

#[test]
fn union_ignores_parents_in_script_form() {
  let (mut p, a, b, c) = user_actions();
  let u = p.union(a, &[b, c]).unwrap();
  assert_eq!(p.tick(u).unwrap(), "|union()");
}

#[test]
fn rename_with_quote_is_escaped() {
  let (mut p, a, _, _) = user_actions();
  let u = p.union(a, &[]).unwrap();
  p.configure(u, |u: &mut UnionNode| {
    u.rename("bob's");
  })
  .unwrap();
  assert_eq!(p.tick(u).unwrap(), r"|union().rename('bob\'s')");
}

#[test]
fn marshal_has_type_id_rename_and_children() {
  let (mut p, a, b, _) = user_actions();
  let u = p.union(a, &[]).unwrap();
  p.link_child(u, b).unwrap();
  p.configure(u, |u: &mut UnionNode| {
    u.rename("user_actions");
  })
  .unwrap();

  let doc = p.marshal(u).unwrap();
  assert_eq!(
    doc,
    json!({
      "type": "union",
      "nodeID": u.to_string(),
      "rename": "user_actions",
      "children": [p.marshal(b).unwrap()],
    })
  );
}

#[test]
fn marshal_keeps_empty_rename() {
  let (mut p, a, _, _) = user_actions();
  let u = p.union(a, &[]).unwrap();
  let doc = p.marshal(u).unwrap();
  assert_eq!(doc["rename"], "");
  assert_eq!(doc["children"], json!([]));
}

#[test]
fn identical_unions_differ_only_in_node_id() {
  let ids = Arc::new(IdAllocator::starting_at(10));
  let build = |ids: Arc<IdAllocator>| {
    let mut p = Pipeline::with_allocator(ids);
    let s = p.stream().unwrap();
    let u = p.union(s, &[]).unwrap();
    let f = p.from(s).unwrap();
    p.link_child(u, f).unwrap();
    p.configure(u, |u: &mut UnionNode| {
      u.rename("merged");
    })
    .unwrap();
    (p, u)
  };
  let (p1, u1) = build(Arc::clone(&ids));
  let (p2, u2) = build(ids);
  assert_ne!(u1, u2);

  assert_eq!(p1.tick(u1).unwrap(), p2.tick(u2).unwrap());

  let mut d1 = p1.marshal(u1).unwrap();
  let mut d2 = p2.marshal(u2).unwrap();
  assert_eq!(d1["nodeID"], u1.to_string());
  assert_eq!(d2["nodeID"], u2.to_string());
  d1["nodeID"] = json!(null);
  d2["nodeID"] = json!(null);
  d1["children"][0]["nodeID"] = json!(null);
  d2["children"][0]["nodeID"] = json!(null);
  assert_eq!(d1, d2);
}
