//! Tests for `script`.

use crate::script::{property, quoted_list, single_quote};

#[test]
fn single_quote_plain() {
  assert_eq!(single_quote("user_actions"), "'user_actions'");
}

#[test]
fn single_quote_empty() {
  assert_eq!(single_quote(""), "''");
}

#[test]
fn single_quote_escapes_quote() {
  assert_eq!(single_quote("bob's"), r"'bob\'s'");
}

#[test]
fn single_quote_escapes_backslash() {
  assert_eq!(single_quote(r"a\b"), r"'a\\b'");
}

#[test]
fn quoted_list_joins() {
  assert_eq!(quoted_list(&["host", "region"]), "'host', 'region'");
  assert_eq!(quoted_list::<&str>(&[]), "");
}

#[test]
fn property_appends_call() {
  let mut buf = String::from("|from()");
  property(&mut buf, "measurement", "'cpu'");
  assert_eq!(buf, "|from().measurement('cpu')");
}
