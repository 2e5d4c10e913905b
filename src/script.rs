//! Helpers for writing TICKscript literals.

/// Renders `s` as a single-quoted TICKscript string literal.
///
/// Backslashes and single quotes are escaped so the literal always closes
/// where the renderer intends it to.
pub fn single_quote(s: &str) -> String {
  let mut out = String::with_capacity(s.len() + 2);
  out.push('\'');
  for c in s.chars() {
    match c {
      '\\' => out.push_str("\\\\"),
      '\'' => out.push_str("\\'"),
      _ => out.push(c),
    }
  }
  out.push('\'');
  out
}

/// Renders a list of string literals separated by `", "`.
pub fn quoted_list<S: AsRef<str>>(items: &[S]) -> String {
  items
    .iter()
    .map(|s| single_quote(s.as_ref()))
    .collect::<Vec<_>>()
    .join(", ")
}

/// Appends `.name(args)` to `buf`.
pub(crate) fn property(buf: &mut String, name: &str, args: &str) {
  buf.push('.');
  buf.push_str(name);
  buf.push('(');
  buf.push_str(args);
  buf.push(')');
}
