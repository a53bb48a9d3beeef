//! Explicit `case N` / `method N` reference extraction.
//!
//! Token boundaries are required on both sides, so "case 12" matches inside
//! any sentence but "staircase 12" and "case 12b" do not.

use std::sync::LazyLock;

use regex::Regex;

static CASE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)\bcase\s+(\d+)\b").expect("case pattern"));

static METHOD_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)\bmethod\s+(\d+)\b").expect("method pattern"));

fn capture_id(re: &Regex, query: &str) -> Option<i64> {
  re.captures(query)
    .and_then(|caps| caps.get(1))
    .and_then(|id| id.as_str().parse().ok())
}

/// Id of an explicit `case N` mention, if present.
pub fn case_reference(query: &str) -> Option<i64> { capture_id(&CASE_RE, query) }

/// Id of an explicit `method N` mention, if present.
pub fn method_reference(query: &str) -> Option<i64> { capture_id(&METHOD_RE, query) }
