//! The value exchanged between pipeline stages and persisted per turn.

use serde::{Deserialize, Serialize};

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
  Internal,
  Online,
}

/// The outcome of resolving one query.
///
/// Serialized untagged, so the wire shape is exactly one of
/// `{title, description, url, source[, similarity_score]}`, `{message}`, or
/// `{error}`. `similarity_score` is present only on answers produced by the
/// semantic ranker and is omitted from JSON otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolutionResult {
  Answer {
    title:       String,
    description: String,
    url:         String,
    source:      Source,
    #[serde(skip_serializing_if = "Option::is_none")]
    similarity_score: Option<f32>,
  },
  Message { message: String },
  Failure { error: String },
}

impl ResolutionResult {
  pub fn message(text: impl Into<String>) -> Self {
    Self::Message { message: text.into() }
  }

  pub fn failure(text: impl Into<String>) -> Self {
    Self::Failure { error: text.into() }
  }

  pub fn is_answer(&self) -> bool { matches!(self, Self::Answer { .. }) }

  /// Apply `f` to the description, if this result carries one.
  pub fn map_description(self, f: impl FnOnce(&str) -> String) -> Self {
    match self {
      Self::Answer {
        title,
        description,
        url,
        source,
        similarity_score,
      } => Self::Answer {
        title,
        description: f(&description),
        url,
        source,
        similarity_score,
      },
      other => other,
    }
  }
}
