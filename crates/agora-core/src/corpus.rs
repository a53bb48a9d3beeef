//! Corpus records and the closed set of corpora the pipeline can search.

use serde::{Deserialize, Serialize};

/// Which corpus a record or a lookup refers to.
///
/// A closed set: resolution code matches on the variant instead of
/// dispatching on table names at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorpusKind {
  Case,
  Method,
}

impl CorpusKind {
  /// The backing SQL table for this corpus.
  pub fn table(self) -> &'static str {
    match self {
      Self::Case => "cases",
      Self::Method => "methods",
    }
  }
}

/// One corpus row. Ids are assigned by the source dataset, not by the store;
/// rows are immutable after ingestion and read-only to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusRecord {
  pub id:          i64,
  pub title:       String,
  pub description: Option<String>,
  pub url:         String,
}

impl CorpusRecord {
  /// The text the semantic ranker embeds for this record.
  pub fn embedding_text(&self) -> String {
    format!(
      "{} {}",
      self.title,
      self.description.as_deref().unwrap_or_default()
    )
  }
}

/// The coarse category assigned to a query. It selects which corpus, if any,
/// the semantic ranker searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
  Case,
  Method,
  General,
}

impl Intent {
  /// Parse a classifier label. Anything but the three known labels is
  /// `None`; callers coerce that to [`Intent::General`].
  pub fn from_label(label: &str) -> Option<Self> {
    match label {
      "case" => Some(Self::Case),
      "method" => Some(Self::Method),
      "general" => Some(Self::General),
      _ => None,
    }
  }

  /// The corpus this intent selects, if any.
  pub fn corpus_kind(self) -> Option<CorpusKind> {
    match self {
      Self::Case => Some(CorpusKind::Case),
      Self::Method => Some(CorpusKind::Method),
      Self::General => None,
    }
  }
}
