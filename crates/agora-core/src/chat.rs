//! Session and turn types, the durable conversation model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::result::ResolutionResult;

/// Maximum length, in characters, of an auto-assigned session title.
pub const SESSION_TITLE_MAX_CHARS: usize = 64;

/// A durable, user-scoped conversation context.
///
/// `title` starts unset and is assigned at most once, from the first query
/// recorded under the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
  pub session_id: Uuid,
  pub user_id:    String,
  pub title:      Option<String>,
  pub created_at: DateTime<Utc>,
}

/// One persisted query/response exchange.
///
/// Never mutated after insertion, except to attach user feedback. The
/// response is the literal value the pipeline returned for the query; it is
/// never re-derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
  pub turn_id:    i64,
  pub session_id: Uuid,
  pub query:      String,
  pub response:   ResolutionResult,
  pub feedback:   Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Derive the auto-assigned title for a session from its first query.
pub fn session_title_from_query(query: &str) -> String {
  query.chars().take(SESSION_TITLE_MAX_CHARS).collect()
}
