//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and session ids as hyphenated
//! lowercase UUIDs. Turn responses are the serialized `ResolutionResult`
//! JSON, stored and replayed verbatim so a re-read turn equals the value the
//! caller originally received.

use agora_core::{
  chat::{Session, Turn},
  result::ResolutionResult,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── ResolutionResult ────────────────────────────────────────────────────────

pub fn encode_response(response: &ResolutionResult) -> Result<String> {
  Ok(serde_json::to_string(response)?)
}

pub fn decode_response(s: &str) -> Result<ResolutionResult> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `chat_sessions` row.
pub struct RawSession {
  pub session_id: String,
  pub user_id:    String,
  pub title:      Option<String>,
  pub created_at: String,
}

impl RawSession {
  pub fn into_session(self) -> Result<Session> {
    Ok(Session {
      session_id: decode_uuid(&self.session_id)?,
      user_id:    self.user_id,
      title:      self.title,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `chat_histories` row.
pub struct RawTurn {
  pub turn_id:    i64,
  pub session_id: String,
  pub query:      String,
  pub response:   String,
  pub feedback:   Option<String>,
  pub created_at: String,
}

impl RawTurn {
  pub fn into_turn(self) -> Result<Turn> {
    Ok(Turn {
      turn_id:    self.turn_id,
      session_id: decode_uuid(&self.session_id)?,
      query:      self.query,
      response:   decode_response(&self.response)?,
      feedback:   self.feedback,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
