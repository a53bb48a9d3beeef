//! Storage trait seams implemented by backends (e.g. `agora-store-sqlite`).
//!
//! Higher layers (`agora-engine`, `agora-api`) depend on these abstractions,
//! not on any concrete backend.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use uuid::Uuid;

use crate::{
  chat::{Session, Turn},
  corpus::{CorpusKind, CorpusRecord},
  result::ResolutionResult,
};

// ─── Corpus ──────────────────────────────────────────────────────────────────

/// Read (and bulk-replace) access to the corpus tables.
///
/// Rows are written only by ingestion; the resolution pipeline never writes.
pub trait CorpusStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch a record by its externally-assigned id. `None` if absent.
  fn get_record(
    &self,
    kind: CorpusKind,
    id: i64,
  ) -> impl Future<Output = Result<Option<CorpusRecord>, Self::Error>> + Send + '_;

  /// All records of a corpus, in ascending-id order ("corpus order").
  fn list_records(
    &self,
    kind: CorpusKind,
  ) -> impl Future<Output = Result<Vec<CorpusRecord>, Self::Error>> + Send + '_;

  /// Atomically replace the full contents of a corpus table.
  ///
  /// Ingestion only; expected to run without concurrent query traffic.
  fn replace_records(
    &self,
    kind: CorpusKind,
    rows: Vec<CorpusRecord>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Chat ────────────────────────────────────────────────────────────────────

/// Persistence for sessions and the turns they own.
///
/// A session exclusively owns its turns; deleting a session deletes them.
pub trait ChatStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Resolve the session a query should be recorded under.
  ///
  /// With `session_id` set, the session is fetched and checked against
  /// `user_id`; `None` means unknown, or owned by someone else. Without it,
  /// the user's most recent session is returned, or a fresh one is created.
  fn get_or_create_session<'a>(
    &'a self,
    user_id: &'a str,
    session_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Option<Session>, Self::Error>> + Send + 'a;

  /// Create a fresh session for the user, unconditionally.
  fn start_new_session<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + 'a;

  /// Persist one turn in a single transaction.
  ///
  /// Also assigns the session title from `query` if it is still unset; that
  /// mutation happens at most once over a session's lifetime. Failures here
  /// must surface to the caller, since a lost turn breaks history integrity.
  fn record_turn<'a>(
    &'a self,
    session_id: Uuid,
    query: &'a str,
    response: &'a ResolutionResult,
  ) -> impl Future<Output = Result<Turn, Self::Error>> + Send + 'a;

  /// Sessions owned by `user_id`, newest first.
  fn list_sessions<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Session>, Self::Error>> + Send + 'a;

  /// Turns of a session in creation order, for replay.
  fn list_turns(
    &self,
    session_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Turn>, Self::Error>> + Send + '_;

  /// Attach feedback to the most recent turn of the user's most recent
  /// session. Returns `false` when there is no such turn.
  fn attach_feedback<'a>(
    &'a self,
    user_id: &'a str,
    feedback: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Delete a session and, by cascade, all of its turns.
  /// Returns `false` if the session did not exist.
  fn delete_session(
    &self,
    session_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
