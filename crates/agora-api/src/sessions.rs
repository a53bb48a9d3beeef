//! Handlers for session lifecycle and history replay.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/start_new_chat` | Body: `{"user_id": "..."}` |
//! | `GET`  | `/get_chat_sessions` | `?user_id=`; newest first |
//! | `GET`  | `/get_chat_history` | `?session_id=`; creation order |

use agora_core::{
  result::ResolutionResult,
  service::{EmbeddingService, IntentService, SearchService},
  store::{ChatStore, CorpusStore},
};
use axum::{
  Json,
  extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Start new chat ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartChatBody {
  pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct StartChatReply {
  pub session_id: Uuid,
}

/// `POST /start_new_chat` — body: `{"user_id": "..."}`
pub async fn start_new_chat<S, I, E, W>(
  State(state): State<AppState<S, I, E, W>>,
  Json(body): Json<StartChatBody>,
) -> Result<Json<StartChatReply>, ApiError>
where
  S: CorpusStore + ChatStore,
  I: IntentService,
  E: EmbeddingService,
  W: SearchService,
{
  let session = state
    .store
    .start_new_session(&body.user_id)
    .await
    .map_err(ApiError::internal)?;
  Ok(Json(StartChatReply {
    session_id: session.session_id,
  }))
}

// ─── List sessions ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SessionsParams {
  pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
  pub id:    Uuid,
  pub title: Option<String>,
}

/// `GET /get_chat_sessions?user_id=...`
pub async fn list_sessions<S, I, E, W>(
  State(state): State<AppState<S, I, E, W>>,
  Query(params): Query<SessionsParams>,
) -> Result<Json<Vec<SessionSummary>>, ApiError>
where
  S: CorpusStore + ChatStore,
  I: IntentService,
  E: EmbeddingService,
  W: SearchService,
{
  let sessions = state
    .store
    .list_sessions(&params.user_id)
    .await
    .map_err(ApiError::internal)?;

  Ok(Json(
    sessions
      .into_iter()
      .map(|s| SessionSummary {
        id:    s.session_id,
        title: s.title,
      })
      .collect(),
  ))
}

// ─── Chat history ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
  pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct HistoryEntry {
  pub query:    String,
  pub response: ResolutionResult,
}

/// `GET /get_chat_history?session_id=...`
pub async fn chat_history<S, I, E, W>(
  State(state): State<AppState<S, I, E, W>>,
  Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError>
where
  S: CorpusStore + ChatStore,
  I: IntentService,
  E: EmbeddingService,
  W: SearchService,
{
  let turns = state
    .store
    .list_turns(params.session_id)
    .await
    .map_err(ApiError::internal)?;

  Ok(Json(
    turns
      .into_iter()
      .map(|t| HistoryEntry {
        query:    t.query,
        response: t.response,
      })
      .collect(),
  ))
}
