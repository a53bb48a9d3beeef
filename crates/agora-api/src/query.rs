//! Handler for `POST /query` — one full pipeline run per request.

use agora_core::{
  result::ResolutionResult,
  service::{EmbeddingService, IntentService, SearchService},
  store::{ChatStore, CorpusStore},
};
use axum::{Json, extract::State};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct QueryBody {
  pub query:      String,
  pub user_id:    String,
  /// Record under this session instead of the user's most recent one.
  pub session_id: Option<Uuid>,
}

/// `POST /query {query, user_id, session_id?}`
///
/// Resolves the query, persists the turn, and returns the exact value that
/// was persisted.
pub async fn handler<S, I, E, W>(
  State(state): State<AppState<S, I, E, W>>,
  Json(body): Json<QueryBody>,
) -> Result<Json<ResolutionResult>, ApiError>
where
  S: CorpusStore + ChatStore,
  I: IntentService,
  E: EmbeddingService,
  W: SearchService,
{
  let session = state
    .store
    .get_or_create_session(&body.user_id, body.session_id)
    .await
    .map_err(ApiError::internal)?
    .ok_or_else(|| {
      // Only reachable with an explicit reference: unknown id, or a session
      // owned by someone else.
      ApiError::NotFound("session not found".to_owned())
    })?;

  let resolved = state
    .pipeline
    .resolve(&body.query)
    .await
    .map_err(ApiError::internal)?;

  if resolved.classification_degraded {
    tracing::warn!(user_id = %body.user_id, "intent classification degraded for this query");
  }

  let turn = state
    .store
    .record_turn(session.session_id, &body.query, &resolved.result)
    .await
    .map_err(ApiError::internal)?;

  tracing::info!(
    session_id = %session.session_id,
    turn_id = turn.turn_id,
    intent = ?resolved.intent,
    "query resolved"
  );

  Ok(Json(resolved.result))
}
