//! Handler for `POST /feedback`.

use agora_core::{
  service::{EmbeddingService, IntentService, SearchService},
  store::{ChatStore, CorpusStore},
};
use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct FeedbackBody {
  pub user_id:  String,
  pub feedback: String,
}

/// `POST /feedback {user_id, feedback}`
///
/// Attaches the feedback to the most recent turn of the caller's current
/// session; 400 when there is no such turn.
pub async fn handler<S, I, E, W>(
  State(state): State<AppState<S, I, E, W>>,
  Json(body): Json<FeedbackBody>,
) -> Result<Json<Value>, ApiError>
where
  S: CorpusStore + ChatStore,
  I: IntentService,
  E: EmbeddingService,
  W: SearchService,
{
  let attached = state
    .store
    .attach_feedback(&body.user_id, &body.feedback)
    .await
    .map_err(ApiError::internal)?;

  if !attached {
    return Err(ApiError::BadRequest(
      "no active chat session found to attach feedback".to_owned(),
    ));
  }

  Ok(Json(json!({ "message": "Feedback recorded. Thank you!" })))
}
