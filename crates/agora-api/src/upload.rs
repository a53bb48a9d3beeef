//! Handler for `POST /upload` — multipart CSV corpus ingestion.
//!
//! Each file is classified by name ("case" or "method"), cleaned, and then
//! swapped into its corpus table in one transaction. Files are processed
//! independently; one bad file does not fail the batch.

use agora_core::{
  service::{EmbeddingService, IntentService, SearchService},
  store::{ChatStore, CorpusStore},
};
use axum::{
  Json,
  extract::{Multipart, State},
};
use serde::Serialize;

use crate::{AppState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct UploadStatus {
  pub filename: String,
  pub status:   &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub detail:   Option<String>,
}

/// `POST /upload` — multipart form data, one part per CSV file.
pub async fn handler<S, I, E, W>(
  State(state): State<AppState<S, I, E, W>>,
  mut multipart: Multipart,
) -> Result<Json<Vec<UploadStatus>>, ApiError>
where
  S: CorpusStore + ChatStore,
  I: IntentService,
  E: EmbeddingService,
  W: SearchService,
{
  let mut results = Vec::new();

  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| ApiError::BadRequest(e.to_string()))?
  {
    let filename = field.file_name().unwrap_or_default().to_owned();
    let data = field
      .bytes()
      .await
      .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    results.push(ingest_file(&state, &filename, &data).await);
  }

  if results.is_empty() {
    return Err(ApiError::BadRequest("no files provided".to_owned()));
  }

  Ok(Json(results))
}

async fn ingest_file<S, I, E, W>(
  state: &AppState<S, I, E, W>,
  filename: &str,
  data: &[u8],
) -> UploadStatus
where
  S: CorpusStore + ChatStore,
  I: IntentService,
  E: EmbeddingService,
  W: SearchService,
{
  if !filename.to_lowercase().ends_with(".csv") {
    return UploadStatus {
      filename: filename.to_owned(),
      status:   "invalid file type",
      detail:   None,
    };
  }

  let Some(kind) = agora_ingest::kind_from_filename(filename) else {
    return UploadStatus {
      filename: filename.to_owned(),
      status:   "failed",
      detail:   Some("filename does not identify a case or method dataset".to_owned()),
    };
  };

  let dataset = match agora_ingest::clean_csv(kind, data) {
    Ok(dataset) => dataset,
    Err(e) => {
      return UploadStatus {
        filename: filename.to_owned(),
        status:   "failed",
        detail:   Some(e.to_string()),
      };
    }
  };

  let loaded = dataset.records.len();
  let skipped = dataset.skipped;

  match state.store.replace_records(kind, dataset.records).await {
    Ok(()) => {
      tracing::info!(filename, ?kind, loaded, skipped, "corpus replaced");
      UploadStatus {
        filename: filename.to_owned(),
        status:   "processed",
        detail:   Some(format!("{loaded} rows loaded, {skipped} skipped")),
      }
    }
    Err(e) => {
      tracing::error!(error = %e, filename, "corpus load failed");
      UploadStatus {
        filename: filename.to_owned(),
        status:   "failed",
        detail:   Some("database error".to_owned()),
      }
    }
  }
}
