//! JSON HTTP API for agora.
//!
//! Exposes an axum [`Router`] backed by any store implementing the core
//! traits plus the three pipeline services. TLS and deployment concerns are
//! the caller's responsibility.

pub mod error;
pub mod feedback;
pub mod query;
pub mod sessions;
pub mod upload;

use std::{path::PathBuf, sync::Arc};

use agora_core::{
  service::{EmbeddingService, IntentService, SearchService},
  store::{ChatStore, CorpusStore},
};
use agora_engine::ResolutionPipeline;
use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub database_path:     PathBuf,
  pub language_base_url: String,
  pub language_api_key:  String,
  pub chat_model:        String,
  pub embedding_model:   String,
  pub search_base_url:   String,
  pub search_api_key:    String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, I, E, W> {
  pub store:    Arc<S>,
  pub pipeline: Arc<ResolutionPipeline<S, I, E, W>>,
}

impl<S, I, E, W> Clone for AppState<S, I, E, W> {
  fn clone(&self) -> Self {
    Self {
      store:    self.store.clone(),
      pipeline: self.pipeline.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full API router for `state`.
pub fn router<S, I, E, W>(state: AppState<S, I, E, W>) -> Router
where
  S: CorpusStore + ChatStore + 'static,
  I: IntentService + 'static,
  E: EmbeddingService + 'static,
  W: SearchService + 'static,
{
  Router::new()
    .route("/", get(health))
    .route("/query", post(query::handler::<S, I, E, W>))
    .route("/start_new_chat", post(sessions::start_new_chat::<S, I, E, W>))
    .route("/get_chat_sessions", get(sessions::list_sessions::<S, I, E, W>))
    .route("/get_chat_history", get(sessions::chat_history::<S, I, E, W>))
    .route("/feedback", post(feedback::handler::<S, I, E, W>))
    .route("/upload", post(upload::handler::<S, I, E, W>))
    .with_state(state)
}

/// `GET /` — liveness probe.
async fn health() -> &'static str { "Server is running!" }
