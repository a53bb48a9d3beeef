//! agora server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, builds the hosted-service clients, and serves the JSON API over
//! HTTP.

use std::sync::Arc;

use agora_api::{AppState, ServerConfig};
use agora_clients::{LanguageClient, LanguageConfig, WebSearchClient, WebSearchConfig};
use agora_engine::ResolutionPipeline;
use agora_store_sqlite::SqliteStore;
use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "agora corpus question-answering server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: std::path::PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("AGORA"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open the SQLite store.
  let store = SqliteStore::open(&server_cfg.database_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.database_path))?;
  let store = Arc::new(store);

  // Build the hosted-service clients. One language client covers both
  // classification and embeddings.
  let language = LanguageClient::new(LanguageConfig {
    base_url:        server_cfg.language_base_url.clone(),
    api_key:         server_cfg.language_api_key.clone(),
    chat_model:      server_cfg.chat_model.clone(),
    embedding_model: server_cfg.embedding_model.clone(),
  })
  .context("failed to build language client")?;

  let web = WebSearchClient::new(WebSearchConfig {
    base_url: server_cfg.search_base_url.clone(),
    api_key:  server_cfg.search_api_key.clone(),
  })
  .context("failed to build web search client")?;

  let pipeline = ResolutionPipeline::new(store.clone(), language.clone(), language, web);

  let state = AppState {
    store,
    pipeline: Arc::new(pipeline),
  };

  let app = agora_api::router(state).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
