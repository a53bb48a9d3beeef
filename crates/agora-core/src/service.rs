//! Trait seams for the hosted services the pipeline calls.
//!
//! Implemented over HTTP in `agora-clients`; tests substitute stubs. Every
//! method is a single awaited call with no retry; recovering from failure is
//! the pipeline's job, not the client's.

use std::future::Future;

/// Labels a query as `case`, `method`, or `general`.
///
/// Returns the service's raw label. Trimming, lowercasing, and coercion of
/// unknown labels happen in the pipeline.
pub trait IntentService: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn classify<'a>(
    &'a self,
    query: &'a str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}

/// Produces a fixed-length vector representation of a text string.
pub trait EmbeddingService: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn embed<'a>(
    &'a self,
    text: &'a str,
  ) -> impl Future<Output = Result<Vec<f32>, Self::Error>> + Send + 'a;
}

/// The top organic result of an external web search.
#[derive(Debug, Clone)]
pub struct WebHit {
  pub title:   String,
  pub snippet: String,
  pub link:    String,
}

/// Ranked external search over the public web.
pub trait SearchService: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// `None` when the search succeeded but returned no organic results.
  fn top_result<'a>(
    &'a self,
    query: &'a str,
  ) -> impl Future<Output = Result<Option<WebHit>, Self::Error>> + Send + 'a;
}
