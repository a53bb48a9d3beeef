//! The query-resolution pipeline.
//!
//! One run per inbound query, sequential: greeting short-circuit,
//! normalization, intent classification, exact-identifier lookup, semantic
//! ranking over the intent-selected corpus, then the online fallback. Each
//! stage absorbs its own service failures and degrades to "no result from
//! this stage"; only corpus storage errors propagate to the caller.

use std::sync::Arc;

use agora_core::{
  corpus::{CorpusKind, CorpusRecord, Intent},
  result::{ResolutionResult, Source},
  service::{EmbeddingService, IntentService, SearchService},
  store::CorpusStore,
};
use agora_text::{
  capitalize_sentences, case_reference, cosine_similarity, is_greeting,
  method_reference, normalize_query,
};

/// Canned reply for small-talk queries.
pub const GREETING_REPLY: &str = "Hello! How can I assist you today?";

/// Terminal reply when neither the corpus nor the web produced anything.
pub const NO_INFORMATION_MESSAGE: &str = "No information found.";

/// The outcome of one pipeline run, including internal observability signals
/// the transport layer logs but never serializes.
#[derive(Debug, Clone)]
pub struct Resolved {
  pub result: ResolutionResult,
  pub intent: Intent,
  /// True when the intent came from coercion after a classifier failure or
  /// an unrecognized label, rather than from a genuine `general` reply.
  pub classification_degraded: bool,
}

/// The resolution pipeline, generic over the corpus store and the three
/// external services so tests can substitute stubs.
pub struct ResolutionPipeline<S, I, E, W> {
  corpus:     Arc<S>,
  classifier: I,
  embedder:   E,
  web:        W,
}

impl<S, I, E, W> ResolutionPipeline<S, I, E, W>
where
  S: CorpusStore,
  I: IntentService,
  E: EmbeddingService,
  W: SearchService,
{
  pub fn new(corpus: Arc<S>, classifier: I, embedder: E, web: W) -> Self {
    Self {
      corpus,
      classifier,
      embedder,
      web,
    }
  }

  /// Resolve one raw query.
  ///
  /// Never fails on a service problem; the only error returned is a corpus
  /// storage failure, which the caller surfaces.
  pub async fn resolve(&self, raw_query: &str) -> Result<Resolved, S::Error> {
    if is_greeting(raw_query) {
      return Ok(Resolved {
        result: ResolutionResult::message(GREETING_REPLY),
        intent: Intent::General,
        classification_degraded: false,
      });
    }

    let query = normalize_query(raw_query);
    tracing::debug!(%query, "normalized query");

    let (intent, degraded) = self.classify(&query).await;
    tracing::debug!(?intent, degraded, "classified intent");

    let mut result = self.exact_match(&query).await?;

    if result.is_none()
      && let Some(kind) = intent.corpus_kind()
    {
      result = self.semantic_search(kind, &query).await?;
    }

    let result = match result {
      Some(found) => found,
      None => self.online_fallback(&query).await,
    };

    Ok(Resolved {
      result: result.map_description(capitalize_sentences),
      intent,
      classification_degraded: degraded,
    })
  }

  // ─── Stages ────────────────────────────────────────────────────────────────

  /// Classification failure is never fatal: transport errors and unknown
  /// labels both coerce to `general`, flagged as degraded.
  async fn classify(&self, query: &str) -> (Intent, bool) {
    match self.classifier.classify(query).await {
      Ok(label) => {
        let label = label.trim().to_lowercase();
        match Intent::from_label(&label) {
          Some(intent) => (intent, false),
          None => {
            tracing::warn!(%label, "unrecognized intent label, coercing to general");
            (Intent::General, true)
          }
        }
      }
      Err(error) => {
        tracing::warn!(%error, "intent classification failed, coercing to general");
        (Intent::General, true)
      }
    }
  }

  /// Explicit `case N` / `method N` lookup. A found case wins over a method
  /// mention in the same query; an id that misses its table falls through.
  async fn exact_match(&self, query: &str) -> Result<Option<ResolutionResult>, S::Error> {
    if let Some(id) = case_reference(query)
      && let Some(found) = self.corpus.get_record(CorpusKind::Case, id).await?
    {
      return Ok(Some(Self::internal_answer(found, None)));
    }

    if let Some(id) = method_reference(query)
      && let Some(found) = self.corpus.get_record(CorpusKind::Method, id).await?
    {
      return Ok(Some(Self::internal_answer(found, None)));
    }

    Ok(None)
  }

  /// Embed the query and every record of `kind`, keeping the strict maximum
  /// so the first record encountered wins ties.
  ///
  /// Recomputes every corpus embedding on every call; there is no cache or
  /// persisted index, so this stage costs one embedding request per row.
  async fn semantic_search(
    &self,
    kind: CorpusKind,
    query: &str,
  ) -> Result<Option<ResolutionResult>, S::Error> {
    let query_embedding = match self.embedder.embed(query).await {
      Ok(vector) => vector,
      Err(error) => {
        tracing::warn!(%error, "query embedding failed, skipping semantic search");
        return Ok(None);
      }
    };

    let records = self.corpus.list_records(kind).await?;

    let mut best: Option<CorpusRecord> = None;
    let mut highest = -1.0f32;

    for record in records {
      let text = record.embedding_text();
      let record_embedding = match self.embedder.embed(&text).await {
        Ok(vector) => vector,
        Err(error) => {
          tracing::debug!(record = record.id, %error, "record embedding failed, skipping");
          continue;
        }
      };

      let similarity = cosine_similarity(&query_embedding, &record_embedding);
      if similarity > highest {
        highest = similarity;
        best = Some(record);
      }
    }

    Ok(best.map(|record| Self::internal_answer(record, Some(highest))))
  }

  /// Last resort: the web search service's top organic result.
  async fn online_fallback(&self, query: &str) -> ResolutionResult {
    match self.web.top_result(query).await {
      Ok(Some(hit)) => ResolutionResult::Answer {
        title:            hit.title,
        description:      hit.snippet,
        url:              hit.link,
        source:           Source::Online,
        similarity_score: None,
      },
      Ok(None) => ResolutionResult::message(NO_INFORMATION_MESSAGE),
      Err(error) => {
        tracing::error!(%error, "online search failed");
        ResolutionResult::failure("Failed to fetch online results")
      }
    }
  }

  fn internal_answer(record: CorpusRecord, similarity_score: Option<f32>) -> ResolutionResult {
    ResolutionResult::Answer {
      title: record.title,
      description: record.description.unwrap_or_default(),
      url: record.url,
      source: Source::Internal,
      similarity_score,
    }
  }
}

#[cfg(test)]
mod tests;
