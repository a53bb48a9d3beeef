//! Pipeline tests against stub services and an in-memory corpus.

use std::{
  collections::HashMap,
  convert::Infallible,
  io,
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
};

use agora_core::{
  corpus::{CorpusKind, CorpusRecord, Intent},
  result::{ResolutionResult, Source},
  service::{EmbeddingService, IntentService, SearchService, WebHit},
  store::CorpusStore,
};
use agora_text::normalize_query;

use super::*;

// ─── Stubs ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct StubCorpus {
  cases:   Vec<CorpusRecord>,
  methods: Vec<CorpusRecord>,
}

impl StubCorpus {
  fn rows(&self, kind: CorpusKind) -> &[CorpusRecord] {
    match kind {
      CorpusKind::Case => &self.cases,
      CorpusKind::Method => &self.methods,
    }
  }
}

impl CorpusStore for StubCorpus {
  type Error = Infallible;

  async fn get_record(
    &self,
    kind: CorpusKind,
    id: i64,
  ) -> Result<Option<CorpusRecord>, Infallible> {
    Ok(self.rows(kind).iter().find(|r| r.id == id).cloned())
  }

  async fn list_records(&self, kind: CorpusKind) -> Result<Vec<CorpusRecord>, Infallible> {
    Ok(self.rows(kind).to_vec())
  }

  async fn replace_records(
    &self,
    _kind: CorpusKind,
    _rows: Vec<CorpusRecord>,
  ) -> Result<(), Infallible> {
    unreachable!("the pipeline never writes to the corpus")
  }
}

/// Classifier returning a fixed label, or failing when none is set.
#[derive(Clone)]
struct StubClassifier {
  label:  Option<&'static str>,
  called: Arc<AtomicBool>,
}

impl StubClassifier {
  fn labeled(label: &'static str) -> Self {
    Self {
      label:  Some(label),
      called: Arc::new(AtomicBool::new(false)),
    }
  }

  fn failing() -> Self {
    Self {
      label:  None,
      called: Arc::new(AtomicBool::new(false)),
    }
  }
}

impl IntentService for StubClassifier {
  type Error = io::Error;

  async fn classify(&self, _query: &str) -> Result<String, io::Error> {
    self.called.store(true, Ordering::SeqCst);
    match self.label {
      Some(label) => Ok(label.to_owned()),
      None => Err(io::Error::other("classifier offline")),
    }
  }
}

/// Embedder keyed by exact input text; unmapped texts fail.
#[derive(Clone, Default)]
struct StubEmbedder {
  vectors: HashMap<String, Vec<f32>>,
  called:  Arc<AtomicBool>,
}

impl StubEmbedder {
  fn with(entries: &[(&str, &[f32])]) -> Self {
    Self {
      vectors: entries
        .iter()
        .map(|(text, vector)| (text.to_string(), vector.to_vec()))
        .collect(),
      called:  Arc::new(AtomicBool::new(false)),
    }
  }
}

impl EmbeddingService for StubEmbedder {
  type Error = io::Error;

  async fn embed(&self, text: &str) -> Result<Vec<f32>, io::Error> {
    self.called.store(true, Ordering::SeqCst);
    self
      .vectors
      .get(text)
      .cloned()
      .ok_or_else(|| io::Error::other(format!("no embedding for {text:?}")))
  }
}

#[derive(Clone)]
enum WebBehavior {
  Hit(WebHit),
  Empty,
  Fail,
}

#[derive(Clone)]
struct StubWeb {
  behavior: WebBehavior,
  called:   Arc<AtomicBool>,
}

impl StubWeb {
  fn hit(title: &str, snippet: &str, link: &str) -> Self {
    Self {
      behavior: WebBehavior::Hit(WebHit {
        title:   title.to_owned(),
        snippet: snippet.to_owned(),
        link:    link.to_owned(),
      }),
      called:   Arc::new(AtomicBool::new(false)),
    }
  }

  fn empty() -> Self {
    Self {
      behavior: WebBehavior::Empty,
      called:   Arc::new(AtomicBool::new(false)),
    }
  }

  fn failing() -> Self {
    Self {
      behavior: WebBehavior::Fail,
      called:   Arc::new(AtomicBool::new(false)),
    }
  }
}

impl SearchService for StubWeb {
  type Error = io::Error;

  async fn top_result(&self, _query: &str) -> Result<Option<WebHit>, io::Error> {
    self.called.store(true, Ordering::SeqCst);
    match &self.behavior {
      WebBehavior::Hit(hit) => Ok(Some(hit.clone())),
      WebBehavior::Empty => Ok(None),
      WebBehavior::Fail => Err(io::Error::other("search offline")),
    }
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn record(id: i64, title: &str, description: &str) -> CorpusRecord {
  CorpusRecord {
    id,
    title: title.to_owned(),
    description: Some(description.to_owned()),
    url: format!("https://example.org/{id}"),
  }
}

fn pipeline(
  corpus: StubCorpus,
  classifier: StubClassifier,
  embedder: StubEmbedder,
  web: StubWeb,
) -> ResolutionPipeline<StubCorpus, StubClassifier, StubEmbedder, StubWeb> {
  ResolutionPipeline::new(Arc::new(corpus), classifier, embedder, web)
}

fn answer_title(result: &ResolutionResult) -> &str {
  match result {
    ResolutionResult::Answer { title, .. } => title,
    other => panic!("expected an answer, got {other:?}"),
  }
}

// ─── Greeting ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn greeting_short_circuits_without_service_calls() {
  let classifier = StubClassifier::labeled("case");
  let embedder = StubEmbedder::default();
  let web = StubWeb::empty();

  let p = pipeline(
    StubCorpus::default(),
    classifier.clone(),
    embedder.clone(),
    web.clone(),
  );
  let resolved = p.resolve("hey there").await.unwrap();

  assert_eq!(resolved.result, ResolutionResult::message(GREETING_REPLY));
  assert_eq!(resolved.intent, Intent::General);
  assert!(!classifier.called.load(Ordering::SeqCst));
  assert!(!embedder.called.load(Ordering::SeqCst));
  assert!(!web.called.load(Ordering::SeqCst));
}

// ─── Exact match ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn exact_case_match_survives_service_outages() {
  let corpus = StubCorpus {
    cases: vec![record(12, "wenling deliberative poll", "held in wenling. notable.")],
    ..Default::default()
  };

  let p = pipeline(
    corpus,
    StubClassifier::failing(),
    StubEmbedder::default(),
    StubWeb::failing(),
  );
  let resolved = p.resolve("Tell me about case 12").await.unwrap();

  match resolved.result {
    ResolutionResult::Answer {
      title,
      description,
      source,
      similarity_score,
      ..
    } => {
      assert_eq!(title, "wenling deliberative poll");
      assert_eq!(description, "Held in wenling. Notable.");
      assert_eq!(source, Source::Internal);
      assert!(similarity_score.is_none());
    }
    other => panic!("expected an answer, got {other:?}"),
  }

  // Classifier failure coerced the intent without failing the query.
  assert_eq!(resolved.intent, Intent::General);
  assert!(resolved.classification_degraded);
}

#[tokio::test]
async fn exact_match_prefers_case_over_method() {
  let corpus = StubCorpus {
    cases:   vec![record(7, "the case seven", "c.")],
    methods: vec![record(7, "the method seven", "m.")],
  };

  let p = pipeline(
    corpus,
    StubClassifier::labeled("general"),
    StubEmbedder::default(),
    StubWeb::empty(),
  );
  let resolved = p.resolve("compare case 7 with method 7").await.unwrap();

  assert_eq!(answer_title(&resolved.result), "the case seven");
}

#[tokio::test]
async fn case_id_miss_falls_through_to_method() {
  let corpus = StubCorpus {
    methods: vec![record(9, "the method nine", "m.")],
    ..Default::default()
  };

  let p = pipeline(
    corpus,
    StubClassifier::labeled("general"),
    StubEmbedder::default(),
    StubWeb::empty(),
  );
  let resolved = p.resolve("case 9 or method 9").await.unwrap();

  assert_eq!(answer_title(&resolved.result), "the method nine");
}

// ─── Semantic ranking ────────────────────────────────────────────────────────

#[tokio::test]
async fn ranker_returns_first_of_tied_records() {
  let first = record(1, "citizens' assembly", "a deliberative body.");
  let second = record(2, "citizens' jury", "a deliberative panel.");
  let corpus = StubCorpus {
    cases: vec![first.clone(), second.clone()],
    ..Default::default()
  };

  let query = normalize_query("deliberative body selection");
  let embedder = StubEmbedder::with(&[
    (&query, &[1.0, 0.0]),
    (&first.embedding_text(), &[1.0, 0.0]),
    (&second.embedding_text(), &[1.0, 0.0]),
  ]);

  let p = pipeline(
    corpus,
    StubClassifier::labeled("case"),
    embedder,
    StubWeb::empty(),
  );
  let resolved = p.resolve("deliberative body selection").await.unwrap();

  match resolved.result {
    ResolutionResult::Answer {
      title,
      similarity_score,
      source,
      ..
    } => {
      assert_eq!(title, "citizens' assembly");
      assert_eq!(source, Source::Internal);
      let score = similarity_score.expect("ranked answers carry a score");
      assert!((score - 1.0).abs() < 1e-6);
    }
    other => panic!("expected an answer, got {other:?}"),
  }
}

#[tokio::test]
async fn ranker_skips_records_that_fail_to_embed() {
  let broken = record(1, "unembeddable", "no vector.");
  let good = record(2, "participatory budget", "allocates money.");
  let corpus = StubCorpus {
    methods: vec![broken, good.clone()],
    ..Default::default()
  };

  let query = normalize_query("how to allocate a budget");
  let embedder = StubEmbedder::with(&[
    (&query, &[0.0, 1.0]),
    (&good.embedding_text(), &[0.0, 1.0]),
  ]);

  let p = pipeline(
    corpus,
    StubClassifier::labeled("method"),
    embedder,
    StubWeb::empty(),
  );
  let resolved = p.resolve("how to allocate a budget").await.unwrap();

  assert_eq!(answer_title(&resolved.result), "participatory budget");
}

#[tokio::test]
async fn query_embedding_failure_falls_back_to_web() {
  let corpus = StubCorpus {
    cases: vec![record(1, "unreachable", "never ranked.")],
    ..Default::default()
  };

  let p = pipeline(
    corpus,
    StubClassifier::labeled("case"),
    StubEmbedder::default(),
    StubWeb::hit("web title", "found online. more detail.", "https://w.example"),
  );
  let resolved = p.resolve("a query on unmatched topics").await.unwrap();

  match resolved.result {
    ResolutionResult::Answer {
      title,
      description,
      source,
      similarity_score,
      ..
    } => {
      assert_eq!(title, "web title");
      assert_eq!(description, "Found online. More detail.");
      assert_eq!(source, Source::Online);
      assert!(similarity_score.is_none());
    }
    other => panic!("expected an answer, got {other:?}"),
  }
}

#[tokio::test]
async fn general_intent_never_invokes_the_ranker() {
  let corpus = StubCorpus {
    cases: vec![record(1, "present but unranked", "text.")],
    ..Default::default()
  };
  let embedder = StubEmbedder::default();

  let p = pipeline(
    corpus,
    StubClassifier::labeled("general"),
    embedder.clone(),
    StubWeb::empty(),
  );
  let resolved = p.resolve("a vague question").await.unwrap();

  assert!(!embedder.called.load(Ordering::SeqCst));
  assert_eq!(
    resolved.result,
    ResolutionResult::message(NO_INFORMATION_MESSAGE)
  );
}

// ─── Online fallback ─────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_web_results_yield_the_no_information_message() {
  let p = pipeline(
    StubCorpus::default(),
    StubClassifier::labeled("general"),
    StubEmbedder::default(),
    StubWeb::empty(),
  );
  let resolved = p.resolve("asdkjasd completely unmatched").await.unwrap();

  assert_eq!(
    resolved.result,
    ResolutionResult::message(NO_INFORMATION_MESSAGE)
  );
}

#[tokio::test]
async fn web_failure_yields_a_failure_result() {
  let p = pipeline(
    StubCorpus::default(),
    StubClassifier::labeled("general"),
    StubEmbedder::default(),
    StubWeb::failing(),
  );
  let resolved = p.resolve("a query for a broken search").await.unwrap();

  assert_eq!(
    resolved.result,
    ResolutionResult::failure("Failed to fetch online results")
  );
}

// ─── Classification ──────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_label_coerces_to_general_and_flags_degradation() {
  let p = pipeline(
    StubCorpus::default(),
    StubClassifier::labeled("banana"),
    StubEmbedder::default(),
    StubWeb::empty(),
  );
  let resolved = p.resolve("some question").await.unwrap();

  assert_eq!(resolved.intent, Intent::General);
  assert!(resolved.classification_degraded);
}

#[tokio::test]
async fn classifier_labels_are_trimmed_and_lowercased() {
  let p = pipeline(
    StubCorpus::default(),
    StubClassifier::labeled("  Case\n"),
    StubEmbedder::default(),
    StubWeb::empty(),
  );
  let resolved = p.resolve("some question about a topic").await.unwrap();

  assert_eq!(resolved.intent, Intent::Case);
  assert!(!resolved.classification_degraded);
}
