//! Behavioural tests for the history ranker.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use clipmind_embeddings::{
    EmbeddingError, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, HashingProvider,
};
use clipmind_history::{HistoryConfig, HistoryError, HistoryRanker, Suggestion};
use pretty_assertions::assert_eq;
use tokio_test::{assert_err, assert_ok};

/// Returns hand-picked vectors for known texts and hashed ones otherwise.
#[derive(Default)]
struct ScriptedProvider {
    vectors: HashMap<String, Vec<f32>>,
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    fn with_vector(mut self, text: &str, vector: &[f32]) -> Self {
        self.vectors.insert(text.to_string(), vector.to_vec());
        self
    }

    fn failing_on(mut self, text: &str) -> Self {
        self.failing.insert(text.to_string());
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        "scripted"
    }

    fn default_dimension(&self) -> usize {
        3
    }

    async fn embed(&self, request: EmbeddingRequest) -> clipmind_embeddings::Result<EmbeddingResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.contains(&request.text) {
            return Err(EmbeddingError::ApiRequest("provider unreachable".to_string()));
        }

        let embedding = match self.vectors.get(&request.text) {
            Some(vector) => vector.clone(),
            None => HashingProvider::new(3).embed_text(&request.text),
        };

        Ok(EmbeddingResponse {
            dimension: embedding.len(),
            embedding,
            model: "scripted".to_string(),
            tokens_used: None,
        })
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Never answers within any reasonable time.
struct StalledProvider;

#[async_trait]
impl EmbeddingProvider for StalledProvider {
    fn name(&self) -> &str {
        "stalled"
    }

    fn default_model(&self) -> &str {
        "stalled"
    }

    fn default_dimension(&self) -> usize {
        3
    }

    async fn embed(&self, _request: EmbeddingRequest) -> clipmind_embeddings::Result<EmbeddingResponse> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(EmbeddingError::ApiRequest("unreachable".to_string()))
    }

    fn is_available(&self) -> bool {
        true
    }
}

fn ranker(max_history: usize, provider: Arc<dyn EmbeddingProvider>) -> HistoryRanker {
    HistoryRanker::new(HistoryConfig::new(max_history), provider).unwrap()
}

fn hashing_ranker(max_history: usize) -> HistoryRanker {
    ranker(max_history, Arc::new(HashingProvider::default()))
}

#[tokio::test]
async fn test_capacity_invariant_holds_after_every_record() {
    let max_history = 7;
    let mut ranker = hashing_ranker(max_history);
    let items: Vec<String> = (0..25).map(|i| format!("clipboard item {i}")).collect();

    for (i, item) in items.iter().enumerate() {
        assert_ok!(ranker.record(item.clone()).await);
        assert!(ranker.len() <= max_history);
        assert_eq!(ranker.len(), (i + 1).min(max_history));
    }

    assert_eq!(ranker.history(), items[items.len() - max_history..].to_vec());
}

#[tokio::test]
async fn test_fifo_eviction_keeps_most_recent_in_order() {
    let mut ranker = hashing_ranker(3);
    for item in ["one", "two", "three", "four", "five"] {
        assert_ok!(ranker.record(item).await);
    }
    assert_eq!(ranker.history(), vec!["three", "four", "five"]);
}

#[tokio::test]
async fn test_suggest_on_empty_history_is_absent() {
    let provider = Arc::new(ScriptedProvider::default());
    let ranker = ranker(10, provider.clone());

    let suggestion = assert_ok!(ranker.suggest("anything").await);

    assert_eq!(suggestion, None);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_self_similarity_scores_one() {
    let mut ranker = hashing_ranker(10);
    let items = [
        "123 Queen Street, Toronto",
        "def hello(): print('Hello World')",
        "Hey, can you send me the meeting link?",
        "https://openai.com/research/gpt-4",
        "My email is kevin@example.com",
    ];
    for item in items {
        assert_ok!(ranker.record(item).await);
    }

    for item in items {
        let suggestion = assert_ok!(ranker.suggest(item).await).unwrap();
        assert_eq!(suggestion.text, item);
        assert!(
            (suggestion.score - 1.0).abs() < 1e-5,
            "score for {item:?} was {}",
            suggestion.score
        );
    }
}

#[tokio::test]
async fn test_tie_break_prefers_earliest_insertion() {
    let provider = ScriptedProvider::default()
        .with_vector("older", &[0.0, 1.0, 0.0])
        .with_vector("newer", &[0.0, 1.0, 0.0])
        .with_vector("query", &[0.0, 1.0, 0.0]);
    let mut ranker = ranker(10, Arc::new(provider));

    assert_ok!(ranker.record("older").await);
    assert_ok!(ranker.record("newer").await);

    let suggestion = assert_ok!(ranker.suggest("query").await).unwrap();
    assert_eq!(suggestion.text, "older");
}

#[tokio::test]
async fn test_history_preserves_record_order() {
    let mut ranker = hashing_ranker(10);
    for item in ["A", "B", "C"] {
        assert_ok!(ranker.record(item).await);
    }
    assert_eq!(ranker.history(), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_alpha_beta_gamma_scenario() {
    let provider = ScriptedProvider::default()
        .with_vector("alpha", &[1.0, 0.0, 0.0])
        .with_vector("beta", &[0.0, 1.0, 0.0])
        .with_vector("gamma", &[0.0, 0.0, 1.0])
        .with_vector("something about beta", &[0.1, 0.9, 0.2]);
    let mut ranker = ranker(2, Arc::new(provider));

    for item in ["alpha", "beta", "gamma"] {
        assert_ok!(ranker.record(item).await);
    }
    assert_eq!(ranker.history(), vec!["beta", "gamma"]);

    let suggestion = assert_ok!(ranker.suggest("something about beta").await).unwrap();
    assert_eq!(suggestion.text, "beta");

    let norm = (0.1f32 * 0.1 + 0.9 * 0.9 + 0.2 * 0.2).sqrt();
    let gamma_score = 0.2 / norm;
    assert!((suggestion.score - 0.9 / norm).abs() < 1e-5);
    assert!(suggestion.score >= gamma_score);
}

#[tokio::test]
async fn test_extreme_magnitudes_rank_by_direction() {
    let provider = ScriptedProvider::default()
        .with_vector("big", &[1e30, 1e30, 0.0])
        .with_vector("tiny", &[1e-30, 0.0, 0.0])
        .with_vector("plain", &[0.0, 0.0, 1.0])
        .with_vector("plain query", &[0.0, 0.0, 2.0]);
    let mut ranker = ranker(10, Arc::new(provider));

    for item in ["big", "tiny", "plain"] {
        assert_ok!(ranker.record(item).await);
    }

    let suggestion = assert_ok!(ranker.suggest("plain query").await).unwrap();
    assert_eq!(suggestion.text, "plain");
    assert!((suggestion.score - 1.0).abs() < 1e-5);

    for item in ["big", "tiny"] {
        let suggestion = assert_ok!(ranker.suggest(item).await).unwrap();
        assert_eq!(suggestion.text, item);
        assert!(
            (suggestion.score - 1.0).abs() < 1e-5,
            "score for {item:?} was {}",
            suggestion.score
        );
    }
}

#[tokio::test]
async fn test_failed_record_leaves_history_unchanged() {
    let provider = ScriptedProvider::default().failing_on("x");
    let mut ranker = ranker(2, Arc::new(provider));
    assert_ok!(ranker.record("kept one").await);
    assert_ok!(ranker.record("kept two").await);

    let err = assert_err!(ranker.record("x").await);

    assert!(matches!(
        err,
        HistoryError::EmbeddingFailure(EmbeddingError::ApiRequest(_))
    ));
    assert_eq!(ranker.history(), vec!["kept one", "kept two"]);
}

#[tokio::test]
async fn test_failed_suggest_does_not_mutate() {
    let provider = ScriptedProvider::default().failing_on("broken context");
    let mut ranker = ranker(5, Arc::new(provider));
    assert_ok!(ranker.record("stored").await);

    let err = assert_err!(ranker.suggest("broken context").await);

    assert!(matches!(err, HistoryError::EmbeddingFailure(_)));
    assert_eq!(ranker.history(), vec!["stored"]);
}

#[tokio::test]
async fn test_dimension_change_is_embedding_failure() {
    let provider = ScriptedProvider::default()
        .with_vector("three dims", &[1.0, 0.0, 0.0])
        .with_vector("two dims", &[1.0, 0.0]);
    let mut ranker = ranker(5, Arc::new(provider));
    assert_ok!(ranker.record("three dims").await);

    let err = assert_err!(ranker.record("two dims").await);
    assert!(matches!(
        err,
        HistoryError::EmbeddingFailure(EmbeddingError::DimensionMismatch {
            expected: 3,
            actual: 2
        })
    ));
    assert_eq!(ranker.history(), vec!["three dims"]);

    let err = assert_err!(ranker.suggest("two dims").await);
    assert!(matches!(err, HistoryError::EmbeddingFailure(_)));
}

#[tokio::test]
async fn test_empty_text_is_recorded_with_zero_score() {
    let mut ranker = hashing_ranker(5);
    assert_ok!(ranker.record("").await);
    assert_eq!(ranker.history(), vec![""]);

    let suggestion = assert_ok!(ranker.suggest("meeting link").await).unwrap();
    assert_eq!(suggestion.text, "");
    assert_eq!(suggestion.score, 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_stalled_provider_times_out() {
    let config = HistoryConfig::new(5).with_embed_timeout(Duration::from_millis(100));
    let mut ranker = HistoryRanker::new(config, Arc::new(StalledProvider)).unwrap();

    let err = assert_err!(ranker.record("never embedded").await);

    assert!(matches!(
        err,
        HistoryError::EmbeddingFailure(EmbeddingError::Timeout { elapsed_ms: 100 })
    ));
    assert!(ranker.is_empty());
}

#[test]
fn test_zero_capacity_is_rejected() {
    let err = HistoryRanker::new(HistoryConfig::new(0), Arc::new(HashingProvider::default()))
        .unwrap_err();
    assert!(matches!(err, HistoryError::InvalidConfig(_)));
}

#[test]
fn test_suggestion_serializes_as_text_and_score() {
    let suggestion = Suggestion {
        text: "beta".to_string(),
        score: 0.5,
    };
    assert_eq!(
        serde_json::to_value(&suggestion).unwrap(),
        serde_json::json!({ "text": "beta", "score": 0.5 })
    );
}
