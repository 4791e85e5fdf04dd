//! The history ranker: records copied texts and suggests the best match.

use std::sync::Arc;

use clipmind_embeddings::{Embedding, EmbeddingError, EmbeddingProvider, EmbeddingRequest};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::HistoryConfig;
use crate::error::Result;
use crate::history::History;

/// The best previously-copied text for a paste context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// The stored clipboard text.
    pub text: String,

    /// Cosine similarity between the context and `text`, in `[-1, 1]`.
    pub score: f32,
}

/// Owns one clipboard [`History`] and answers similarity queries against it.
///
/// The ranker holds no locks. Callers that share one across tasks must
/// serialise `record` and `suggest`, e.g. behind a single mutex.
pub struct HistoryRanker {
    config: HistoryConfig,
    provider: Arc<dyn EmbeddingProvider>,
    history: History,
}

impl HistoryRanker {
    /// Create a ranker with an empty history.
    pub fn new(config: HistoryConfig, provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        config.validate()?;
        debug!(
            max_history = config.max_history,
            provider = provider.name(),
            "Created history ranker"
        );
        Ok(Self {
            history: History::new(config.max_history),
            config,
            provider,
        })
    }

    /// Embed `text` and append it, evicting the oldest entry when full.
    ///
    /// On failure the history is left exactly as it was.
    pub async fn record(&mut self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        let vector = self.embed(&text).await?;

        let evicted = self.history.push(text, vector);
        debug!(
            len = self.history.len(),
            evicted = evicted.is_some(),
            "Recorded clipboard item"
        );
        Ok(())
    }

    /// Suggest the stored text most similar to `context`.
    ///
    /// Returns `Ok(None)` on an empty history without calling the provider.
    pub async fn suggest(&self, context: &str) -> Result<Option<Suggestion>> {
        if self.history.is_empty() {
            debug!("No clipboard items to suggest from");
            return Ok(None);
        }

        let query = self.embed(context).await?;
        let suggestion = self
            .history
            .best_match(&query)?
            .map(|(entry, score)| Suggestion {
                text: entry.text().to_string(),
                score,
            });

        if let Some(suggestion) = &suggestion {
            debug!(score = suggestion.score, "Selected suggestion");
        }
        Ok(suggestion)
    }

    /// Stored texts, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history.texts()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Capacity of the history.
    pub fn max_history(&self) -> usize {
        self.history.max_history()
    }

    /// Name of the embedding provider in use.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        let call = self.provider.embed(EmbeddingRequest::new(text));

        let response = match self.config.embed_timeout() {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                warn!(provider = self.provider.name(), "Embedding provider timed out");
                EmbeddingError::Timeout {
                    elapsed_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                }
            })??,
            None => call.await?,
        };

        self.history.check_vector(&response.embedding)?;
        Ok(response.embedding)
    }
}

impl std::fmt::Debug for HistoryRanker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryRanker")
            .field("config", &self.config)
            .field("provider", &self.provider.name())
            .field("len", &self.history.len())
            .finish()
    }
}
