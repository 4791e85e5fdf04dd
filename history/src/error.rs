//! Error types for the history ranker.

use clipmind_embeddings::EmbeddingError;
use thiserror::Error;

/// Result type alias for history operations.
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Errors surfaced by [`HistoryRanker`](crate::HistoryRanker).
///
/// An empty history is not an error: `suggest` returns `Ok(None)`.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// The embedding provider could not produce a usable vector.
    #[error("embedding failure: {0}")]
    EmbeddingFailure(#[from] EmbeddingError),

    /// The ranker was constructed with unusable parameters.
    #[error("configuration error: {0}")]
    InvalidConfig(String),
}
