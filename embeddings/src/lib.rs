//! # Embeddings
//!
//! Text embedding capability for the Clipmind history ranker.
//!
//! ## Features
//!
//! - **Providers**: an async [`EmbeddingProvider`] trait with an
//!   OpenAI-compatible HTTP provider and an offline hashing provider
//! - **Similarity**: cosine similarity with a defined zero-norm result
//! - **Caching**: an in-memory cache that skips re-embedding repeated text
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings                                   │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingRequest ──► EmbeddingProvider ──► EmbeddingResponse   │
//! │                            │                      │             │
//! │                            ▼                      ▼             │
//! │              OpenAI / Hashing / Cached     cosine_similarity    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod error;
pub mod hashing;
pub mod provider;
pub mod similarity;

pub use cache::{CacheStats, CachedProvider, EmbeddingCache};
pub use error::{EmbeddingError, Result};
pub use hashing::HashingProvider;
pub use provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, OpenAIProvider};
pub use similarity::{cosine_similarity, dot_product, normalize};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Dimension of embeddings (varies by model).
pub const DEFAULT_DIMENSION: usize = 1536; // OpenAI text-embedding-3-small
