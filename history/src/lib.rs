//! # Clipboard History
//!
//! The ranking engine behind Clipmind: a FIFO-bounded history of copied
//! texts with their embeddings, and a nearest-neighbour lookup that picks the
//! stored text most similar to a paste context.
//!
//! ```text
//!   record(text) ──► embed ──► History (oldest evicted past max_history)
//!   suggest(ctx) ──► embed ──► linear cosine scan ──► Option<Suggestion>
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use clipmind_embeddings::HashingProvider;
//! use clipmind_history::{HistoryConfig, HistoryRanker};
//!
//! let mut ranker = HistoryRanker::new(HistoryConfig::default(), Arc::new(HashingProvider::default()))?;
//! ranker.record("123 Queen Street, Toronto").await?;
//! if let Some(suggestion) = ranker.suggest("what's the address?").await? {
//!     println!("{} ({:.2})", suggestion.text, suggestion.score);
//! }
//! ```

pub mod config;
pub mod entry;
pub mod error;
pub mod history;
pub mod ranker;

pub use config::HistoryConfig;
pub use entry::HistoryEntry;
pub use error::{HistoryError, Result};
pub use history::History;
pub use ranker::{HistoryRanker, Suggestion};
