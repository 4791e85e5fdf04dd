//! A single recorded clipboard item.

use clipmind_embeddings::Embedding;

/// A copied text together with its embedding.
///
/// Entries are immutable once created; only [`History`](crate::History)
/// constructs them.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    text: String,
    vector: Embedding,
    order: u64,
}

impl HistoryEntry {
    pub(crate) fn new(text: String, vector: Embedding, order: u64) -> Self {
        Self {
            text,
            vector,
            order,
        }
    }

    /// The copied text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The embedding of [`text`](Self::text).
    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    /// Monotonic insertion index; lower means recorded earlier.
    pub fn order(&self) -> u64 {
        self.order
    }
}
