//! The bounded FIFO store and its similarity scan.

use std::collections::VecDeque;

use clipmind_embeddings::{Embedding, EmbeddingError, cosine_similarity};
use ordered_float::OrderedFloat;
use tracing::debug;

use crate::entry::HistoryEntry;

/// Ordered, capacity-bounded sequence of [`HistoryEntry`], oldest first.
///
/// Invariant: `len() <= max_history()` after every mutation. Access does not
/// affect eviction; this is FIFO, not LRU.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    max_history: usize,
    next_order: u64,
}

impl History {
    pub(crate) fn new(max_history: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_history.saturating_add(1)),
            max_history,
            next_order: 0,
        }
    }

    /// Capacity of the history.
    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Vector dimension shared by all entries, once anything is stored.
    pub fn dimension(&self) -> Option<usize> {
        self.entries.front().map(|entry| entry.vector().len())
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Stored texts, oldest first.
    pub fn texts(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.text().to_string())
            .collect()
    }

    /// Reject vectors that would corrupt ranking.
    pub(crate) fn check_vector(&self, vector: &[f32]) -> Result<(), EmbeddingError> {
        if vector.is_empty() {
            return Err(EmbeddingError::InvalidResponse(
                "provider returned an empty embedding".to_string(),
            ));
        }
        if vector.iter().any(|x| !x.is_finite()) {
            return Err(EmbeddingError::InvalidResponse(
                "provider returned a non-finite embedding component".to_string(),
            ));
        }
        if let Some(expected) = self.dimension()
            && expected != vector.len()
        {
            return Err(EmbeddingError::DimensionMismatch {
                expected,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    /// Append an entry, evicting the oldest one if capacity is exceeded.
    ///
    /// Returns the evicted entry, if any.
    pub(crate) fn push(&mut self, text: String, vector: Embedding) -> Option<HistoryEntry> {
        let order = self.next_order;
        self.next_order += 1;
        self.entries.push_back(HistoryEntry::new(text, vector, order));

        if self.entries.len() > self.max_history {
            let evicted = self.entries.pop_front();
            if let Some(entry) = &evicted {
                debug!(order = entry.order(), "Evicted oldest history entry");
            }
            return evicted;
        }
        None
    }

    /// Find the entry most similar to `query` by cosine similarity.
    ///
    /// Linear scan over every entry. On equal scores the earliest-inserted
    /// entry wins. Returns `None` only when the history is empty.
    pub fn best_match(&self, query: &[f32]) -> Result<Option<(&HistoryEntry, f32)>, EmbeddingError> {
        let mut best: Option<(&HistoryEntry, OrderedFloat<f32>)> = None;

        for entry in &self.entries {
            let score = OrderedFloat(cosine_similarity(query, entry.vector())?);
            // Strictly greater, so ties keep the earlier entry.
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((entry, score));
            }
        }

        Ok(best.map(|(entry, score)| (entry, score.0)))
    }
}
