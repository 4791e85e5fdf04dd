//! Dispatch of protocol requests onto the history ranker.

use std::sync::Arc;

use clipmind_history::HistoryRanker;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::protocol::{ErrorKind, Request, Response};

/// The process-wide ranker handle shared by every session.
///
/// The lock is held for a whole request, provider call included, so `record`
/// and `suggest` never interleave on the same history.
pub type SharedRanker = Arc<Mutex<HistoryRanker>>;

/// Wrap a ranker for sharing between sessions.
pub fn share(ranker: HistoryRanker) -> SharedRanker {
    Arc::new(Mutex::new(ranker))
}

/// Execute one request.
pub async fn handle_request(ranker: &Mutex<HistoryRanker>, request: Request) -> Response {
    match request {
        Request::Copy { content, source } => {
            debug!(
                source = source.as_deref(),
                chars = content.chars().count(),
                "Received copy request"
            );
            let mut ranker = ranker.lock().await;
            match ranker.record(content).await {
                Ok(()) => Response::Recorded {
                    history_len: ranker.len(),
                },
                Err(err) => {
                    warn!("Failed to record clipboard item: {err}");
                    err.into()
                }
            }
        }
        Request::Paste { content, source } => {
            debug!(
                source = source.as_deref(),
                chars = content.chars().count(),
                "Received paste request"
            );
            let ranker = ranker.lock().await;
            match ranker.suggest(&content).await {
                Ok(suggestion) => {
                    if let Some(suggestion) = &suggestion {
                        info!(score = suggestion.score, "Suggested clipboard item");
                    }
                    suggestion.into()
                }
                Err(err) => {
                    warn!("Failed to suggest clipboard item: {err}");
                    err.into()
                }
            }
        }
        Request::History => Response::History {
            items: ranker.lock().await.history(),
        },
    }
}

/// Execute one raw protocol line. Blank lines yield no response.
pub async fn handle_line(ranker: &Mutex<HistoryRanker>, line: &str) -> Option<Response> {
    if line.trim().is_empty() {
        return None;
    }

    let response = match Request::parse_line(line) {
        Ok(request) => handle_request(ranker, request).await,
        Err(err) => {
            warn!("Rejected malformed request: {err}");
            Response::error(ErrorKind::BadRequest, err.to_string())
        }
    };
    Some(response)
}
