//! Wire messages: one JSON object per line in each direction.

use clipmind_history::{HistoryError, Suggestion};
use serde::{Deserialize, Serialize};

/// A request from the clipboard monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Something was copied; remember it.
    Copy {
        #[serde(default)]
        content: String,

        /// Where the copy happened (e.g. "macOS"); informational only.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source: Option<String>,
    },

    /// A paste is about to happen in `content`'s context; suggest an item.
    Paste {
        #[serde(default)]
        content: String,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        source: Option<String>,
    },

    /// List the remembered items, oldest first.
    History,
}

impl Request {
    /// Parse one protocol line.
    pub fn parse_line(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line.trim())
    }
}

/// Category of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The embedding provider could not embed the text.
    EmbeddingFailure,
    /// The line was not a valid request.
    BadRequest,
    /// Anything else.
    Internal,
}

/// The answer to exactly one [`Request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Recorded { history_len: usize },
    Suggestion { text: String, score: f32 },
    NoSuggestion,
    History { items: Vec<String> },
    Error { kind: ErrorKind, message: String },
}

impl Response {
    /// Build an error response.
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Error {
            kind,
            message: message.into(),
        }
    }

    /// Encode as a single line, including the trailing newline.
    pub fn to_line(&self) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

impl From<Option<Suggestion>> for Response {
    fn from(suggestion: Option<Suggestion>) -> Self {
        match suggestion {
            Some(Suggestion { text, score }) => Self::Suggestion { text, score },
            None => Self::NoSuggestion,
        }
    }
}

impl From<HistoryError> for Response {
    fn from(err: HistoryError) -> Self {
        let kind = match &err {
            HistoryError::EmbeddingFailure(_) => ErrorKind::EmbeddingFailure,
            HistoryError::InvalidConfig(_) => ErrorKind::Internal,
        };
        Self::error(kind, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipmind_embeddings::EmbeddingError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_copy_from_clipboard_monitor() {
        let request =
            Request::parse_line(r#"{"type":"copy","content":"123 Queen Street, Toronto","source":"macOS"}"#)
                .unwrap();
        assert_eq!(
            request,
            Request::Copy {
                content: "123 Queen Street, Toronto".to_string(),
                source: Some("macOS".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_paste_without_content_defaults_to_empty() {
        let request = Request::parse_line(r#"{"type":"paste"}"#).unwrap();
        assert_eq!(
            request,
            Request::Paste {
                content: String::new(),
                source: None,
            }
        );
    }

    #[test]
    fn test_parse_history_ignores_extra_fields() {
        let request = Request::parse_line(r#" {"type":"history","source":"cli"} "#).unwrap();
        assert_eq!(request, Request::History);
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        assert!(Request::parse_line(r#"{"type":"cut","content":"x"}"#).is_err());
        assert!(Request::parse_line("not json").is_err());
    }

    #[test]
    fn test_response_lines() {
        assert_eq!(
            Response::NoSuggestion.to_line().unwrap(),
            "{\"type\":\"no_suggestion\"}\n"
        );
        assert_eq!(
            Response::Recorded { history_len: 2 }.to_line().unwrap(),
            "{\"type\":\"recorded\",\"history_len\":2}\n"
        );
    }

    #[test]
    fn test_embedding_failure_maps_to_error_kind() {
        let response = Response::from(HistoryError::EmbeddingFailure(
            EmbeddingError::ProviderNotConfigured,
        ));
        match response {
            Response::Error { kind, message } => {
                assert_eq!(kind, ErrorKind::EmbeddingFailure);
                assert!(message.contains("not configured"));
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn test_suggestion_conversion() {
        let response = Response::from(Some(Suggestion {
            text: "beta".to_string(),
            score: 0.75,
        }));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({ "type": "suggestion", "text": "beta", "score": 0.75 })
        );
        assert_eq!(Response::from(None), Response::NoSuggestion);
    }
}
