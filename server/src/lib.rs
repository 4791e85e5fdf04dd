//! # Clipmind server
//!
//! Thin transport around [`clipmind_history::HistoryRanker`]. Requests and
//! responses are single-line JSON objects, served over stdin/stdout (for a
//! clipboard monitor that spawns the process) or TCP.
//!
//! ```text
//! {"type":"copy","content":"123 Queen Street, Toronto","source":"macOS"}
//! {"type":"recorded","history_len":1}
//! {"type":"paste","content":"Whats the address?"}
//! {"type":"suggestion","text":"123 Queen Street, Toronto","score":0.41}
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod handler;
pub mod protocol;
pub mod transport;

pub use cli::{Cli, Commands};
pub use commands::run;
pub use config::ServerConfig;
pub use handler::{SharedRanker, handle_line, handle_request, share};
pub use protocol::{ErrorKind, Request, Response};
pub use transport::{MAX_LINE_BYTES, serve_lines, serve_stdio, serve_tcp};
