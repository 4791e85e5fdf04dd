//! Clipmind server
//!
//! # Usage
//!
//! ```bash
//! clipmind-server stdio [--max-history N] [--provider openai|hashing]
//! clipmind-server listen [--host HOST] [--port PORT]
//! ```

use anyhow::Result;
use clap::Parser;

use clipmind_server::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    clipmind_server::run(Cli::parse()).await
}
