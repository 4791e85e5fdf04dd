//! CLI argument parsing. Flags override the config file.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{EmbeddingProviderType, ServerConfig};

/// Clipmind server
///
/// Remembers copied text and suggests the most relevant item when pasting.
#[derive(Parser, Debug)]
#[command(name = "clipmind-server")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides the default location)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Commands,
}

/// Settings that can be overridden for any mode.
#[derive(Args, Debug, Default)]
pub struct Overrides {
    /// Number of clipboard items to remember
    #[arg(long, global = true)]
    pub max_history: Option<usize>,

    /// Embedding provider
    #[arg(long, global = true, value_enum)]
    pub provider: Option<EmbeddingProviderType>,

    /// Embedding model name
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Base URL of an OpenAI-compatible embeddings API
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Give up on an embedding call after this many milliseconds
    #[arg(long, global = true)]
    pub embed_timeout_ms: Option<u64>,
}

impl Overrides {
    /// Apply the flags that were given on top of `config`.
    pub fn apply(&self, config: &mut ServerConfig) {
        if let Some(max_history) = self.max_history {
            config.history.max_history = max_history;
        }
        if let Some(timeout) = self.embed_timeout_ms {
            config.history.embed_timeout_ms = Some(timeout);
        }
        if let Some(provider) = self.provider {
            config.embedding.provider = provider;
        }
        if let Some(model) = &self.model {
            config.embedding.model = Some(model.clone());
        }
        if let Some(base_url) = &self.base_url {
            config.embedding.base_url = Some(base_url.clone());
        }
    }
}

/// Transport modes
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read requests from stdin and answer on stdout
    Stdio,

    /// Accept requests over TCP
    Listen {
        /// Interface to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to bind
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_listen_with_overrides() {
        let cli = Cli::parse_from([
            "clipmind-server",
            "listen",
            "--port",
            "9000",
            "--max-history",
            "3",
            "--provider",
            "hashing",
        ]);

        match cli.command {
            Commands::Listen { port, host } => {
                assert_eq!(port, Some(9000));
                assert_eq!(host, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let mut config = ServerConfig::default();
        cli.overrides.apply(&mut config);
        assert_eq!(config.history.max_history, 3);
        assert_eq!(config.embedding.provider, EmbeddingProviderType::Hashing);
    }

    #[test]
    fn test_parse_stdio_with_config() {
        let cli = Cli::parse_from(["clipmind-server", "--config", "/tmp/clipmind.toml", "stdio"]);
        assert!(matches!(cli.command, Commands::Stdio));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/clipmind.toml")));
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let mut config = ServerConfig::default();
        Overrides::default().apply(&mut config);
        assert_eq!(config, ServerConfig::default());
    }
}
