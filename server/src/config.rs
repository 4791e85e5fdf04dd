//! Server configuration.
//!
//! Loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (`--config PATH`, else `<config dir>/clipmind/config.toml`)
//! 3. CLI flags

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clipmind_embeddings::{
    CachedProvider, EmbeddingCache, EmbeddingProvider, HashingProvider, OpenAIProvider,
};
use clipmind_history::HistoryConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// History ranker settings.
    pub history: HistoryConfig,

    /// Embedding provider settings.
    pub embedding: EmbeddingConfig,

    /// TCP listener settings.
    pub listen: ListenConfig,
}

impl ServerConfig {
    /// Default config file location, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("clipmind").join("config.toml"))
    }

    /// Load from `path`, or from the default location when it exists.
    ///
    /// An explicit path must exist; a missing default file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

/// Which embedding provider to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum EmbeddingProviderType {
    /// OpenAI-compatible embeddings API.
    #[default]
    #[serde(rename = "openai")]
    #[value(name = "openai")]
    OpenAI,

    /// Offline feature hashing.
    #[serde(rename = "hashing")]
    #[value(name = "hashing")]
    Hashing,
}

/// Configuration for the embedding provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Which provider to use.
    pub provider: EmbeddingProviderType,

    /// Model to use for embeddings.
    pub model: Option<String>,

    /// API base URL for OpenAI-compatible servers.
    pub base_url: Option<String>,

    /// API key; falls back to `OPENAI_API_KEY`.
    pub api_key: Option<String>,

    /// Output dimension (shortened OpenAI embeddings, or hashing buckets).
    pub dimensions: Option<usize>,

    /// Whether to cache embeddings of repeated texts.
    pub cache_enabled: bool,

    /// Maximum cache size.
    pub cache_max_entries: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderType::OpenAI,
            model: None,
            base_url: None,
            api_key: None,
            dimensions: None,
            cache_enabled: true,
            cache_max_entries: 1000,
        }
    }
}

impl EmbeddingConfig {
    /// Build the provider capability described by this configuration.
    pub fn build_provider(&self) -> Arc<dyn EmbeddingProvider> {
        let provider: Arc<dyn EmbeddingProvider> = match self.provider {
            EmbeddingProviderType::OpenAI => {
                let mut provider = OpenAIProvider::new();
                if let Some(key) = &self.api_key {
                    provider = provider.with_api_key(key);
                }
                if let Some(url) = &self.base_url {
                    provider = provider.with_base_url(url);
                }
                if let Some(model) = &self.model {
                    provider = provider.with_model(model);
                }
                if let Some(dims) = self.dimensions {
                    provider = provider.with_dimensions(dims);
                }
                Arc::new(provider)
            }
            EmbeddingProviderType::Hashing => Arc::new(
                self.dimensions
                    .map(HashingProvider::new)
                    .unwrap_or_default(),
            ),
        };

        if !provider.is_available() {
            warn!(
                provider = provider.name(),
                "Embedding provider is not configured; requests will fail until it is"
            );
        }

        if self.cache_enabled {
            Arc::new(CachedProvider::new(
                provider,
                EmbeddingCache::new(self.cache_max_entries),
            ))
        } else {
            provider
        }
    }
}

/// Configuration for the TCP listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    /// Interface to bind.
    pub host: String,

    /// Port to bind.
    pub port: u16,
}

impl ListenConfig {
    /// `host:port` for binding.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}
