//! Configuration management

use crate::error::{Result, RxClaimsError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// LLM service configuration
    #[serde(default)]
    pub llm_service: LLMServiceConfig,

    /// Where the claims corpus is loaded from
    #[serde(default)]
    pub claims: ClaimsSourceConfig,

    /// Retrieval tuning
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Deadline applied around each generation call, in seconds
    #[serde(default = "default_generation_timeout")]
    pub generation_timeout_secs: u64,
}

/// LLM service configuration for external inference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMServiceConfig {
    /// Base URL of the LLM service for chat/completions
    pub url: String,

    /// Model name for answer generation
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// Base URL for embeddings service (can be different from LLM URL)
    #[serde(default)]
    pub embedding_url: Option<String>,

    /// Model name for embeddings
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Embedding dimensions (will be auto-detected if not specified)
    #[serde(default)]
    pub embedding_dimensions: Option<usize>,

    /// API key (optional, for authenticated services)
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Sampling temperature for answers
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on answer length
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// How long embeddings and completions stay cached
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

impl LLMServiceConfig {
    /// Get the embeddings URL (falls back to main URL if not specified)
    pub fn embeddings_url(&self) -> &str {
        self.embedding_url.as_deref().unwrap_or(&self.url)
    }
}

impl Default for LLMServiceConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("RXCLAIMS_LLM_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            model: default_chat_model(),
            embedding_url: std::env::var("RXCLAIMS_EMBEDDING_URL").ok(),
            embedding_model: default_embedding_model(),
            embedding_dimensions: std::env::var("RXCLAIMS_EMBEDDING_DIMS")
                .ok()
                .and_then(|s| s.parse().ok()),
            api_key: std::env::var("RXCLAIMS_LLM_API_KEY").ok(),
            timeout_secs: default_timeout(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_chat_model() -> String {
    std::env::var("RXCLAIMS_LLM_MODEL")
        .unwrap_or_else(|_| "meta-llama/Llama-3.1-8B-Instruct".to_string())
}

fn default_embedding_model() -> String {
    std::env::var("RXCLAIMS_EMBEDDING_MODEL")
        .unwrap_or_else(|_| "sentence-transformers/all-MiniLM-L6-v2".to_string())
}

fn default_timeout() -> u64 {
    30
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    512
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_generation_timeout() -> u64 {
    60
}

/// Location of the raw claims corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimsSourceConfig {
    /// JSON/JSONL file or directory of them
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Glob used when `path` is a directory; only `.json` and `.jsonl`
    /// files are ever read
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

impl Default for ClaimsSourceConfig {
    fn default() -> Self {
        Self {
            path: std::env::var("RXCLAIMS_CLAIMS").ok().map(PathBuf::from),
            pattern: default_pattern(),
        }
    }
}

fn default_pattern() -> String {
    crate::providers::json::DEFAULT_PATTERN.to_string()
}

/// How a record's paid date is looked for in the query text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DateMatchMode {
    /// Date text found anywhere in the query
    #[default]
    Literal,
    /// Date text bounded by non-alphanumerics, or the same day in another format
    Anchored,
}

/// Retrieval tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default)]
    pub date_match: DateMatchMode,

    /// Texts per embedding request during the index build
    #[serde(default = "default_embed_batch_size")]
    pub embed_batch_size: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            date_match: DateMatchMode::default(),
            embed_batch_size: default_embed_batch_size(),
        }
    }
}

fn default_embed_batch_size() -> usize {
    32
}

impl Config {
    /// Load config from default path
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load config from an explicit path, falling back to defaults when absent
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_yaml::from_str(&content)?
        } else {
            Config::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Generation deadline as a duration
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.retrieval.embed_batch_size == 0 {
            return Err(RxClaimsError::Config(
                "retrieval.embed_batch_size must be at least 1".to_string(),
            ));
        }
        if self.generation_timeout_secs == 0 {
            return Err(RxClaimsError::Config(
                "generation_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
