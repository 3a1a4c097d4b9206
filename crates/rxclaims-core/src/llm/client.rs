//! HTTP client for external LLM services (vLLM, OpenAI, etc.)

use super::cache::{chat_cache_key, embedding_cache_key, LLMCache};
use crate::claims::sanitize_bytes;
use crate::config::LLMServiceConfig;
use crate::error::{Result, RxClaimsError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Trait for LLM service clients
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate chat completion
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String>;

    /// Generate embeddings for text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get embedding dimensions
    fn embedding_dimensions(&self) -> usize;

    /// Get chat model name
    fn model_name(&self) -> &str;

    /// Get embedding model name
    fn embedding_model_name(&self) -> &str;
}

/// Chat message for completion requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// API metrics for monitoring
#[derive(Debug, Default)]
struct APIMetrics {
    total_requests: AtomicU64,
    total_errors: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    total_latency_ms: AtomicU64,
}

impl APIMetrics {
    fn error(&self) {
        self.total_errors.fetch_add(1, Ordering::Relaxed);
    }

    fn latency(&self, start: Instant) {
        let elapsed = start.elapsed().as_millis() as u64;
        self.total_latency_ms.fetch_add(elapsed, Ordering::Relaxed);
    }
}

/// Snapshot of API metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub total_errors: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_hit_rate: f64,
    pub avg_latency_ms: f64,
}

/// vLLM/OpenAI-compatible client
pub struct VLLMClient {
    http_client: reqwest::Client,
    config: LLMServiceConfig,
    embedding_dimensions: usize,
    cache: LLMCache,
    metrics: APIMetrics,
}

impl VLLMClient {
    /// Create new vLLM client from configuration
    pub fn new(config: LLMServiceConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        // all-MiniLM-L6-v2 width unless configured
        let embedding_dimensions = config.embedding_dimensions.unwrap_or(384);
        let cache = LLMCache::with_ttl(Duration::from_secs(config.cache_ttl_secs));

        Ok(Self {
            http_client,
            config,
            embedding_dimensions,
            cache,
            metrics: APIMetrics::default(),
        })
    }

    /// Get current API metrics
    pub fn metrics(&self) -> MetricsSnapshot {
        let total = self.metrics.total_requests.load(Ordering::Relaxed);
        let hits = self.metrics.cache_hits.load(Ordering::Relaxed);
        let misses = self.metrics.cache_misses.load(Ordering::Relaxed);
        let lookups = hits + misses;

        MetricsSnapshot {
            total_requests: total,
            total_errors: self.metrics.total_errors.load(Ordering::Relaxed),
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate: if lookups > 0 {
                hits as f64 / lookups as f64 * 100.0
            } else {
                0.0
            },
            avg_latency_ms: if total > 0 {
                self.metrics.total_latency_ms.load(Ordering::Relaxed) as f64 / total as f64
            } else {
                0.0
            },
        }
    }

    /// One `/v1/embeddings` round trip, checked for one vector per input
    async fn request_embeddings(&self, inputs: &[&str]) -> Result<Vec<Vec<f32>>> {
        #[derive(Serialize)]
        struct EmbedRequest<'a> {
            model: &'a str,
            input: &'a [&'a str],
        }

        #[derive(Deserialize)]
        struct EmbedResponse {
            data: Vec<EmbedData>,
        }

        #[derive(Deserialize)]
        struct EmbedData {
            embedding: Vec<f32>,
        }

        let request = EmbedRequest {
            model: &self.config.embedding_model,
            input: inputs,
        };

        let url = format!("{}/v1/embeddings", self.config.embeddings_url());
        let response: EmbedResponse = self.post_json(&url, &request, Service::Embedding).await?;

        if response.data.len() != inputs.len() {
            self.metrics.error();
            return Err(RxClaimsError::Embedding(format!(
                "Requested {} embeddings, received {}",
                inputs.len(),
                response.data.len()
            )));
        }

        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }

    /// POST a JSON body and decode the JSON reply.
    ///
    /// The body is read as bytes and decoded leniently so a stray invalid
    /// UTF-8 sequence does not fail the whole answer.
    async fn post_json<B, R>(&self, url: &str, body: &B, service: Service) -> Result<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let mut req = self.http_client.post(url).json(body);
        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req.send().await.map_err(|e| {
            self.metrics.error();
            RxClaimsError::Http(e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            self.metrics.error();
            RxClaimsError::Http(e)
        })?;
        let text = sanitize_bytes(&bytes);

        if !status.is_success() {
            self.metrics.error();
            return Err(service.error(format!(
                "{:?} service error (HTTP {}): {}",
                service, status, text
            )));
        }

        serde_json::from_str(&text).map_err(|e| {
            self.metrics.error();
            service.error(format!("malformed {:?} response: {}", service, e))
        })
    }
}

/// Which endpoint a request went to, for error attribution
#[derive(Debug, Clone, Copy)]
enum Service {
    Embedding,
    Generation,
}

impl Service {
    fn error(self, message: String) -> RxClaimsError {
        match self {
            Self::Embedding => RxClaimsError::Embedding(message),
            Self::Generation => RxClaimsError::Generation(message),
        }
    }
}

#[async_trait]
impl LLMClient for VLLMClient {
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let start = Instant::now();
        self.metrics.total_requests.fetch_add(1, Ordering::Relaxed);

        let messages_json = serde_json::to_string(&messages)?;
        let cache_key = chat_cache_key(&self.config.model, &messages_json);

        if let Some(cached) = self.cache.get_text(&cache_key) {
            tracing::debug!("Cache hit for chat completion");
            self.metrics.cache_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(cached);
        }
        self.metrics.cache_misses.fetch_add(1, Ordering::Relaxed);

        #[derive(Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage>,
            temperature: f32,
            max_tokens: u32,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
        }

        #[derive(Deserialize)]
        struct ChatChoice {
            message: ChatMessage,
        }

        let request = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = format!("{}/v1/chat/completions", self.config.url);
        let chat_response: ChatResponse = self.post_json(&url, &request, Service::Generation).await?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                self.metrics.error();
                RxClaimsError::Generation("No response from LLM".to_string())
            })?;

        self.cache.set_text(cache_key, content.clone());
        self.metrics.latency(start);

        Ok(content)
    }

    /// Query embeddings go through the cache; a chat session repeats them.
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let start = Instant::now();
        self.metrics.total_requests.fetch_add(1, Ordering::Relaxed);

        let cache_key = embedding_cache_key(&self.config.embedding_model, text);
        if let Some(cached) = self.cache.get_embedding(&cache_key) {
            self.metrics.cache_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(cached);
        }
        self.metrics.cache_misses.fetch_add(1, Ordering::Relaxed);

        let embedding = self
            .request_embeddings(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RxClaimsError::Embedding("No embedding returned".to_string()))?;

        self.cache.set_embedding(cache_key, embedding.clone());
        self.metrics.latency(start);

        Ok(embedding)
    }

    /// Batch calls embed the corpus once at build time; the index keeps the
    /// vectors, so nothing is cached here.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let start = Instant::now();
        self.metrics.total_requests.fetch_add(1, Ordering::Relaxed);

        let inputs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let embeddings = self.request_embeddings(&inputs).await?;

        self.metrics.latency(start);
        Ok(embeddings)
    }

    fn embedding_dimensions(&self) -> usize {
        self.embedding_dimensions
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn embedding_model_name(&self) -> &str {
        &self.config.embedding_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LLMServiceConfig {
        LLMServiceConfig {
            url: "http://127.0.0.1:9".to_string(),
            model: "chat-model".to_string(),
            embedding_url: None,
            embedding_model: "embed-model".to_string(),
            embedding_dimensions: Some(8),
            api_key: None,
            timeout_secs: 1,
            temperature: 0.0,
            max_tokens: 64,
            cache_ttl_secs: 60,
        }
    }

    #[test]
    fn test_client_reports_configured_models() {
        let client = VLLMClient::new(config()).unwrap();
        assert_eq!(client.model_name(), "chat-model");
        assert_eq!(client.embedding_model_name(), "embed-model");
        assert_eq!(client.embedding_dimensions(), 8);
    }

    #[test]
    fn test_chat_message_role() {
        assert_eq!(ChatMessage::user("q").role, "user");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_recoverable_error() {
        let client = VLLMClient::new(config()).unwrap();
        let err = client
            .chat_completion(vec![ChatMessage::user("hello")])
            .await
            .unwrap_err();
        assert!(err.is_recoverable());

        let metrics = client.metrics();
        assert_eq!(metrics.total_requests, 1);
        assert_eq!(metrics.total_errors, 1);
        assert_eq!(metrics.cache_misses, 1);
    }

    #[tokio::test]
    async fn test_batch_embedding_bypasses_cache() {
        let client = VLLMClient::new(config()).unwrap();
        let texts = vec!["Lipitor CVS 2024-01-05 C100".to_string(); 3];
        assert!(client.embed_batch(&texts).await.is_err());

        let metrics = client.metrics();
        assert_eq!(metrics.total_requests, 1);
        assert_eq!(metrics.cache_hits + metrics.cache_misses, 0);
        assert_eq!(metrics.total_errors, 1);
    }
}
