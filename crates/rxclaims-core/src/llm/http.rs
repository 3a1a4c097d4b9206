//! Adapters from an HTTP `LLMClient` to the retrieval-facing traits
//!
//! One client can back both adapters so embeddings and answers share the
//! connection pool, cache, and metrics.

use super::{ChatMessage, Embedder, Generator, LLMClient};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Embeds claim projections and queries through the embeddings endpoint
pub struct HttpEmbedder {
    client: Arc<dyn LLMClient>,
}

impl HttpEmbedder {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.client.embed(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.client.embed_batch(texts).await
    }

    fn dimensions(&self) -> usize {
        self.client.embedding_dimensions()
    }

    fn model_name(&self) -> &str {
        self.client.embedding_model_name()
    }
}

/// Sends the whole grounding prompt as a single user turn
pub struct HttpGenerator {
    client: Arc<dyn LLMClient>,
}

impl HttpGenerator {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Generator for HttpGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.client
            .chat_completion(vec![ChatMessage::user(prompt)])
            .await
    }

    fn model_name(&self) -> &str {
        self.client.model_name()
    }
}
