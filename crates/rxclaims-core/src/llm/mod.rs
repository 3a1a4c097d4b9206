//! LLM integration
//!
//! Provides traits and implementations for:
//! - Embedding generation via external services (vLLM, OpenAI, etc.)
//! - Grounded answer generation via chat completions

mod cache;
mod client;
mod http;
mod traits;

pub use cache::{CacheStats, LLMCache};
pub use client::{ChatMessage, LLMClient, MetricsSnapshot, VLLMClient};
pub use http::{HttpEmbedder, HttpGenerator};
pub use traits::*;
