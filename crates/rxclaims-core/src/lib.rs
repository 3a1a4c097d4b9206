//! rxclaims Core Library
//!
//! Retrieval and grounding layer for answering questions about pharmacy
//! claims with a generative model that may only use supplied records.
//!
//! # Features
//! - Normalization of nested raw claim entries into flat records
//! - In-memory embedding index built once at startup
//! - Lexical field matching plus cosine-similarity ranking
//! - Deterministic grounding prompt with Paid/Rejected/Duplicate rules
//! - OpenAI-compatible HTTP clients for embeddings and generation

pub mod assistant;
pub mod claims;
pub mod config;
pub mod error;
pub mod index;
pub mod llm;
pub mod prompt;
pub mod providers;
pub mod search;

pub use assistant::{ClaimAssistant, GroundedPrompt, EMPTY_QUERY_MESSAGE};
pub use claims::{normalize_corpus, ClaimRecord};
pub use config::{ClaimsSourceConfig, Config, DateMatchMode, LLMServiceConfig, RetrievalConfig};
pub use error::{Error, Result, RxClaimsError};
pub use index::ClaimIndex;
pub use llm::{
    ChatMessage, Embedder, Generator, HttpEmbedder, HttpGenerator, LLMClient, MetricsSnapshot,
    VLLMClient,
};
pub use prompt::build_grounding_prompt;
pub use providers::{ClaimSource, JsonClaimSource};
pub use search::{
    retrieve, Candidate, CandidateSet, CandidateSource, LexicalMatcher, ScoredClaim,
    SEMANTIC_TOP_K,
};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "rxclaims";
