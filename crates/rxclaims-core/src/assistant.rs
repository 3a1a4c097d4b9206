//! Question answering over the claim index
//!
//! Ties retrieval, prompt assembly, and the external generator together
//! behind a single `answer(query)` entry point shared by every front end.

use crate::claims::sanitize_bytes;
use crate::config::{Config, DateMatchMode};
use crate::error::{Result, RxClaimsError};
use crate::index::ClaimIndex;
use crate::llm::{Embedder, Generator};
use crate::prompt::build_grounding_prompt;
use crate::search::{retrieve, CandidateSet, LexicalMatcher};
use std::sync::Arc;
use std::time::Duration;

/// Returned for blank input instead of running retrieval
pub const EMPTY_QUERY_MESSAGE: &str = "Submit your question here.";

/// Default deadline for one generation call
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Candidates and the prompt built from them
#[derive(Debug)]
pub struct GroundedPrompt<'a> {
    pub query: String,
    pub candidates: CandidateSet<'a>,
    pub prompt: String,
}

/// Answers free-text questions grounded in the claim index
pub struct ClaimAssistant {
    index: Arc<ClaimIndex>,
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn Generator>,
    matcher: LexicalMatcher,
    generation_timeout: Duration,
}

impl ClaimAssistant {
    pub fn new(
        index: Arc<ClaimIndex>,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            index,
            embedder,
            generator,
            matcher: LexicalMatcher::default(),
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }

    /// Apply retrieval and timeout settings from configuration
    pub fn with_config(self, config: &Config) -> Self {
        self.with_date_match(config.retrieval.date_match)
            .with_generation_timeout(config.generation_timeout())
    }

    pub fn with_date_match(mut self, mode: DateMatchMode) -> Self {
        self.matcher = LexicalMatcher::new(mode);
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn index(&self) -> &ClaimIndex {
        &self.index
    }

    /// Retrieve candidates and build the prompt without calling the generator.
    ///
    /// Returns `None` for blank input.
    pub async fn prepare(&self, query: &str) -> Result<Option<GroundedPrompt<'_>>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let candidates = retrieve(&self.index, self.embedder.as_ref(), &self.matcher, query).await?;
        let prompt = build_grounding_prompt(&candidates, query);

        Ok(Some(GroundedPrompt {
            query: query.to_string(),
            candidates,
            prompt,
        }))
    }

    /// Answer one question.
    ///
    /// Blank input short-circuits to [`EMPTY_QUERY_MESSAGE`]. Generator
    /// failures and timeouts come back as recoverable errors; nothing is
    /// retried here.
    pub async fn answer(&self, query: &str) -> Result<String> {
        let Some(grounded) = self.prepare(query).await? else {
            return Ok(EMPTY_QUERY_MESSAGE.to_string());
        };

        let response = tokio::time::timeout(
            self.generation_timeout,
            self.generator.generate(&grounded.prompt),
        )
        .await
        .map_err(|_| {
            tracing::warn!(
                "Generation timed out after {:?} ({} candidates)",
                self.generation_timeout,
                grounded.candidates.len()
            );
            RxClaimsError::GenerationTimeout(self.generation_timeout)
        })?
        .inspect_err(|e| tracing::warn!("Generation failed: {}", e))?;

        Ok(sanitize_bytes(response.as_bytes()))
    }
}
