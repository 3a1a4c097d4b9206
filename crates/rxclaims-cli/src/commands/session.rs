//! Shared startup: config, corpus load, index build

use crate::app::Cli;
use anyhow::Result;
use rxclaims_core::claims::normalize_corpus;
use rxclaims_core::{
    ClaimAssistant, ClaimIndex, ClaimRecord, ClaimSource, Config, HttpEmbedder, HttpGenerator,
    JsonClaimSource, LLMClient, RxClaimsError, VLLMClient,
};
use std::sync::Arc;

/// Load config and apply command-line overrides
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(claims) = &cli.claims {
        config.claims.path = Some(claims.clone());
    }
    Ok(config)
}

/// Read and normalize the configured claims corpus
pub async fn load_records(config: &Config) -> Result<(JsonClaimSource, Vec<ClaimRecord>)> {
    let path = config.claims.path.clone().ok_or_else(|| {
        RxClaimsError::InvalidInput(
            "No claims source configured (use --claims or RXCLAIMS_CLAIMS)".to_string(),
        )
    })?;

    let source = JsonClaimSource::new(path).with_pattern(config.claims.pattern.clone());
    let entries = source.list_entries().await?;
    let records = normalize_corpus(&entries);

    tracing::debug!(
        "Loaded {} claims from {} source {}",
        records.len(),
        source.source_type(),
        source.path().display()
    );

    Ok((source, records))
}

/// A ready assistant plus the client behind it, for metrics
pub struct Session {
    pub assistant: ClaimAssistant,
    pub client: Arc<VLLMClient>,
}

impl Session {
    /// Load the corpus and embed it. Needs the embedding service.
    pub async fn start(config: &Config) -> Result<Self> {
        let (_, records) = load_records(config).await?;

        let client = Arc::new(VLLMClient::new(config.llm_service.clone())?);
        let shared: Arc<dyn LLMClient> = client.clone();
        let embedder = Arc::new(HttpEmbedder::new(shared.clone()));
        let generator = Arc::new(HttpGenerator::new(shared));

        let index =
            ClaimIndex::build(records, embedder.as_ref(), config.retrieval.embed_batch_size)
                .await?;

        let assistant =
            ClaimAssistant::new(Arc::new(index), embedder, generator).with_config(config);

        Ok(Self { assistant, client })
    }

    pub fn log_metrics(&self) {
        let metrics = self.client.metrics();
        tracing::debug!(
            "LLM requests: {} ({} errors), cache hit rate {:.0}%, avg latency {:.0} ms",
            metrics.total_requests,
            metrics.total_errors,
            metrics.cache_hit_rate,
            metrics.avg_latency_ms
        );
    }
}

/// Join positional words into one query string
pub fn join_query(words: &[String]) -> String {
    words.join(" ").trim().to_string()
}
