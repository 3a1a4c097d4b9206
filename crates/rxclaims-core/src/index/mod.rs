//! In-memory embedding index over normalized claims
//!
//! Built once at startup and read-only afterwards. Vectors are stored in
//! the same order as records, so position `i` in one is position `i` in
//! the other.

use crate::claims::ClaimRecord;
use crate::error::{Result, RxClaimsError};
use crate::llm::Embedder;
use sha2::{Digest, Sha256};
use std::time::Instant;

/// Default number of texts sent per embedding request
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Claim records with one embedding vector each
#[derive(Debug, Clone)]
pub struct ClaimIndex {
    records: Vec<ClaimRecord>,
    vectors: Vec<Vec<f32>>,
    dimensions: usize,
    model: String,
}

impl ClaimIndex {
    /// Embed every record's canonical projection and hold both in lockstep.
    pub async fn build(
        records: Vec<ClaimRecord>,
        embedder: &dyn Embedder,
        batch_size: usize,
    ) -> Result<Self> {
        let start = Instant::now();
        let batch_size = if batch_size > 0 {
            batch_size
        } else {
            DEFAULT_BATCH_SIZE
        };

        let texts: Vec<String> = records.iter().map(ClaimRecord::embedding_text).collect();
        let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(texts.len());

        for (batch_idx, batch) in texts.chunks(batch_size).enumerate() {
            let embedded = embedder.embed_batch(batch).await?;
            if embedded.len() != batch.len() {
                return Err(RxClaimsError::Index(format!(
                    "Batch {} returned {} vectors for {} records",
                    batch_idx,
                    embedded.len(),
                    batch.len()
                )));
            }
            vectors.extend(embedded);
        }

        let index = Self::from_embeddings(
            records,
            vectors,
            embedder.dimensions(),
            embedder.model_name(),
        )?;

        tracing::info!(
            "Built claim index: {} records, {} dimensions, model {} ({} ms)",
            index.len(),
            index.dimensions(),
            index.model_name(),
            start.elapsed().as_millis()
        );

        Ok(index)
    }

    /// Assemble an index from precomputed vectors.
    ///
    /// `default_dimensions` is used only when there are no records.
    pub fn from_embeddings(
        records: Vec<ClaimRecord>,
        vectors: Vec<Vec<f32>>,
        default_dimensions: usize,
        model: &str,
    ) -> Result<Self> {
        if records.len() != vectors.len() {
            return Err(RxClaimsError::Index(format!(
                "{} records but {} vectors",
                records.len(),
                vectors.len()
            )));
        }

        let dimensions = vectors.first().map_or(default_dimensions, Vec::len);

        if let Some((pos, bad)) = vectors
            .iter()
            .enumerate()
            .find(|(_, v)| v.len() != dimensions || v.is_empty())
        {
            return Err(RxClaimsError::Index(format!(
                "Embedding for claim {} has {} dimensions, expected {}",
                records[pos].claim_id,
                bad.len(),
                dimensions
            )));
        }

        Ok(Self {
            records,
            vectors,
            dimensions,
            model: model.to_string(),
        })
    }

    pub fn records(&self) -> &[ClaimRecord] {
        &self.records
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    /// Record and vector pairs in corpus order
    pub fn entries(&self) -> impl Iterator<Item = (&ClaimRecord, &[f32])> {
        self.records
            .iter()
            .zip(self.vectors.iter().map(Vec::as_slice))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// SHA-256 over the canonical projections, in corpus order
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for record in &self.records {
            hasher.update(record.embedding_text().as_bytes());
            hasher.update(b"\n");
        }
        format!("{:x}", hasher.finalize())
    }
}
