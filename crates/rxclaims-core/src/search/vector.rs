//! Vector similarity ranking
//!
//! Computes cosine similarity between query embedding and stored embeddings.

use crate::claims::ClaimRecord;
use crate::error::{Result, RxClaimsError};
use crate::index::ClaimIndex;
use crate::llm::Embedder;

/// Records kept from the semantic ranking per query
pub const SEMANTIC_TOP_K: usize = 5;

/// One ranked record with its similarity
#[derive(Debug, Clone, Copy)]
pub struct ScoredClaim<'a> {
    pub record: &'a ClaimRecord,
    pub position: usize,
    pub score: f32,
}

/// Compute cosine similarity between two embeddings
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Rank every indexed record against a query vector, best first.
///
/// The sort is stable, so equal scores keep corpus order.
pub fn rank_by_vector<'a>(
    index: &'a ClaimIndex,
    query_embedding: &[f32],
    limit: usize,
) -> Result<Vec<ScoredClaim<'a>>> {
    if !index.is_empty() && query_embedding.len() != index.dimensions() {
        return Err(RxClaimsError::Search(format!(
            "Query embedding has {} dimensions, index has {}",
            query_embedding.len(),
            index.dimensions()
        )));
    }

    let mut scored: Vec<ScoredClaim<'a>> = index
        .entries()
        .enumerate()
        .map(|(position, (record, vector))| ScoredClaim {
            record,
            position,
            score: finite_or_worst(cosine_similarity(query_embedding, vector)),
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit);

    Ok(scored)
}

/// NaN from a malformed vector must not outrank real scores
fn finite_or_worst(score: f32) -> f32 {
    if score.is_finite() {
        score
    } else {
        f32::NEG_INFINITY
    }
}

/// Embed the query and return the top [`SEMANTIC_TOP_K`] records.
pub async fn semantic_search<'a>(
    index: &'a ClaimIndex,
    embedder: &dyn Embedder,
    query: &str,
) -> Result<Vec<ScoredClaim<'a>>> {
    if index.is_empty() {
        return Ok(Vec::new());
    }
    let query_embedding = embedder.embed(query).await?;
    rank_by_vector(index, &query_embedding, SEMANTIC_TOP_K)
}
