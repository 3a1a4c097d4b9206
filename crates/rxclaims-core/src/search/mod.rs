//! Candidate retrieval
//!
//! Provides:
//! - Lexical field matching against the query text
//! - Vector similarity ranking over the claim index
//! - Deduplicating merge of both into a candidate set

mod lexical;
mod merge;
mod vector;

pub use lexical::{parse_date, LexicalMatcher};
pub use merge::{Candidate, CandidateSet, CandidateSource};
pub use vector::{
    cosine_similarity, rank_by_vector, semantic_search, ScoredClaim, SEMANTIC_TOP_K,
};

use crate::error::Result;
use crate::index::ClaimIndex;
use crate::llm::Embedder;

/// Run lexical and semantic retrieval for one query and merge the hits.
///
/// The lexical scan runs while the query embedding is in flight; both
/// finish before the merge.
pub async fn retrieve<'a>(
    index: &'a ClaimIndex,
    embedder: &dyn Embedder,
    matcher: &LexicalMatcher,
    query: &str,
) -> Result<CandidateSet<'a>> {
    let lexical_scan = async { matcher.scan(index.records(), query) };
    let (lexical, semantic) = tokio::join!(lexical_scan, semantic_search(index, embedder, query));
    let semantic = semantic?;

    let candidates = CandidateSet::merge(&lexical, &semantic);

    tracing::debug!(
        "Retrieved {} candidates ({} lexical, {} semantic)",
        candidates.len(),
        lexical.len(),
        semantic.len()
    );

    Ok(candidates)
}
