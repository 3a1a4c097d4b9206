//! Union of lexical and semantic hits, unique by claim id

use super::ScoredClaim;
use crate::claims::ClaimRecord;
use serde::Serialize;
use std::collections::HashMap;

/// Which retriever surfaced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateSource {
    Lexical,
    Semantic,
    Both,
}

/// One record considered relevant to the query
#[derive(Debug, Clone, Serialize)]
pub struct Candidate<'a> {
    pub record: &'a ClaimRecord,
    pub source: CandidateSource,
    /// Similarity when the semantic ranker surfaced it
    pub score: Option<f32>,
}

/// Deduplicated candidates for a single query.
///
/// Iteration yields lexical hits first, then semantic-only hits, but
/// callers must not rely on any particular order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CandidateSet<'a> {
    candidates: Vec<Candidate<'a>>,
    #[serde(skip)]
    by_id: HashMap<&'a str, usize>,
}

impl<'a> CandidateSet<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge both hit lists into a fresh set
    pub fn merge(lexical: &[&'a ClaimRecord], semantic: &[ScoredClaim<'a>]) -> Self {
        let mut set = Self::new();
        for record in lexical {
            set.insert(record, CandidateSource::Lexical, None);
        }
        for hit in semantic {
            set.insert(hit.record, CandidateSource::Semantic, Some(hit.score));
        }
        set
    }

    /// Add a record unless its claim id is already present; a repeat from
    /// the other retriever upgrades the source to `Both`.
    pub fn insert(&mut self, record: &'a ClaimRecord, source: CandidateSource, score: Option<f32>) {
        if let Some(&idx) = self.by_id.get(record.claim_id.as_str()) {
            let existing = &mut self.candidates[idx];
            if existing.source != source {
                existing.source = CandidateSource::Both;
            }
            if existing.score.is_none() {
                existing.score = score;
            }
            return;
        }

        self.by_id.insert(record.claim_id.as_str(), self.candidates.len());
        self.candidates.push(Candidate {
            record,
            source,
            score,
        });
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn contains(&self, claim_id: &str) -> bool {
        self.by_id.contains_key(claim_id)
    }

    pub fn get(&self, claim_id: &str) -> Option<&Candidate<'a>> {
        self.by_id.get(claim_id).map(|&idx| &self.candidates[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate<'a>> {
        self.candidates.iter()
    }

    pub fn records(&self) -> impl Iterator<Item = &'a ClaimRecord> + '_ {
        self.candidates.iter().map(|c| c.record)
    }

    /// Claim ids, sorted, for order-independent comparison
    pub fn sorted_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.by_id.keys().map(|id| id.to_string()).collect();
        ids.sort();
        ids
    }
}
