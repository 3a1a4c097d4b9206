//! Lexical matching of claim fields against the query text
//!
//! A cheap recall booster: drug name, pharmacy name, or paid date that
//! literally shows up in the question. Short field values will produce
//! false positives and that is accepted.

use crate::claims::ClaimRecord;
use crate::config::DateMatchMode;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Date-shaped tokens a user might type
    static ref DATE_TOKEN: Regex = Regex::new(
        r"\b(\d{4}[-/]\d{1,2}[-/]\d{1,2}|\d{1,2}[-/]\d{1,2}[-/]\d{4}|\d{8})\b"
    )
    .expect("date token pattern is valid");
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%Y%m%d"];

/// Parse a date written in one of the accepted formats
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text.trim(), fmt).ok())
}

/// Flags records whose fields appear in the query
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalMatcher {
    pub date_match: DateMatchMode,
}

impl LexicalMatcher {
    pub fn new(date_match: DateMatchMode) -> Self {
        Self { date_match }
    }

    /// `query_lower` must already be lower-cased.
    pub fn matches(&self, record: &ClaimRecord, query_lower: &str) -> bool {
        contains_non_empty(query_lower, &record.drug_name.to_lowercase())
            || contains_non_empty(query_lower, &record.pharmacy_name.to_lowercase())
            || self.date_matches(&record.paid_date.to_lowercase(), query_lower)
    }

    /// All matching records, in corpus order
    pub fn scan<'a>(&self, records: &'a [ClaimRecord], query: &str) -> Vec<&'a ClaimRecord> {
        let query_lower = query.to_lowercase();
        records
            .iter()
            .filter(|record| self.matches(record, &query_lower))
            .collect()
    }

    fn date_matches(&self, date: &str, query_lower: &str) -> bool {
        if date.is_empty() {
            return false;
        }
        match self.date_match {
            DateMatchMode::Literal => query_lower.contains(date),
            DateMatchMode::Anchored => {
                anchored_literal(date, query_lower) || same_calendar_day(date, query_lower)
            }
        }
    }
}

fn contains_non_empty(haystack: &str, needle: &str) -> bool {
    !needle.is_empty() && haystack.contains(needle)
}

/// Occurrence of `date` not glued to letters or digits on either side
fn anchored_literal(date: &str, query_lower: &str) -> bool {
    query_lower.match_indices(date).any(|(start, _)| {
        let before = query_lower[..start].chars().next_back();
        let after = query_lower[start + date.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn same_calendar_day(date: &str, query_lower: &str) -> bool {
    let Some(paid) = parse_date(date) else {
        return false;
    };
    DATE_TOKEN
        .find_iter(query_lower)
        .filter_map(|m| parse_date(m.as_str()))
        .any(|d| d == paid)
}
