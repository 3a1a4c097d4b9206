//! Claims corpus sources
//!
//! A source hands back raw claim entries exactly as stored. Normalization
//! happens afterwards, so sources never interpret claim fields.

use crate::error::Result;
use serde_json::Value;

pub mod json;

pub use json::JsonClaimSource;

/// Claims source trait - anything that can produce raw claim entries
#[async_trait::async_trait]
pub trait ClaimSource: Send + Sync {
    /// Source type identifier (e.g., "json")
    fn source_type(&self) -> &'static str;

    /// Every raw entry, in source order
    async fn list_entries(&self) -> Result<Vec<Value>>;
}
