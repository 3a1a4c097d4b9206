//! Claim records and their normalization from raw source entries

mod normalize;
mod record;

pub use normalize::{
    count_by_status, normalize_corpus, normalize_entry, resolve_field, sanitize_bytes,
    sanitize_value, ClaimField, FieldRule, FIELD_RULES,
};
pub use record::ClaimRecord;
