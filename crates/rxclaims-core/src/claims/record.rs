//! Normalized claim record

use serde::{Deserialize, Serialize};

/// One pharmacy claim with every field flattened to a trimmed string.
///
/// Absent source fields are empty strings, never missing. `claim_id` is
/// always non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub claim_id: String,
    pub status_raw: String,
    pub drug_name: String,
    pub pharmacy_name: String,
    pub paid_amount: String,
    pub paid_date: String,
    pub reject_code: String,
    pub reject_message: String,
    pub original_claim_ref: String,
}

impl ClaimRecord {
    /// Text projection fed to the embedding model
    pub fn embedding_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.drug_name, self.pharmacy_name, self.paid_date, self.claim_id
        )
    }

    /// Field name/value pairs in prompt order.
    ///
    /// `claim_id` and `status` are always present; the rest only when
    /// non-empty.
    pub fn context_fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![
            ("claim_id", self.claim_id.as_str()),
            ("status", self.status_raw.as_str()),
        ];

        let optional = [
            ("drug_name", self.drug_name.as_str()),
            ("pharmacy_name", self.pharmacy_name.as_str()),
            ("paid_amount", self.paid_amount.as_str()),
            ("paid_date", self.paid_date.as_str()),
            ("reject_code", self.reject_code.as_str()),
            ("reject_message", self.reject_message.as_str()),
            ("original_claim_ref", self.original_claim_ref.as_str()),
        ];
        fields.extend(optional.into_iter().filter(|(_, v)| !v.is_empty()));

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_text_projection() {
        let record = ClaimRecord {
            claim_id: "C100".into(),
            drug_name: "Lipitor".into(),
            pharmacy_name: "CVS".into(),
            paid_date: "2024-01-05".into(),
            ..Default::default()
        };
        assert_eq!(record.embedding_text(), "Lipitor CVS 2024-01-05 C100");
    }

    #[test]
    fn test_context_fields_skip_empty() {
        let record = ClaimRecord {
            claim_id: "C7".into(),
            reject_code: "70".into(),
            ..Default::default()
        };
        let fields = record.context_fields();
        assert_eq!(
            fields,
            vec![("claim_id", "C7"), ("status", ""), ("reject_code", "70")]
        );
    }
}
