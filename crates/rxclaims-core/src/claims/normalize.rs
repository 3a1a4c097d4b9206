//! Raw claim entry -> ClaimRecord
//!
//! Field lookups are driven by [`FIELD_RULES`]: each field lists the JSON
//! paths it may come from, in preference order. The first path that yields
//! a non-empty value wins.

use super::ClaimRecord;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Which record field a rule fills
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimField {
    ClaimId,
    StatusRaw,
    DrugName,
    PharmacyName,
    PaidAmount,
    PaidDate,
    RejectCode,
    RejectMessage,
    OriginalClaimRef,
}

/// Ordered fallback paths for one field
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: ClaimField,
    pub paths: &'static [&'static [&'static str]],
}

pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        field: ClaimField::ClaimId,
        paths: &[&["claim", "claim_tracking_id"]],
    },
    FieldRule {
        field: ClaimField::StatusRaw,
        paths: &[&["claim", "claim_response", "transaction_response_status"]],
    },
    FieldRule {
        field: ClaimField::DrugName,
        paths: &[&["claim", "drug_name"]],
    },
    FieldRule {
        field: ClaimField::PharmacyName,
        paths: &[&["claim", "pharmacy_name"]],
    },
    FieldRule {
        field: ClaimField::PaidAmount,
        paths: &[
            &["claim", "claim_response", "total_amount_paid"],
            &["claim", "claim_response", "patient_pay_amount"],
        ],
    },
    FieldRule {
        field: ClaimField::PaidDate,
        paths: &[&["claim", "claim_response", "date_of_service"]],
    },
    FieldRule {
        field: ClaimField::RejectCode,
        paths: &[&["claim", "claim_response", "reject_code"]],
    },
    FieldRule {
        field: ClaimField::RejectMessage,
        paths: &[&["claim", "claim_response", "message"]],
    },
    FieldRule {
        field: ClaimField::OriginalClaimRef,
        paths: &[&[
            "claim",
            "claim_request",
            "associated_prescription_reference_number",
        ]],
    },
];

/// Coerce any JSON value to a trimmed string.
///
/// Null becomes empty; scalars use their display form; arrays and objects
/// are rendered as compact JSON.
pub fn sanitize_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string().trim().to_string(),
    }
}

/// Decode bytes as UTF-8, dropping invalid sequences, then trim.
pub fn sanitize_bytes(bytes: &[u8]) -> String {
    let decoded: String = bytes.utf8_chunks().map(|chunk| chunk.valid()).collect();
    decoded.trim().to_string()
}

fn lookup<'a>(entry: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(entry, |node, key| node.get(*key))
}

/// Resolve a rule against a raw entry; missing intermediates yield "".
pub fn resolve_field(entry: &Value, rule: &FieldRule) -> String {
    rule.paths
        .iter()
        .filter_map(|path| lookup(entry, path))
        .map(sanitize_value)
        .find(|v| !v.is_empty())
        .unwrap_or_default()
}

/// Normalize one raw entry. `claim_id` may come back empty here;
/// [`normalize_corpus`] fills it in.
pub fn normalize_entry(entry: &Value) -> ClaimRecord {
    let mut record = ClaimRecord::default();

    for rule in FIELD_RULES {
        let value = resolve_field(entry, rule);
        let slot = match rule.field {
            ClaimField::ClaimId => &mut record.claim_id,
            ClaimField::StatusRaw => &mut record.status_raw,
            ClaimField::DrugName => &mut record.drug_name,
            ClaimField::PharmacyName => &mut record.pharmacy_name,
            ClaimField::PaidAmount => &mut record.paid_amount,
            ClaimField::PaidDate => &mut record.paid_date,
            ClaimField::RejectCode => &mut record.reject_code,
            ClaimField::RejectMessage => &mut record.reject_message,
            ClaimField::OriginalClaimRef => &mut record.original_claim_ref,
        };
        *slot = value;
    }

    record.status_raw = record.status_raw.to_uppercase();
    record
}

/// Normalize a full load. Every entry yields exactly one record, and every
/// record leaves with a distinct `claim_id`.
///
/// A tracking id seen again later in the load becomes `<id>-2`, `<id>-3`,
/// and so on, skipping any suffix already used in the source. Entries
/// without a tracking id get a fresh UUID.
pub fn normalize_corpus(entries: &[Value]) -> Vec<ClaimRecord> {
    let mut records: Vec<ClaimRecord> = entries.iter().map(normalize_entry).collect();

    let mut taken: HashSet<String> = records
        .iter()
        .filter(|r| !r.claim_id.is_empty())
        .map(|r| r.claim_id.clone())
        .collect();

    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    for record in records.iter_mut().filter(|r| !r.claim_id.is_empty()) {
        if seen.insert(record.claim_id.clone()) {
            continue;
        }

        let mut suffix = 2usize;
        let mut id = format!("{}-{}", record.claim_id, suffix);
        while taken.contains(&id) {
            suffix += 1;
            id = format!("{}-{}", record.claim_id, suffix);
        }
        tracing::warn!(
            "Duplicate claim tracking id {} in corpus; indexed as {}",
            record.claim_id,
            id
        );
        taken.insert(id.clone());
        seen.insert(id.clone());
        record.claim_id = id;
    }

    let mut generated = 0usize;
    for record in records.iter_mut().filter(|r| r.claim_id.is_empty()) {
        let mut id = Uuid::new_v4().to_string();
        while taken.contains(&id) {
            id = Uuid::new_v4().to_string();
        }
        taken.insert(id.clone());
        record.claim_id = id;
        generated += 1;
    }

    if generated > 0 {
        tracing::debug!("Generated {} claim ids for entries without one", generated);
    }

    records
}

/// Record counts keyed by `status_raw` (empty status reported as "UNKNOWN")
pub fn count_by_status(records: &[ClaimRecord]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for record in records {
        let key = if record.status_raw.is_empty() {
            "UNKNOWN".to_string()
        } else {
            record.status_raw.clone()
        };
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn paid_entry() -> Value {
        json!({
            "claim": {
                "claim_tracking_id": "  C100 ",
                "drug_name": "Lipitor",
                "pharmacy_name": "CVS",
                "claim_response": {
                    "transaction_response_status": "paid",
                    "total_amount_paid": 42.5,
                    "patient_pay_amount": "10.00",
                    "date_of_service": "2024-01-05"
                }
            }
        })
    }

    #[test]
    fn test_normalize_paid_entry() {
        let record = normalize_entry(&paid_entry());
        assert_eq!(record.claim_id, "C100");
        assert_eq!(record.status_raw, "PAID");
        assert_eq!(record.drug_name, "Lipitor");
        assert_eq!(record.pharmacy_name, "CVS");
        assert_eq!(record.paid_amount, "42.5");
        assert_eq!(record.paid_date, "2024-01-05");
        assert_eq!(record.reject_code, "");
        assert_eq!(record.original_claim_ref, "");
    }

    #[test]
    fn test_paid_amount_falls_back_to_patient_pay() {
        let entry = json!({
            "claim": {"claim_response": {"total_amount_paid": null, "patient_pay_amount": "12.00"}}
        });
        assert_eq!(normalize_entry(&entry).paid_amount, "12.00");

        let entry = json!({
            "claim": {"claim_response": {"total_amount_paid": "  ", "patient_pay_amount": 3}}
        });
        assert_eq!(normalize_entry(&entry).paid_amount, "3");
    }

    #[test]
    fn test_zero_total_is_kept() {
        let entry = json!({
            "claim": {"claim_response": {"total_amount_paid": 0, "patient_pay_amount": "5"}}
        });
        assert_eq!(normalize_entry(&entry).paid_amount, "0");
    }

    #[test]
    fn test_missing_intermediate_object_degrades_to_empty() {
        let entry = json!({"claim": {"drug_name": "Metformin", "claim_response": "oops"}});
        let record = normalize_entry(&entry);
        assert_eq!(record.drug_name, "Metformin");
        assert_eq!(record.status_raw, "");
        assert_eq!(record.paid_amount, "");
        assert_eq!(record.original_claim_ref, "");
    }

    #[test]
    fn test_scalars_are_stringified() {
        let entry = json!({
            "claim": {
                "claim_tracking_id": 991,
                "drug_name": true,
                "claim_response": {"reject_code": 70, "message": ["a", "b"]},
                "claim_request": {"associated_prescription_reference_number": "RX-1"}
            }
        });
        let record = normalize_entry(&entry);
        assert_eq!(record.claim_id, "991");
        assert_eq!(record.drug_name, "true");
        assert_eq!(record.reject_code, "70");
        assert_eq!(record.reject_message, r#"["a","b"]"#);
        assert_eq!(record.original_claim_ref, "RX-1");
    }

    #[test]
    fn test_sanitize_bytes_drops_invalid_sequences() {
        assert_eq!(sanitize_bytes(b"  Lip\xffitor\xc3 "), "Lipitor");
        assert_eq!(sanitize_bytes("caf\u{e9}".as_bytes()), "caf\u{e9}");
        assert_eq!(sanitize_bytes(b""), "");
    }

    #[test]
    fn test_corpus_generates_unique_ids() {
        let entries = vec![json!({}), json!(null), json!({"claim": {}}), paid_entry()];
        let records = normalize_corpus(&entries);

        assert_eq!(records.len(), 4);
        let ids: HashSet<_> = records.iter().map(|r| r.claim_id.clone()).collect();
        assert_eq!(ids.len(), 4);
        assert!(records.iter().all(|r| !r.claim_id.is_empty()));
        assert_eq!(records[3].claim_id, "C100");
    }

    #[test]
    fn test_repeated_tracking_ids_are_disambiguated() {
        let entry = |status: &str| {
            json!({"claim": {
                "claim_tracking_id": "C1",
                "drug_name": "Lipitor",
                "claim_response": {"transaction_response_status": status}
            }})
        };
        // "C1-2" is already a real id, so the second C1 skips to "C1-3"
        let entries = vec![
            entry("rejected"),
            entry("paid"),
            json!({"claim": {"claim_tracking_id": "C1-2"}}),
            entry("duplicate"),
        ];
        let records = normalize_corpus(&entries);

        let ids: Vec<_> = records.iter().map(|r| r.claim_id.as_str()).collect();
        assert_eq!(ids, vec!["C1", "C1-3", "C1-2", "C1-4"]);
        assert_eq!(records[0].status_raw, "REJECTED");
        assert_eq!(records[1].status_raw, "PAID");
    }

    #[test]
    fn test_count_by_status() {
        let entries = vec![
            paid_entry(),
            paid_entry(),
            json!({"claim": {"claim_response": {"transaction_response_status": "Rejected"}}}),
            json!({}),
        ];
        let counts = count_by_status(&normalize_corpus(&entries));
        assert_eq!(counts.get("PAID"), Some(&2));
        assert_eq!(counts.get("REJECTED"), Some(&1));
        assert_eq!(counts.get("UNKNOWN"), Some(&1));
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            ".{0,12}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 24, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::hash_map(
                    prop_oneof![
                        Just("claim".to_string()),
                        Just("claim_response".to_string()),
                        Just("claim_tracking_id".to_string()),
                        Just("drug_name".to_string()),
                        "[a-z_]{1,8}",
                    ],
                    inner,
                    0..4
                )
                .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_every_entry_yields_one_record_with_an_id(
            entries in prop::collection::vec(arb_json(), 0..12)
        ) {
            let records = normalize_corpus(&entries);
            prop_assert_eq!(records.len(), entries.len());
            let ids: HashSet<&str> = records.iter().map(|r| r.claim_id.as_str()).collect();
            prop_assert_eq!(ids.len(), records.len());
            for record in &records {
                prop_assert!(!record.claim_id.is_empty());
                for (_, value) in record.context_fields() {
                    prop_assert_eq!(value, value.trim());
                }
            }
        }
    }
}
