//! JSON output formatter

use rxclaims_core::GroundedPrompt;

pub fn format_inspection(grounded: &GroundedPrompt<'_>, show_prompt: bool) -> String {
    let candidates: Vec<serde_json::Value> = grounded
        .candidates
        .iter()
        .map(|c| {
            serde_json::json!({
                "claim_id": c.record.claim_id,
                "source": c.source,
                "score": c.score,
                "status": c.record.status_raw,
                "record": c.record,
            })
        })
        .collect();

    let mut output = serde_json::json!({
        "query": grounded.query,
        "candidates": candidates,
    });
    if show_prompt {
        output["prompt"] = serde_json::Value::String(grounded.prompt.clone());
    }

    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string()) + "\n"
}
