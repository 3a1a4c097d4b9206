//! Grounding prompt assembly
//!
//! The prompt has four parts, always in this order: the grounding
//! preamble, the claims context block, the quoted user query, and the
//! classification instructions. Only the context block and the query vary.

use crate::search::CandidateSet;

/// Role and no-fabrication rule
pub const PREAMBLE: &str = "You are a pharmacy-claims AI Agent. Use ONLY the data below; do NOT invent facts or hallucinate.";

pub const CONTEXT_HEADER: &str = "=== CLAIMS CONTEXT ===";

/// Closes each candidate stanza
pub const STANZA_DELIMITER: &str = "---";

/// Classification policy
pub const INSTRUCTIONS: &str = "Instructions:
- Based only on the data above, decide whether the user refers to a Paid, Rejected, or Duplicate claim.
- Always include the Claim ID in your answer.
- If Paid: return payment info (paid amount, date of service/paid_date, payee/pharmacy, claim ID).
- If Rejected: return reject code and message, and suggest how to fix or resubmit if possible.
- If Duplicate: if original_claim_ref is present, return that as original; otherwise say you don't have enough information to find original claim.
- If none of the above or data is insufficient: say \"I don't have enough information.\"
Use plain English, short sentences, no jargon.
";

/// Build the full prompt for one query
pub fn build_grounding_prompt(candidates: &CandidateSet<'_>, query: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str(PREAMBLE);
    prompt.push_str("\n\n");
    prompt.push_str(&format_context_block(candidates));
    prompt.push_str(&format!("\nUser query:\n\"\"\"{}\"\"\"\n\n", query));
    prompt.push_str(INSTRUCTIONS);

    prompt
}

/// The `=== CLAIMS CONTEXT ===` block, one stanza per candidate
pub fn format_context_block(candidates: &CandidateSet<'_>) -> String {
    let mut block = String::new();
    block.push_str(CONTEXT_HEADER);
    block.push('\n');

    for record in candidates.records() {
        for (name, value) in record.context_fields() {
            block.push_str(&format!("{}: {}\n", name, value));
        }
        block.push_str(STANZA_DELIMITER);
        block.push('\n');
    }

    block
}
