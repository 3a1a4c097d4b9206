//! Terminal output formatter

use rxclaims_core::{CandidateSource, GroundedPrompt};

pub fn format_inspection(grounded: &GroundedPrompt<'_>, show_prompt: bool) -> String {
    let mut output = String::new();

    if grounded.candidates.is_empty() {
        output.push_str("No matching claims\n");
    }

    for candidate in grounded.candidates.iter() {
        let score = match candidate.score {
            Some(score) => format!("{:>3}%", (score * 100.0).round() as i32),
            None => "   -".to_string(),
        };
        let source = match candidate.source {
            CandidateSource::Lexical => "lex",
            CandidateSource::Semantic => "sem",
            CandidateSource::Both => "both",
        };
        let record = candidate.record;
        output.push_str(&format!(
            "{} {:<4} {} {}",
            score, source, record.claim_id, record.status_raw
        ));
        for detail in [&record.drug_name, &record.pharmacy_name, &record.paid_date] {
            if !detail.is_empty() {
                output.push_str(&format!(" | {}", detail));
            }
        }
        output.push('\n');
    }

    if show_prompt {
        output.push('\n');
        output.push_str(&grounded.prompt);
    }

    output
}
