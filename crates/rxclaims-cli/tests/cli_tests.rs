//! Integration tests for commands that need no model service

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn rxclaims_cmd(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rxclaims").unwrap();
    cmd.env_remove("RXCLAIMS_CLAIMS")
        .arg("--config")
        .arg(config_dir.path().join("config.yml"));
    cmd
}

fn setup_claims() -> TempDir {
    let dir = TempDir::new().unwrap();
    let claims = r#"[
        {"claim": {"claim_tracking_id": "C100", "drug_name": "Lipitor", "pharmacy_name": "CVS",
                   "claim_response": {"transaction_response_status": "paid",
                                      "total_amount_paid": "42.50",
                                      "date_of_service": "2024-01-05"}}},
        {"claim": {"claim_tracking_id": "R200", "drug_name": "Ozempic",
                   "claim_response": {"transaction_response_status": "rejected",
                                      "reject_code": "70",
                                      "message": "Product/Service Not Covered"}}},
        {"claim": {"claim_tracking_id": "C101", "drug_name": "Metformin",
                   "claim_response": {"transaction_response_status": "Paid"}}},
        {"claim": {"drug_name": "Albuterol"}}
    ]"#;
    fs::write(dir.path().join("claims.json"), claims).unwrap();
    dir
}

#[test]
fn test_status_counts_claims() {
    let claims_dir = setup_claims();
    let config_dir = TempDir::new().unwrap();

    rxclaims_cmd(&config_dir)
        .arg("status")
        .arg("--claims")
        .arg(claims_dir.path().join("claims.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Claims:          4"))
        .stdout(predicate::str::contains("PAID           2"))
        .stdout(predicate::str::contains("REJECTED       1"))
        .stdout(predicate::str::contains("UNKNOWN        1"));
}

#[test]
fn test_status_json_over_directory() {
    let claims_dir = setup_claims();
    let config_dir = TempDir::new().unwrap();

    let output = rxclaims_cmd(&config_dir)
        .arg("status")
        .arg("--format")
        .arg("json")
        .env("RXCLAIMS_CLAIMS", claims_dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["claims"], 4);
    assert_eq!(json["by_status"]["PAID"], 2);
    assert_eq!(json["by_status"]["REJECTED"], 1);
}

#[test]
fn test_status_missing_source_fails() {
    let config_dir = TempDir::new().unwrap();

    rxclaims_cmd(&config_dir)
        .arg("status")
        .arg("--claims")
        .arg(config_dir.path().join("nope.json"))
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::starts_with("Error: "));
}

#[test]
fn test_status_without_source_is_invalid_input() {
    let config_dir = TempDir::new().unwrap();

    rxclaims_cmd(&config_dir)
        .arg("status")
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("--claims"));
}

#[test]
fn test_empty_ask_prompts_for_question() {
    let config_dir = TempDir::new().unwrap();

    rxclaims_cmd(&config_dir)
        .arg("ask")
        .arg("   ")
        .assert()
        .success()
        .stdout(predicate::str::diff("Submit your question here.\n"));
}

#[test]
fn test_empty_ask_json() {
    let config_dir = TempDir::new().unwrap();

    let output = rxclaims_cmd(&config_dir)
        .args(["--format", "json", "ask"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["answer"], "Submit your question here.");
}

#[test]
fn test_invalid_config_is_rejected() {
    let config_dir = TempDir::new().unwrap();
    fs::write(
        config_dir.path().join("config.yml"),
        "retrieval:\n  embed_batch_size: 0\n",
    )
    .unwrap();
    let claims_dir = setup_claims();

    rxclaims_cmd(&config_dir)
        .arg("status")
        .arg("--claims")
        .arg(claims_dir.path().join("claims.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: "));
}

#[test]
fn test_chat_json_lines_until_exit() {
    let config_dir = TempDir::new().unwrap();
    let claims_dir = TempDir::new().unwrap();
    let claims = claims_dir.path().join("claims.json");
    fs::write(&claims, "[]").unwrap();

    // Blank turns never reach a model service, and an empty corpus embeds nothing
    let output = rxclaims_cmd(&config_dir)
        .args(["--format", "json", "chat", "--claims"])
        .arg(&claims)
        .write_stdin("\n   \nexit\nnot reached\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let turns: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(turns.len(), 2);
    assert!(turns
        .iter()
        .all(|t| t["answer"] == "Submit your question here."));
}
