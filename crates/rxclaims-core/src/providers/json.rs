//! JSON source for raw claim entries
//!
//! Accepts:
//! - a `.json` file holding an array of entries, or an object with a
//!   `claims` array
//! - a `.jsonl` file with one entry per line
//! - a directory, scanned recursively for files matching a glob pattern

use super::ClaimSource;
use crate::error::{Result, RxClaimsError};
use async_trait::async_trait;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Every `.json` and `.jsonl` file under a directory source
pub const DEFAULT_PATTERN: &str = "**/*";

/// Reads claim entries from JSON or JSON Lines files
pub struct JsonClaimSource {
    path: PathBuf,
    pattern: String,
}

impl JsonClaimSource {
    /// Create a source for a file or directory
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pattern: DEFAULT_PATTERN.to_string(),
        }
    }

    /// Glob applied to paths relative to a directory source
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse_file(&self, path: &Path) -> Result<Vec<Value>> {
        let content = fs::read_to_string(path).map_err(|e| {
            RxClaimsError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read claims file {:?}: {}", path, e),
            ))
        })?;

        if is_jsonl(path) {
            return parse_json_lines(&content, path);
        }

        let value: Value = serde_json::from_str(&content).map_err(|e| {
            RxClaimsError::Parse(format!("Failed to parse claims file {:?}: {}", path, e))
        })?;

        match value {
            Value::Array(entries) => Ok(entries),
            Value::Object(mut obj) => match obj.remove("claims") {
                Some(Value::Array(entries)) => Ok(entries),
                _ => Err(RxClaimsError::Parse(format!(
                    "Claims file {:?} is an object without a `claims` array",
                    path
                ))),
            },
            _ => Err(RxClaimsError::Parse(format!(
                "Claims file {:?} must hold an array of claim entries",
                path
            ))),
        }
    }

    /// Scan directory for claim files matching pattern
    fn scan_directory(&self, base_path: &Path) -> Result<Vec<PathBuf>> {
        let glob_pattern = glob::Pattern::new(&self.pattern)?;
        let mut files = Vec::new();

        for entry in WalkDir::new(base_path)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                let name = e.file_name().to_string_lossy();
                e.depth() == 0
                    || (!name.starts_with('.')
                        && !matches!(name.as_ref(), "node_modules" | "target" | "dist" | "build"))
            })
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !is_json(path) && !is_jsonl(path) {
                continue;
            }
            if let Ok(relative) = path.strip_prefix(base_path) {
                if glob_pattern.matches(&relative.to_string_lossy()) {
                    files.push(path.to_path_buf());
                }
            }
        }

        Ok(files)
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

fn is_json(path: &Path) -> bool {
    has_extension(path, "json")
}

fn is_jsonl(path: &Path) -> bool {
    has_extension(path, "jsonl")
}

fn parse_json_lines(content: &str, path: &Path) -> Result<Vec<Value>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|e| {
                RxClaimsError::Parse(format!("{:?} line {}: {}", path, idx + 1, e))
            })
        })
        .collect()
}

#[async_trait]
impl ClaimSource for JsonClaimSource {
    fn source_type(&self) -> &'static str {
        "json"
    }

    async fn list_entries(&self) -> Result<Vec<Value>> {
        let base_path = self.path.as_path();

        if base_path.is_file() {
            if !is_json(base_path) && !is_jsonl(base_path) {
                return Err(RxClaimsError::Parse(format!(
                    "File {:?} is not a JSON or JSONL file",
                    base_path
                )));
            }
            let entries = self.parse_file(base_path)?;
            tracing::info!("Loaded {} claim entries from {:?}", entries.len(), base_path);
            return Ok(entries);
        }

        if !base_path.exists() {
            return Err(RxClaimsError::SourceNotFound(
                base_path.display().to_string(),
            ));
        }

        let files = self.scan_directory(base_path)?;
        let mut all_entries = Vec::new();

        for file in &files {
            match self.parse_file(file) {
                Ok(entries) => all_entries.extend(entries),
                Err(e) => {
                    tracing::warn!("Skipping claims file {:?}: {}", file, e);
                }
            }
        }

        tracing::info!(
            "Loaded {} claim entries from {} files under {:?}",
            all_entries.len(),
            files.len(),
            base_path
        );

        Ok(all_entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_type() {
        assert_eq!(JsonClaimSource::new("claims.json").source_type(), "json");
    }

    #[tokio::test]
    async fn test_array_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("claims.json");
        fs::write(
            &path,
            r#"[{"claim": {"claim_tracking_id": "A"}}, {"claim": {"claim_tracking_id": "B"}}]"#,
        )
        .unwrap();

        let entries = JsonClaimSource::new(&path).list_entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1]["claim"]["claim_tracking_id"], "B");
    }

    #[tokio::test]
    async fn test_object_with_claims_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        fs::write(&path, r#"{"claims": [{}, {}, {}], "exported_at": "2024-02-01"}"#).unwrap();

        let entries = JsonClaimSource::new(&path).list_entries().await.unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[tokio::test]
    async fn test_jsonl_file_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("claims.jsonl");
        fs::write(&path, "{\"claim\": {}}\n\n{\"claim\": {}}\n").unwrap();

        let entries = JsonClaimSource::new(&path).list_entries().await.unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[tokio::test]
    async fn test_scalar_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("claims.json");
        fs::write(&path, "42").unwrap();

        let err = JsonClaimSource::new(&path).list_entries().await.unwrap_err();
        assert!(matches!(err, RxClaimsError::Parse(_)));
    }

    #[tokio::test]
    async fn test_directory_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("2024")).unwrap();
        fs::write(dir.path().join("2024/jan.json"), "[{}, {}]").unwrap();
        fs::write(dir.path().join("feb.json"), "[{}]").unwrap();
        fs::write(dir.path().join("broken.json"), "[{").unwrap();
        fs::write(dir.path().join("notes.txt"), "[{}]").unwrap();

        let entries = JsonClaimSource::new(dir.path())
            .list_entries()
            .await
            .unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[tokio::test]
    async fn test_directory_default_pattern_reads_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.json"), "[{}]").unwrap();
        fs::write(dir.path().join("b.jsonl"), "{}\n{}\n").unwrap();

        let entries = JsonClaimSource::new(dir.path())
            .list_entries()
            .await
            .unwrap();
        assert_eq!(entries.len(), 3);

        let json_only = JsonClaimSource::new(dir.path())
            .with_pattern("**/*.json")
            .list_entries()
            .await
            .unwrap();
        assert_eq!(json_only.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonClaimSource::new(dir.path().join("absent"))
            .list_entries()
            .await
            .unwrap_err();
        assert!(matches!(err, RxClaimsError::SourceNotFound(_)));
    }
}
