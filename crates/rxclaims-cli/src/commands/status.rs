//! Status command

use super::session::{load_config, load_records};
use crate::app::{Cli, OutputFormat};
use anyhow::Result;
use rxclaims_core::claims::count_by_status;
use std::collections::BTreeMap;

pub async fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let (source, records) = load_records(&config).await?;
    let by_status: BTreeMap<String, usize> = count_by_status(&records).into_iter().collect();

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "source": source.path().display().to_string(),
                "claims": records.len(),
                "by_status": by_status,
                "llm_url": config.llm_service.url,
                "embedding_model": config.llm_service.embedding_model,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Cli => {
            println!("Source:          {}", source.path().display());
            println!("Claims:          {}", records.len());
            println!();
            println!("By status:");
            for (status, count) in &by_status {
                println!("  {:<14} {}", status, count);
            }
            println!();
            println!("Services:");
            println!("  Generation:    {}", config.llm_service.url);
            println!("  Embeddings:    {}", config.llm_service.embedding_model);
        }
    }
    Ok(())
}
