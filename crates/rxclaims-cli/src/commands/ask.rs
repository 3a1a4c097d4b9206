//! Ask command

use super::session::{join_query, load_config, Session};
use crate::app::{AskArgs, Cli, OutputFormat};
use anyhow::Result;
use rxclaims_core::EMPTY_QUERY_MESSAGE;

pub async fn run(args: &AskArgs, cli: &Cli) -> Result<()> {
    let query = join_query(&args.query);

    // Nothing to retrieve; skip the index build entirely
    if query.is_empty() {
        print_answer(&query, EMPTY_QUERY_MESSAGE, cli.format)?;
        return Ok(());
    }

    let config = load_config(cli)?;
    let session = Session::start(&config).await?;
    let result = session.assistant.answer(&query).await;
    session.log_metrics();

    print_answer(&query, &result?, cli.format)
}

fn print_answer(query: &str, answer: &str, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "query": query,
                "answer": answer,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Cli => println!("{}", answer),
    }
    Ok(())
}
