//! Chat command: one question per stdin line
//!
//! With `--format json` each turn is one compact JSON object per line and
//! no input prompt is printed.

use super::session::{load_config, Session};
use crate::app::{Cli, OutputFormat};
use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let session = Session::start(&config).await?;

    eprintln!(
        "{} claims loaded. Ask a question, or type 'exit' to quit.",
        session.assistant.index().len()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if cli.format == OutputFormat::Cli {
            print!("> ");
            std::io::stdout().flush()?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if matches!(line, "exit" | "quit") {
            break;
        }

        // A failed question never ends the session
        let result = session.assistant.answer(line).await;
        match cli.format {
            OutputFormat::Json => {
                let turn = match &result {
                    Ok(answer) => serde_json::json!({"query": line, "answer": answer}),
                    Err(e) => serde_json::json!({"query": line, "error": e.to_string()}),
                };
                println!("{}", turn);
            }
            OutputFormat::Cli => match result {
                Ok(answer) => println!("{}\n", answer),
                Err(e) => eprintln!("Error: {}\n", e),
            },
        }
    }

    session.log_metrics();
    Ok(())
}
