//! Inspect command: retrieval and prompt only

use super::session::{join_query, load_config, Session};
use crate::app::{Cli, InspectArgs};
use crate::output::format_inspection;
use anyhow::Result;
use rxclaims_core::EMPTY_QUERY_MESSAGE;

pub async fn run(args: &InspectArgs, cli: &Cli) -> Result<()> {
    let query = join_query(&args.query);
    if query.is_empty() {
        println!("{}", EMPTY_QUERY_MESSAGE);
        return Ok(());
    }

    let config = load_config(cli)?;
    let session = Session::start(&config).await?;

    if let Some(grounded) = session.assistant.prepare(&query).await? {
        print!("{}", format_inspection(&grounded, args.prompt, cli.format));
    }

    session.log_metrics();
    Ok(())
}
