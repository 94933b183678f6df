//! Check command: run the drop validator over file names

use anyhow::Result;
use deckdrop_ingestion::is_acceptable;
use serde::Serialize;

use crate::output::{self, OutputFormat};

#[derive(Serialize)]
struct CheckResult<'a> {
    name: &'a str,
    accepted: bool,
}

pub fn run(names: &[String], format: OutputFormat) -> Result<()> {
    let results: Vec<CheckResult<'_>> = names
        .iter()
        .map(|name| CheckResult {
            name,
            accepted: is_acceptable(name),
        })
        .collect();

    match format.structured() {
        None => {
            for result in &results {
                if result.accepted {
                    output::success(&format!("{} accepted", result.name));
                } else {
                    output::error(&format!("{} rejected", result.name));
                }
            }
        }
        Some(structured) => println!("{}", output::format_output(&results, structured)?),
    }

    let rejected = results.iter().filter(|r| !r.accepted).count();
    if rejected > 0 {
        anyhow::bail!("{} of {} file name(s) rejected", rejected, results.len());
    }

    Ok(())
}
