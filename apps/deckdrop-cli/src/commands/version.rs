//! Version information command

use anyhow::Result;
use colored::Colorize;

use crate::output::{self, OutputFormat};

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run(format: OutputFormat) -> Result<()> {
    let version_info = VersionInfo {
        cli_version: VERSION.to_string(),
        accepted_extension: deckdrop_ingestion::ACCEPTED_EXTENSION,
        git_commit: option_env!("GIT_COMMIT").map(String::from),
    };

    match format.structured() {
        None => {
            println!("{} {}", "deckdrop".cyan().bold(), VERSION.green());
            if let Some(commit) = &version_info.git_commit {
                println!("  Git Commit: {}", &commit[..7.min(commit.len())]);
            }
        }
        Some(structured) => println!("{}", output::format_output(&version_info, structured)?),
    }

    Ok(())
}

#[derive(serde::Serialize)]
struct VersionInfo {
    cli_version: String,
    accepted_extension: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    git_commit: Option<String>,
}
