//! Inspect command: parse a presentation without uploading it

use anyhow::{Context, Result};
use colored::Colorize;
use deckdrop_core::{RawFile, StructuredDocument};
use deckdrop_ingestion::{DocumentParser, PptxParser};
use serde::Serialize;

use crate::output::{self, OutputFormat};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InspectReport {
    file_name: String,
    content_type: String,
    size: usize,
    #[serde(flatten)]
    document: StructuredDocument,
}

pub async fn run(path: &str, format: OutputFormat) -> Result<()> {
    let file = RawFile::from_path(path)
        .await
        .with_context(|| format!("Failed to read {}", path))?;

    let document = PptxParser::new().parse(&file).await?;
    let report = InspectReport {
        file_name: file.name().to_string(),
        content_type: file.content_type(),
        size: file.len(),
        document,
    };

    match format.structured() {
        None => {
            output::section(&format!(
                "{} ({}, {} slides)",
                report.file_name,
                output::format_size(report.size),
                report.document.slide_count()
            ));
            output::key_value("content type", &report.content_type);
            for slide in &report.document.slides {
                println!("{}", format!("Slide {}", slide.number).cyan().bold());
                if slide.texts.is_empty() {
                    println!("  {}", "(no text)".dimmed());
                }
                for text in &slide.texts {
                    println!("  {}", text);
                }
            }
        }
        Some(structured) => println!("{}", output::format_output(&report, structured)?),
    }

    Ok(())
}
