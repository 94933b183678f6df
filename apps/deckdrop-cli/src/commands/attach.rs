//! Attach command: one ingestion attempt through a drop surface

use anyhow::{Context, Result};
use deckdrop_core::{AppConfig, FileType, MemoryStore, RawFile};
use deckdrop_ingestion::{
    DragEvent, DropSurface, HttpPersistence, IngestionOrchestrator, IngestionReceipt, PptxParser,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::output::{self, OutputFormat};
use crate::presenter::ConsolePresenter;
use crate::Via;

#[derive(Serialize)]
struct AttachReport {
    #[serde(flatten)]
    receipt: IngestionReceipt,
    sequence: u32,
}

pub async fn run(
    config: &AppConfig,
    paths: Vec<String>,
    slot: FileType,
    via: Via,
    format: OutputFormat,
) -> Result<()> {
    let (path, ignored) = paths.split_first().context("No file given")?;
    if !ignored.is_empty() {
        info!(ignored = ignored.len(), "Only the first file is used");
    }

    let file = RawFile::from_path(path)
        .await
        .with_context(|| format!("Failed to read {}", path))?;
    let files = vec![file];

    debug!(file_name = %path, slot = %slot, via = ?via, "Starting attach");

    let store = Arc::new(MemoryStore::new());
    let persistence =
        HttpPersistence::from_config(&config.api).context("Failed to create API client")?;
    let orchestrator = IngestionOrchestrator::new(
        slot,
        Arc::new(PptxParser::new()),
        Arc::new(persistence),
        store.clone(),
    );
    let mut surface = DropSurface::new(Arc::new(orchestrator), Arc::new(ConsolePresenter));

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")?,
    );
    spinner.set_message(format!("Attaching to the {} slot...", slot));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let outcome = match via {
        Via::Pick => surface.select_files(files).await,
        Via::Drop => {
            surface.handle_drag_event(DragEvent::Enter { external: true });
            surface.handle_drag_event(DragEvent::Drop { files });
            surface.process_drops().await.pop()
        }
    };

    spinner.finish_and_clear();

    let receipt = outcome.context("No file was attached")?.into_result()?;
    let report = AttachReport {
        receipt,
        sequence: store.sequence(),
    };

    match format.structured() {
        None => {
            output::success(&format!(
                "Attached {} as the {} deck",
                report.receipt.file_name, report.receipt.file_type
            ));
            output::key_value("ppt id", report.receipt.ppt_id.as_str());
            output::key_value("slides", &report.receipt.slide_count.to_string());
            output::key_value(
                "took",
                &output::format_duration(report.receipt.processing_time_ms),
            );
            output::key_value("sequence", &report.sequence.to_string());
        }
        Some(structured) => println!("{}", output::format_output(&report, structured)?),
    }

    Ok(())
}
