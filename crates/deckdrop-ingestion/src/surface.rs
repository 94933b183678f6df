//! Drop surface wiring
//!
//! A [`DropSurface`] is one attachment area: it owns the gesture detector,
//! feeds both entry points into the orchestrator and turns each outcome's
//! side effect into a call on the [`Presenter`].

use deckdrop_core::RawFile;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::gesture::{DragEvent, DragResponse, GestureDetector};
use crate::orchestrator::{IngestionOrchestrator, IngestionOutcome, SideEffect};

/// Notice shown when a dropped file is not a presentation
pub const INVALID_FILE_MESSAGE: &str = "Only .pptx files can be attached. Please try again.";

/// Presentation-layer actions the surface can trigger
pub trait Presenter: Send + Sync {
    /// Show a transient, non-blocking notice
    fn show_invalid_file_notice(&self, message: &str);

    /// Leave the ingestion surface for the error view
    fn go_to_error_view(&self);
}

pub struct DropSurface {
    detector: GestureDetector,
    drops: mpsc::UnboundedReceiver<RawFile>,
    orchestrator: Arc<IngestionOrchestrator>,
    presenter: Arc<dyn Presenter>,
}

impl DropSurface {
    pub fn new(orchestrator: Arc<IngestionOrchestrator>, presenter: Arc<dyn Presenter>) -> Self {
        let (tx, drops) = mpsc::unbounded_channel();

        let detector = GestureDetector::new(move |file: RawFile| {
            if tx.send(file).is_err() {
                warn!("Drop surface closed, discarding dropped file");
            }
        });

        Self {
            detector,
            drops,
            orchestrator,
            presenter,
        }
    }

    pub fn orchestrator(&self) -> &Arc<IngestionOrchestrator> {
        &self.orchestrator
    }

    /// Whether an external drag is currently over the surface
    pub fn is_dragging(&self) -> bool {
        self.detector.is_dragging()
    }

    /// Forward a platform drag event to the gesture detector
    pub fn handle_drag_event(&mut self, event: DragEvent) -> DragResponse {
        self.detector.handle(event)
    }

    /// Run every dropped file queued since the last call, one at a time
    pub async fn process_drops(&mut self) -> Vec<IngestionOutcome> {
        let mut outcomes = Vec::new();

        while let Ok(file) = self.drops.try_recv() {
            let outcome = self.orchestrator.ingest_dropped(file).await;
            self.apply(&outcome);
            outcomes.push(outcome);
        }

        outcomes
    }

    /// Files chosen through the picker. An empty selection does nothing.
    pub async fn select_files(&self, files: Vec<RawFile>) -> Option<IngestionOutcome> {
        let extra = files.len().saturating_sub(1);
        let file = files.into_iter().next()?;

        if extra > 0 {
            debug!(ignored = extra, "Multiple files selected, using the first");
        }

        let outcome = self.orchestrator.ingest_selected(file).await;
        self.apply(&outcome);
        Some(outcome)
    }

    /// Hand the outcome's side effect to the presenter
    pub fn apply(&self, outcome: &IngestionOutcome) {
        match outcome.effect() {
            Some(SideEffect::ShowInvalidFileNotice) => {
                self.presenter.show_invalid_file_notice(INVALID_FILE_MESSAGE)
            }
            Some(SideEffect::NavigateToErrorView) => self.presenter.go_to_error_view(),
            None => {}
        }
    }
}

impl std::fmt::Debug for DropSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropSurface")
            .field("detector", &self.detector)
            .field("orchestrator", &self.orchestrator)
            .finish_non_exhaustive()
    }
}
