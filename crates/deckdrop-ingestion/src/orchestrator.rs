//! Ingestion orchestration
//!
//! Runs one attempt through parse → persist → register → advance for both
//! entry points. A picked file goes straight in; a dropped file is checked
//! against the validator first. Failures come back as side-effect
//! descriptors for the calling layer to act on.

use deckdrop_core::{
    DocumentIdentifier, DocumentRegistration, FileType, IngestionContext, RawFile, StateStore,
};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::parser::DocumentParser;
use crate::persistence::DocumentPersistence;
use crate::validator::{derive_file_name, is_acceptable};
use crate::{FailureKind, IngestionError, Result};

/// Lifecycle of the most recent attempt on one orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptState {
    Idle,
    InProgress,
    Failed,
    Succeeded,
}

/// Pipeline step that can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Parse,
    Persist,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Parse => write!(f, "parse"),
            Stage::Persist => write!(f, "persist"),
        }
    }
}

/// An attempt that never entered the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Dropped file does not carry the supported extension
    InvalidFileType { file_name: String },
    /// Another attempt is still running
    Busy,
}

/// A parse or persist error, tagged with the stage that raised it
#[derive(Debug)]
pub struct PipelineFailure {
    pub attempt_id: Uuid,
    pub stage: Stage,
    pub error: IngestionError,
}

impl PipelineFailure {
    pub fn kind(&self) -> FailureKind {
        match self.stage {
            Stage::Parse => FailureKind::ParseFailure,
            Stage::Persist => FailureKind::PersistenceFailure,
        }
    }
}

/// Summary of a successful attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionReceipt {
    pub attempt_id: Uuid,
    pub file_type: FileType,
    /// File name sent to the remote store, extension stripped
    pub file_name: String,
    pub ppt_id: DocumentIdentifier,
    pub slide_count: usize,
    pub processing_time_ms: u64,
}

/// Action the presentation layer should take after an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SideEffect {
    /// Transient notice; the surface stays usable
    ShowInvalidFileNotice,
    /// Leave the ingestion surface for the error view
    NavigateToErrorView,
}

/// Result of one call to an entry point
#[derive(Debug)]
pub enum IngestionOutcome {
    Completed(IngestionReceipt),
    Rejected(Rejection),
    Failed(PipelineFailure),
}

impl IngestionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, IngestionOutcome::Completed(_))
    }

    pub fn receipt(&self) -> Option<&IngestionReceipt> {
        match self {
            IngestionOutcome::Completed(receipt) => Some(receipt),
            _ => None,
        }
    }

    /// The side effect the presentation layer owes the user, if any.
    ///
    /// Busy rejections are silent: the running attempt will surface its own
    /// result.
    pub fn effect(&self) -> Option<SideEffect> {
        match self {
            IngestionOutcome::Completed(_) => None,
            IngestionOutcome::Rejected(Rejection::InvalidFileType { .. }) => {
                Some(SideEffect::ShowInvalidFileNotice)
            }
            IngestionOutcome::Rejected(Rejection::Busy) => None,
            IngestionOutcome::Failed(_) => Some(SideEffect::NavigateToErrorView),
        }
    }

    /// Collapse into a `Result`, turning rejections into errors
    pub fn into_result(self) -> Result<IngestionReceipt> {
        match self {
            IngestionOutcome::Completed(receipt) => Ok(receipt),
            IngestionOutcome::Rejected(Rejection::InvalidFileType { file_name }) => {
                Err(IngestionError::InvalidFileType(file_name))
            }
            IngestionOutcome::Rejected(Rejection::Busy) => Err(IngestionError::Busy),
            IngestionOutcome::Failed(failure) => Err(failure.error),
        }
    }
}

/// Orchestrator statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrchestratorStats {
    pub attempts_succeeded: u64,
    pub attempts_failed: u64,
    pub rejected_invalid: u64,
    pub rejected_busy: u64,
}

/// Drives ingestion attempts for one surface.
///
/// At most one attempt runs at a time; an entry point called while another
/// attempt is in flight returns [`Rejection::Busy`] without touching
/// anything.
pub struct IngestionOrchestrator {
    file_type: FileType,
    parser: Arc<dyn DocumentParser>,
    persistence: Arc<dyn DocumentPersistence>,
    store: Arc<dyn StateStore>,
    state: Mutex<AttemptState>,
    stats: Mutex<OrchestratorStats>,
}

impl IngestionOrchestrator {
    pub fn new(
        file_type: FileType,
        parser: Arc<dyn DocumentParser>,
        persistence: Arc<dyn DocumentPersistence>,
        store: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            file_type,
            parser,
            persistence,
            store,
            state: Mutex::new(AttemptState::Idle),
            stats: Mutex::new(OrchestratorStats::default()),
        }
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    pub fn state(&self) -> AttemptState {
        *self.state.lock()
    }

    pub fn stats(&self) -> OrchestratorStats {
        self.stats.lock().clone()
    }

    /// Entry point for a file chosen through a file picker.
    ///
    /// The picker already filters by extension, so the name is not checked.
    pub async fn ingest_selected(&self, file: RawFile) -> IngestionOutcome {
        debug!(file_name = %file.name(), "File selected");
        self.run(file).await
    }

    /// Entry point for a file dropped on the surface
    pub async fn ingest_dropped(&self, file: RawFile) -> IngestionOutcome {
        if !is_acceptable(file.name()) {
            info!(file_name = %file.name(), "Dropped file rejected");
            self.stats.lock().rejected_invalid += 1;
            return IngestionOutcome::Rejected(Rejection::InvalidFileType {
                file_name: file.name().to_string(),
            });
        }

        debug!(file_name = %file.name(), "File dropped");
        self.run(file).await
    }

    async fn run(&self, file: RawFile) -> IngestionOutcome {
        let Some(guard) = AttemptGuard::acquire(&self.state) else {
            warn!(file_name = %file.name(), "Attempt already in progress, rejecting");
            self.stats.lock().rejected_busy += 1;
            return IngestionOutcome::Rejected(Rejection::Busy);
        };

        let start = std::time::Instant::now();
        let context = IngestionContext::new(self.file_type, derive_file_name(file.name()));

        info!(
            attempt_id = %context.attempt_id,
            file_name = %file.name(),
            file_type = %context.file_type,
            size = file.len(),
            "Ingestion started"
        );

        match self.pipeline(&context, &file).await {
            Ok((ppt_id, slide_count)) => {
                guard.finish(AttemptState::Succeeded);
                self.stats.lock().attempts_succeeded += 1;

                let processing_time_ms = start.elapsed().as_millis() as u64;

                info!(
                    attempt_id = %context.attempt_id,
                    ppt_id = %ppt_id,
                    slide_count = slide_count,
                    processing_time_ms = processing_time_ms,
                    "Ingestion completed"
                );

                IngestionOutcome::Completed(IngestionReceipt {
                    attempt_id: context.attempt_id,
                    file_type: context.file_type,
                    file_name: context.derived_file_name,
                    ppt_id,
                    slide_count,
                    processing_time_ms,
                })
            }
            Err((stage, error)) => {
                guard.finish(AttemptState::Failed);
                self.stats.lock().attempts_failed += 1;

                warn!(
                    attempt_id = %context.attempt_id,
                    stage = %stage,
                    error = %error,
                    "Ingestion failed"
                );

                IngestionOutcome::Failed(PipelineFailure {
                    attempt_id: context.attempt_id,
                    stage,
                    error,
                })
            }
        }
    }

    /// Parse, persist, then register and advance. Nothing reaches the store
    /// unless both fallible stages succeeded.
    async fn pipeline(
        &self,
        context: &IngestionContext,
        file: &RawFile,
    ) -> std::result::Result<(DocumentIdentifier, usize), (Stage, IngestionError)> {
        let document = self
            .parser
            .parse(file)
            .await
            .map_err(|e| (Stage::Parse, e))?;

        debug!(
            attempt_id = %context.attempt_id,
            parser = self.parser.name(),
            slides = document.slide_count(),
            "Document parsed"
        );

        let ppt_id = self
            .persistence
            .save(&document, &context.derived_file_name)
            .await
            .map_err(|e| (Stage::Persist, e))?;

        let slide_count = document.slide_count();

        self.store.register_document(DocumentRegistration {
            file_type: context.file_type,
            ppt_id: ppt_id.clone(),
            data: document,
        });
        self.store.advance_sequence();

        Ok((ppt_id, slide_count))
    }
}

impl std::fmt::Debug for IngestionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionOrchestrator")
            .field("file_type", &self.file_type)
            .field("parser", &self.parser.name())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Marks the orchestrator busy for the lifetime of one attempt.
///
/// If the attempt future is dropped before finishing, the state falls back
/// to `Idle` so the surface does not stay locked.
struct AttemptGuard<'a> {
    state: &'a Mutex<AttemptState>,
    finished: bool,
}

impl<'a> AttemptGuard<'a> {
    fn acquire(state: &'a Mutex<AttemptState>) -> Option<Self> {
        let mut current = state.lock();
        if *current == AttemptState::InProgress {
            return None;
        }
        *current = AttemptState::InProgress;

        Some(Self {
            state,
            finished: false,
        })
    }

    fn finish(mut self, outcome: AttemptState) {
        *self.state.lock() = outcome;
        self.finished = true;
    }
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            *self.state.lock() = AttemptState::Idle;
        }
    }
}
