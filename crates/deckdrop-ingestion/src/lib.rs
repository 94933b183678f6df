//! Presentation ingestion pipeline for deckdrop
//!
//! Takes a single `.pptx` file from either a file picker or a drag-and-drop
//! gesture and runs it through validate → parse → persist → register →
//! advance-sequence.
//!
//! # Features
//!
//! - Extension validation for dropped files
//! - Drag gesture state machine that turns platform events into a
//!   dragging flag and a single drop notification
//! - PPTX parsing into a slide/text document
//! - HTTP persistence against a remote `ppts/save` endpoint
//! - One orchestrator shared by both entry points, rejecting overlapping
//!   attempts and reporting failures as side-effect descriptors

pub mod gesture;
pub mod orchestrator;
pub mod parser;
pub mod persistence;
pub mod surface;
pub mod validator;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports
pub use gesture::{DragEvent, DragPhase, DragResponse, GestureDetector};
pub use orchestrator::{
    AttemptState, IngestionOrchestrator, IngestionOutcome, IngestionReceipt, OrchestratorStats,
    PipelineFailure, Rejection, SideEffect, Stage,
};
pub use parser::{DocumentParser, PptxParser};
pub use persistence::{DocumentPersistence, HttpPersistence, HttpPersistenceBuilder, SaveRequest};
pub use surface::{DropSurface, Presenter, INVALID_FILE_MESSAGE};
pub use validator::{derive_file_name, is_acceptable, ACCEPTED_EXTENSION};

/// Error types for ingestion operations
#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    #[error("Parse failed: {0}")]
    ParseFailed(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed document identifier: {0}")]
    MalformedIdentifier(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("An ingestion attempt is already in progress")]
    Busy,
}

/// How a failure is surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Dropped file has the wrong extension; shown as a transient notice
    InvalidFileType,
    /// Parser rejected the content; navigates to the error view
    ParseFailure,
    /// Remote save failed; navigates to the error view
    PersistenceFailure,
    /// Another attempt is still running
    Busy,
}

impl IngestionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            IngestionError::InvalidFileType(_) => FailureKind::InvalidFileType,
            IngestionError::ParseFailed(_) => FailureKind::ParseFailure,
            IngestionError::Http(_)
            | IngestionError::Api { .. }
            | IngestionError::MalformedIdentifier(_)
            | IngestionError::Url(_) => FailureKind::PersistenceFailure,
            IngestionError::Busy => FailureKind::Busy,
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestionError>;
