//! Recording fakes for the adapter traits.
//!
//! Every fake appends to one shared journal so tests can assert the exact
//! order in which the pipeline touched its collaborators.

use async_trait::async_trait;
use deckdrop_core::{
    DocumentIdentifier, DocumentRegistration, FileType, RawFile, Slide, StateStore,
    StructuredDocument,
};
use parking_lot::Mutex;
use std::io::{Cursor, Write};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::orchestrator::IngestionOrchestrator;
use crate::parser::DocumentParser;
use crate::persistence::DocumentPersistence;
use crate::surface::Presenter;
use crate::{IngestionError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Parse(String),
    Save(String),
    Register { file_type: FileType, ppt_id: String },
    Advance,
    Notice(String),
    ErrorView,
}

pub(crate) type Journal = Arc<Mutex<Vec<Call>>>;

pub(crate) struct FakeParser {
    journal: Journal,
    fail: bool,
    gate: Option<Arc<Notify>>,
}

#[async_trait]
impl DocumentParser for FakeParser {
    async fn parse(&self, file: &RawFile) -> Result<StructuredDocument> {
        self.journal.lock().push(Call::Parse(file.name().to_string()));

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        if self.fail {
            return Err(IngestionError::ParseFailed("corrupt container".to_string()));
        }

        Ok(StructuredDocument::new(vec![Slide::new(
            1,
            vec![file.name().to_string()],
        )]))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

pub(crate) struct FakePersistence {
    journal: Journal,
    fail: bool,
}

#[async_trait]
impl DocumentPersistence for FakePersistence {
    async fn save(
        &self,
        _document: &StructuredDocument,
        file_name: &str,
    ) -> Result<DocumentIdentifier> {
        self.journal.lock().push(Call::Save(file_name.to_string()));

        if self.fail {
            return Err(IngestionError::Api {
                status: 503,
                message: "unavailable".to_string(),
            });
        }

        Ok(DocumentIdentifier::new("ppt-1"))
    }
}

pub(crate) struct RecordingStore {
    journal: Journal,
}

impl StateStore for RecordingStore {
    fn register_document(&self, registration: DocumentRegistration) {
        self.journal.lock().push(Call::Register {
            file_type: registration.file_type,
            ppt_id: registration.ppt_id.to_string(),
        });
    }

    fn advance_sequence(&self) {
        self.journal.lock().push(Call::Advance);
    }
}

pub(crate) struct RecordingPresenter {
    journal: Journal,
}

impl Presenter for RecordingPresenter {
    fn show_invalid_file_notice(&self, message: &str) {
        self.journal.lock().push(Call::Notice(message.to_string()));
    }

    fn go_to_error_view(&self) {
        self.journal.lock().push(Call::ErrorView);
    }
}

/// An orchestrator wired to recording fakes
pub(crate) struct Harness {
    pub journal: Journal,
    pub orchestrator: Arc<IngestionOrchestrator>,
    file_type: FileType,
    fail_parse: bool,
    fail_save: bool,
    gate: Option<Arc<Notify>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(Arc::default(), FileType::Original, false, false, None)
    }

    fn build(
        journal: Journal,
        file_type: FileType,
        fail_parse: bool,
        fail_save: bool,
        gate: Option<Arc<Notify>>,
    ) -> Self {
        let orchestrator = IngestionOrchestrator::new(
            file_type,
            Arc::new(FakeParser {
                journal: journal.clone(),
                fail: fail_parse,
                gate: gate.clone(),
            }),
            Arc::new(FakePersistence {
                journal: journal.clone(),
                fail: fail_save,
            }),
            Arc::new(RecordingStore {
                journal: journal.clone(),
            }),
        );

        Self {
            journal,
            orchestrator: Arc::new(orchestrator),
            file_type,
            fail_parse,
            fail_save,
            gate,
        }
    }

    fn rebuild(self) -> Self {
        Self::build(
            self.journal,
            self.file_type,
            self.fail_parse,
            self.fail_save,
            self.gate,
        )
    }

    pub fn with_file_type(mut self, file_type: FileType) -> Self {
        self.file_type = file_type;
        self.rebuild()
    }

    pub fn failing_parse(mut self) -> Self {
        self.fail_parse = true;
        self.rebuild()
    }

    pub fn failing_save(mut self) -> Self {
        self.fail_save = true;
        self.rebuild()
    }

    /// Make the parser wait until [`Harness::release_parse`] is called
    pub fn gated_parse(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self.rebuild()
    }

    pub fn release_parse(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn presenter(&self) -> Arc<RecordingPresenter> {
        Arc::new(RecordingPresenter {
            journal: self.journal.clone(),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.journal.lock().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.journal.lock().iter().filter(|c| predicate(c)).count()
    }
}

/// A slide part with one paragraph per text run. `runs` are inserted as
/// raw markup, so entities and CDATA sections pass through untouched.
pub(crate) fn slide_xml(runs: &[&str]) -> String {
    let paragraphs: String = runs
        .iter()
        .map(|run| format!("<a:p><a:r><a:t>{}</a:t></a:r></a:p>", run))
        .collect();

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
            r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
            r#"<p:cSld><p:spTree><p:sp><p:txBody>{}</p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#
        ),
        paragraphs
    )
}

/// Build a ZIP container holding the given parts
pub(crate) fn pptx_bytes(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));

    for (name, content) in parts {
        writer
            .start_file(*name, zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }

    writer.finish().unwrap().into_inner()
}
