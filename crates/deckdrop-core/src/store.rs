//! Application state store.
//!
//! The ingestion pipeline only ever mutates the store through the two
//! operations on [`StateStore`]; reading back is left to front ends.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::types::{DocumentIdentifier, FileType, StructuredDocument};

/// Payload handed to [`StateStore::register_document`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRegistration {
    #[serde(rename = "type")]
    pub file_type: FileType,
    pub ppt_id: DocumentIdentifier,
    pub data: StructuredDocument,
}

/// Mutation surface of the application state.
///
/// Both operations are infallible from the caller's point of view.
pub trait StateStore: Send + Sync {
    /// Store a parsed document under its slot
    fn register_document(&self, registration: DocumentRegistration);

    /// Move the application to its next stage
    fn advance_sequence(&self);
}

/// A document held by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredDocument {
    pub ppt_id: DocumentIdentifier,
    pub data: StructuredDocument,
    pub registered_at: DateTime<Utc>,
}

/// Point-in-time copy of the store contents
#[derive(Debug, Clone, Serialize)]
pub struct StoreSnapshot {
    pub sequence: u32,
    pub documents: BTreeMap<FileType, RegisteredDocument>,
}

#[derive(Debug, Default)]
struct StoreState {
    documents: HashMap<FileType, RegisteredDocument>,
    sequence: u32,
}

/// In-process [`StateStore`].
///
/// Holds one document per slot; registering a slot again replaces it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of the sequence counter
    pub fn sequence(&self) -> u32 {
        self.state.read().sequence
    }

    pub fn document(&self, file_type: FileType) -> Option<RegisteredDocument> {
        self.state.read().documents.get(&file_type).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.read().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().documents.is_empty()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.read();
        StoreSnapshot {
            sequence: state.sequence,
            documents: state
                .documents
                .iter()
                .map(|(k, v)| (*k, v.clone()))
                .collect(),
        }
    }
}

impl StateStore for MemoryStore {
    fn register_document(&self, registration: DocumentRegistration) {
        let DocumentRegistration {
            file_type,
            ppt_id,
            data,
        } = registration;

        debug!(
            file_type = %file_type,
            ppt_id = %ppt_id,
            slides = data.slide_count(),
            "Document registered"
        );

        self.state.write().documents.insert(
            file_type,
            RegisteredDocument {
                ppt_id,
                data,
                registered_at: Utc::now(),
            },
        );
    }

    fn advance_sequence(&self) {
        let mut state = self.state.write();
        state.sequence = state.sequence.saturating_add(1);
        debug!(sequence = state.sequence, "Sequence advanced");
    }
}
