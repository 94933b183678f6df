//! Core types for deckdrop.
//!
//! Holds the data model shared by the ingestion pipeline and its front ends:
//! raw file handles, the parsed slide document, remote identifiers, the
//! slot tags a document can fill, the application state store and the
//! layered configuration.

pub mod config;
pub mod store;
pub mod types;

pub use config::*;
pub use store::{DocumentRegistration, MemoryStore, RegisteredDocument, StateStore, StoreSnapshot};
pub use types::*;
