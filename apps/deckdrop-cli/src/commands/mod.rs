//! CLI command implementations

pub mod attach;
pub mod check;
pub mod completions;
pub mod inspect;
pub mod version;
