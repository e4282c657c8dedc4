//! core::metadata
//!
//! Project metadata fields, sources and storage.
//!
//! # Modules
//!
//! - [`fields`] - The closed set of metadata field names
//! - [`source`] - Reading YAML/JSON metadata sources
//! - [`store`] - The ordered, field-restricted metadata store
//!
//! # Recognized Fields
//!
//! `authors`, `compatibility`, `dependencies`, `extra`, `license`,
//! `maintainer`, `name`, `project_url`, `source`, `summary`, `todo`,
//! `version`. The synthetic `project_dir` is set at runtime only.

pub mod fields;
pub mod source;
pub mod store;

use std::path::PathBuf;

use thiserror::Error;

use crate::core::merge::MergeError;

pub use fields::{is_empty_value, MetadataField};
pub use source::{read_source, SourceFormat};
pub use store::MetadataStore;

/// Errors from loading metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to read metadata file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse metadata file '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("metadata in {origin} is not a mapping")]
    NotAMapping { origin: String },

    #[error("metadata merge failed: {0}")]
    Merge(#[from] MergeError),
}
