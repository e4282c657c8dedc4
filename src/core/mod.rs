//! core
//!
//! Core domain types and rules for projectsync.
//!
//! # Modules
//!
//! - [`merge`] - Recursive mapping merge with conflict policy
//! - [`metadata`] - Recognized fields, source files, and the metadata store
//! - [`project`] - Per-project loading and contributor fallback
//! - [`config`] - Configuration schema and loading
//! - [`paths`] - Where project files live

pub mod config;
pub mod merge;
pub mod metadata;
pub mod paths;
pub mod project;
