//! projectsync - Merge project metadata and render README/LICENSE from templates
//!
//! projectsync reads a project's `meta.yaml` or `meta.json`, layers it over
//! a shared defaults file, fills in the author list from git history when
//! the metadata leaves it empty, and renders a fixed set of templates
//! (README, LICENSE) into the project directory.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Orchestrates Load → Finalize → Render → Write
//! - [`core`] - Metadata store, merge rules, configuration, and paths
//! - [`git`] - Single interface for all Git operations
//! - [`render`] - Template rendering and output writing
//! - [`ui`] - User-facing output
//!
//! # Guarantees
//!
//! 1. Only recognized metadata fields are ever stored
//! 2. Every recognized field is present after finalization
//! 3. No output file is written unless every template rendered

pub mod cli;
pub mod core;
pub mod engine;
pub mod git;
pub mod render;
pub mod ui;
