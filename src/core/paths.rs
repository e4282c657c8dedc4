//! core::paths
//!
//! Centralized path routing for a project directory.
//!
//! # Layout
//!
//! Everything projectsync reads or writes inside a project lives directly
//! in the project directory:
//! - `meta.yaml` / `meta.json` - project metadata (YAML preferred)
//! - `.projectsync.toml` - project-scoped configuration
//! - rendered outputs, named after their template minus its last extension
//!
//! # Example
//!
//! ```
//! use projectsync::core::paths::ProjectPaths;
//! use std::path::PathBuf;
//!
//! let paths = ProjectPaths::new("/work/demo");
//!
//! assert_eq!(
//!     paths.output_path("README.rst.jinja"),
//!     PathBuf::from("/work/demo/README.rst")
//! );
//! ```

use std::path::{Path, PathBuf};

/// Metadata file names probed in a project directory, in preference order.
pub const METADATA_FILE_NAMES: [&str; 2] = ["meta.yaml", "meta.json"];

/// Project-scoped configuration file name.
pub const PROJECT_CONFIG_FILE: &str = ".projectsync.toml";

/// Path routing for one project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    /// The project directory as given.
    pub project_dir: PathBuf,
}

impl ProjectPaths {
    /// Create paths rooted at a project directory.
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
        }
    }

    /// Candidate metadata file paths, in preference order.
    pub fn metadata_candidates(&self) -> Vec<PathBuf> {
        METADATA_FILE_NAMES
            .iter()
            .map(|name| self.project_dir.join(name))
            .collect()
    }

    /// First existing metadata file, if any.
    pub fn locate_metadata_file(&self) -> Option<PathBuf> {
        self.metadata_candidates()
            .into_iter()
            .find(|path| path.is_file())
    }

    /// Path of the project-scoped config file.
    pub fn config_path(&self) -> PathBuf {
        self.project_dir.join(PROJECT_CONFIG_FILE)
    }

    /// Where a rendered template is written.
    ///
    /// The template's last extension is stripped, so `LICENSE.jinja`
    /// becomes `LICENSE`. Only the file name is used; directories in the
    /// template name are not recreated.
    pub fn output_path(&self, template: &str) -> PathBuf {
        self.project_dir.join(output_file_name(template))
    }
}

/// File name a template renders to.
pub fn output_file_name(template: &str) -> String {
    let path = Path::new(template);
    match (path.extension(), path.file_stem()) {
        (Some(_), Some(stem)) => stem.to_string_lossy().into_owned(),
        _ => path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| template.to_string()),
    }
}
