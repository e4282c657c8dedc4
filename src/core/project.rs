//! core::project
//!
//! Two-phase metadata build for one project directory.
//!
//! # Phases
//!
//! 1. **Defaults**: an explicit defaults file, or the project's own
//!    `meta.yaml`/`meta.json` when none is given
//! 2. **Overrides**: always the project's own metadata file
//! 3. **Export**: finalize the store and fill `authors` from the
//!    repository history when no source supplied any
//!
//! Without an explicit defaults file the project file is merged twice.
//! Merging is idempotent, so the second pass changes nothing.
//!
//! # Example
//!
//! ```ignore
//! use projectsync::core::project::{GitContributors, ProjectContext};
//!
//! let mut project = ProjectContext::new("/work/demo");
//! project.apply_defaults(Some(Path::new("/templates/meta_defaults.yaml")))?;
//! project.apply_overrides()?;
//! let metadata = project.finalize_and_export(&GitContributors)?;
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::merge::MergePolicy;
use crate::core::metadata::{MetadataError, MetadataField, MetadataStore};
use crate::core::paths::ProjectPaths;
use crate::git::{Git, GitError};

/// Errors from building project metadata.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// No `meta.yaml` or `meta.json` in the project directory.
    #[error("no meta.yaml or meta.json found in '{}'", .dir.display())]
    NotFound { dir: PathBuf },

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error("failed to list contributors: {0}")]
    Contributors(#[from] GitError),
}

/// Supplies the contributor list used when `authors` is empty.
pub trait ContributorSource {
    /// `"Name <email>"` strings for everyone who worked on the project.
    fn contributors(&self, project_dir: &Path) -> Result<Vec<String>, GitError>;
}

/// Contributors from the history of the repository containing the project.
///
/// A directory outside any repository has no contributors.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitContributors;

impl ContributorSource for GitContributors {
    fn contributors(&self, project_dir: &Path) -> Result<Vec<String>, GitError> {
        let git = match Git::open(project_dir) {
            Ok(git) => git,
            Err(GitError::NotARepo { path }) => {
                debug!(path = %path.display(), "not a git repository, no contributors");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        Ok(git
            .contributors()?
            .into_iter()
            .map(|c| c.to_string())
            .collect())
    }
}

/// Metadata build state for one project.
///
/// Owns a fresh [`MetadataStore`]; nothing is shared between projects.
#[derive(Debug)]
pub struct ProjectContext {
    paths: ProjectPaths,
    metadata: MetadataStore,
}

impl ProjectContext {
    /// Start a project with the default merge policy.
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self::with_policy(project_dir, MergePolicy::default())
    }

    /// Start a project with an explicit merge policy.
    ///
    /// `project_dir` is recorded as the first metadata key.
    pub fn with_policy(project_dir: impl Into<PathBuf>, policy: MergePolicy) -> Self {
        let paths = ProjectPaths::new(project_dir);
        let mut metadata = MetadataStore::with_policy(policy);
        metadata.set(
            MetadataField::ProjectDir,
            Value::String(paths.project_dir.display().to_string()),
        );
        Self { paths, metadata }
    }

    /// Path routing for this project.
    pub fn paths(&self) -> &ProjectPaths {
        &self.paths
    }

    /// The metadata accumulated so far.
    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    /// First of `meta.yaml`, `meta.json` present in the project directory.
    pub fn locate_metadata_file(&self) -> Option<PathBuf> {
        self.paths.locate_metadata_file()
    }

    fn require_metadata_file(&self) -> Result<PathBuf, ProjectError> {
        self.locate_metadata_file()
            .ok_or_else(|| ProjectError::NotFound {
                dir: self.paths.project_dir.clone(),
            })
    }

    /// Load the defaults source.
    ///
    /// Uses `path` when given, otherwise the project's own metadata file.
    ///
    /// # Errors
    ///
    /// - [`ProjectError::NotFound`] if no path is given and the project has
    ///   no metadata file
    /// - [`ProjectError::Metadata`] if the source cannot be read or merged
    pub fn apply_defaults(&mut self, path: Option<&Path>) -> Result<(), ProjectError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => self.require_metadata_file()?,
        };
        info!(path = %path.display(), "applying metadata defaults");
        self.metadata.load_file(&path)?;
        Ok(())
    }

    /// Load the project's own metadata file over whatever is loaded.
    ///
    /// # Errors
    ///
    /// - [`ProjectError::NotFound`] if the project has no metadata file
    /// - [`ProjectError::Metadata`] if the source cannot be read or merged
    pub fn apply_overrides(&mut self) -> Result<(), ProjectError> {
        let path = self.require_metadata_file()?;
        info!(path = %path.display(), "applying project metadata");
        self.metadata.load_file(&path)?;
        Ok(())
    }

    /// Finalize the metadata and fill in `authors` if nothing supplied it.
    ///
    /// The contributor source is only consulted when `authors` is empty;
    /// its answer is deduplicated and sorted before it is stored.
    pub fn finalize_and_export(
        &mut self,
        contributors: &dyn ContributorSource,
    ) -> Result<&MetadataStore, ProjectError> {
        self.metadata.finalize();

        if self.metadata.is_empty(MetadataField::Authors) {
            let authors: BTreeSet<String> = contributors
                .contributors(&self.paths.project_dir)?
                .into_iter()
                .collect();
            debug!(count = authors.len(), "authors filled from contributors");
            self.metadata.set(
                MetadataField::Authors,
                Value::Array(authors.into_iter().map(Value::String).collect()),
            );
        }

        Ok(&self.metadata)
    }

    /// Give up the context, keeping the metadata.
    pub fn into_metadata(self) -> MetadataStore {
        self.metadata
    }
}
