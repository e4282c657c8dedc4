//! engine
//!
//! Orchestrates one projectsync run: Load -> Finalize -> Render -> Write.
//!
//! # Lifecycle
//!
//! 1. **Load**: a fresh [`ProjectContext`] applies the defaults source, then
//!    the project's own metadata file
//! 2. **Finalize**: fill unset fields, derive `authors` from history if empty
//! 3. **Render**: every template is rendered in memory
//! 4. **Write**: outputs are written only after all templates rendered
//!
//! # Invariants
//!
//! - Every run builds its own metadata store; nothing carries over
//! - Any failure aborts the run before a single output is written
//! - A dry run performs steps 1-3 and writes nothing
//!
//! # Example
//!
//! ```ignore
//! use projectsync::core::project::GitContributors;
//! use projectsync::engine::{run, SyncRequest};
//!
//! let request = SyncRequest::new("/work/demo", "/srv/templates");
//! let report = run(&request, &GitContributors)?;
//! for output in report.outputs() {
//!     println!("wrote {}", output.display());
//! }
//! ```

use std::path::PathBuf;

use tracing::info;

use crate::core::config::DEFAULT_TEMPLATES;
use crate::core::merge::MergePolicy;
use crate::core::metadata::MetadataStore;
use crate::core::project::{ContributorSource, ProjectContext, ProjectError};
use crate::render::{write_outputs, RenderError, RenderedFile, TemplateRenderer};

/// Execution context for a run.
///
/// Contains global settings derived from CLI flags that affect output.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
}

/// Everything needed to sync one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    /// Project directory holding `meta.yaml`/`meta.json`
    pub project_dir: PathBuf,
    /// Directory templates are loaded from
    pub templates_dir: PathBuf,
    /// Explicit defaults source; the project file is used when absent
    pub defaults_file: Option<PathBuf>,
    /// Template names to render
    pub templates: Vec<String>,
    /// How conflicting metadata values merge
    pub merge_policy: MergePolicy,
    /// Render without writing
    pub dry_run: bool,
}

impl SyncRequest {
    /// A request with the built-in template list and default policy.
    pub fn new(project_dir: impl Into<PathBuf>, templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            templates_dir: templates_dir.into(),
            defaults_file: None,
            templates: DEFAULT_TEMPLATES.iter().map(|t| t.to_string()).collect(),
            merge_policy: MergePolicy::default(),
            dry_run: false,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug)]
pub struct SyncReport {
    /// The finalized metadata the templates saw
    pub metadata: MetadataStore,
    /// Rendered files, in template order
    pub rendered: Vec<RenderedFile>,
    /// Whether the files were written
    pub written: bool,
}

impl SyncReport {
    /// Destination paths of the rendered files.
    pub fn outputs(&self) -> Vec<&std::path::Path> {
        self.rendered.iter().map(|f| f.path.as_path()).collect()
    }
}

/// Errors from a run.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Building the metadata failed.
    #[error(transparent)]
    Project(#[from] ProjectError),

    /// Rendering or writing failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Run the full lifecycle for one project.
pub fn run(
    request: &SyncRequest,
    contributors: &dyn ContributorSource,
) -> Result<SyncReport, EngineError> {
    // 1. Load
    let mut project = ProjectContext::with_policy(&request.project_dir, request.merge_policy);
    project.apply_defaults(request.defaults_file.as_deref())?;
    project.apply_overrides()?;

    // 2. Finalize
    project.finalize_and_export(contributors)?;
    let metadata = project.metadata();

    // 3. Render
    let renderer = TemplateRenderer::new(&request.templates_dir)?;
    let rendered = request
        .templates
        .iter()
        .map(|template| renderer.render_file(template, project.paths(), metadata))
        .collect::<Result<Vec<_>, _>>()?;

    // 4. Write
    if !request.dry_run {
        write_outputs(&rendered)?;
    }
    info!(
        outputs = rendered.len(),
        dry_run = request.dry_run,
        "project synced"
    );

    Ok(SyncReport {
        metadata: project.into_metadata(),
        rendered,
        written: !request.dry_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::MetadataField;
    use crate::git::GitError;
    use serde_json::json;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    struct NoContributors;

    impl ContributorSource for NoContributors {
        fn contributors(&self, _project_dir: &Path) -> Result<Vec<String>, GitError> {
            Ok(Vec::new())
        }
    }

    fn fixture() -> (TempDir, TempDir) {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("meta.yaml"), "name: demo\nlicense: MIT\n").unwrap();

        let templates = TempDir::new().unwrap();
        fs::write(templates.path().join("README.rst.jinja"), "{{ name }}").unwrap();
        fs::write(templates.path().join("LICENSE.jinja"), "{{ license }}").unwrap();
        (project, templates)
    }

    #[test]
    fn renders_and_writes_defaults() {
        let (project, templates) = fixture();
        let request = SyncRequest::new(project.path(), templates.path());

        let report = run(&request, &NoContributors).unwrap();

        assert!(report.written);
        assert_eq!(
            report.outputs(),
            vec![
                project.path().join("README.rst").as_path(),
                project.path().join("LICENSE").as_path()
            ]
        );
        assert_eq!(
            fs::read_to_string(project.path().join("README.rst")).unwrap(),
            "demo\n"
        );
        assert_eq!(
            report.metadata.get(MetadataField::Authors),
            Some(&json!([]))
        );
    }

    #[test]
    fn dry_run_writes_nothing() {
        let (project, templates) = fixture();
        let mut request = SyncRequest::new(project.path(), templates.path());
        request.dry_run = true;

        let report = run(&request, &NoContributors).unwrap();

        assert!(!report.written);
        assert_eq!(report.rendered.len(), 2);
        assert!(!project.path().join("README.rst").exists());
    }

    #[test]
    fn failing_template_writes_nothing() {
        let (project, templates) = fixture();
        let mut request = SyncRequest::new(project.path(), templates.path());
        request.templates.push("MISSING.jinja".to_string());

        let err = run(&request, &NoContributors).unwrap_err();

        assert!(matches!(err, EngineError::Render(RenderError::Template { .. })));
        assert!(!project.path().join("README.rst").exists());
        assert!(!project.path().join("LICENSE").exists());
    }

    #[test]
    fn missing_metadata_aborts() {
        let project = TempDir::new().unwrap();
        let templates = TempDir::new().unwrap();
        let request = SyncRequest::new(project.path(), templates.path());

        let err = run(&request, &NoContributors).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Project(ProjectError::NotFound { .. })
        ));
    }
}
