//! render
//!
//! Template rendering for generated project files.
//!
//! # Architecture
//!
//! This module is the only user of `minijinja`. Templates are loaded by
//! name from a templates directory and rendered with the finalized project
//! metadata as their context, so `{{ name }}` or
//! `{% for a in authors %}` work directly.
//!
//! Rendering and writing are separate steps: [`TemplateRenderer::render_file`]
//! only produces text, and [`write_outputs`] writes a batch once everything
//! rendered. No auto-escaping is applied; outputs are plain text formats.
//!
//! # Example
//!
//! ```ignore
//! let renderer = TemplateRenderer::new(Path::new("templates"))?;
//! let rendered = renderer.render_file("README.rst.jinja", project.paths(), &metadata)?;
//! write_outputs(&[rendered])?;
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use minijinja::{path_loader, AutoEscape, Environment};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::core::paths::ProjectPaths;

/// Errors from rendering or writing templates.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The templates directory does not exist.
    #[error("templates directory not found: {}", .path.display())]
    MissingTemplatesDir { path: PathBuf },

    /// A template failed to load or render.
    #[error("failed to render template '{name}': {message}")]
    Template { name: String, message: String },

    /// An output file could not be written.
    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A rendered template waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Template name it came from
    pub template: String,
    /// Destination path
    pub path: PathBuf,
    /// Full file contents, trailing newline included
    pub contents: String,
}

/// Loads and renders templates from one directory.
pub struct TemplateRenderer {
    env: Environment<'static>,
    templates_dir: PathBuf,
}

impl std::fmt::Debug for TemplateRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRenderer")
            .field("templates_dir", &self.templates_dir)
            .finish()
    }
}

impl TemplateRenderer {
    /// Create a renderer for a templates directory.
    ///
    /// # Errors
    ///
    /// [`RenderError::MissingTemplatesDir`] if `templates_dir` is not a directory.
    pub fn new(templates_dir: &Path) -> Result<Self, RenderError> {
        if !templates_dir.is_dir() {
            return Err(RenderError::MissingTemplatesDir {
                path: templates_dir.to_path_buf(),
            });
        }

        let mut env = Environment::new();
        env.set_loader(path_loader(templates_dir));
        env.set_auto_escape_callback(|_| AutoEscape::None);

        Ok(Self {
            env,
            templates_dir: templates_dir.to_path_buf(),
        })
    }

    /// The directory templates are loaded from.
    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    /// Render a template to text, with a trailing newline appended.
    pub fn render<S: Serialize>(&self, template: &str, data: &S) -> Result<String, RenderError> {
        let to_error = |e: minijinja::Error| RenderError::Template {
            name: template.to_string(),
            message: e.to_string(),
        };

        let tmpl = self.env.get_template(template).map_err(to_error)?;
        let contents = tmpl.render(data).map_err(to_error)?;
        Ok(format!("{}\n", contents))
    }

    /// Render a template for a project, resolving its output path.
    pub fn render_file<S: Serialize>(
        &self,
        template: &str,
        paths: &ProjectPaths,
        data: &S,
    ) -> Result<RenderedFile, RenderError> {
        let contents = self.render(template, data)?;
        let path = paths.output_path(template);
        debug!(template, path = %path.display(), "rendered template");
        Ok(RenderedFile {
            template: template.to_string(),
            path,
            contents,
        })
    }
}

/// Write rendered files, each atomically.
pub fn write_outputs(files: &[RenderedFile]) -> Result<(), RenderError> {
    for file in files {
        write_atomic(&file.path, file.contents.as_bytes())?;
    }
    Ok(())
}

/// Write to a temp file next to `path`, then rename over it.
///
/// The temp file is removed again if any step fails.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), RenderError> {
    let write_err = |path: &Path, e: std::io::Error| RenderError::Write {
        path: path.to_path_buf(),
        source: e,
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = path.with_file_name(format!(".{}.tmp", file_name));

    let result = write_temp(&temp_path, contents)
        .map_err(|e| write_err(&temp_path, e))
        .and_then(|()| fs::rename(&temp_path, path).map_err(|e| write_err(path, e)));

    if result.is_err() && temp_path.exists() {
        if let Err(e) = fs::remove_file(&temp_path) {
            debug!(path = %temp_path.display(), error = %e, "could not remove temp file");
        }
    }
    result
}

fn write_temp(temp_path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(temp_path)?;
    file.write_all(contents)?;
    file.sync_all()
}
