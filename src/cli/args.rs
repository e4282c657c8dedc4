//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Usage
//!
//! ```text
//! projectsync <PROJECT_DIR> [TEMPLATES_DIR] [DEFAULTS_FILE]
//! ```
//!
//! `TEMPLATES_DIR` and `DEFAULTS_FILE` fall back to the global config.
//! An empty `DEFAULTS_FILE` argument counts as not given.
//!
//! # Flags
//!
//! - `--template <NAME>`: Render this template (repeatable)
//! - `--strict`: Fail on conflicting metadata instead of overriding
//! - `--override`: Let the later source win, even if config asks for strict
//! - `--dry-run`: Render everything but write nothing
//! - `--print-metadata`: Print the finalized metadata as JSON
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use std::path::{Path, PathBuf};

use clap::builder::TypedValueParser;
use clap::Parser;

use crate::core::merge::MergePolicy;

/// projectsync - Merge project metadata and render README/LICENSE from templates
#[derive(Parser, Debug)]
#[command(name = "projectsync")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    # Render README.rst and LICENSE for the current project
    projectsync . ~/templates/python ~/templates/python/meta_defaults.yaml

    # Preview without touching any file
    projectsync . ~/templates/python --dry-run --print-metadata

    # Only regenerate the license, refusing conflicting metadata
    projectsync . ~/templates/python --template LICENSE.jinja --strict")]
pub struct Cli {
    /// Project directory containing meta.yaml or meta.json
    pub project_dir: PathBuf,

    /// Directory holding the templates
    pub templates_dir: Option<PathBuf>,

    /// Metadata defaults applied before the project's own file
    #[arg(value_parser = clap::builder::OsStringValueParser::new().map(PathBuf::from))]
    pub defaults_file: Option<PathBuf>,

    /// Render this template instead of the configured list (repeatable)
    #[arg(long = "template", value_name = "NAME")]
    pub templates: Vec<String>,

    /// Fail when sources disagree instead of letting the later one win
    #[arg(long)]
    pub strict: bool,

    /// Let the later source win, overriding a configured strict policy
    #[arg(long = "override", conflicts_with = "strict")]
    pub override_policy: bool,

    /// Render templates but do not write any file
    #[arg(long)]
    pub dry_run: bool,

    /// Print the finalized metadata as JSON
    #[arg(long)]
    pub print_metadata: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// The defaults file, treating an empty argument as absent.
    pub fn defaults_file(&self) -> Option<&Path> {
        self.defaults_file
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }

    /// Merge policy requested on the command line, if any.
    pub fn merge_policy(&self) -> Option<MergePolicy> {
        if self.strict {
            Some(MergePolicy::Strict)
        } else if self.override_policy {
            Some(MergePolicy::Override)
        } else {
            None
        }
    }
}
