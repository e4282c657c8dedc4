//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! projectsync has two configuration scopes:
//! - **Global**: User-level settings (templates directory, defaults file)
//! - **Project**: Per-project overrides in `.projectsync.toml`
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Project config file
//! 4. CLI arguments (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$PROJECTSYNC_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/projectsync/config.toml`
//! 3. `~/.projectsync/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use projectsync::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(Some(Path::new("/path/to/project"))).unwrap();
//! let config = result.config;
//!
//! println!("Templates: {:?}", config.templates());
//! println!("Merge policy: {}", config.merge_policy());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, ProjectConfig};

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::core::merge::MergePolicy;
use crate::core::paths::ProjectPaths;

/// Templates rendered when nothing else is configured.
pub const DEFAULT_TEMPLATES: [&str; 2] = ["README.rst.jinja", "LICENSE.jinja"];

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
}

/// Merged configuration from all sources.
///
/// Accessor methods apply precedence rules automatically. Project config
/// overrides global config.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Project configuration (if present)
    pub project: Option<ProjectConfig>,
}

impl Config {
    /// Build a configuration from already-parsed scopes.
    pub fn new(global: GlobalConfig, project: Option<ProjectConfig>) -> Self {
        Self { global, project }
    }

    /// Load configuration from default locations.
    ///
    /// If `project_dir` is provided, also loads `.projectsync.toml` from it.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed.
    /// Missing config files are not an error (defaults are used).
    pub fn load(project_dir: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let global = Self::load_global()?;

        let project = match project_dir {
            Some(dir) => Self::load_project(dir)?,
            None => None,
        };

        global.validate()?;
        if let Some(ref p) = project {
            p.validate()?;
        }

        Ok(ConfigLoadResult {
            config: Config { global, project },
        })
    }

    /// Load global configuration from standard locations.
    fn load_global() -> Result<GlobalConfig, ConfigError> {
        // 1. Check $PROJECTSYNC_CONFIG
        if let Ok(path) = std::env::var("PROJECTSYNC_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Self::read_config(&path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/projectsync/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("projectsync/config.toml");
            if path.exists() {
                return Self::read_config(&path);
            }
        }

        // 3. Check ~/.projectsync/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".projectsync/config.toml");
            if path.exists() {
                return Self::read_config(&path);
            }
        }

        Ok(GlobalConfig::default())
    }

    /// Load project configuration if the project has one.
    fn load_project(project_dir: &Path) -> Result<Option<ProjectConfig>, ConfigError> {
        let path = ProjectPaths::new(project_dir).config_path();
        if !path.is_file() {
            return Ok(None);
        }
        Self::read_config(&path).map(Some)
    }

    /// Read and parse a TOML config file.
    fn read_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
        debug!(path = %path.display(), "loading config");
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Get the templates directory.
    ///
    /// Returns `None` if not configured.
    pub fn templates_dir(&self) -> Option<&Path> {
        self.global.templates_dir.as_deref()
    }

    /// Get the metadata defaults file.
    ///
    /// Returns `None` if not configured.
    pub fn defaults_file(&self) -> Option<&Path> {
        self.global.defaults_file.as_deref()
    }

    /// Get the templates to render.
    ///
    /// Defaults to [`DEFAULT_TEMPLATES`] if not configured.
    pub fn templates(&self) -> Vec<String> {
        self.project
            .as_ref()
            .and_then(|p| p.templates.clone())
            .or_else(|| self.global.templates.clone())
            .unwrap_or_else(|| DEFAULT_TEMPLATES.iter().map(|t| t.to_string()).collect())
    }

    /// Get the merge policy.
    ///
    /// Defaults to [`MergePolicy::Override`] if not configured.
    pub fn merge_policy(&self) -> MergePolicy {
        self.project
            .as_ref()
            .and_then(|p| p.merge_policy.as_deref())
            .or(self.global.merge_policy.as_deref())
            .and_then(|name| name.parse().ok())
            .unwrap_or_default()
    }
}
