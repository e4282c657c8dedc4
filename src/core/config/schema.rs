//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$PROJECTSYNC_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/projectsync/config.toml`
//! 3. `~/.projectsync/config.toml` (canonical write location)
//!
//! # Project Config
//!
//! Located at `<project_dir>/.projectsync.toml`.
//!
//! # Validation
//!
//! Config values are validated after parsing (e.g., `merge_policy` must name
//! a known policy, template lists must not be empty).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::merge::MergePolicy;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// templates_dir = "/home/me/templates/python"
/// defaults_file = "/home/me/templates/python/meta_defaults.yaml"
/// templates = ["README.rst.jinja", "LICENSE.jinja"]
/// merge_policy = "override"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Directory templates are loaded from
    pub templates_dir: Option<PathBuf>,

    /// Metadata defaults applied before the project's own file
    pub defaults_file: Option<PathBuf>,

    /// Templates to render, by name within the templates directory
    pub templates: Option<Vec<String>>,

    /// How conflicting metadata values are merged ("override" or "strict")
    pub merge_policy: Option<String>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_merge_policy(self.merge_policy.as_deref())?;
        validate_templates(self.templates.as_deref())?;
        Ok(())
    }
}

/// Project configuration.
///
/// # Example
///
/// ```toml
/// templates = ["README.md.jinja"]
/// merge_policy = "strict"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Templates to render for this project
    pub templates: Option<Vec<String>>,

    /// Merge policy for this project
    pub merge_policy: Option<String>,
}

impl ProjectConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_merge_policy(self.merge_policy.as_deref())?;
        validate_templates(self.templates.as_deref())?;
        Ok(())
    }
}

fn validate_merge_policy(policy: Option<&str>) -> Result<(), ConfigError> {
    if let Some(policy) = policy {
        policy
            .parse::<MergePolicy>()
            .map_err(ConfigError::InvalidValue)?;
    }
    Ok(())
}

fn validate_templates(templates: Option<&[String]>) -> Result<(), ConfigError> {
    if let Some(templates) = templates {
        if templates.is_empty() {
            return Err(ConfigError::InvalidValue(
                "templates cannot be an empty list".to_string(),
            ));
        }
        if templates.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::InvalidValue(
                "template names cannot be empty".to_string(),
            ));
        }
    }
    Ok(())
}
