//! cli
//!
//! Command-line interface layer for projectsync.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and flags
//! - Resolve them against the loaded configuration
//! - Hand the resulting request to the [`crate::engine`]
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, applies config
//! precedence, and reports the engine's outcome. It never reads metadata
//! or writes outputs itself.

pub mod args;

pub use args::Cli;

use anyhow::{anyhow, Context as _, Result};
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;
use crate::core::metadata::MetadataField;
use crate::core::project::GitContributors;
use crate::engine::{self, SyncRequest};
use crate::ui::output::{self, Verbosity};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let ctx = engine::Context {
        debug: cli.debug,
        quiet: cli.quiet,
    };
    let verbosity = Verbosity::from_context(&ctx);
    init_logging(verbosity);

    let config = Config::load(Some(&cli.project_dir))
        .context("failed to load configuration")?
        .config;
    let request = build_request(&cli, &config)?;

    let report = engine::run(&request, &GitContributors)?;
    if report.metadata.is_empty(MetadataField::Authors) {
        output::warn(
            "no authors in metadata and none found in git history",
            verbosity,
        );
    }

    if cli.print_metadata {
        println!("{}", serde_json::to_string_pretty(&report.metadata)?);
    }

    let outputs: Vec<String> = report
        .outputs()
        .into_iter()
        .map(|path| output::format_path(path, &request.project_dir))
        .collect();
    let verb = if report.written { "Wrote" } else { "Would write" };
    output::print(
        format!("{}:\n{}", verb, output::format_list(&outputs, "  ")),
        verbosity,
    );

    Ok(())
}

/// Resolve CLI arguments against configuration.
///
/// CLI values win; config fills the gaps.
pub fn build_request(cli: &Cli, config: &Config) -> Result<SyncRequest> {
    let templates_dir = cli
        .templates_dir
        .clone()
        .or_else(|| config.templates_dir().map(|p| p.to_path_buf()))
        .ok_or_else(|| {
            anyhow!("no templates directory given and none configured (set templates_dir)")
        })?;

    let mut request = SyncRequest::new(&cli.project_dir, templates_dir);
    request.defaults_file = cli
        .defaults_file()
        .or(config.defaults_file())
        .map(|p| p.to_path_buf());
    request.templates = if cli.templates.is_empty() {
        config.templates()
    } else {
        cli.templates.clone()
    };
    request.merge_policy = cli.merge_policy().unwrap_or_else(|| config.merge_policy());
    request.dry_run = cli.dry_run;

    Ok(request)
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` takes precedence over the verbosity flags.
fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));

    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{GlobalConfig, ProjectConfig};
    use crate::core::merge::MergePolicy;
    use clap::Parser;
    use std::path::{Path, PathBuf};

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("projectsync").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_values_win() {
        let config = Config::new(
            GlobalConfig {
                templates_dir: Some(PathBuf::from("/cfg/templates")),
                defaults_file: Some(PathBuf::from("/cfg/defaults.yaml")),
                merge_policy: Some("override".to_string()),
                ..Default::default()
            },
            None,
        );
        let request = build_request(
            &cli(&["proj", "tmpl", "d.json", "--strict", "--template", "X.jinja"]),
            &config,
        )
        .unwrap();

        assert_eq!(request.templates_dir, PathBuf::from("tmpl"));
        assert_eq!(request.defaults_file.as_deref(), Some(Path::new("d.json")));
        assert_eq!(request.templates, vec!["X.jinja"]);
        assert_eq!(request.merge_policy, MergePolicy::Strict);
    }

    #[test]
    fn config_fills_gaps() {
        let config = Config::new(
            GlobalConfig {
                templates_dir: Some(PathBuf::from("/cfg/templates")),
                defaults_file: Some(PathBuf::from("/cfg/defaults.yaml")),
                ..Default::default()
            },
            Some(ProjectConfig {
                templates: Some(vec!["README.md.jinja".to_string()]),
                merge_policy: Some("strict".to_string()),
            }),
        );
        let request = build_request(&cli(&["proj"]), &config).unwrap();
        assert_eq!(request.templates_dir, PathBuf::from("/cfg/templates"));
        assert_eq!(
            request.defaults_file.as_deref(),
            Some(Path::new("/cfg/defaults.yaml"))
        );
        assert_eq!(request.templates, vec!["README.md.jinja"]);
        assert_eq!(request.merge_policy, MergePolicy::Strict);
        assert!(!request.dry_run);
    }

    #[test]
    fn override_flag_beats_configured_strict() {
        let config = Config::new(
            GlobalConfig {
                merge_policy: Some("strict".to_string()),
                ..Default::default()
            },
            Some(ProjectConfig {
                merge_policy: Some("strict".to_string()),
                ..Default::default()
            }),
        );
        let request = build_request(&cli(&["proj", "tmpl", "--override"]), &config).unwrap();
        assert_eq!(request.merge_policy, MergePolicy::Override);

        let request = build_request(&cli(&["proj", "tmpl"]), &config).unwrap();
        assert_eq!(request.merge_policy, MergePolicy::Strict);
    }

    #[test]
    fn missing_templates_dir_is_error() {
        let err = build_request(&cli(&["proj"]), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("templates directory"));
    }

    #[test]
    fn builtin_templates_by_default() {
        let request = build_request(&cli(&["proj", "tmpl"]), &Config::default()).unwrap();
        assert_eq!(request.templates, vec!["README.rst.jinja", "LICENSE.jinja"]);
        assert_eq!(request.merge_policy, MergePolicy::Override);
        assert!(request.defaults_file.is_none());
    }
}
