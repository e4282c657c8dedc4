//! Integration tests for project loading, contributors, and the engine.
//!
//! These tests use real git repositories created via tempfile so the
//! contributor fallback runs against actual history.

use std::fs;
use std::path::Path;
use std::process::Command;

use serde_json::json;
use tempfile::TempDir;

use projectsync::core::merge::MergePolicy;
use projectsync::core::metadata::MetadataField;
use projectsync::core::project::{ContributorSource, GitContributors, ProjectContext, ProjectError};
use projectsync::engine::{self, EngineError, SyncRequest};
use projectsync::git::{Git, GitError};

/// Test fixture that creates a real git repository.
struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create an empty repository with a committer identity.
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");

        run_git(dir.path(), &["init", "-q"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);
        run_git(dir.path(), &["config", "commit.gpgsign", "false"]);

        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn write(&self, name: &str, contents: &str) {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    /// Write a file and commit it under the given author.
    fn commit_as(&self, author: &str, file: &str, contents: &str) {
        self.write(file, contents);
        run_git(self.path(), &["add", file]);
        run_git(
            self.path(),
            &["commit", "-q", "-m", "change", "--author", author],
        );
    }
}

/// Run a git command in the given directory.
fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

fn write_templates(dir: &Path) {
    fs::write(
        dir.join("README.rst.jinja"),
        "{{ name }} {{ version }}\n{% for a in authors %}* {{ a }}\n{% endfor %}",
    )
    .unwrap();
    fs::write(dir.join("LICENSE.jinja"), "License: {{ license }}").unwrap();
}

mod contributors {
    use super::*;

    #[test]
    fn sorted_and_deduplicated() {
        let repo = TestRepo::new();
        repo.commit_as("Zed <zed@example.com>", "a.txt", "1");
        repo.commit_as("Ada <ada@example.com>", "b.txt", "2");
        repo.commit_as("Zed <zed@example.com>", "c.txt", "3");

        let found = GitContributors.contributors(repo.path()).unwrap();
        assert_eq!(found, vec!["Ada <ada@example.com>", "Zed <zed@example.com>"]);
    }

    #[test]
    fn mailmap_merges_identities() {
        let repo = TestRepo::new();
        repo.commit_as("Ada <ada@old.example.com>", "a.txt", "1");
        repo.commit_as("Ada L <ada@example.com>", "b.txt", "2");
        repo.commit_as(
            "Ada L <ada@example.com>",
            ".mailmap",
            "Ada Lovelace <ada@example.com> <ada@old.example.com>\n\
             Ada Lovelace <ada@example.com> Ada L <ada@example.com>\n",
        );

        let found = GitContributors.contributors(repo.path()).unwrap();
        assert_eq!(found, vec!["Ada Lovelace <ada@example.com>"]);
    }

    #[test]
    fn subdirectory_sees_whole_history() {
        let repo = TestRepo::new();
        repo.commit_as("Ada <ada@example.com>", "root.txt", "1");
        repo.commit_as("Bob <bob@example.com>", "pkg/meta.yaml", "name: pkg\n");

        let found = GitContributors
            .contributors(&repo.path().join("pkg"))
            .unwrap();
        assert_eq!(found, vec!["Ada <ada@example.com>", "Bob <bob@example.com>"]);
    }

    #[test]
    fn no_commits_yields_empty() {
        let repo = TestRepo::new();
        let git = Git::open(repo.path()).unwrap();
        assert!(!git.has_commits());
        assert!(GitContributors.contributors(repo.path()).unwrap().is_empty());
    }

    #[test]
    fn outside_repository_yields_empty() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Git::open(dir.path()),
            Err(GitError::NotARepo { .. })
        ));
        assert!(GitContributors.contributors(dir.path()).unwrap().is_empty());
    }
}

mod project {
    use super::*;

    #[test]
    fn authors_filled_from_history_when_missing() {
        let repo = TestRepo::new();
        repo.commit_as("Bob <bob@example.com>", "meta.yaml", "name: demo\n");

        let mut project = ProjectContext::new(repo.path());
        project.apply_defaults(None).unwrap();
        project.apply_overrides().unwrap();
        let metadata = project.finalize_and_export(&GitContributors).unwrap();

        assert_eq!(
            metadata.get(MetadataField::Authors),
            Some(&json!(["Bob <bob@example.com>"]))
        );
    }

    #[test]
    fn declared_authors_are_kept() {
        let repo = TestRepo::new();
        repo.commit_as(
            "Bob <bob@example.com>",
            "meta.yaml",
            "name: demo\nauthors: [Carol]\n",
        );

        let mut project = ProjectContext::new(repo.path());
        project.apply_defaults(None).unwrap();
        project.apply_overrides().unwrap();
        let metadata = project.finalize_and_export(&GitContributors).unwrap();

        assert_eq!(metadata.get(MetadataField::Authors), Some(&json!(["Carol"])));
    }

    #[test]
    fn defaults_then_project_override() {
        let dir = TempDir::new().unwrap();
        let defaults = dir.path().join("defaults.json");
        fs::write(&defaults, r#"{"license": "MIT", "version": "0.1"}"#).unwrap();
        fs::write(dir.path().join("meta.json"), r#"{"name": "demo", "version": "0.2"}"#).unwrap();

        let mut project = ProjectContext::new(dir.path());
        project.apply_defaults(Some(&defaults)).unwrap();
        project.apply_overrides().unwrap();
        let metadata = project.finalize_and_export(&GitContributors).unwrap();

        assert_eq!(metadata.get(MetadataField::Name), Some(&json!("demo")));
        assert_eq!(metadata.get(MetadataField::Version), Some(&json!("0.2")));
        assert_eq!(metadata.get(MetadataField::License), Some(&json!("MIT")));
        assert_eq!(metadata.get(MetadataField::Summary), Some(&json!(null)));
        assert_eq!(metadata.get(MetadataField::Authors), Some(&json!([])));
    }

    #[test]
    fn strict_policy_reports_conflict() {
        let dir = TempDir::new().unwrap();
        let defaults = dir.path().join("defaults.yaml");
        fs::write(&defaults, "version: '0.1'\n").unwrap();
        fs::write(dir.path().join("meta.yaml"), "version: '0.2'\n").unwrap();

        let mut project = ProjectContext::with_policy(dir.path(), MergePolicy::Strict);
        project.apply_defaults(Some(&defaults)).unwrap();
        let err = project.apply_overrides().unwrap_err();
        assert!(err.to_string().contains("version"), "{err}");
    }

    #[test]
    fn missing_metadata_file() {
        let dir = TempDir::new().unwrap();
        let mut project = ProjectContext::new(dir.path());
        assert!(matches!(
            project.apply_defaults(None),
            Err(ProjectError::NotFound { .. })
        ));
    }
}

mod engine_run {
    use super::*;

    #[test]
    fn renders_and_writes_outputs() {
        let repo = TestRepo::new();
        repo.commit_as("Ada <ada@example.com>", "meta.yaml", "name: demo\nversion: '0.2'\n");
        let templates = TempDir::new().unwrap();
        write_templates(templates.path());
        let defaults = templates.path().join("defaults.yaml");
        fs::write(&defaults, "license: MIT\nversion: '0.1'\n").unwrap();

        let mut request = SyncRequest::new(repo.path(), templates.path());
        request.defaults_file = Some(defaults);
        let report = engine::run(&request, &GitContributors).unwrap();

        assert!(report.written);
        assert_eq!(
            fs::read_to_string(repo.path().join("README.rst")).unwrap(),
            "demo 0.2\n* Ada <ada@example.com>\n\n"
        );
        assert_eq!(
            fs::read_to_string(repo.path().join("LICENSE")).unwrap(),
            "License: MIT\n"
        );
        assert_eq!(report.outputs().len(), 2);
    }

    #[test]
    fn dry_run_writes_nothing() {
        let repo = TestRepo::new();
        repo.commit_as("Ada <ada@example.com>", "meta.yaml", "name: demo\n");
        let templates = TempDir::new().unwrap();
        write_templates(templates.path());

        let mut request = SyncRequest::new(repo.path(), templates.path());
        request.dry_run = true;
        let report = engine::run(&request, &GitContributors).unwrap();

        assert!(!report.written);
        assert!(report.rendered[1].contents.starts_with("License: "));
        assert!(!repo.path().join("README.rst").exists());
        assert!(!repo.path().join("LICENSE").exists());
    }

    #[test]
    fn failed_template_writes_nothing() {
        let repo = TestRepo::new();
        repo.commit_as("Ada <ada@example.com>", "meta.yaml", "name: demo\n");
        let templates = TempDir::new().unwrap();
        write_templates(templates.path());

        let mut request = SyncRequest::new(repo.path(), templates.path());
        request.templates = vec!["README.rst.jinja".into(), "MISSING.jinja".into()];
        let err = engine::run(&request, &GitContributors).unwrap_err();

        assert!(matches!(err, EngineError::Render(_)));
        assert!(!repo.path().join("README.rst").exists());
    }

    #[test]
    fn missing_project_metadata_writes_nothing() {
        let project = TempDir::new().unwrap();
        let templates = TempDir::new().unwrap();
        write_templates(templates.path());

        let request = SyncRequest::new(project.path(), templates.path());
        let err = engine::run(&request, &GitContributors).unwrap_err();

        assert!(matches!(
            err,
            EngineError::Project(ProjectError::NotFound { .. })
        ));
        assert!(fs::read_dir(project.path()).unwrap().next().is_none());
    }
}
