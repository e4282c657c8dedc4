//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module provides the **single doorway** to all Git operations in
//! projectsync. Only history reads are needed: the commit authors reachable
//! from HEAD, resolved through the repository mailmap.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: Not inside a Git repository
//! - [`GitError::BareRepo`]: Repository has no working directory
//! - [`GitError::Internal`]: Any other libgit2 failure
//!
//! # Example
//!
//! ```ignore
//! use projectsync::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! for author in git.contributors()? {
//!     println!("{}", author);
//! }
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        GitError::Internal {
            message: format!("{}: {}", context, err.message()),
        }
    }
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

/// A commit author identity.
///
/// Ordered by its rendered `Name <email>` form, so a sorted set of
/// contributors lists them lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Contributor {
    /// Author name (after mailmap resolution)
    pub name: String,
    /// Author email (after mailmap resolution)
    pub email: String,
}

impl Contributor {
    /// Create a contributor identity.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for Contributor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

impl PartialOrd for Contributor {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Contributor {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_string().cmp(&other.to_string())
    }
}

/// The Git interface.
///
/// This is the **single point of interaction** with Git. No other module
/// should import `git2` directly.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover` to find the repository root,
    /// so `path` can be any directory within the repository.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        if repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        Ok(Self { repo })
    }

    /// Whether HEAD points at a commit (false for a fresh `git init`).
    pub fn has_commits(&self) -> bool {
        self.repo
            .head()
            .ok()
            .and_then(|head| head.target())
            .is_some()
    }

    /// Every distinct commit author reachable from HEAD, sorted.
    ///
    /// Identities go through the repository mailmap, the same way
    /// `git log --format='%aN <%aE>'` resolves them. A repository without
    /// commits yields an empty list.
    pub fn contributors(&self) -> Result<Vec<Contributor>, GitError> {
        if !self.has_commits() {
            return Ok(Vec::new());
        }

        let mailmap = self
            .repo
            .mailmap()
            .map_err(|e| GitError::from_git2(e, "mailmap"))?;

        let mut revwalk = self
            .repo
            .revwalk()
            .map_err(|e| GitError::from_git2(e, "revwalk"))?;
        revwalk
            .push_head()
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;

        let mut authors = BTreeSet::new();
        for oid in revwalk {
            let oid = oid?;
            let commit = self
                .repo
                .find_commit(oid)
                .map_err(|e| GitError::from_git2(e, &oid.to_string()))?;
            let author = commit
                .author_with_mailmap(&mailmap)
                .map_err(|e| GitError::from_git2(e, &oid.to_string()))?;

            authors.insert(Contributor::new(
                String::from_utf8_lossy(author.name_bytes()),
                String::from_utf8_lossy(author.email_bytes()),
            ));
        }

        Ok(authors.into_iter().collect())
    }
}
