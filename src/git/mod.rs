//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. No other module should import
//! `git2`, and nothing shells out to the git CLI.
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - Listing commit authors reachable from HEAD (mailmap-aware)
//!
//! # Example
//!
//! ```ignore
//! use projectsync::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let authors = git.contributors()?;
//! ```

mod interface;

pub use interface::{Contributor, Git, GitError};
