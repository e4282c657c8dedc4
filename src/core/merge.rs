//! core::merge
//!
//! Recursive merge of metadata mappings.
//!
//! # Rules
//!
//! For every key `k` of the source mapping:
//!
//! | destination        | source          | result                          |
//! |--------------------|-----------------|---------------------------------|
//! | absent             | any             | source value copied             |
//! | mapping            | mapping         | merged recursively              |
//! | equal to source    | equal           | unchanged                       |
//! | null               | non-null        | source value                    |
//! | any other mismatch |                 | decided by [`MergePolicy`]      |
//!
//! The source mapping is never modified.
//!
//! # Example
//!
//! ```
//! use projectsync::core::merge::{deep_merge, MergePolicy};
//! use serde_json::json;
//!
//! let mut dest = json!({"dependencies": {"y": "2.0"}});
//! let src = json!({"dependencies": {"x": "1.0"}});
//!
//! deep_merge(
//!     dest.as_object_mut().unwrap(),
//!     src.as_object().unwrap(),
//!     MergePolicy::Override,
//! )
//! .unwrap();
//!
//! assert_eq!(dest, json!({"dependencies": {"x": "1.0", "y": "2.0"}}));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors from merging two mappings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MergeError {
    /// Both sides carry different non-null leaves under the strict policy.
    #[error("conflict at {path}")]
    Conflict {
        /// Dotted key path of the conflicting leaf
        path: String,
    },
}

/// How mismatched leaf values are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// The source value always wins (last write wins).
    #[default]
    Override,
    /// Differing non-null leaves are a [`MergeError::Conflict`].
    ///
    /// A null destination still takes the source value, and a null source
    /// leaves the destination alone.
    Strict,
}

impl MergePolicy {
    /// All accepted policy names, in display order.
    pub const NAMES: [&'static str; 2] = ["override", "strict"];

    /// The configuration name of this policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            MergePolicy::Override => "override",
            MergePolicy::Strict => "strict",
        }
    }
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "override" => Ok(MergePolicy::Override),
            "strict" => Ok(MergePolicy::Strict),
            other => Err(format!(
                "invalid merge policy '{}', must be one of: {}",
                other,
                Self::NAMES.join(", ")
            )),
        }
    }
}

/// Fold `src` into `dest` in place.
///
/// # Errors
///
/// Returns [`MergeError::Conflict`] only under [`MergePolicy::Strict`].
/// On error `dest` may already hold the keys merged before the conflict.
pub fn deep_merge(
    dest: &mut Map<String, Value>,
    src: &Map<String, Value>,
    policy: MergePolicy,
) -> Result<(), MergeError> {
    let mut path = Vec::new();
    merge_at(dest, src, policy, &mut path)
}

fn merge_at<'a>(
    dest: &mut Map<String, Value>,
    src: &'a Map<String, Value>,
    policy: MergePolicy,
    path: &mut Vec<&'a str>,
) -> Result<(), MergeError> {
    for (key, incoming) in src {
        let Some(existing) = dest.get_mut(key) else {
            dest.insert(key.clone(), incoming.clone());
            continue;
        };

        path.push(key);
        match (existing, incoming) {
            (Value::Object(inner_dest), Value::Object(inner_src)) => {
                merge_at(inner_dest, inner_src, policy, path)?;
            }
            (existing, incoming) if *existing == *incoming => {}
            (existing, incoming) if existing.is_null() => {
                *existing = incoming.clone();
            }
            (existing, incoming) => match policy {
                MergePolicy::Override => *existing = incoming.clone(),
                MergePolicy::Strict => {
                    if !incoming.is_null() {
                        return Err(MergeError::Conflict {
                            path: path.join("."),
                        });
                    }
                }
            },
        }
        path.pop();
    }
    Ok(())
}
