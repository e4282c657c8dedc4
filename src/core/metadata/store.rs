//! core::metadata::store
//!
//! The per-project metadata store.
//!
//! # Architecture
//!
//! `MetadataStore` wraps an insertion-ordered `serde_json::Map`. The map is
//! private: values only enter through [`MetadataStore::load`] (recognized
//! fields, deep-merged) or [`MetadataStore::set`] (a typed field). Keys
//! outside the closed field set can never be stored.
//!
//! # Lifecycle
//!
//! 1. `new()` - empty store, one per project run
//! 2. `load()` / `load_file()` - zero or more times, in precedence order
//! 3. `finalize()` - every recognized field present, null when unsupplied
//!
//! # Example
//!
//! ```
//! use projectsync::core::metadata::{MetadataField, MetadataStore};
//! use serde_json::json;
//!
//! let mut store = MetadataStore::new();
//! store.load(&json!({"license": "MIT", "version": "0.1"})).unwrap();
//! store.load(&json!({"name": "demo", "version": "0.2", "color": "blue"})).unwrap();
//! store.finalize();
//!
//! assert_eq!(store.get(MetadataField::Version), Some(&json!("0.2")));
//! assert_eq!(store.get(MetadataField::Summary), Some(&json!(null)));
//! assert!(store.get_key("color").is_none());
//! ```

use std::path::Path;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use super::fields::{is_empty_value, MetadataField};
use super::source::{into_mapping, read_source};
use super::MetadataError;
use crate::core::merge::{deep_merge, MergePolicy};

/// Ordered metadata restricted to the known field set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataStore {
    values: Map<String, Value>,
    policy: MergePolicy,
}

impl MetadataStore {
    /// Create an empty store using the default merge policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with an explicit merge policy.
    pub fn with_policy(policy: MergePolicy) -> Self {
        Self {
            values: Map::new(),
            policy,
        }
    }

    /// The merge policy applied by `load`.
    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// Merge the recognized fields of a raw document into the store.
    ///
    /// Unrecognized keys and empty values are dropped before merging.
    ///
    /// # Errors
    ///
    /// - [`MetadataError::NotAMapping`] if `raw` is not a mapping
    /// - [`MetadataError::Merge`] on a conflict under the strict policy
    pub fn load(&mut self, raw: &Value) -> Result<(), MetadataError> {
        let map = into_mapping(raw.clone(), "document")?;
        self.load_map(&map)
    }

    /// Read a metadata source file and merge it into the store.
    ///
    /// # Errors
    ///
    /// Everything [`read_source`] returns, plus merge conflicts.
    pub fn load_file(&mut self, path: &Path) -> Result<(), MetadataError> {
        debug!(path = %path.display(), "loading metadata source");
        let map = read_source(path)?;
        self.load_map(&map)
    }

    fn load_map(&mut self, raw: &Map<String, Value>) -> Result<(), MetadataError> {
        let mut staged = Map::new();
        for field in MetadataField::RECOGNIZED {
            if let Some(value) = field.extract(raw) {
                staged.insert(field.as_str().to_string(), value.clone());
            }
        }

        let dropped = raw
            .keys()
            .filter(|key| MetadataField::from_key(key).map_or(true, |f| f.is_synthetic()))
            .count();
        debug!(staged = staged.len(), dropped, "merging metadata");

        deep_merge(&mut self.values, &staged, self.policy)?;
        Ok(())
    }

    /// Fill every recognized field that is still missing with null.
    ///
    /// Calling this more than once has no further effect.
    pub fn finalize(&mut self) {
        for field in MetadataField::RECOGNIZED {
            self.values
                .entry(field.as_str().to_string())
                .or_insert(Value::Null);
        }
    }

    /// Whether every recognized field is present.
    pub fn is_finalized(&self) -> bool {
        MetadataField::RECOGNIZED
            .iter()
            .all(|f| self.values.contains_key(f.as_str()))
    }

    /// Set a field directly, replacing any previous value.
    ///
    /// A field that was not present yet is appended at the end.
    pub fn set(&mut self, field: MetadataField, value: Value) {
        self.values.insert(field.as_str().to_string(), value);
    }

    /// Get a field's value.
    pub fn get(&self, field: MetadataField) -> Option<&Value> {
        self.values.get(field.as_str())
    }

    /// Get a value by its raw key.
    pub fn get_key(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Whether a field is missing or holds an empty value.
    pub fn is_empty(&self, field: MetadataField) -> bool {
        self.get(field).map_or(true, is_empty_value)
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Clone the contents as a JSON object value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.values.clone())
    }
}

impl Serialize for MetadataStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}
