//! core::metadata::fields
//!
//! The closed set of metadata field names.
//!
//! Twelve fields are read from metadata sources. One more, `project_dir`,
//! is synthetic: it is set at runtime and never read from a file.

use std::fmt;

use serde_json::{Map, Value};

/// A metadata field known to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetadataField {
    /// Everyone who committed to the project. Not the same as `maintainer`.
    Authors,
    Compatibility,
    Dependencies,
    Extra,
    /// SPDX license identifier
    License,
    Maintainer,
    Name,
    ProjectUrl,
    Source,
    Summary,
    Todo,
    Version,
    /// Synthetic: the project directory being processed.
    ProjectDir,
}

impl MetadataField {
    /// Fields extracted from metadata sources, in canonical order.
    pub const RECOGNIZED: [MetadataField; 12] = [
        MetadataField::Authors,
        MetadataField::Compatibility,
        MetadataField::Dependencies,
        MetadataField::Extra,
        MetadataField::License,
        MetadataField::Maintainer,
        MetadataField::Name,
        MetadataField::ProjectUrl,
        MetadataField::Source,
        MetadataField::Summary,
        MetadataField::Todo,
        MetadataField::Version,
    ];

    /// The key this field is stored under.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataField::Authors => "authors",
            MetadataField::Compatibility => "compatibility",
            MetadataField::Dependencies => "dependencies",
            MetadataField::Extra => "extra",
            MetadataField::License => "license",
            MetadataField::Maintainer => "maintainer",
            MetadataField::Name => "name",
            MetadataField::ProjectUrl => "project_url",
            MetadataField::Source => "source",
            MetadataField::Summary => "summary",
            MetadataField::Todo => "todo",
            MetadataField::Version => "version",
            MetadataField::ProjectDir => "project_dir",
        }
    }

    /// Source keys consulted for this field, most preferred first.
    ///
    /// Every field currently answers only to its own name; aliases go here.
    pub fn candidate_keys(&self) -> &'static [&'static str] {
        match self {
            MetadataField::Authors => &["authors"],
            MetadataField::Compatibility => &["compatibility"],
            MetadataField::Dependencies => &["dependencies"],
            MetadataField::Extra => &["extra"],
            MetadataField::License => &["license"],
            MetadataField::Maintainer => &["maintainer"],
            MetadataField::Name => &["name"],
            MetadataField::ProjectUrl => &["project_url"],
            MetadataField::Source => &["source"],
            MetadataField::Summary => &["summary"],
            MetadataField::Todo => &["todo"],
            MetadataField::Version => &["version"],
            MetadataField::ProjectDir => &[],
        }
    }

    /// Whether the field is set at runtime rather than read from sources.
    pub fn is_synthetic(&self) -> bool {
        matches!(self, MetadataField::ProjectDir)
    }

    /// Look up a field by its stored key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::RECOGNIZED
            .into_iter()
            .chain(std::iter::once(MetadataField::ProjectDir))
            .find(|f| f.as_str() == key)
    }

    /// The first non-empty value found under one of the candidate keys.
    pub fn extract<'a>(&self, raw: &'a Map<String, Value>) -> Option<&'a Value> {
        self.candidate_keys()
            .iter()
            .filter_map(|key| raw.get(*key))
            .find(|value| !is_empty_value(value))
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Null, `""`, `[]` and `{}` count as "no value".
///
/// Booleans and numbers are always values, including `false` and `0`.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
