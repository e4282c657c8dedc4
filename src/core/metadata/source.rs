//! core::metadata::source
//!
//! Reading raw metadata sources from disk.
//!
//! The format is picked from the file extension: `.yaml` is YAML,
//! everything else is parsed as JSON. Either way the document must be
//! a mapping; an empty document counts as an empty mapping.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use super::MetadataError;

/// Serialization format of a metadata source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Yaml,
    Json,
}

impl SourceFormat {
    /// Pick the format from a path's extension.
    ///
    /// # Example
    ///
    /// ```
    /// use projectsync::core::metadata::source::SourceFormat;
    /// use std::path::Path;
    ///
    /// assert_eq!(SourceFormat::from_path(Path::new("meta.yaml")), SourceFormat::Yaml);
    /// assert_eq!(SourceFormat::from_path(Path::new("meta.json")), SourceFormat::Json);
    /// assert_eq!(SourceFormat::from_path(Path::new("meta.yml")), SourceFormat::Json);
    /// assert_eq!(SourceFormat::from_path(Path::new("meta.txt")), SourceFormat::Json);
    /// ```
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") => SourceFormat::Yaml,
            _ => SourceFormat::Json,
        }
    }

    /// Parse a document in this format.
    ///
    /// Returns the parser's message on failure.
    pub fn parse(&self, contents: &str) -> Result<Value, String> {
        match self {
            SourceFormat::Yaml => {
                // Through serde_yaml::Value so empty documents come back as null.
                let document: serde_yaml::Value =
                    serde_yaml::from_str(contents).map_err(|e| e.to_string())?;
                serde_json::to_value(document).map_err(|e| e.to_string())
            }
            SourceFormat::Json => serde_json::from_str(contents).map_err(|e| e.to_string()),
        }
    }
}

/// Read a metadata source file into a mapping.
///
/// # Errors
///
/// - [`MetadataError::Read`] if the file cannot be read
/// - [`MetadataError::Parse`] if the contents are malformed
/// - [`MetadataError::NotAMapping`] if the document is not a mapping
pub fn read_source(path: &Path) -> Result<Map<String, Value>, MetadataError> {
    let contents = fs::read_to_string(path).map_err(|e| MetadataError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let format = SourceFormat::from_path(path);
    let document = format
        .parse(&contents)
        .map_err(|message| MetadataError::Parse {
            path: path.to_path_buf(),
            message,
        })?;

    into_mapping(document, &path.display().to_string())
}

/// Accept a parsed document as a mapping.
pub(crate) fn into_mapping(
    document: Value,
    origin: &str,
) -> Result<Map<String, Value>, MetadataError> {
    match document {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(MetadataError::NotAMapping {
            origin: origin.to_string(),
        }),
    }
}
