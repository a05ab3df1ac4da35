//! Decoding configuration documents.

use std::path::Path;

use crate::error::Result;
use crate::value::Table;

/// Serialization format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Pick the format from a file extension; anything but `.json` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

/// Decode a `{global, domains}` document. The top level must be a mapping;
/// an empty YAML document decodes to an empty table.
pub fn parse_document(text: &str, format: DocumentFormat) -> Result<Table> {
    match format {
        DocumentFormat::Yaml if text.trim().is_empty() => Ok(Table::new()),
        DocumentFormat::Yaml => Ok(serde_yaml::from_str(text)?),
        DocumentFormat::Json => Ok(serde_json::from_str(text)?),
    }
}
