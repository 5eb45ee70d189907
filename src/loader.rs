//! Reading language data files into mappings.

use crate::error::LoadError;
use crate::value::{Map, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Source of language data: turns a resolved file path into a mapping.
pub trait LangLoader: fmt::Debug {
    /// Suffix appended to the relative name given to `load`.
    fn extension(&self) -> &str;

    fn load(&self, file: &Path) -> Result<Map, LoadError>;
}

/// On-disk encoding of language files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    Toml,
}

#[derive(Debug, Clone, Default)]
pub struct FileLoader {
    format: Format,
}

impl FileLoader {
    pub fn new(format: Format) -> Self {
        Self { format }
    }

    pub fn json() -> Self {
        Self::new(Format::Json)
    }

    pub fn toml() -> Self {
        Self::new(Format::Toml)
    }

    pub fn format(&self) -> Format {
        self.format
    }
}

impl LangLoader for FileLoader {
    fn extension(&self) -> &str {
        match self.format {
            Format::Json => ".lang.json",
            Format::Toml => ".lang.toml",
        }
    }

    fn load(&self, file: &Path) -> Result<Map, LoadError> {
        let malformed = |reason: String| LoadError::Malformed {
            path: file.to_path_buf(),
            reason,
        };

        let content = fs::read_to_string(file).map_err(|source| LoadError::Unreadable {
            path: file.to_path_buf(),
            source,
        })?;

        let value: Value = match self.format {
            Format::Json => serde_json::from_str(&content).map_err(|e| malformed(e.to_string()))?,
            Format::Toml => toml::from_str(&content).map_err(|e| malformed(e.to_string()))?,
        };

        match value {
            Value::Map(map) => Ok(map),
            other => Err(malformed(format!("expected a mapping, found {}", other.kind()))),
        }
    }
}
