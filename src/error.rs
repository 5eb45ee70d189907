use std::path::PathBuf;
use thiserror::Error;

/// Failure to bring a language file into a catalog. A failed load leaves
/// the catalog untouched.
#[derive(Debug, Error)]
pub enum LoadError {
    /// `load` was called before any language was activated.
    #[error("no active language selected")]
    NoActiveLanguage,

    /// The active language has no registered folder.
    #[error("language '{0}' is not registered")]
    UnknownLanguage(String),

    /// The language file could not be read.
    #[error("language file not readable: {}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but does not hold a mapping.
    #[error("malformed language file {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}
