//! Path-addressed language catalogs.
//!
//! [`PathStore`] keeps nested, insertion-ordered data addressed by paths
//! such as `"menu.file.open"`. [`LanguageCatalog`] loads per-language data
//! files into one store and resolves entries through the placeholder
//! engine in [`placeholder`].

pub mod catalog;
pub mod config;
pub mod error;
pub mod loader;
pub mod path_store;
pub mod placeholder;
pub mod value;

pub use catalog::{CatalogScope, LanguageCatalog, LookupOptions};
pub use config::Config;
pub use error::LoadError;
pub use loader::{FileLoader, Format, LangLoader};
pub use path_store::{PathStore, DEFAULT_SEPARATOR};
pub use placeholder::{replace, replace_value, DEFAULT_ESCAPE, DEFAULT_MARKER};
pub use value::{replace_recursive, Key, Map, Value};
