//! Language catalog: translation data for the active language, held in a
//! [`PathStore`] and read back through the placeholder engine.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing path | Key not loaded | `get` returns `None` |
//! | Unregistered language | `set_language` with unknown id | Ignored, returns `false` |
//! | Unreadable / non-mapping file | `load` | `LoadError`, catalog untouched |
//! | Missing source | `copy` / `move_path` | Returns `false`, nothing changes |

use crate::error::LoadError;
use crate::loader::{FileLoader, LangLoader};
use crate::path_store::{PathStore, DEFAULT_SEPARATOR};
use crate::placeholder::{self, DEFAULT_ESCAPE, DEFAULT_MARKER};
use crate::value::{replace_recursive, Value};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// How a lookup splits its path and spots placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupOptions<'a> {
    pub separator: char,
    pub marker: &'a str,
    pub escape: char,
}

impl Default for LookupOptions<'static> {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            marker: DEFAULT_MARKER,
            escape: DEFAULT_ESCAPE,
        }
    }
}

#[derive(Debug)]
pub struct LanguageCatalog {
    storage_root: PathBuf,
    // language id -> folder relative to `storage_root`
    languages: IndexMap<String, String>,
    language: Option<String>,
    default_language: Option<String>,
    vars: PathStore,
    loader: Box<dyn LangLoader>,
}

impl Default for LanguageCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageCatalog {
    /// Empty catalog reading `*.lang.json` files.
    pub fn new() -> Self {
        Self::with_loader(FileLoader::json())
    }

    pub fn with_loader(loader: impl LangLoader + 'static) -> Self {
        Self {
            storage_root: PathBuf::new(),
            languages: IndexMap::new(),
            language: None,
            default_language: None,
            vars: PathStore::new(),
            loader: Box::new(loader),
        }
    }

    pub fn set_storage_root(&mut self, root: impl Into<PathBuf>) {
        self.storage_root = root.into();
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    pub fn set_languages<I, K, V>(&mut self, languages: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.languages = languages
            .into_iter()
            .map(|(id, folder)| (id.into(), folder.into()))
            .collect();
    }

    pub fn languages(&self) -> &IndexMap<String, String> {
        &self.languages
    }

    /// Activates `id` if it is a registered language. Returns whether it was.
    pub fn set_language(&mut self, id: &str) -> bool {
        if !self.languages.contains_key(id) {
            warn!(language = id, "ignoring unregistered language");
            return false;
        }
        self.language = Some(id.to_string());
        true
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Stored for callers; lookups never fall back to it.
    pub fn set_default_language(&mut self, id: impl Into<String>) {
        self.default_language = Some(id.into());
    }

    pub fn default_language(&self) -> Option<&str> {
        self.default_language.as_deref()
    }

    pub fn store(&self) -> &PathStore {
        &self.vars
    }

    // ---- loading -----------------------------------------------------

    pub fn load(&mut self, relative: &str, target: Option<&str>) -> Result<(), LoadError> {
        self.load_sep(relative, target, DEFAULT_SEPARATOR)
    }

    /// Loads `{root}/{folder}/{relative}{ext}` and merges it at `target`.
    ///
    /// Without a target the relative name is used, with `/` and `\`
    /// turned into `separator`. An existing mapping at the target is deep
    /// merged (new keys win); anything else there is overwritten. The
    /// empty target merges into the root.
    pub fn load_sep(
        &mut self,
        relative: &str,
        target: Option<&str>,
        separator: char,
    ) -> Result<(), LoadError> {
        let target = match target {
            Some(target) => target.to_string(),
            None => relative.replace(['/', '\\'], &separator.to_string()),
        };

        let file = self.resolve_file(relative)?;
        let incoming = self.loader.load(&file)?;
        info!(file = %file.display(), target = %target, entries = incoming.len(), "loaded language file");

        if target.is_empty() {
            replace_recursive(self.vars.items_mut(), incoming);
            return Ok(());
        }

        match self.vars.get_mut_sep(&target, separator) {
            Some(Value::Map(existing)) => replace_recursive(existing, incoming),
            _ => {
                self.vars.set_sep(&target, Value::Map(incoming), separator);
            }
        }
        Ok(())
    }

    fn resolve_file(&self, relative: &str) -> Result<PathBuf, LoadError> {
        let language = self.language.as_deref().ok_or(LoadError::NoActiveLanguage)?;
        let folder = self
            .languages
            .get(language)
            .ok_or_else(|| LoadError::UnknownLanguage(language.to_string()))?;
        // concatenated, not joined: an absolute folder or relative name
        // must not replace the storage root
        let mut file = self.storage_root.clone().into_os_string();
        file.push(format!("/{folder}/{relative}{}", self.loader.extension()));
        Ok(PathBuf::from(file))
    }

    // ---- lookups -----------------------------------------------------

    pub fn get(&self, path: &str, substitutions: &[(&str, &str)]) -> Option<Value> {
        self.get_with(path, substitutions, &LookupOptions::default())
    }

    /// Value at `path` with its placeholders substituted; `None` when the
    /// path is absent (no fallback language is consulted).
    pub fn get_with(
        &self,
        path: &str,
        substitutions: &[(&str, &str)],
        options: &LookupOptions<'_>,
    ) -> Option<Value> {
        let raw = self.vars.get_sep(path, options.separator);
        debug!(path, found = raw.is_some(), "catalog lookup");
        raw.map(|value| {
            placeholder::replace_value(value, substitutions, options.marker, options.escape)
        })
    }

    /// Like [`get`](Self::get) but only for scalar leaves, as text.
    pub fn get_str(&self, path: &str, substitutions: &[(&str, &str)]) -> Option<String> {
        self.get(path, substitutions)?.to_text()
    }

    pub fn replace(
        text: Option<&str>,
        substitutions: &[(&str, &str)],
        marker: &str,
        escape: char,
    ) -> String {
        placeholder::replace(text, substitutions, marker, escape)
    }

    /// Read view rooted at `root`.
    pub fn scope(&self, root: &str) -> CatalogScope<'_> {
        CatalogScope {
            catalog: self,
            root: root.to_string(),
        }
    }

    // ---- mutation ----------------------------------------------------

    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        self.set_sep(path, value, DEFAULT_SEPARATOR);
    }

    pub fn set_sep(&mut self, path: &str, value: impl Into<Value>, separator: char) {
        self.vars.set_sep(path, value, separator);
    }

    pub fn remove(&mut self, path: &str) -> bool {
        self.remove_sep(path, DEFAULT_SEPARATOR)
    }

    pub fn remove_sep(&mut self, path: &str, separator: char) -> bool {
        self.vars.remove_sep(path, separator)
    }

    pub fn copy(&mut self, source: &str, dest: &str) -> bool {
        self.copy_sep(source, dest, DEFAULT_SEPARATOR)
    }

    /// Copies `source` to `dest`. When both are mappings they are deep
    /// merged with `source` winning. Returns whether `source` existed.
    pub fn copy_sep(&mut self, source: &str, dest: &str, separator: char) -> bool {
        let Some(value) = self.vars.get_sep(source, separator).cloned() else {
            debug!(source, "copy skipped, source missing");
            return false;
        };

        let value = match (value, self.vars.get_sep(dest, separator)) {
            (Value::Map(incoming), Some(Value::Map(existing))) => {
                let mut merged = existing.clone();
                replace_recursive(&mut merged, incoming);
                Value::Map(merged)
            }
            (value, _) => value,
        };

        self.vars.set_sep(dest, value, separator);
        true
    }

    pub fn move_path(&mut self, source: &str, dest: &str) -> bool {
        self.move_path_sep(source, dest, DEFAULT_SEPARATOR)
    }

    /// Copy, then drop `source` only if the copy happened.
    pub fn move_path_sep(&mut self, source: &str, dest: &str, separator: char) -> bool {
        if !self.copy_sep(source, dest, separator) {
            return false;
        }
        self.vars.remove_sep(source, separator);
        true
    }
}

/// Lookups under a fixed root path, e.g. one screen's strings.
#[derive(Debug, Clone)]
pub struct CatalogScope<'a> {
    catalog: &'a LanguageCatalog,
    root: String,
}

impl CatalogScope<'_> {
    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn get(&self, path: &str, substitutions: &[(&str, &str)]) -> Option<Value> {
        self.get_with(path, substitutions, &LookupOptions::default())
    }

    pub fn get_with(
        &self,
        path: &str,
        substitutions: &[(&str, &str)],
        options: &LookupOptions<'_>,
    ) -> Option<Value> {
        if self.root.is_empty() {
            return self.catalog.get_with(path, substitutions, options);
        }
        let full = format!("{}{}{}", self.root, options.separator, path);
        self.catalog.get_with(&full, substitutions, options)
    }

    pub fn get_str(&self, path: &str, substitutions: &[(&str, &str)]) -> Option<String> {
        self.get(path, substitutions)?.to_text()
    }
}
