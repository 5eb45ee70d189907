use crate::catalog::{LanguageCatalog, LookupOptions};
use crate::loader::{FileLoader, Format};
use crate::path_store::DEFAULT_SEPARATOR;
use crate::placeholder::{DEFAULT_ESCAPE, DEFAULT_MARKER};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable pointing at an alternative config file.
pub const CONFIG_ENV: &str = "LANGPATH_CONFIG";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub storage: StorageConfig,
    // language id -> folder under `storage.root`
    #[serde(default)]
    pub languages: IndexMap<String, String>,
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    pub root: PathBuf,
    #[serde(default)]
    pub format: Format,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LookupConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub separator: char,
    pub marker: String,
    pub escape: char,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    // UI language: "auto" follows $LANG
    pub language: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            active: Some("en".to_string()),
            default: Some("en".to_string()),
            separator: DEFAULT_SEPARATOR,
            marker: DEFAULT_MARKER.to_string(),
            escape: DEFAULT_ESCAPE,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut languages = IndexMap::new();
        languages.insert("en".to_string(), "en".to_string());
        languages.insert("es".to_string(), "es".to_string());

        Self {
            storage: StorageConfig {
                root: Self::base_dir().join("lang"),
                format: Format::Json,
            },
            languages,
            lookup: LookupConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    /// Loads the config from `$LANGPATH_CONFIG` or `~/.langpath/config.toml`,
    /// writing the defaults there on first use.
    pub fn new() -> Result<Self> {
        Self::load_or_create(&Self::get_config_path())
    }

    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load_from(config_path)
        } else {
            let config = Config::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing {}", config_path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }

    pub fn get_config_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| Self::base_dir().join("config.toml"))
    }

    fn base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".langpath")
    }

    pub fn get_effective_language(&self) -> String {
        if self.display.language == "auto" {
            // Try to get system language
            std::env::var("LANG")
                .unwrap_or_else(|_| "en_US".to_string())
                .split('.')
                .next()
                .unwrap_or("en")
                .to_string()
        } else {
            self.display.language.clone()
        }
    }

    pub fn lookup_options(&self) -> LookupOptions<'_> {
        LookupOptions {
            separator: self.lookup.separator,
            marker: &self.lookup.marker,
            escape: self.lookup.escape,
        }
    }

    /// Empty catalog wired to the configured storage, languages and loader.
    /// An unregistered `lookup.active` leaves no language selected.
    pub fn build_catalog(&self) -> LanguageCatalog {
        let mut catalog = LanguageCatalog::with_loader(FileLoader::new(self.storage.format));
        catalog.set_storage_root(&self.storage.root);
        catalog.set_languages(self.languages.clone());
        if let Some(default) = &self.lookup.default {
            catalog.set_default_language(default.clone());
        }
        if let Some(active) = &self.lookup.active {
            catalog.set_language(active);
        }
        catalog
    }
}
