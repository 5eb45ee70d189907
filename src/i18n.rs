use langpath::{LanguageCatalog, Value};

/// The CLI's own messages, kept in a catalog under `<lang>.<key>`.
pub struct I18n {
    catalog: LanguageCatalog,
    current_lang: String,
}

const EN: &[(&str, &str)] = &[
    // Help texts
    ("help_config_section", "Config (~/.langpath/config.toml, or $LANGPATH_CONFIG):"),
    ("help_config_storage", "storage.root / storage.format: where language folders live, json | toml"),
    ("help_config_languages", "[languages] id = \"folder\": registered languages"),
    ("help_config_lookup", "lookup.active / separator / marker / escape: lookup defaults"),
    // Runtime messages
    ("loaded", "Loaded :file into ':target'"),
    ("not_found", "No entry at ':path'"),
    ("copied", "Copied ':source' to ':dest'"),
    ("moved", "Moved ':source' to ':dest'"),
    ("removed", "Removed ':path'"),
    ("source_missing", "Nothing at ':path', catalog unchanged"),
    ("languages_header", "Registered languages:"),
    ("active_marker", "(active)"),
    ("default_marker", "(default)"),
    ("no_languages", "No languages registered"),
    ("config_path", "Config file: :path"),
    ("catalog_empty", "Catalog is empty"),
    // Error messages
    ("error_load", "Failed to load language file ':file'"),
    ("error_unknown_language", "Language ':lang' is not registered"),
    ("error_substitution", "Invalid substitution ':arg', expected name=value"),
];

const ES: &[(&str, &str)] = &[
    // Help texts
    ("help_config_section", "Configuración (~/.langpath/config.toml, o $LANGPATH_CONFIG):"),
    ("help_config_storage", "storage.root / storage.format: carpeta de idiomas, json | toml"),
    ("help_config_languages", "[languages] id = \"carpeta\": idiomas registrados"),
    ("help_config_lookup", "lookup.active / separator / marker / escape: valores de búsqueda"),
    // Runtime messages
    ("loaded", "Cargado :file en ':target'"),
    ("not_found", "No hay entrada en ':path'"),
    ("copied", "Copiado ':source' a ':dest'"),
    ("moved", "Movido ':source' a ':dest'"),
    ("removed", "Eliminado ':path'"),
    ("source_missing", "No existe ':path', catálogo sin cambios"),
    ("languages_header", "Idiomas registrados:"),
    ("active_marker", "(activo)"),
    ("default_marker", "(por defecto)"),
    ("no_languages", "No hay idiomas registrados"),
    ("config_path", "Archivo de configuración: :path"),
    ("catalog_empty", "El catálogo está vacío"),
    // Error messages
    ("error_load", "No se pudo cargar el archivo de idioma ':file'"),
    ("error_unknown_language", "El idioma ':lang' no está registrado"),
    ("error_substitution", "Sustitución no válida ':arg', se esperaba nombre=valor"),
];

impl I18n {
    pub fn new(lang: &str) -> Self {
        let mut catalog = LanguageCatalog::new();
        catalog.set_languages([("en", "en"), ("es", "es")]);
        catalog.set("en", Value::from_entries(EN.iter().copied()));
        catalog.set("es", Value::from_entries(ES.iter().copied()));

        // unknown locales fall back to English
        let lower = lang.to_lowercase();
        let effective_lang = if lower.starts_with("es") || lower == "spanish" || lower == "español" {
            "es"
        } else {
            "en"
        };
        catalog.set_language(effective_lang);

        Self {
            catalog,
            current_lang: effective_lang.to_string(),
        }
    }

    pub fn t(&self, key: &str) -> String {
        self.t_format(key, &[])
    }

    pub fn t_format(&self, key: &str, args: &[(&str, &str)]) -> String {
        self.catalog
            .scope(&self.current_lang)
            .get_str(key, args)
            .unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_selection() {
        assert_eq!(I18n::new("es_ES").t("removed"), "Eliminado ':path'");
        assert_eq!(I18n::new("en_US").t("removed"), "Removed ':path'");
        assert_eq!(I18n::new("de_DE").t("removed"), "Removed ':path'");
    }

    #[test]
    fn test_format_and_missing_key() {
        let i18n = I18n::new("en");
        assert_eq!(
            i18n.t_format("copied", &[("source", "a.b"), ("dest", "c")]),
            "Copied 'a.b' to 'c'"
        );
        assert_eq!(i18n.t("no_such_key"), "no_such_key");
    }

    #[test]
    fn test_every_message_is_translated() {
        let en: Vec<&str> = EN.iter().map(|(k, _)| *k).collect();
        let es: Vec<&str> = ES.iter().map(|(k, _)| *k).collect();
        assert_eq!(en, es);
    }
}
