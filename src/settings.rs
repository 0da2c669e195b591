//! Settings file.
//!
//! ```toml
//! soft_delete_field = "deleted_at"
//! pretty = true
//!
//! [resources.variants]
//! default_relations = ["product", "prices", "options"]
//! allowed_relations = ["product", "prices", "options"]
//! default_fields = ["id", "title", "sku"]
//! default_limit = 20
//! default_order = "-created_at"
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{QueryError, QueryResult};
use crate::list::ListRules;
use crate::transpiler::{DEFAULT_SOFT_DELETE_FIELD, TranslateOptions};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Field whose presence in a selector turns on `withDeleted`.
    pub soft_delete_field: String,
    /// Pretty-print JSON output.
    pub pretty: bool,
    /// List rules keyed by resource name.
    pub resources: BTreeMap<String, ListRules>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            soft_delete_field: DEFAULT_SOFT_DELETE_FIELD.to_string(),
            pretty: true,
            resources: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// `<config dir>/findquery/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("findquery").join("config.toml"))
    }

    pub fn from_toml(text: &str) -> QueryResult<Self> {
        toml::from_str(text).map_err(|e| QueryError::Settings(e.to_string()))
    }

    pub fn load(path: &Path) -> QueryResult<Self> {
        tracing::debug!("Loading settings from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .map_err(|e| QueryError::Settings(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&text)
    }

    /// Load `explicit` if given (it must exist), else the default path when
    /// present, else built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> QueryResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn translate_options(&self) -> TranslateOptions {
        TranslateOptions {
            soft_delete_field: self.soft_delete_field.clone(),
        }
    }

    pub fn resource(&self, name: &str) -> QueryResult<&ListRules> {
        self.resources
            .get(name)
            .ok_or_else(|| QueryError::Settings(format!("unknown resource '{}'", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.translate_options(), TranslateOptions::default());
    }

    #[test]
    fn test_resources() {
        let settings = Settings::from_toml(
            r#"
            soft_delete_field = "archived_at"
            pretty = false

            [resources.variants]
            default_relations = ["product", "prices", "options"]
            allowed_relations = ["product", "prices", "options"]
            default_limit = 20
            default_order = "-created_at"
            "#,
        )
        .unwrap();

        assert_eq!(settings.soft_delete_field, "archived_at");
        assert!(!settings.pretty);
        let rules = settings.resource("variants").unwrap();
        assert_eq!(rules.default_limit, Some(20));
        assert_eq!(rules.allowed_relations.len(), 3);
        assert!(rules.allowed_fields.is_empty());
        assert!(settings.resource("orders").is_err());
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            Settings::from_toml("pretty = \"yes\""),
            Err(QueryError::Settings(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file() {
        let path = std::env::temp_dir().join("findquery-does-not-exist.toml");
        assert!(Settings::load_or_default(Some(&path)).is_err());
    }
}
