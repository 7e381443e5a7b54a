//! Catalog configuration with environment overrides.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use syllabus_api::{ClassroomId, ContentLocale};

use crate::error::{CatalogError, Result};

pub const ENV_ASSET_DIR: &str = "SYLLABUS_ASSET_DIR";
pub const ENV_BACKEND: &str = "SYLLABUS_BACKEND";
pub const ENV_DEFAULT_CLASSROOM: &str = "SYLLABUS_DEFAULT_CLASSROOM";
pub const ENV_DEFAULT_LOCALE: &str = "SYLLABUS_DEFAULT_LOCALE";

/// Which asset encoding the catalog is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// MessagePack records (`<name>.rec`).
    Records,
    /// Loosely typed JSON documents (`<name>.json`).
    #[default]
    Documents,
}

impl FromStr for BackendMode {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "records" | "record" | "proto" => Ok(BackendMode::Records),
            "documents" | "document" | "json" => Ok(BackendMode::Documents),
            other => Err(CatalogError::InvalidConfig(format!(
                "unknown backend '{other}', expected 'records' or 'documents'"
            ))),
        }
    }
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendMode::Records => f.write_str("records"),
            BackendMode::Documents => f.write_str("documents"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub asset_root: PathBuf,
    pub backend: BackendMode,
    pub default_classroom_id: ClassroomId,
    pub default_locale: ContentLocale,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            backend: BackendMode::default(),
            default_classroom_id: "test_classroom_id_0".to_string(),
            default_locale: ContentLocale::default(),
        }
    }
}

impl CatalogConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the `SYLLABUS_*`
    /// variables. Blank values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(dir) = get(ENV_ASSET_DIR) {
            config.asset_root = PathBuf::from(dir);
        }
        if let Some(backend) = get(ENV_BACKEND) {
            config.backend = backend.parse()?;
        }
        if let Some(classroom) = get(ENV_DEFAULT_CLASSROOM) {
            config.default_classroom_id = classroom.trim().to_string();
        }
        if let Some(tag) = get(ENV_DEFAULT_LOCALE) {
            config.default_locale = ContentLocale::parse(&tag).ok_or_else(|| {
                CatalogError::InvalidConfig(format!("invalid locale tag '{tag}'"))
            })?;
        }
        Ok(config)
    }

    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    pub fn with_backend(mut self, backend: BackendMode) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_default_classroom(mut self, classroom_id: impl Into<ClassroomId>) -> Self {
        self.default_classroom_id = classroom_id.into();
        self
    }

    pub fn with_default_locale(mut self, locale: ContentLocale) -> Self {
        self.default_locale = locale;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = CatalogConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, CatalogConfig::default());
        assert_eq!(config.backend, BackendMode::Documents);
        assert_eq!(config.default_classroom_id, "test_classroom_id_0");
        assert_eq!(config.default_locale.tag(), "en");
    }

    #[test]
    fn test_overrides_apply() {
        let config = CatalogConfig::from_lookup(lookup(&[
            (ENV_ASSET_DIR, "/srv/catalog"),
            (ENV_BACKEND, "Records"),
            (ENV_DEFAULT_CLASSROOM, "math"),
            (ENV_DEFAULT_LOCALE, "pt_BR"),
            ("UNRELATED", "x"),
        ]))
        .unwrap();
        assert_eq!(config.asset_root, PathBuf::from("/srv/catalog"));
        assert_eq!(config.backend, BackendMode::Records);
        assert_eq!(config.default_classroom_id, "math");
        assert_eq!(config.default_locale.selection_chain(), vec!["pt-br", "pt"]);
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let config = CatalogConfig::from_lookup(lookup(&[(ENV_BACKEND, "  ")])).unwrap();
        assert_eq!(config.backend, BackendMode::Documents);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = CatalogConfig::from_lookup(lookup(&[(ENV_BACKEND, "xml")])).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidConfig(_)));
        let err = CatalogConfig::from_lookup(lookup(&[(ENV_DEFAULT_LOCALE, "12")])).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidConfig(_)));
    }
}
