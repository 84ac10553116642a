use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::loader::DEFAULT_ENCODING;
use crate::locale::{EN, normalize_locale};

/// Where dictionaries live and which locales to use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizeConfig {
    /// Directory containing `<locale>.json` files
    pub dictionary_dir: PathBuf,
    /// Used when the detected or forced locale has no dictionary
    pub default_locale: String,
    /// Takes priority over the detected locale
    pub forced_locale: Option<String>,
    /// Locales loaded up front by a `LocaleRegistry`
    pub locales: Vec<String>,
    pub encoding: String,
}

impl Default for LocalizeConfig {
    fn default() -> Self {
        LocalizeConfig {
            dictionary_dir: PathBuf::from("locales"),
            default_locale: EN.to_string(),
            forced_locale: None,
            locales: vec![EN.to_string()],
            encoding: DEFAULT_ENCODING.to_string(),
        }
    }
}

impl LocalizeConfig {
    /// Read configuration from `LOCALIZE_*` environment variables
    ///
    /// - `LOCALIZE_DIR` (default `locales`)
    /// - `LOCALIZE_DEFAULT_LOCALE` (default `en`)
    /// - `LOCALIZE_FORCE_LOCALE`
    /// - `LOCALIZE_LOCALES`, comma separated (default: the default locale)
    /// - `LOCALIZE_ENCODING` (default `utf-8`)
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = LocalizeConfig::default();
        let non_empty = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        let default_locale = non_empty("LOCALIZE_DEFAULT_LOCALE")
            .map(|value| normalize_locale(&value))
            .unwrap_or(defaults.default_locale);

        let locales = non_empty("LOCALIZE_LOCALES")
            .map(|value| {
                value
                    .split(',')
                    .map(normalize_locale)
                    .filter(|locale| !locale.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec![default_locale.clone()]);

        LocalizeConfig {
            dictionary_dir: non_empty("LOCALIZE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.dictionary_dir),
            forced_locale: non_empty("LOCALIZE_FORCE_LOCALE").map(|value| normalize_locale(&value)),
            encoding: non_empty("LOCALIZE_ENCODING").unwrap_or(defaults.encoding),
            default_locale,
            locales,
        }
    }

    pub fn with_dictionary_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dictionary_dir = dir.into();
        self
    }

    pub fn with_default_locale(mut self, locale: &str) -> Self {
        self.default_locale = normalize_locale(locale);
        self
    }

    pub fn with_forced_locale(mut self, locale: Option<&str>) -> Self {
        self.forced_locale = locale.map(normalize_locale);
        self
    }

    pub fn with_locales(mut self, locales: &[&str]) -> Self {
        self.locales = locales.iter().map(|l| normalize_locale(l)).collect();
        self
    }
}
