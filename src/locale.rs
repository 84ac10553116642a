//! Locale identifiers and environment detection

use tracing::debug;

use crate::error::{LoadError, LoadResult};

/// English
pub const EN: &str = "en";
/// Russian
pub const RU: &str = "ru";

/// Locales shipped with dictionaries out of the box
pub const LOCALES: &[&str] = &[EN, RU];

/// Environment variables consulted for the user's locale, in priority order
pub const LOCALE_ENV_VARS: &[&str] = &["LC_ALL", "LC_MESSAGES", "LANG"];

/// Reduce a locale string to its lowercase language code
///
/// - `en-US` → `en`
/// - `ru_RU.UTF-8` → `ru`
/// - `EN` → `en`
pub fn normalize_locale(locale: &str) -> String {
    locale
        .split(['-', '_', '.', '@'])
        .next()
        .unwrap_or(locale)
        .trim()
        .to_lowercase()
}

/// Check that a locale can safely name a dictionary file
///
/// Only ASCII alphanumerics, hyphens and underscores are accepted.
pub fn validate_locale(locale: &str) -> LoadResult<()> {
    if locale.is_empty() {
        return Err(LoadError::InvalidLocale(
            "empty locale cannot name a dictionary file".to_string(),
        ));
    }

    match locale
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        Some(c) => Err(LoadError::InvalidLocale(format!(
            "'{}' in locale '{}' is not allowed in a dictionary file name",
            c, locale
        ))),
        None => Ok(()),
    }
}

/// Detect the user's locale using `lookup` to read environment variables.
///
/// `C` and `POSIX` carry no language and are skipped.
pub fn detect_locale_with<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    LOCALE_ENV_VARS.iter().copied().find_map(|var| {
        let value = lookup(var)?;
        let locale = normalize_locale(&value);
        if locale.is_empty() || locale == "c" || locale == "posix" {
            return None;
        }
        debug!(var, value = value.as_str(), locale = locale.as_str(), "detected locale");
        Some(locale)
    })
}

/// Detect the user's locale from the process environment
pub fn detect_locale() -> Option<String> {
    detect_locale_with(|var| std::env::var(var).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("en-US"), "en");
        assert_eq!(normalize_locale("ru_RU.UTF-8"), "ru");
        assert_eq!(normalize_locale("de@euro"), "de");
        assert_eq!(normalize_locale("EN"), "en");
        assert_eq!(normalize_locale("fr"), "fr");
    }

    #[test]
    fn test_validate_locale() {
        assert!(validate_locale("en").is_ok());
        assert!(validate_locale("zh-Hans").is_ok());
        assert!(validate_locale("de_DE").is_ok());
        assert!(validate_locale("").is_err());
        assert!(validate_locale("en/../x").is_err());
        assert!(validate_locale("fr.json").is_err());

        let err = validate_locale("en/../x").unwrap_err();
        assert!(err.to_string().contains("'/'"));
    }

    #[test]
    fn test_detect_locale_priority() {
        assert_eq!(
            detect_locale_with(env(&[("LANG", "ru_RU.UTF-8"), ("LC_ALL", "fr_FR.UTF-8")])),
            Some("fr".to_string())
        );
        assert_eq!(
            detect_locale_with(env(&[("LANG", "ru_RU.UTF-8")])),
            Some("ru".to_string())
        );
    }

    #[test]
    fn test_detect_locale_skips_posix() {
        assert_eq!(
            detect_locale_with(env(&[("LC_ALL", "C"), ("LANG", "en-GB")])),
            Some("en".to_string())
        );
        assert_eq!(detect_locale_with(env(&[("LANG", "POSIX")])), None);
        assert_eq!(detect_locale_with(env(&[])), None);
    }
}
