//! Multi-locale registry
//!
//! Loads several locales concurrently and serves renders for any of them.
//! Loading finishes only once every requested locale has been attempted; a
//! locale that failed is recorded with no dictionary.

use futures::future::join_all;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::config::LocalizeConfig;
use crate::dictionary::{CompiledDictionary, Dictionary};
use crate::error::LoadError;
use crate::interpolator::{SubstitutionMap, interpolate};
use crate::loader::{DictionarySource, FileSource, load_dictionary};
use crate::locale::normalize_locale;
use crate::preprocessor::{AuthoringWarning, Preprocessor};

/// Outcome of loading one locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleOutcome {
    pub locale: String,
    pub error: Option<LoadError>,
    pub warnings: Vec<AuthoringWarning>,
}

impl LocaleOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Default)]
pub struct LocaleRegistry {
    dictionaries: HashMap<String, Option<CompiledDictionary>>,
    outcomes: Vec<LocaleOutcome>,
}

impl LocaleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `config.locales` from `config.dictionary_dir`.
    pub async fn from_config(config: &LocalizeConfig) -> Self {
        let source = FileSource::new(&config.dictionary_dir).with_encoding(&config.encoding);
        let locales: Vec<&str> = config.locales.iter().map(String::as_str).collect();
        Self::load(&locales, &source).await
    }

    /// Load every locale concurrently and wait for all of them.
    ///
    /// # Arguments
    /// * `locales` - Locales to load; they are normalized and duplicates dropped
    /// * `source` - Where dictionaries are fetched from
    ///
    /// # Returns
    /// A registry with one [`LocaleOutcome`] per distinct locale. Failed
    /// locales stay listed but have no dictionary.
    ///
    /// # Example
    /// ```ignore
    /// let source = MemorySource::new().with_dictionary("en", r#"{"hi": ["Hi"]}"#);
    /// let registry = LocaleRegistry::load(&["en", "ru"], &source).await;
    /// assert!(registry.is_ready("en"));
    /// assert!(!registry.is_ready("ru"));
    /// ```
    pub async fn load<S>(locales: &[&str], source: &S) -> Self
    where
        S: DictionarySource + ?Sized,
    {
        let mut wanted: Vec<String> = Vec::new();
        for locale in locales {
            let locale = normalize_locale(locale);
            if !wanted.contains(&locale) {
                wanted.push(locale);
            }
        }

        let loads = wanted.iter().map(|locale| async move {
            match load_dictionary(source, locale).await {
                Ok(raw) => {
                    let mut preprocessor = Preprocessor::new();
                    let compiled = Dictionary::from(raw)
                        .preprocess(&mut preprocessor)
                        .into_compiled();
                    let outcome = LocaleOutcome {
                        locale: locale.clone(),
                        error: None,
                        warnings: preprocessor.into_warnings(),
                    };
                    (outcome, compiled)
                }
                Err(error) => {
                    let outcome = LocaleOutcome {
                        locale: locale.clone(),
                        error: Some(error),
                        warnings: Vec::new(),
                    };
                    (outcome, None)
                }
            }
        });

        let mut registry = LocaleRegistry::new();
        for (outcome, compiled) in join_all(loads).await {
            registry.dictionaries.insert(outcome.locale.clone(), compiled);
            registry.outcomes.push(outcome);
        }

        info!(
            requested = registry.outcomes.len(),
            ready = registry.ready_locales().count(),
            "locale dictionaries loaded"
        );
        registry
    }

    /// Like [`LocaleRegistry::load`], calling `on_ready` once all locales were attempted.
    pub async fn load_with<S, F>(locales: &[&str], source: &S, on_ready: F) -> Self
    where
        S: DictionarySource + ?Sized,
        F: FnOnce(&LocaleRegistry),
    {
        let registry = Self::load(locales, source).await;
        on_ready(&registry);
        registry
    }

    /// Register an already compiled dictionary, replacing any previous
    /// outcome for the same locale.
    pub fn insert(&mut self, locale: &str, dictionary: CompiledDictionary) {
        let locale = normalize_locale(locale);
        self.outcomes.retain(|outcome| outcome.locale != locale);
        self.outcomes.push(LocaleOutcome {
            locale: locale.clone(),
            error: None,
            warnings: Vec::new(),
        });
        self.dictionaries.insert(locale, Some(dictionary));
    }

    /// Every requested locale, in request order
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.outcomes.iter().map(|outcome| outcome.locale.as_str())
    }

    pub fn ready_locales(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.is_ok())
            .map(|outcome| outcome.locale.as_str())
    }

    /// Per-locale load results, in request order
    pub fn outcomes(&self) -> &[LocaleOutcome] {
        &self.outcomes
    }

    /// Whether `locale` has a usable dictionary
    pub fn is_ready(&self, locale: &str) -> bool {
        self.dictionary(locale).is_some()
    }

    /// Compiled dictionary for `locale`
    ///
    /// The locale is normalized the same way as on load, so `en-US` and `EN`
    /// both find `en`. Returns `None` both for locales never requested and for
    /// those that failed to load.
    pub fn dictionary(&self, locale: &str) -> Option<&CompiledDictionary> {
        self.dictionaries
            .get(&normalize_locale(locale))
            .and_then(Option::as_ref)
    }

    /// Render `key` in `locale`, or an empty string if that locale is not
    /// loaded or lacks the key.
    pub fn get<M>(&self, key: &str, substitutions: &M, locale: &str) -> String
    where
        M: SubstitutionMap + ?Sized,
    {
        let Some(dictionary) = self.dictionary(locale) else {
            warn!(locale, key, "use of uninitialized dictionary");
            return String::new();
        };

        match dictionary.get(key) {
            Some(message) => interpolate(message, substitutions),
            None => {
                warn!(locale, key, "use of not defined key");
                String::new()
            }
        }
    }
}
