//! Single-locale localizer
//!
//! Picks one active locale for the process: a forced locale if configured,
//! otherwise the one detected from the environment, falling back to the
//! default locale when a dictionary cannot be loaded.

use tracing::{info, warn};

use crate::config::LocalizeConfig;
use crate::dictionary::{CompiledDictionary, Dictionary};
use crate::error::LoadError;
use crate::interpolator::{SubstitutionMap, interpolate};
use crate::loader::{DictionarySource, FileSource, load_dictionary};
use crate::locale::{detect_locale, normalize_locale};
use crate::preprocessor::{AuthoringWarning, Preprocessor};

/// Steps taken while resolving the active locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Requested(String),
    Failed { locale: String, error: LoadError },
    RequestedFallback(String),
    Ready(String),
    FailedFinal,
}

/// Locales to try, in order, without repeats
pub fn resolution_chain(forced: Option<&str>, detected: Option<&str>, default: &str) -> Vec<String> {
    let mut chain: Vec<String> = Vec::new();
    for locale in [forced, detected, Some(default)].into_iter().flatten() {
        let locale = normalize_locale(locale);
        if !locale.is_empty() && !chain.contains(&locale) {
            chain.push(locale);
        }
    }
    chain
}

#[derive(Debug, Default)]
pub struct Localizer {
    active: Option<(String, CompiledDictionary)>,
    history: Vec<LoadState>,
    warnings: Vec<AuthoringWarning>,
}

impl Localizer {
    /// An uninitialized localizer; every `get` returns an empty string.
    pub fn new() -> Self {
        Self::default()
    }

    /// A localizer that is already ready with `dictionary` as `locale`
    pub fn from_compiled(locale: &str, dictionary: CompiledDictionary) -> Self {
        Localizer {
            active: Some((normalize_locale(locale), dictionary)),
            history: vec![LoadState::Ready(normalize_locale(locale))],
            warnings: Vec::new(),
        }
    }

    /// Load the dictionaries from `config.dictionary_dir`, detecting the user
    /// locale from the environment.
    pub async fn from_config(config: &LocalizeConfig) -> Self {
        let source = FileSource::new(&config.dictionary_dir).with_encoding(&config.encoding);
        let detected = detect_locale();
        Self::init(config, detected.as_deref(), &source).await
    }

    /// Try forced, detected and default locales in turn until one loads.
    ///
    /// # Arguments
    /// * `config` - Supplies the forced and default locales
    /// * `detected` - Locale detected from the user's environment, if any
    /// * `source` - Where dictionaries are fetched from
    ///
    /// # Returns
    /// A localizer that is ready if any locale in the chain loaded. Every
    /// step is kept in [`Localizer::history`], ending with
    /// [`LoadState::Ready`] or [`LoadState::FailedFinal`].
    pub async fn init<S>(config: &LocalizeConfig, detected: Option<&str>, source: &S) -> Self
    where
        S: DictionarySource + ?Sized,
    {
        let chain = resolution_chain(
            config.forced_locale.as_deref(),
            detected,
            &config.default_locale,
        );

        let mut localizer = Localizer::new();
        for (attempt, locale) in chain.iter().enumerate() {
            localizer.history.push(if attempt == 0 {
                LoadState::Requested(locale.clone())
            } else {
                LoadState::RequestedFallback(locale.clone())
            });

            match load_dictionary(source, locale).await {
                Ok(raw) => {
                    let mut preprocessor = Preprocessor::new();
                    let compiled = Dictionary::from(raw)
                        .preprocess(&mut preprocessor)
                        .into_compiled()
                        .unwrap_or_default();
                    localizer.warnings = preprocessor.into_warnings();

                    info!(locale = locale.as_str(), messages = compiled.len(), "locale ready");
                    localizer.history.push(LoadState::Ready(locale.clone()));
                    localizer.active = Some((locale.clone(), compiled));
                    return localizer;
                }
                Err(error) => {
                    match chain.get(attempt + 1) {
                        Some(next) => warn!(
                            locale = locale.as_str(),
                            "locale is not supported, trying {}", next
                        ),
                        None => warn!(
                            locale = locale.as_str(),
                            "failed to load the default locale"
                        ),
                    }
                    localizer.history.push(LoadState::Failed {
                        locale: locale.clone(),
                        error,
                    });
                }
            }
        }

        localizer.history.push(LoadState::FailedFinal);
        localizer
    }

    /// Whether a dictionary was loaded
    pub fn is_ready(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_locale(&self) -> Option<&str> {
        self.active.as_ref().map(|(locale, _)| locale.as_str())
    }

    pub fn dictionary(&self) -> Option<&CompiledDictionary> {
        self.active.as_ref().map(|(_, dictionary)| dictionary)
    }

    /// Every resolution step taken by [`Localizer::init`], in order
    pub fn history(&self) -> &[LoadState] {
        &self.history
    }

    /// Authoring warnings from compiling the active dictionary
    pub fn warnings(&self) -> &[AuthoringWarning] {
        &self.warnings
    }

    /// Render `key` with `substitutions`, or an empty string if the
    /// localizer is not ready or the key is unknown.
    pub fn get<M>(&self, key: &str, substitutions: &M) -> String
    where
        M: SubstitutionMap + ?Sized,
    {
        let Some((_, dictionary)) = &self.active else {
            warn!(key, "use of uninitialized localizer");
            return String::new();
        };

        match dictionary.get(key) {
            Some(message) => interpolate(message, substitutions),
            None => {
                warn!(key, "use of not defined key");
                String::new()
            }
        }
    }
}
