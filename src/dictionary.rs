use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::{LoadError, LoadResult};
use crate::preprocessor::Preprocessor;
use crate::segment::CompiledMessage;

/// Message key to raw template, exactly as authored in `<locale>.json`.
///
/// ```json
/// {
///     "@metadata": { ... },  // Ignored
///     "greeting": ["Hello,", "#name", "$!"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawDictionary(pub HashMap<String, Vec<String>>);

impl RawDictionary {
    pub fn new() -> Self {
        RawDictionary(HashMap::new())
    }

    pub fn with_template(&mut self, key: &str, template: &[&str]) -> &mut Self {
        self.0.insert(
            key.to_owned(),
            template.iter().map(|part| part.to_string()).collect(),
        );
        self
    }

    pub fn get(&self, key: &str) -> Option<&Vec<String>> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse dictionary JSON text.
    ///
    /// Keys starting with `@` are metadata and skipped. Entries whose value is
    /// not an array of strings are skipped with a warning.
    ///
    /// # Errors
    /// - Invalid JSON
    /// - Root is not an object
    pub fn from_json(content: &str) -> LoadResult<Self> {
        let json: Value = serde_json::from_str(content)?;

        let obj = json
            .as_object()
            .ok_or_else(|| LoadError::InvalidShape("root must be an object".to_string()))?;

        let mut dictionary = RawDictionary::new();
        for (key, value) in obj {
            if key.starts_with('@') {
                continue;
            }

            let template = value.as_array().and_then(|parts| {
                parts
                    .iter()
                    .map(|part| part.as_str().map(str::to_owned))
                    .collect::<Option<Vec<String>>>()
            });

            match template {
                Some(template) => {
                    dictionary.0.insert(key.clone(), template);
                }
                None => warn!(key = key.as_str(), "message is not an array of strings, skipping"),
            }
        }

        Ok(dictionary)
    }
}

/// Message key to compiled segments for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledDictionary(HashMap<String, CompiledMessage>);

impl CompiledDictionary {
    /// Create an empty compiled dictionary
    pub fn new() -> Self {
        CompiledDictionary(HashMap::new())
    }

    /// Add or replace the compiled message for `key`
    pub fn insert(&mut self, key: String, message: CompiledMessage) {
        self.0.insert(key, message);
    }

    /// Get the compiled message for `key`
    ///
    /// # Returns
    /// The segments ready for [`crate::interpolate`], or `None` for an unknown key
    pub fn get(&self, key: &str) -> Option<&CompiledMessage> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// All message keys, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Lifecycle of a locale's dictionary. Raw and compiled templates never share storage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Dictionary {
    #[default]
    Unloaded,
    Raw(RawDictionary),
    Compiled(CompiledDictionary),
}

impl Dictionary {
    /// Compile a raw dictionary.
    ///
    /// An unloaded dictionary is left alone with a warning; a compiled one is
    /// returned unchanged, so preprocessing twice is a no-op.
    pub fn preprocess(self, preprocessor: &mut Preprocessor) -> Self {
        match self {
            Dictionary::Unloaded => {
                warn!("dictionary is not initialized, nothing to preprocess");
                Dictionary::Unloaded
            }
            Dictionary::Raw(raw) => Dictionary::Compiled(preprocessor.preprocess_dictionary(&raw)),
            Dictionary::Compiled(compiled) => {
                debug!(messages = compiled.len(), "dictionary already compiled");
                Dictionary::Compiled(compiled)
            }
        }
    }

    pub fn is_compiled(&self) -> bool {
        matches!(self, Dictionary::Compiled(_))
    }

    pub fn compiled(&self) -> Option<&CompiledDictionary> {
        match self {
            Dictionary::Compiled(compiled) => Some(compiled),
            _ => None,
        }
    }

    /// Take the compiled dictionary out, `None` unless preprocessed
    pub fn into_compiled(self) -> Option<CompiledDictionary> {
        match self {
            Dictionary::Compiled(compiled) => Some(compiled),
            _ => None,
        }
    }
}

impl From<RawDictionary> for Dictionary {
    fn from(raw: RawDictionary) -> Self {
        Dictionary::Raw(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_reads_templates() {
        let raw = RawDictionary::from_json(r##"{"greeting": ["Hello,", "#name", "$!"]}"##).unwrap();
        assert_eq!(raw.len(), 1);
        assert_eq!(
            raw.get("greeting"),
            Some(&vec!["Hello,".to_string(), "#name".to_string(), "$!".to_string()])
        );
    }

    #[test]
    fn test_from_json_skips_metadata_and_bad_entries() {
        let raw = RawDictionary::from_json(
            r#"{"@metadata": {"authors": []}, "ok": ["a"], "flat": "text", "mixed": ["a", 1]}"#,
        )
        .unwrap();
        assert_eq!(raw.len(), 1);
        assert!(raw.get("ok").is_some());
    }

    #[test]
    fn test_from_json_rejects_invalid_input() {
        assert!(matches!(
            RawDictionary::from_json("{not json"),
            Err(LoadError::InvalidJson(_))
        ));
        assert!(matches!(
            RawDictionary::from_json(r#"["a", "b"]"#),
            Err(LoadError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_preprocess_unloaded_is_noop() {
        let mut preprocessor = Preprocessor::new();
        let dictionary = Dictionary::Unloaded.preprocess(&mut preprocessor);
        assert_eq!(dictionary, Dictionary::Unloaded);
        assert!(preprocessor.warnings().is_empty());
    }

    #[test]
    fn test_preprocess_twice_is_idempotent() {
        let mut raw = RawDictionary::new();
        raw.with_template("greeting", &["Hello,", "#name", "$!"])
            .with_template("broken", &["#$"]);

        let mut preprocessor = Preprocessor::new();
        let once = Dictionary::from(raw).preprocess(&mut preprocessor);
        assert!(once.is_compiled());
        assert_eq!(preprocessor.warnings().len(), 1);

        let twice = once.clone().preprocess(&mut preprocessor);
        assert_eq!(once, twice);
        assert_eq!(preprocessor.warnings().len(), 1);
    }
}
