use serde_json::Value;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use crate::segment::{CompiledMessage, Segment};

/// Placeholder name to the value spliced into a dynamic segment.
pub trait SubstitutionMap {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>>;
}

impl<V: AsRef<str>> SubstitutionMap for HashMap<String, V> {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|v| Cow::Borrowed(v.as_ref()))
    }
}

impl<V: AsRef<str>> SubstitutionMap for HashMap<&str, V> {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|v| Cow::Borrowed(v.as_ref()))
    }
}

impl<V: AsRef<str>> SubstitutionMap for BTreeMap<String, V> {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|v| Cow::Borrowed(v.as_ref()))
    }
}

impl<V: AsRef<str>> SubstitutionMap for BTreeMap<&str, V> {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|v| Cow::Borrowed(v.as_ref()))
    }
}

/// JSON objects substitute strings as-is and other scalars by their JSON text.
impl SubstitutionMap for serde_json::Map<String, Value> {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        match self.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(Cow::Borrowed(s)),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}

impl<K: AsRef<str>, V: AsRef<str>> SubstitutionMap for [(K, V)] {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        self.iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| Cow::Borrowed(v.as_ref()))
    }
}

/// Render a compiled message.
///
/// Segments are never modified; every call writes into its own buffer, so a
/// message can be rendered concurrently with different substitutions. A
/// missing substitution renders as an empty string.
pub fn interpolate<M>(message: &CompiledMessage, substitutions: &M) -> String
where
    M: SubstitutionMap + ?Sized,
{
    let mut result = String::new();

    for segment in message {
        match segment {
            Segment::Static { text } => result.push_str(text),
            Segment::Dynamic {
                key,
                trailing_space,
            } => {
                match substitutions.lookup(key) {
                    Some(value) => result.push_str(&value),
                    None => warn!(key = key.as_str(), "no substitution for placeholder"),
                }
                if *trailing_space {
                    result.push(' ');
                }
            }
        }
    }

    result
}

impl CompiledMessage {
    pub fn render<M>(&self, substitutions: &M) -> String
    where
        M: SubstitutionMap + ?Sized,
    {
        interpolate(self, substitutions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessor::preprocess_message;
    use serde_json::json;

    fn compile(parts: &[&str]) -> CompiledMessage {
        let template: Vec<String> = parts.iter().map(|p| p.to_string()).collect();
        preprocess_message("test", &template)
    }

    fn subs(pairs: &[(&'static str, &'static str)]) -> HashMap<&'static str, &'static str> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_spaced_fixture_keeps_every_trailing_space() {
        let message = compile(&["Hello, ", "#name", "!"]);
        assert_eq!(
            interpolate(&message, &subs(&[("name", "World")])),
            "Hello,  World ! "
        );
    }

    #[test]
    fn test_unspaced_fixture() {
        let message = compile(&["Hello,", "#$name", "$!"]);
        assert_eq!(
            interpolate(&message, &subs(&[("name", "World")])),
            "Hello, World!"
        );
    }

    #[test]
    fn test_static_message_ignores_substitutions() {
        let message = compile(&["Nothing", "$here"]);
        assert_eq!(interpolate(&message, &subs(&[])), "Nothing here");
        assert_eq!(
            interpolate(&message, &subs(&[("Nothing", "x"), ("here", "y")])),
            "Nothing here"
        );
    }

    #[test]
    fn test_missing_substitution_renders_empty() {
        let message = compile(&["$[", "#$who", "$]"]);
        assert_eq!(interpolate(&message, &subs(&[])), "[]");

        let message = compile(&["#who", "$left"]);
        assert_eq!(interpolate(&message, &subs(&[])), " left");
    }

    #[test]
    fn test_render_does_not_leak_between_calls() {
        let message = compile(&["#$a", "$/", "#$b"]);
        assert_eq!(message.render(&subs(&[("a", "1"), ("b", "2")])), "1/2");
        assert_eq!(message.render(&subs(&[("a", "x")])), "x/");
        assert_eq!(message, compile(&["#$a", "$/", "#$b"]));
    }

    #[test]
    fn test_json_map_substitutions() {
        let message = compile(&["#$count", "$ files, ", "#$ok"]);
        let Value::Object(map) = json!({"count": 3, "ok": true}) else {
            unreachable!()
        };
        assert_eq!(interpolate(&message, &map), "3 files, true");
    }

    #[test]
    fn test_pair_slice_and_owned_maps() {
        let message = compile(&["Hi", "#$name"]);
        let pairs = [("name", "Ann")];
        assert_eq!(interpolate(&message, &pairs[..]), "Hi Ann");

        let mut owned: BTreeMap<String, String> = BTreeMap::new();
        owned.insert("name".to_string(), "Bob".to_string());
        assert_eq!(interpolate(&message, &owned), "Hi Bob");
    }
}
