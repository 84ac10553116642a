use tracing::warn;

use crate::dictionary::{CompiledDictionary, RawDictionary};
use crate::segment::{CompiledMessage, ControlSymbol, Segment, SegmentKind};

/// Result of scanning the control prefix of one raw template element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<'a> {
    pub kind: SegmentKind,
    /// The element with its control prefix stripped.
    pub content: &'a str,
    /// The element consisted only of control characters.
    pub malformed: bool,
}

impl Classification<'_> {
    pub fn into_segment(self) -> Segment {
        Segment::new(self.kind, self.content)
    }
}

/// Scan the control prefix of `raw` and classify it.
///
/// `#` and `$` are each honoured once; a repeated one is content. `~` ends
/// the prefix and is dropped, so the character after it is always content.
/// An element made only of control characters is malformed and degrades to
/// an empty unspaced static segment.
pub fn classify_segment(raw: &str) -> Classification<'_> {
    let mut saw_dynamic = false;
    let mut saw_no_whitespace = false;
    let mut content_start = None;

    for (index, ch) in raw.char_indices() {
        match ControlSymbol::from_char(ch) {
            Some(ControlSymbol::Dynamic) if !saw_dynamic => saw_dynamic = true,
            Some(ControlSymbol::NoWhitespace) if !saw_no_whitespace => saw_no_whitespace = true,
            Some(ControlSymbol::Escape) => {
                content_start = Some(index + ch.len_utf8());
                break;
            }
            _ => {
                content_start = Some(index);
                break;
            }
        }
    }

    match content_start {
        Some(start) if start < raw.len() => Classification {
            kind: SegmentKind::new(saw_dynamic, saw_no_whitespace),
            content: &raw[start..],
            malformed: false,
        },
        // An empty element has no prefix at all and stays a plain spaced literal.
        None if raw.is_empty() => Classification {
            kind: SegmentKind::StaticSpaced,
            content: "",
            malformed: false,
        },
        _ => Classification {
            kind: SegmentKind::StaticUnspaced,
            content: "",
            malformed: true,
        },
    }
}

/// A template element that had no content after its control prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthoringWarning {
    pub message_key: String,
    pub index: usize,
    pub raw: String,
}

impl std::fmt::Display for AuthoringWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "template string {:?} at index {} in message '{}' should contain at least one non-control symbol or be empty",
            self.raw, self.index, self.message_key
        )
    }
}

/// Compiles raw templates into segments and collects authoring warnings.
#[derive(Debug, Default)]
pub struct Preprocessor {
    warnings: Vec<AuthoringWarning>,
}

impl Preprocessor {
    /// Create a preprocessor with no warnings recorded
    pub fn new() -> Self {
        Preprocessor {
            warnings: Vec::new(),
        }
    }

    fn compile_element(&mut self, message_key: &str, index: usize, raw: &str) -> Segment {
        let classification = classify_segment(raw);
        if classification.malformed {
            let warning = AuthoringWarning {
                message_key: message_key.to_string(),
                index,
                raw: raw.to_string(),
            };
            warn!(key = message_key, index, raw, "{}", warning);
            self.warnings.push(warning);
        }
        classification.into_segment()
    }

    /// Compile one template, element by element
    ///
    /// # Arguments
    /// * `message_key` - Key the template is stored under, used in warnings
    /// * `template` - Raw template elements, each with an optional control prefix
    ///
    /// # Returns
    /// One segment per element. Malformed elements become empty static
    /// segments and are recorded as warnings.
    pub fn preprocess_message(&mut self, message_key: &str, template: &[String]) -> CompiledMessage {
        template
            .iter()
            .enumerate()
            .map(|(index, raw)| self.compile_element(message_key, index, raw))
            .collect()
    }

    /// Compile every template in `raw`
    pub fn preprocess_dictionary(&mut self, raw: &RawDictionary) -> CompiledDictionary {
        let mut compiled = CompiledDictionary::new();
        for (key, template) in raw.iter() {
            let message = self.preprocess_message(key, template);
            compiled.insert(key.clone(), message);
        }
        compiled
    }

    /// Warnings recorded so far, in compile order
    pub fn warnings(&self) -> &[AuthoringWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<AuthoringWarning> {
        self.warnings
    }
}

/// Compile a single template without keeping the warnings around.
pub fn preprocess_message(message_key: &str, template: &[String]) -> CompiledMessage {
    Preprocessor::new().preprocess_message(message_key, template)
}

/// Compile a whole raw dictionary, returning the warnings it produced.
pub fn preprocess_dictionary(raw: &RawDictionary) -> (CompiledDictionary, Vec<AuthoringWarning>) {
    let mut preprocessor = Preprocessor::new();
    let compiled = preprocessor.preprocess_dictionary(raw);
    (compiled, preprocessor.into_warnings())
}
