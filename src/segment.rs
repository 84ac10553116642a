/// Reserved prefix characters recognised at the start of a raw template element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlSymbol {
    /// `#`: the content is a placeholder name resolved at render time.
    Dynamic,
    /// `$`: no trailing space is appended after the segment.
    NoWhitespace,
    /// `~`: the next character is literal content, even if it is a control symbol.
    Escape,
}

impl ControlSymbol {
    pub const DYNAMIC: char = '#';
    pub const NO_WHITESPACE: char = '$';
    pub const ESCAPE: char = '~';

    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            Self::DYNAMIC => Some(ControlSymbol::Dynamic),
            Self::NO_WHITESPACE => Some(ControlSymbol::NoWhitespace),
            Self::ESCAPE => Some(ControlSymbol::Escape),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            ControlSymbol::Dynamic => Self::DYNAMIC,
            ControlSymbol::NoWhitespace => Self::NO_WHITESPACE,
            ControlSymbol::Escape => Self::ESCAPE,
        }
    }
}

impl std::fmt::Display for ControlSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The four ways a raw template element can be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    StaticSpaced,
    StaticUnspaced,
    DynamicSpaced,
    DynamicUnspaced,
}

impl SegmentKind {
    pub fn new(dynamic: bool, no_whitespace: bool) -> Self {
        match (dynamic, no_whitespace) {
            (false, false) => SegmentKind::StaticSpaced,
            (false, true) => SegmentKind::StaticUnspaced,
            (true, false) => SegmentKind::DynamicSpaced,
            (true, true) => SegmentKind::DynamicUnspaced,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, SegmentKind::DynamicSpaced | SegmentKind::DynamicUnspaced)
    }

    pub fn needs_trailing_space(&self) -> bool {
        matches!(self, SegmentKind::StaticSpaced | SegmentKind::DynamicSpaced)
    }
}

/// One compiled piece of a message.
///
/// Static segments carry their final text, trailing space already applied.
/// Dynamic segments carry the placeholder name; their text only exists in
/// the output buffer of a render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Static { text: String },
    Dynamic { key: String, trailing_space: bool },
}

impl Segment {
    /// Build a segment from already stripped content.
    pub fn new(kind: SegmentKind, content: &str) -> Self {
        match kind {
            SegmentKind::StaticSpaced => Segment::Static {
                text: format!("{} ", content),
            },
            SegmentKind::StaticUnspaced => Segment::Static {
                text: content.to_string(),
            },
            SegmentKind::DynamicSpaced => Segment::Dynamic {
                key: content.to_string(),
                trailing_space: true,
            },
            SegmentKind::DynamicUnspaced => Segment::Dynamic {
                key: content.to_string(),
                trailing_space: false,
            },
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Segment::Dynamic { .. })
    }

    /// The placeholder name, or an empty string for static segments.
    pub fn key(&self) -> &str {
        match self {
            Segment::Static { .. } => "",
            Segment::Dynamic { key, .. } => key,
        }
    }

    /// Whether a space follows the resolved value. Static text already contains it.
    pub fn needs_trailing_space(&self) -> bool {
        match self {
            Segment::Static { .. } => false,
            Segment::Dynamic { trailing_space, .. } => *trailing_space,
        }
    }

    /// The fixed text of a static segment.
    pub fn static_text(&self) -> Option<&str> {
        match self {
            Segment::Static { text } => Some(text),
            Segment::Dynamic { .. } => None,
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Static { text } => write!(f, "{}", text),
            Segment::Dynamic {
                key,
                trailing_space,
            } => {
                write!(f, "{{{}}}", key)?;
                if *trailing_space {
                    write!(f, " ")?;
                }
                Ok(())
            }
        }
    }
}

/// The ordered segments of one message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledMessage(pub Vec<Segment>);

impl CompiledMessage {
    pub fn new() -> Self {
        CompiledMessage(Vec::new())
    }

    pub fn push(&mut self, segment: Segment) {
        self.0.push(segment);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.0.iter()
    }

    /// Placeholder names referenced by this message, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|segment| segment.is_dynamic())
            .map(Segment::key)
    }
}

impl FromIterator<Segment> for CompiledMessage {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        CompiledMessage(iter.into_iter().collect())
    }
}

impl IntoIterator for CompiledMessage {
    type Item = Segment;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a CompiledMessage {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
