//! Canonical output model shared by every source format

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NormalizeError;

/// Style class given to verse lines whose paragraph carries none
pub const DEFAULT_STYLE_CLASS: &str = "p";

/// Message carried by the sentinel block
pub const UNAVAILABLE_MESSAGE: &str = "Content unavailable";

/// Upstream source format of a chapter payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceFormat {
    /// JSON envelope around class-tagged markup (format A)
    TaggedJson,
    /// Legacy hypertext page fragment (format B)
    LegacyHtml,
    /// Flat JSON array of `{verse, text}` records (format C)
    VerseArray,
}

impl SourceFormat {
    pub const ALL: [SourceFormat; 3] = [
        SourceFormat::TaggedJson,
        SourceFormat::LegacyHtml,
        SourceFormat::VerseArray,
    ];

    /// Canonical identifier, as accepted by [`FromStr`]
    pub fn identifier(&self) -> &'static str {
        match self {
            SourceFormat::TaggedJson => "tagged-json",
            SourceFormat::LegacyHtml => "legacy-html",
            SourceFormat::VerseArray => "verse-array",
        }
    }

    /// Short version identifiers also accepted by [`FromStr`]
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            SourceFormat::TaggedJson => &["a", "format-a"],
            SourceFormat::LegacyHtml => &["b", "format-b"],
            SourceFormat::VerseArray => &["c", "format-c"],
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for SourceFormat {
    type Err = NormalizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SourceFormat::ALL
            .into_iter()
            .find(|format| {
                format.identifier() == wanted || format.aliases().contains(&wanted.as_str())
            })
            .ok_or_else(|| NormalizeError::UnsupportedFormat(s.to_string()))
    }
}

/// User display preferences applied while normalizing
///
/// Immutable per call. Persisting them is the host application's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayPreferences {
    /// Replace footnotes with inline markers instead of removing them
    pub show_footnotes: bool,
    /// Emit descriptive notes (e.g. psalm superscriptions)
    pub show_description: bool,
    /// Emit cross-reference paragraphs
    pub show_cross_reference: bool,
}

impl Default for DisplayPreferences {
    fn default() -> Self {
        Self {
            show_footnotes: false,
            show_description: true,
            show_cross_reference: true,
        }
    }
}

impl DisplayPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_footnotes(mut self, show: bool) -> Self {
        self.show_footnotes = show;
        self
    }

    pub fn with_description(mut self, show: bool) -> Self {
        self.show_description = show;
        self
    }

    pub fn with_cross_reference(mut self, show: bool) -> Self {
        self.show_cross_reference = show;
        self
    }
}

/// One rendered line of a verse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseLine {
    pub text: String,
    pub style_class: String,
}

impl VerseLine {
    /// Create a line, falling back to [`DEFAULT_STYLE_CLASS`] when no style is known
    pub fn new(text: impl Into<String>, style_class: Option<&str>) -> Self {
        let style_class = style_class
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_STYLE_CLASS);
        Self {
            text: text.into(),
            style_class: style_class.to_string(),
        }
    }
}

/// All lines belonging to one verse number within a chapter
///
/// The first line is rendered with the verse-number label, the rest as
/// continuation lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseGroup {
    pub verse_number: String,
    pub lines: Vec<VerseLine>,
}

impl VerseGroup {
    pub fn new(verse_number: impl Into<String>, first_line: VerseLine) -> Self {
        Self {
            verse_number: verse_number.into(),
            lines: vec![first_line],
        }
    }

    pub fn first_line(&self) -> Option<&VerseLine> {
        self.lines.first()
    }

    pub fn continuation_lines(&self) -> &[VerseLine] {
        self.lines.get(1..).unwrap_or_default()
    }

    /// All line texts joined with a single space
    pub fn joined_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Kind of a [`ContentBlock`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    SectionHeading,
    Subtitle,
    Description,
    CrossReference,
    VerseGroup,
    PoeticParagraph,
    Unavailable,
}

/// Rendering payload of a [`ContentBlock`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockBody {
    SectionHeading { text: String },
    Subtitle { text: String },
    Description { text: String },
    CrossReference { text: String },
    VerseGroup(VerseGroup),
    PoeticParagraph { text: String, style_class: String },
    Unavailable { message: String },
}

impl BlockBody {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockBody::SectionHeading { .. } => BlockKind::SectionHeading,
            BlockBody::Subtitle { .. } => BlockKind::Subtitle,
            BlockBody::Description { .. } => BlockKind::Description,
            BlockBody::CrossReference { .. } => BlockKind::CrossReference,
            BlockBody::VerseGroup(_) => BlockKind::VerseGroup,
            BlockBody::PoeticParagraph { .. } => BlockKind::PoeticParagraph,
            BlockBody::Unavailable { .. } => BlockKind::Unavailable,
        }
    }

    /// Plain heading/paragraph text; `None` for verse groups
    pub fn text(&self) -> Option<&str> {
        match self {
            BlockBody::SectionHeading { text }
            | BlockBody::Subtitle { text }
            | BlockBody::Description { text }
            | BlockBody::CrossReference { text }
            | BlockBody::PoeticParagraph { text, .. } => Some(text),
            BlockBody::Unavailable { message } => Some(message),
            BlockBody::VerseGroup(_) => None,
        }
    }
}

/// Canonical output unit
///
/// `sequence_index` is unique within one normalized chapter and reflects the
/// order in which the content first appeared in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub sequence_index: usize,
    #[serde(flatten)]
    pub body: BlockBody,
}

impl ContentBlock {
    pub fn new(sequence_index: usize, body: BlockBody) -> Self {
        Self {
            sequence_index,
            body,
        }
    }

    /// The "no content" sentinel block
    pub fn unavailable() -> Self {
        Self::new(
            0,
            BlockBody::Unavailable {
                message: UNAVAILABLE_MESSAGE.to_string(),
            },
        )
    }

    pub fn kind(&self) -> BlockKind {
        self.body.kind()
    }

    pub fn as_verse_group(&self) -> Option<&VerseGroup> {
        match &self.body {
            BlockBody::VerseGroup(group) => Some(group),
            _ => None,
        }
    }
}

/// Result of normalizing one chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedChapter {
    pub title: String,
    pub blocks: Vec<ContentBlock>,
}

impl NormalizedChapter {
    /// A chapter holding only the sentinel block
    pub fn unavailable(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: vec![ContentBlock::unavailable()],
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(
            self.blocks.as_slice(),
            [block] if block.kind() == BlockKind::Unavailable
        )
    }

    pub fn verse_groups(&self) -> impl Iterator<Item = &VerseGroup> {
        self.blocks.iter().filter_map(ContentBlock::as_verse_group)
    }

    pub fn verse_count(&self) -> usize {
        self.verse_groups().count()
    }

    pub fn verse(&self, verse_number: &str) -> Option<&VerseGroup> {
        self.verse_groups()
            .find(|group| group.verse_number == verse_number)
    }
}

/// What the external fetch layer hands over for one chapter
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FetchedPayload {
    pub content: String,
    pub success: bool,
}

impl FetchedPayload {
    pub fn ok(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            success: true,
        }
    }

    pub fn failed() -> Self {
        Self::default()
    }
}
