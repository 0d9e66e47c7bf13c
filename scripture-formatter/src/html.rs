//! HTML fragment rendering for content blocks
//!
//! Every block becomes one self-contained fragment. Verse groups render one
//! `<span>` per line; only the first carries the verse-number label.

use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::{Deserialize, Serialize};
use tracing::debug;

use scripture_parser::{BlockBody, ContentBlock, NormalizedChapter, VerseGroup};

/// Configuration options for fragment rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentConfig {
    /// Label the first line of each verse with its number
    pub show_verse_numbers: bool,
    /// Emit the chapter title as a leading `<h2>` fragment
    pub include_title: bool,
    /// Add the line's source style class (e.g. `q1`) next to the verse class
    pub include_style_classes: bool,
    pub title_class: String,
    pub verse_class: String,
    pub verse_number_class: String,
    pub continuation_class: String,
    pub unavailable_class: String,
}

impl Default for FragmentConfig {
    fn default() -> Self {
        Self {
            show_verse_numbers: true,
            include_title: false,
            include_style_classes: true,
            title_class: "chapter-title".to_string(),
            verse_class: "verse".to_string(),
            verse_number_class: "verse-number".to_string(),
            continuation_class: "continuation".to_string(),
            unavailable_class: "unavailable".to_string(),
        }
    }
}

/// Block to HTML fragment renderer
#[derive(Debug, Clone, Default)]
pub struct FragmentRenderer {
    config: FragmentConfig,
}

impl FragmentRenderer {
    /// Create a renderer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with custom configuration
    pub fn with_config(config: FragmentConfig) -> Self {
        Self { config }
    }

    /// Set whether verse numbers are shown
    pub fn with_verse_numbers(mut self, show: bool) -> Self {
        self.config.show_verse_numbers = show;
        self
    }

    /// Set whether the chapter title is rendered
    pub fn with_title(mut self, include: bool) -> Self {
        self.config.include_title = include;
        self
    }

    /// Set whether line style classes are kept
    pub fn with_style_classes(mut self, include: bool) -> Self {
        self.config.include_style_classes = include;
        self
    }

    pub fn config(&self) -> &FragmentConfig {
        &self.config
    }

    /// Render one block
    pub fn render_block(&self, block: &ContentBlock) -> String {
        match &block.body {
            BlockBody::SectionHeading { text } => format!("<h3>{text}</h3>"),
            BlockBody::Subtitle { text } => format!("<h4>{text}</h4>"),
            BlockBody::Description { text } => paragraph("description", text),
            BlockBody::CrossReference { text } => paragraph("cross-reference", text),
            BlockBody::PoeticParagraph { text, style_class } => paragraph(style_class, text),
            BlockBody::VerseGroup(group) => self.render_verse_group(group),
            BlockBody::Unavailable { message } => {
                paragraph(&self.config.unavailable_class, &encode_text(message))
            }
        }
    }

    /// Render all blocks of a chapter, one fragment each, in block order
    pub fn render_fragments(&self, chapter: &NormalizedChapter) -> Vec<String> {
        let mut fragments = Vec::with_capacity(chapter.blocks.len() + 1);
        if self.config.include_title {
            fragments.push(format!(
                r#"<h2 class="{}">{}</h2>"#,
                encode_double_quoted_attribute(&self.config.title_class),
                encode_text(&chapter.title)
            ));
        }
        fragments.extend(chapter.blocks.iter().map(|block| self.render_block(block)));
        debug!(
            title = %chapter.title,
            fragments = fragments.len(),
            "Rendered chapter fragments"
        );
        fragments
    }

    /// Render a whole chapter, fragments separated by newlines
    pub fn render_chapter(&self, chapter: &NormalizedChapter) -> String {
        self.render_fragments(chapter).join("\n")
    }

    fn render_verse_group(&self, group: &VerseGroup) -> String {
        let number = encode_double_quoted_attribute(&group.verse_number);
        let lines: Vec<String> = group
            .lines
            .iter()
            .enumerate()
            .map(|(index, line)| {
                let mut classes = vec![self.config.verse_class.as_str()];
                if self.config.include_style_classes {
                    classes.push(&line.style_class);
                }
                if index > 0 {
                    classes.push(&self.config.continuation_class);
                }
                let label = if index == 0 && self.config.show_verse_numbers {
                    format!(
                        r#"<sup class="{}">{}</sup>"#,
                        encode_double_quoted_attribute(&self.config.verse_number_class),
                        encode_text(&group.verse_number)
                    )
                } else {
                    String::new()
                };
                format!(
                    r#"<span class="{}" data-verse="{number}">{label}{}</span>"#,
                    encode_double_quoted_attribute(&classes.join(" ")),
                    line.text
                )
            })
            .collect();
        lines.concat()
    }
}

fn paragraph(class: &str, text: &str) -> String {
    format!(
        r#"<p class="{}">{text}</p>"#,
        encode_double_quoted_attribute(class)
    )
}
