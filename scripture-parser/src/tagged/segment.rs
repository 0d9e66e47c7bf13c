//! Verse segmentation of one tagged paragraph
//!
//! Tiers, tried in order:
//!
//! 1. explicit verse id on the paragraph (and no embedded verse numbers)
//! 2. embedded verse spans
//! 3. a leading number followed by a space
//!
//! When all three fail, paragraphs in a poetic or structural style become a
//! [`Segment::Poetic`] paragraph; anything else is dropped.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::region::ExtractedRegion;
use crate::common::cleanup::{clean_preserving, clean_text};
use crate::common::footnote::{FOOTNOTE_MARKER_CLASS, process_footnotes, remove_cross_reference_notes};
use crate::common::markup::{Element, attribute_value, find_elements, has_class, remove_elements};

/// Paragraph styles rendered on their own when no verse can be recovered
const POETIC_STYLES: &[&str] = &[
    "q", "q1", "q2", "q3", "q4", "qc", "qr", "qm", "qm1", "qm2", "qm3", "pi", "pi1", "pi2", "pi3",
    "pc", "pm", "m", "mi", "nb", "li", "li1", "li2", "li3",
];

const VERSE_SPAN_CLASS: &str = "verse";
const VERSE_NUMBER_CLASS: &str = "v";

/// Outcome of segmenting one paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// `(verse number, text)` pairs in paragraph order
    Verses(Vec<(String, String)>),
    /// A standalone poetic paragraph
    Poetic(String),
    /// Nothing usable
    Dropped,
}

/// Verse number from a `BOOK:CHAPTER:VERSE` id
pub fn verse_number_from_id(verse_id: &str) -> Option<String> {
    let mut parts = verse_id.trim().split(':');
    let (_book, _chapter, verse) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let verse = verse.trim();
    (!verse.is_empty()).then(|| verse.to_string())
}

fn is_verse_number_marker(tag: &str) -> bool {
    has_class(tag, VERSE_NUMBER_CLASS)
}

fn contains_verse_number_marker(markup: &str) -> bool {
    !find_elements(markup, "span", is_verse_number_marker).is_empty()
}

/// Cleaned text of a verse fragment, footnote markers kept
fn verse_text(markup: &str, show_footnotes: bool) -> String {
    let without_xrefs = remove_cross_reference_notes(markup);
    let with_notes = process_footnotes(&without_xrefs, show_footnotes);
    let without_numbers = remove_elements(&with_notes, "span", is_verse_number_marker);
    clean_preserving(&without_numbers, &[FOOTNOTE_MARKER_CLASS])
}

/// Segment one paragraph region
pub fn segment_paragraph(region: &ExtractedRegion, show_footnotes: bool) -> Segment {
    let content = region.text.as_str();

    // Tier 1: explicit verse id
    if let Some(number) = region.verse_id.as_deref().and_then(verse_number_from_id)
        && !contains_verse_number_marker(content)
    {
        let text = verse_text(content, show_footnotes);
        if text.is_empty() {
            debug!(verse = %number, "Dropping empty verse paragraph");
            return Segment::Dropped;
        }
        return Segment::Verses(vec![(number, text)]);
    }

    // Tier 2: embedded verse spans
    let spans = find_elements(content, "span", |tag| has_class(tag, VERSE_SPAN_CLASS));
    if !spans.is_empty() {
        return Segment::Verses(segment_verse_spans(&spans, show_footnotes));
    }

    // Tier 3: leading verse number
    if let Some((number, rest)) = split_leading_number(content) {
        let text = verse_text(rest, show_footnotes);
        if !text.is_empty() {
            return Segment::Verses(vec![(number, text)]);
        }
    }

    let style = region.style_class.as_deref().unwrap_or_default();
    if style.split_whitespace().any(|class| POETIC_STYLES.contains(&class)) {
        let text = verse_text(content, show_footnotes);
        if !text.is_empty() {
            return Segment::Poetic(text);
        }
    }

    debug!(offset = region.offset, style, "Dropping paragraph without recoverable verse");
    Segment::Dropped
}

/// Verse being accumulated while walking verse spans
#[derive(Debug)]
struct CurrentVerse {
    number: String,
    buffer: Vec<String>,
}

impl CurrentVerse {
    fn new(number: String) -> Self {
        Self {
            number,
            buffer: Vec::new(),
        }
    }

    fn push(&mut self, text: String) {
        if !text.is_empty() {
            self.buffer.push(text);
        }
    }

    fn flush_into(self, verses: &mut Vec<(String, String)>) {
        if self.buffer.is_empty() {
            debug!(verse = %self.number, "Verse span without text");
            return;
        }
        verses.push((self.number, self.buffer.join(" ")));
    }
}

/// Tier 2: a span with a verse-number marker starts a new verse, one without
/// continues the current verse or, lacking one, recovers a number from its id
fn segment_verse_spans(spans: &[Element<'_>], show_footnotes: bool) -> Vec<(String, String)> {
    let mut verses = Vec::new();
    let mut current: Option<CurrentVerse> = None;

    for span in spans {
        let markers = find_elements(span.inner, "span", is_verse_number_marker);
        let text = verse_text(span.inner, show_footnotes);

        if let Some(marker) = markers.first() {
            let number = clean_text(marker.inner);
            if let Some(previous) = current.take() {
                previous.flush_into(&mut verses);
            }
            if number.is_empty() {
                debug!("Verse-number marker without a number");
                continue;
            }
            let mut verse = CurrentVerse::new(number);
            verse.push(text);
            current = Some(verse);
        } else if let Some(verse) = current.as_mut() {
            verse.push(text);
        } else if let Some(number) =
            attribute_value(span.open_tag, "data-vid").and_then(|vid| verse_number_from_id(&vid))
        {
            let mut verse = CurrentVerse::new(number);
            verse.push(text);
            current = Some(verse);
        } else {
            debug!("Dropping verse span without a verse to continue");
        }
    }

    if let Some(last) = current {
        last.flush_into(&mut verses);
    }

    verses
}

/// Tier 3: optional leading tags, a number, at least one space, then the text
fn split_leading_number(content: &str) -> Option<(String, &str)> {
    static LEADING_NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = LEADING_NUMBER_REGEX.get_or_init(|| {
        Regex::new(r"(?s)^\s*(?:<[^>]*>\s*)*(\d+)\s+(\S.*)$")
            .expect("Failed to compile leading number regex")
    });

    let caps = re.captures(content)?;
    let number = caps.get(1)?.as_str().to_string();
    let rest = caps.get(2)?.as_str();
    Some((number, rest))
}
