//! Region extraction for tagged markup
//!
//! Five independent scans, one per region kind. Each match remembers where it
//! started in the source; reading order is decided later from those offsets
//! alone.

use std::sync::OnceLock;

use regex::Regex;

use crate::common::cleanup::clean_text;
use crate::common::footnote::{process_footnotes, remove_cross_reference_notes};
use crate::common::markup::{attribute_value, has_class, remove_elements};

const SECTION_CLASSES: &[&str] = &["s", "s1", "s2", "s3", "s4"];
const SUBTITLE_CLASSES: &[&str] = &["ms", "ms1", "ms2", "ms3", "mr", "sr"];
const DESCRIPTION_CLASS: &str = "d";
const CROSS_REFERENCE_CLASS: &str = "r";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Section,
    Subtitle,
    Description,
    CrossReference,
    Paragraph,
}

/// One region captured from the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRegion {
    pub kind: RegionKind,
    /// Byte offset of the region's opening tag in the source
    pub offset: usize,
    /// Cleaned text for headings and notes, raw inner markup for paragraphs
    pub text: String,
    /// Style class of a paragraph region
    pub style_class: Option<String>,
    /// `BOOK:CHAPTER:VERSE` id of a paragraph region
    pub verse_id: Option<String>,
}

impl ExtractedRegion {
    fn new(kind: RegionKind, offset: usize, text: String) -> Self {
        Self {
            kind,
            offset,
            text,
            style_class: None,
            verse_id: None,
        }
    }
}

fn heading_regex(tag: &'static str) -> Regex {
    Regex::new(&format!(r"(?s)<{tag}\b([^>]*)>(.*?)</{tag}>"))
        .expect("Failed to compile heading regex")
}

fn section_regex() -> &'static Regex {
    static SECTION_REGEX: OnceLock<Regex> = OnceLock::new();
    SECTION_REGEX.get_or_init(|| heading_regex("h3"))
}

fn subtitle_regex() -> &'static Regex {
    static SUBTITLE_REGEX: OnceLock<Regex> = OnceLock::new();
    SUBTITLE_REGEX.get_or_init(|| heading_regex("h4"))
}

fn paragraph_regex() -> &'static Regex {
    static PARAGRAPH_REGEX: OnceLock<Regex> = OnceLock::new();
    PARAGRAPH_REGEX.get_or_init(|| {
        Regex::new(r"(?s)<p\b([^>]*)>(.*?)</p>").expect("Failed to compile paragraph regex")
    })
}

fn anchor_regex() -> &'static Regex {
    static ANCHOR_REGEX: OnceLock<Regex> = OnceLock::new();
    ANCHOR_REGEX.get_or_init(|| {
        Regex::new(r"(?s)<a\b[^>]*>(.*?)</a>").expect("Failed to compile anchor regex")
    })
}

fn class_of(attributes: &str) -> Option<String> {
    attribute_value(&format!("<x {attributes}>"), "class")
        .map(|class| class.trim().to_string())
        .filter(|class| !class.is_empty())
}

fn class_in(attributes: &str, classes: &[&str]) -> bool {
    class_of(attributes).is_some_and(|class| class.split_whitespace().any(|c| classes.contains(&c)))
}

/// Run `regex` over `content`, keeping matches whose attributes satisfy `accept`
///
/// Yields `(offset, attributes, inner)` for each accepted match.
fn scan<'a>(
    content: &'a str,
    regex: &Regex,
    accept: impl Fn(&str) -> bool,
) -> Vec<(usize, &'a str, &'a str)> {
    regex
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let attributes = caps.get(1).map_or("", |m| m.as_str());
            let inner = caps.get(2).map_or("", |m| m.as_str());
            accept(attributes).then_some((whole.start(), attributes, inner))
        })
        .collect()
}

/// Heading text: notes dropped, tags stripped
fn heading_text(inner: &str) -> String {
    clean_text(&process_footnotes(&remove_cross_reference_notes(inner), false))
}

pub fn extract_sections(content: &str) -> Vec<ExtractedRegion> {
    scan(content, section_regex(), |attrs| class_in(attrs, SECTION_CLASSES))
        .into_iter()
        .map(|(offset, _, inner)| {
            ExtractedRegion::new(RegionKind::Section, offset, heading_text(inner))
        })
        .filter(|region| !region.text.is_empty())
        .collect()
}

pub fn extract_subtitles(content: &str) -> Vec<ExtractedRegion> {
    scan(content, subtitle_regex(), |attrs| class_in(attrs, SUBTITLE_CLASSES))
        .into_iter()
        .map(|(offset, _, inner)| {
            ExtractedRegion::new(RegionKind::Subtitle, offset, heading_text(inner))
        })
        .filter(|region| !region.text.is_empty())
        .collect()
}

/// Descriptive notes, with nested footnotes, cross-reference notes and verse
/// numbers stripped during capture
pub fn extract_descriptions(content: &str) -> Vec<ExtractedRegion> {
    scan(content, paragraph_regex(), |attrs| {
        class_in(attrs, &[DESCRIPTION_CLASS])
    })
    .into_iter()
    .map(|(offset, _, inner)| {
        let without_notes = process_footnotes(&remove_cross_reference_notes(inner), false);
        let without_numbers = remove_elements(&without_notes, "span", |tag| has_class(tag, "v"));
        ExtractedRegion::new(RegionKind::Description, offset, clean_text(&without_numbers))
    })
    .filter(|region| !region.text.is_empty())
    .collect()
}

/// Cross-reference paragraphs, inline anchors collapsed to their text
pub fn extract_cross_references(content: &str) -> Vec<ExtractedRegion> {
    scan(content, paragraph_regex(), |attrs| {
        class_in(attrs, &[CROSS_REFERENCE_CLASS])
    })
    .into_iter()
    .map(|(offset, _, inner)| {
        let collapsed = anchor_regex().replace_all(inner, "$1");
        ExtractedRegion::new(RegionKind::CrossReference, offset, clean_text(&collapsed))
    })
    .filter(|region| !region.text.is_empty())
    .collect()
}

/// Generic verse paragraphs: raw inner markup plus style class and verse id
pub fn extract_paragraphs(content: &str) -> Vec<ExtractedRegion> {
    scan(content, paragraph_regex(), |attrs| {
        !class_in(attrs, &[DESCRIPTION_CLASS, CROSS_REFERENCE_CLASS])
    })
    .into_iter()
    .map(|(offset, attributes, inner)| {
        let tag = format!("<p {attributes}>");
        ExtractedRegion {
            kind: RegionKind::Paragraph,
            offset,
            text: inner.to_string(),
            style_class: class_of(attributes),
            verse_id: attribute_value(&tag, "data-vid").filter(|vid| !vid.trim().is_empty()),
        }
    })
    .collect()
}

/// All regions of all five kinds, ordered by source offset
pub fn extract_regions(content: &str) -> Vec<ExtractedRegion> {
    let mut regions = extract_sections(content);
    regions.extend(extract_subtitles(content));
    regions.extend(extract_descriptions(content));
    regions.extend(extract_cross_references(content));
    regions.extend(extract_paragraphs(content));

    regions.sort_by_key(|region| region.offset);
    regions
}
