//! Marker-driven extraction over a legacy element tree
//!
//! Only two kinds of element matter: headings (class `title`) and verse-number
//! markers (class `number`). A verse's text is the rest of the inline container
//! that encloses its marker.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::tree::MarkupNode;
use crate::common::BlockAssembler;
use crate::common::cleanup::{clean_preserving, clean_text, normalize_whitespace};
use crate::models::{BlockBody, ContentBlock, VerseGroup, VerseLine};

/// `id` of the element holding the chapter text
pub const ROOT_CONTAINER_ID: &str = "tdBible1";

pub const HEADING_CLASS: &str = "title";
pub const VERSE_NUMBER_CLASS: &str = "number";

/// Spans produced by the legacy tag normalizer that survive cleaning
pub const PRESERVED_CLASSES: &[&str] = &["name", "area"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Heading,
    VerseNumber,
}

fn classify<N: MarkupNode>(node: &N) -> Option<Marker> {
    if node.has_class(HEADING_CLASS) {
        Some(Marker::Heading)
    } else if node.has_class(VERSE_NUMBER_CLASS) {
        Some(Marker::VerseNumber)
    } else {
        None
    }
}

/// Heading text with empty parentheses removed and the remaining
/// parenthesised groups wrapped in a reference span
pub fn heading_text(markup: &str) -> String {
    static EMPTY_PARENS_REGEX: OnceLock<Regex> = OnceLock::new();
    static PARENS_REGEX: OnceLock<Regex> = OnceLock::new();
    let empty = EMPTY_PARENS_REGEX
        .get_or_init(|| Regex::new(r"\(\s*\)").expect("Failed to compile empty parens regex"));
    let parens = PARENS_REGEX
        .get_or_init(|| Regex::new(r"\(([^()]*)\)").expect("Failed to compile parens regex"));

    let text = clean_text(markup);
    let text = empty.replace_all(&text, "");
    let text = parens.replace_all(&text, r#"<span class="reference">($1)</span>"#);
    normalize_whitespace(&text)
}

/// Collects blocks with their source offsets during the walk
#[derive(Debug, Default)]
struct Extraction {
    found: Vec<(usize, BlockBody)>,
    processed_verses: HashSet<String>,
    verse_count: usize,
}

impl Extraction {
    fn add_heading<N: MarkupNode>(&mut self, marker: &N) {
        let text = heading_text(marker.inner_markup());
        if text.is_empty() {
            debug!(offset = marker.source_offset(), "Skipping empty heading");
            return;
        }
        self.found
            .push((marker.source_offset(), BlockBody::SectionHeading { text }));
    }

    /// Emit the verse introduced by `marker`, whose text is the rest of `container`
    fn add_verse<N: MarkupNode>(&mut self, marker: &N, container: &N) {
        let number = marker.text();
        if number.is_empty() {
            debug!(offset = marker.source_offset(), "Verse-number marker without a number");
            return;
        }
        if !self.processed_verses.insert(number.clone()) {
            debug!(verse = %number, "Skipping repeated verse-number marker");
            return;
        }

        let rest = container
            .inner_markup()
            .replacen(marker.outer_markup(), "", 1);
        let text = clean_preserving(&rest, PRESERVED_CLASSES);
        if text.is_empty() {
            debug!(verse = %number, "Dropping verse without text");
            return;
        }

        self.verse_count += 1;
        self.found.push((
            marker.source_offset(),
            BlockBody::VerseGroup(VerseGroup::new(number, VerseLine::new(text, None))),
        ));
    }

    fn into_blocks(self) -> Vec<ContentBlock> {
        let mut found = self.found;
        found.sort_by_key(|(offset, _)| *offset);

        let mut assembler = BlockAssembler::new();
        for (_, body) in found {
            assembler.push(body);
        }
        assembler.finish()
    }
}

/// Primary walk: depth-first from `root`, stopping at markers
///
/// Verse markers count only when their parent is a `<span>`.
fn walk_markers<N: MarkupNode>(root: &N, extraction: &mut Extraction) {
    let mut stack: Vec<N> = root.children().into_iter().rev().collect();

    while let Some(node) = stack.pop() {
        match classify(&node) {
            Some(Marker::Heading) => extraction.add_heading(&node),
            Some(Marker::VerseNumber) => match node.parent() {
                Some(parent) if parent.tag_name() == "span" => {
                    extraction.add_verse(&node, &parent);
                }
                _ => debug!(
                    offset = node.source_offset(),
                    "Verse-number marker outside an inline container"
                ),
            },
            None => stack.extend(node.children().into_iter().rev()),
        }
    }
}

/// Fallback: every element that directly contains a verse-number marker
fn scan_containers<N: MarkupNode>(root: &N, extraction: &mut Extraction) {
    for container in root.descendants() {
        let marker = container
            .children()
            .into_iter()
            .find(|child| child.has_class(VERSE_NUMBER_CLASS));
        if let Some(marker) = marker {
            extraction.add_verse(&marker, &container);
        }
    }
}

/// Extract headings and verses below `root`, in source order
///
/// Falls back to [`scan_containers`] when the primary walk finds no verse.
pub fn extract_blocks<N: MarkupNode>(root: &N) -> Vec<ContentBlock> {
    let mut extraction = Extraction::default();
    walk_markers(root, &mut extraction);

    if extraction.verse_count == 0 {
        debug!("Primary walk found no verses, scanning all containers");
        scan_containers(root, &mut extraction);
    }

    extraction.into_blocks()
}
