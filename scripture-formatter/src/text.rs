//! Plain text rendering

use std::sync::OnceLock;

use html_escape::decode_html_entities;
use regex::Regex;

use scripture_parser::{BlockBody, NormalizedChapter};

/// Remove tags, decode entities and collapse whitespace
pub fn strip_markup(markup: &str) -> String {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]*>").expect("Failed to compile tag regex"));

    let stripped = re.replace_all(markup, "");
    decode_html_entities(&stripped)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render a chapter as plain text
///
/// The title comes first, then one paragraph per block separated by blank
/// lines. Verse lines read `N text`; continuation lines are indented by the
/// width of the label instead.
pub fn to_plain_text(chapter: &NormalizedChapter) -> String {
    let mut paragraphs = vec![chapter.title.clone()];

    for block in &chapter.blocks {
        let paragraph = match &block.body {
            BlockBody::VerseGroup(group) => {
                let label = format!("{} ", group.verse_number);
                let indent = " ".repeat(label.chars().count());
                group
                    .lines
                    .iter()
                    .enumerate()
                    .map(|(index, line)| {
                        let prefix = if index == 0 { &label } else { &indent };
                        format!("{prefix}{}", strip_markup(&line.text))
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            body => strip_markup(body.text().unwrap_or_default()),
        };
        if !paragraph.trim().is_empty() {
            paragraphs.push(paragraph);
        }
    }

    paragraphs.join("\n\n")
}
