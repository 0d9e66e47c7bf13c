//! Footnote handling for tagged markup
//!
//! A footnote is a `<span class="note f">` container holding one or more
//! `<span class="ft">` text regions. Its in-text caller is a separate
//! `<span class="fc">` anchor, removed in both modes.

use std::borrow::Cow;
use std::sync::OnceLock;

use html_escape::encode_double_quoted_attribute;
use regex::Regex;
use tracing::debug;

use super::cleanup::{clean_text, decode_entities};
use super::markup::{find_elements, has_class, replace_elements};

/// Class of the inline marker that replaces a shown footnote
pub const FOOTNOTE_MARKER_CLASS: &str = "fn-marker";

/// Visible content of the inline marker
pub const FOOTNOTE_MARKER_SYMBOL: &str = "*";

fn is_footnote_container(tag: &str) -> bool {
    has_class(tag, "note") && has_class(tag, "f")
}

fn is_cross_reference_note(tag: &str) -> bool {
    has_class(tag, "note") && has_class(tag, "x")
}

/// Replace footnotes with inline markers, or drop them
///
/// With `show_footnotes` each footnote container becomes one marker carrying
/// the escaped footnote text; containers with empty text are removed. Callers
/// are removed either way.
pub fn process_footnotes(markup: &str, show_footnotes: bool) -> String {
    let without_callers = remove_callers(markup);

    replace_elements(&without_callers, "span", is_footnote_container, |element| {
        if !show_footnotes {
            return String::new();
        }
        let text = footnote_text(element.inner);
        if text.is_empty() {
            debug!("Dropping footnote with empty text");
            String::new()
        } else {
            footnote_marker(&text)
        }
    })
}

/// Remove inline cross-reference notes (`<span class="note x">`)
pub fn remove_cross_reference_notes(markup: &str) -> String {
    replace_elements(markup, "span", is_cross_reference_note, |_| String::new())
}

/// Remove footnote caller anchors
///
/// Two shapes occur upstream: the closed form
/// `<span class="fc"><a ..><sup>a</sup></a></span>` and an open-ended form
/// where only the opening tag and the caller letter are present.
pub fn remove_callers(markup: &str) -> Cow<'_, str> {
    static CLOSED_CALLER_REGEX: OnceLock<Regex> = OnceLock::new();
    static OPEN_CALLER_REGEX: OnceLock<Regex> = OnceLock::new();

    let closed = CLOSED_CALLER_REGEX.get_or_init(|| {
        Regex::new(
            r#"<span\s+class=["']?fc["']?[^>]*>\s*<a\b[^>]*>\s*<sup\b[^>]*>[^<]*</sup>\s*</a>\s*</span>"#,
        )
        .expect("Failed to compile closed caller regex")
    });
    let open = OPEN_CALLER_REGEX.get_or_init(|| {
        Regex::new(r#"<span\s+class=["']?fc["']?[^>]*>[^<\s]*(?:</span>)?"#)
            .expect("Failed to compile open caller regex")
    });

    match closed.replace_all(markup, "") {
        Cow::Borrowed(unchanged) => open.replace_all(unchanged, ""),
        Cow::Owned(owned) => Cow::Owned(open.replace_all(&owned, "").into_owned()),
    }
}

/// Cleaned text of all `ft` regions inside a footnote container
fn footnote_text(container_inner: &str) -> String {
    let parts: Vec<String> = find_elements(container_inner, "span", |tag| has_class(tag, "ft"))
        .iter()
        .map(|element| decode_entities(&clean_text(element.inner)).into_owned())
        .filter(|text| !text.is_empty())
        .collect();
    parts.join(" ")
}

/// Inline marker element for one footnote
pub fn footnote_marker(text: &str) -> String {
    let escaped = encode_double_quoted_attribute(text.trim());
    format!(
        r#"<span class="{FOOTNOTE_MARKER_CLASS}" data-note="{escaped}" title="{escaped}">{FOOTNOTE_MARKER_SYMBOL}</span>"#
    )
}
