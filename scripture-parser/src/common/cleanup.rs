//! Entity decoding and tag stripping for extracted text
//!
//! Every parser funnels its captured markup through [`clean_text`] or
//! [`clean_preserving`] before it lands in a block.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::markup::{has_class, tag_name};

/// Tags after which a space is inserted when stripped, so words don't run together
const BLOCK_TAGS: &[&str] = &["br", "p", "div", "li", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Decode the fixed entity set used by upstream payloads
///
/// Only `&nbsp;`, `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;` and `&#39;` are
/// decoded, in a single pass, so `&amp;lt;` becomes `&lt;` and not `<`.
/// Unknown entities pass through unchanged. `&nbsp;` decodes to a plain space.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    static ENTITY_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = ENTITY_REGEX.get_or_init(|| {
        Regex::new(r"&(nbsp|amp|lt|gt|quot|apos|#39|#160);")
            .expect("Failed to compile entity regex")
    });

    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    re.replace_all(text, |caps: &Captures| match &caps[1] {
        "nbsp" | "#160" => " ",
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        _ => "'",
    })
}

/// Strip all tags, decode entities, collapse whitespace and trim
pub fn clean_text(markup: &str) -> String {
    clean_preserving(markup, &[])
}

/// Like [`clean_text`], but keep `<span>` elements whose class is listed in
/// `preserved_classes`, attributes verbatim
///
/// Entities are decoded in text only; preserved tags are copied untouched so
/// already-escaped attribute values survive repeated cleaning. Angle brackets
/// in text, decoded or bare, are written back as `&lt;` and `&gt;`, so escaped
/// source text never turns into markup.
pub fn clean_preserving(markup: &str, preserved_classes: &[&str]) -> String {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = TAG_REGEX.get_or_init(|| {
        Regex::new(r"</?[A-Za-z!?][^<>]*>").expect("Failed to compile tag regex")
    });

    let mut result = String::with_capacity(markup.len());
    // One entry per open <span>: whether it was preserved
    let mut span_stack: Vec<bool> = Vec::new();
    let mut cursor = 0;

    for tag in re.find_iter(markup) {
        push_text(&mut result, &markup[cursor..tag.start()]);
        cursor = tag.end();

        let raw = tag.as_str();
        let Some((name, closing)) = tag_name(raw) else {
            continue;
        };

        if name == "span" && !raw.ends_with("/>") {
            if closing {
                if span_stack.pop() == Some(true) {
                    result.push_str(raw);
                }
            } else {
                let keep = preserved_classes.iter().any(|class| has_class(raw, class));
                if keep {
                    result.push_str(raw);
                }
                span_stack.push(keep);
            }
        } else if BLOCK_TAGS.contains(&name.as_str()) {
            push_text(&mut result, " ");
        }
    }
    push_text(&mut result, &markup[cursor..]);

    for kept in span_stack.into_iter().rev() {
        if kept {
            result.push_str("</span>");
        }
    }

    let trimmed = result.trim();
    if trimmed.len() == result.len() {
        result
    } else {
        trimmed.to_string()
    }
}

/// Collapse whitespace runs to single spaces and trim
pub fn normalize_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    push_collapsed(&mut result, text);
    result.trim().to_string()
}

/// Append decoded text, collapsing whitespace runs across segment boundaries
fn push_text(out: &mut String, segment: &str) {
    for c in decode_entities(segment).chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => push_char(out, c),
        }
    }
}

fn push_collapsed(out: &mut String, text: &str) {
    for c in text.chars() {
        push_char(out, c);
    }
}

fn push_char(out: &mut String, c: char) {
    if c.is_whitespace() {
        if !out.is_empty() && !out.ends_with(' ') {
            out.push(' ');
        }
    } else {
        out.push(c);
    }
}
