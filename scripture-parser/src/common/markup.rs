//! Lightweight markup scanning helpers
//!
//! The upstream payloads are tag soup rather than well-formed XML, and nested
//! `<span>` regions cannot be matched with the `regex` crate alone (no
//! back-references). These helpers locate balanced elements by counting tag
//! depth and read attributes from a single opening tag.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

/// Matches any opening, closing or self-closing tag, capturing the name
fn tag_regex() -> &'static Regex {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    TAG_REGEX.get_or_init(|| {
        Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9]*)\b[^>]*>").expect("Failed to compile tag regex")
    })
}

/// A balanced element found by [`find_elements`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<'a> {
    /// Byte range of the whole element, tags included
    pub range: Range<usize>,
    /// The opening tag, e.g. `<span class="verse">`
    pub open_tag: &'a str,
    /// Markup between the opening and the matching closing tag
    pub inner: &'a str,
}

/// Find all top-level `tag` elements whose opening tag satisfies `accept`
///
/// Nested elements of the same name are balanced by depth counting; an
/// accepted element that is never closed is ignored. Elements nested inside an
/// already captured element are not reported separately.
pub fn find_elements<'a, F>(content: &'a str, tag: &str, accept: F) -> Vec<Element<'a>>
where
    F: Fn(&str) -> bool,
{
    let mut elements = Vec::new();
    // (start of opening tag, end of opening tag, depth)
    let mut open: Option<(usize, usize, usize)> = None;

    for caps in tag_regex().captures_iter(content) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if !caps[2].eq_ignore_ascii_case(tag) {
            continue;
        }
        let closing = !caps[1].is_empty();
        let self_closing = whole.as_str().ends_with("/>");

        match open.as_mut() {
            None => {
                if !closing && !self_closing && accept(whole.as_str()) {
                    open = Some((whole.start(), whole.end(), 1));
                }
            }
            Some((start, inner_start, depth)) => {
                if self_closing {
                    continue;
                }
                if closing {
                    *depth -= 1;
                    if *depth == 0 {
                        elements.push(Element {
                            range: *start..whole.end(),
                            open_tag: &content[*start..*inner_start],
                            inner: &content[*inner_start..whole.start()],
                        });
                        open = None;
                    }
                } else {
                    *depth += 1;
                }
            }
        }
    }

    if let Some((start, _, depth)) = open {
        debug!(start, depth, tag, "Ignoring unterminated element");
    }

    elements
}

/// Replace every element found by [`find_elements`] with the output of `replace`
pub fn replace_elements<F, R>(content: &str, tag: &str, accept: F, mut replace: R) -> String
where
    F: Fn(&str) -> bool,
    R: FnMut(&Element<'_>) -> String,
{
    let elements = find_elements(content, tag, accept);
    if elements.is_empty() {
        return content.to_string();
    }

    let mut result = String::with_capacity(content.len());
    let mut cursor = 0;
    for element in &elements {
        result.push_str(&content[cursor..element.range.start]);
        result.push_str(&replace(element));
        cursor = element.range.end;
    }
    result.push_str(&content[cursor..]);
    result
}

/// Remove every element found by [`find_elements`], content included
pub fn remove_elements<F>(content: &str, tag: &str, accept: F) -> String
where
    F: Fn(&str) -> bool,
{
    replace_elements(content, tag, accept, |_| String::new())
}

/// Name of a tag and whether it is a closing tag, e.g. `</span>` -> `("span", true)`
pub fn tag_name(tag: &str) -> Option<(String, bool)> {
    let caps = tag_regex().captures(tag)?;
    Some((caps[2].to_ascii_lowercase(), !caps[1].is_empty()))
}

/// Parse all attributes of an opening tag
///
/// Accepts double-quoted, single-quoted and unquoted values as legacy markup
/// uses all three. Attribute names are lower-cased.
pub fn parse_attributes(tag: &str) -> Vec<(String, String)> {
    let mut attributes = Vec::new();

    let Some(start) = tag.find('<') else {
        return attributes;
    };
    let body = tag[start + 1..].trim_end_matches('>').trim_end_matches('/');
    let Some(name_end) = body.find(|c: char| c.is_ascii_whitespace()) else {
        return attributes;
    };

    let attrs_part = &body[name_end..];
    let bytes = attrs_part.as_bytes();
    let len = bytes.len();
    let mut pos = 0;

    while pos < len {
        while pos < len && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= len {
            break;
        }

        let name_start = pos;
        while pos < len && bytes[pos] != b'=' && !bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        let name = attrs_part[name_start..pos].to_ascii_lowercase();

        while pos < len && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= len || bytes[pos] != b'=' {
            // Bare attribute such as `hidden`
            if !name.is_empty() {
                attributes.push((name, String::new()));
            }
            continue;
        }
        pos += 1;
        while pos < len && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= len {
            attributes.push((name, String::new()));
            break;
        }

        let quote = bytes[pos];
        let value = if quote == b'"' || quote == b'\'' {
            pos += 1;
            let value_start = pos;
            while pos < len && bytes[pos] != quote {
                pos += 1;
            }
            let value = &attrs_part[value_start..pos];
            pos += 1;
            value
        } else {
            let value_start = pos;
            while pos < len && !bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            &attrs_part[value_start..pos]
        };

        if !name.is_empty() {
            attributes.push((name, value.to_string()));
        }
    }

    attributes
}

/// Value of one attribute of an opening tag
pub fn attribute_value(tag: &str, name: &str) -> Option<String> {
    parse_attributes(tag)
        .into_iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

/// Whether the opening tag's `class` attribute lists `class`
pub fn has_class(tag: &str, class: &str) -> bool {
    attribute_value(tag, "class")
        .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
}
