//! Legacy presentational tag normalizer
//!
//! Legacy pages mark proper names, places and inline titles with
//! `<font class="...">`. The semantic ones become spans the renderer can
//! style, the rest are unwrapped.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::common::markup::replace_elements;

/// Upper bound on passes of each rewrite loop
pub const MAX_REWRITE_PASSES: usize = 10;

/// Content of a `<font>` element that contains no further `<font>` tags
const INNERMOST_CONTENT: &str = r"((?:[^<]|<[^fF/][^>]*>|</[^fF][^>]*>)*?)";

fn font_class_regex(class: &str) -> Regex {
    Regex::new(&format!(
        r#"(?is)<font\b[^>]*\bclass\s*=\s*["']?{class}\b["']?[^>]*>{INNERMOST_CONTENT}</font\s*>"#
    ))
    .expect("Failed to compile font class regex")
}

/// `(pattern, replacement)` pairs applied on every pass
fn class_rewrites() -> &'static [(Regex, &'static str)] {
    static CLASS_REWRITES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    CLASS_REWRITES.get_or_init(|| {
        vec![
            (font_class_regex("chapNum"), ""),
            (font_class_regex("smallTitle"), r#"<h4 class="title">$1</h4>"#),
            (font_class_regex("name"), r#"<span class="name">$1</span>"#),
            (font_class_regex("area"), r#"<span class="area">$1</span>"#),
            (font_class_regex("origin"), "$1"),
        ]
    })
}

fn font_tag_regex() -> &'static Regex {
    static FONT_TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    FONT_TAG_REGEX
        .get_or_init(|| Regex::new(r"(?i)</?font\b[^>]*>").expect("Failed to compile font tag regex"))
}

fn tag_start_regex() -> &'static Regex {
    static TAG_START_REGEX: OnceLock<Regex> = OnceLock::new();
    TAG_START_REGEX.get_or_init(|| {
        Regex::new(r"^(?:</?[A-Za-z][A-Za-z0-9:-]*[\s/>]|<[!?])")
            .expect("Failed to compile tag start regex")
    })
}

/// Escape every `<` that does not open a tag, comment or declaration
///
/// Legacy text contains bare comparisons such as `a < b` or `c<d`; left as is
/// the element tree would read them as tags and pull the next verse inside.
pub fn escape_stray_brackets(markup: &str) -> String {
    let mut result = String::with_capacity(markup.len());
    let mut cursor = 0;
    for (index, _) in markup.match_indices('<') {
        if !tag_start_regex().is_match(&markup[index..]) {
            result.push_str(&markup[cursor..index]);
            result.push_str("&lt;");
            cursor = index + 1;
        }
    }
    result.push_str(&markup[cursor..]);
    result
}

/// One pass of the class rewrites, innermost elements first
fn rewrite_classes(markup: &str) -> String {
    class_rewrites()
        .iter()
        .fold(markup.to_string(), |current, (regex, replacement)| {
            regex.replace_all(&current, *replacement).into_owned()
        })
}

/// Unwrap every remaining top-level `<font>` element to its inner markup
fn unwrap_fonts(markup: &str) -> String {
    replace_elements(markup, "font", |_| true, |element| element.inner.to_string())
}

/// Run `step` until the markup stops changing or the pass cap is reached
fn run_to_fixed_point(markup: String, label: &str, step: impl Fn(&str) -> String) -> String {
    let mut current = markup;
    for _ in 0..MAX_REWRITE_PASSES {
        let next = step(&current);
        if next == current {
            return current;
        }
        current = next;
    }
    // The last allowed pass may have been the converging one
    if step(&current) != current {
        debug!(loop_name = label, passes = MAX_REWRITE_PASSES, "Rewrite pass cap reached");
    }
    current
}

/// Rewrite legacy `<font>` markup into semantic equivalents
///
/// - `name` and `area` become `<span class="name|area">`
/// - `origin` is unwrapped to its content
/// - `smallTitle` becomes `<h4 class="title">`
/// - `chapNum` is removed together with its content
///
/// Any other `<font>` is unwrapped, and stray `<font>`/`</font>` tags left by
/// malformed input are deleted. A `<` that opens no tag is escaped first.
/// Never fails; hitting the pass cap keeps the best result so far.
pub fn normalize_legacy_tags(markup: &str) -> String {
    let escaped = escape_stray_brackets(markup);
    let rewritten = run_to_fixed_point(escaped, "class rewrite", rewrite_classes);
    let unwrapped = run_to_fixed_point(rewritten, "font unwrap", unwrap_fonts);
    font_tag_regex().replace_all(&unwrapped, "").into_owned()
}
