//! Legacy HTML parsing (format B)
//!
//! Presentational tags are normalized first ([`tags`]), the result is parsed
//! into an element tree ([`tree`]) and headings and verses are collected from
//! the chapter container ([`walk`]).

pub mod tags;
pub mod tree;
pub mod walk;

use tracing::{debug, warn};

use crate::common::ParsedPayload;
use tags::normalize_legacy_tags;
use tree::Document;
use walk::{ROOT_CONTAINER_ID, extract_blocks};

/// Parse a legacy HTML page fragment
///
/// Legacy pages carry no reference text. A page without the chapter
/// container produces the sentinel block.
pub fn parse_legacy_chapter(payload: &str) -> ParsedPayload {
    if payload.trim().is_empty() {
        warn!("Legacy payload is empty");
        return ParsedPayload::unavailable(None);
    }

    let normalized = normalize_legacy_tags(payload);
    let document = Document::parse(&normalized);
    debug!(elements = document.element_count(), "Parsed legacy markup");

    let Some(root) = document.find_by_id(ROOT_CONTAINER_ID) else {
        warn!(id = ROOT_CONTAINER_ID, "Legacy payload has no chapter container");
        return ParsedPayload::unavailable(None);
    };

    ParsedPayload {
        reference: None,
        blocks: extract_blocks(&root),
    }
}
