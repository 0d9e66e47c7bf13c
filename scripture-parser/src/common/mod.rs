//! Utilities shared by the three source-format parsers

pub mod assembly;
pub mod cleanup;
pub mod footnote;
pub mod markup;

pub use assembly::BlockAssembler;
pub use cleanup::{clean_preserving, clean_text, decode_entities, normalize_whitespace};
pub use footnote::{FOOTNOTE_MARKER_CLASS, process_footnotes};

use crate::models::ContentBlock;

/// Output of one format parser, before the title is attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPayload {
    /// Reference text supplied by the source, if any (e.g. "창세기 1")
    pub reference: Option<String>,
    pub blocks: Vec<ContentBlock>,
}

impl ParsedPayload {
    /// Payload that yielded nothing usable
    pub fn unavailable(reference: Option<String>) -> Self {
        Self {
            reference,
            blocks: vec![ContentBlock::unavailable()],
        }
    }
}
