//! Verse array parsing (format C)
//!
//! The upstream provider has already split the chapter into verses, so every
//! record maps to exactly one verse group.

use std::fmt;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::common::cleanup::clean_text;
use crate::common::{BlockAssembler, ParsedPayload};
use crate::error::Result;
use crate::models::{BlockBody, VerseGroup, VerseLine};

/// Verse number as sent upstream: a number or a string such as `"4-5"`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum VerseKey {
    Number(u64),
    Text(String),
}

impl fmt::Display for VerseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerseKey::Number(n) => write!(f, "{n}"),
            VerseKey::Text(s) => f.write_str(s.trim()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerseRecord {
    pub verse: VerseKey,
    /// Missing or `null` text reads as empty and the record is skipped
    #[serde(default)]
    pub text: Option<String>,
}

/// Accepted payload shapes: a bare array or an object with a `verses` array
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FlatPayload {
    Records(Vec<VerseRecord>),
    Envelope {
        #[serde(default)]
        reference: Option<String>,
        #[serde(default)]
        verses: Vec<VerseRecord>,
    },
}

impl FlatPayload {
    pub fn decode(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    fn into_parts(self) -> (Option<String>, Vec<VerseRecord>) {
        match self {
            FlatPayload::Records(records) => (None, records),
            FlatPayload::Envelope { reference, verses } => (reference, verses),
        }
    }
}

/// Parse a verse array payload
pub fn parse_flat_chapter(payload: &str) -> ParsedPayload {
    let (reference, records) = match FlatPayload::decode(payload) {
        Ok(decoded) => decoded.into_parts(),
        Err(err) => {
            warn!(error = %err, "Verse array payload could not be decoded");
            return ParsedPayload::unavailable(None);
        }
    };
    let reference = reference.filter(|r| !r.trim().is_empty());

    if records.is_empty() {
        warn!("Verse array payload has no verses");
        return ParsedPayload::unavailable(reference);
    }

    let mut assembler = BlockAssembler::new();
    for record in records {
        let text = clean_text(record.text.as_deref().unwrap_or_default());
        if text.is_empty() {
            debug!(verse = %record.verse, "Dropping verse without text");
            continue;
        }
        assembler.push(BlockBody::VerseGroup(VerseGroup::new(
            record.verse.to_string(),
            VerseLine::new(text, None),
        )));
    }

    ParsedPayload {
        reference,
        blocks: assembler.finish(),
    }
}
