//! Tagged JSON parsing (format A)
//!
//! The payload is a JSON envelope whose `content` field holds class-tagged
//! markup. Regions are extracted by independent scans (see [`region`]),
//! ordered by source offset and mapped to blocks here.

pub mod region;
pub mod segment;

use std::collections::HashSet;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::common::{BlockAssembler, ParsedPayload};
use crate::error::Result;
use crate::models::{BlockBody, ContentBlock, DisplayPreferences, VerseLine};
use region::{ExtractedRegion, RegionKind, extract_regions};
use segment::{Segment, segment_paragraph};

/// JSON envelope of a tagged chapter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaggedEnvelope {
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Decode the JSON envelope
pub fn decode_envelope(payload: &str) -> Result<TaggedEnvelope> {
    Ok(serde_json::from_str(payload)?)
}

/// Parse a tagged JSON payload
///
/// Invalid JSON, a missing `content` field or content without any usable
/// region all produce the sentinel block.
pub fn parse_tagged_chapter(payload: &str, preferences: &DisplayPreferences) -> ParsedPayload {
    let envelope = match decode_envelope(payload) {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!(error = %err, "Tagged payload is not a valid envelope");
            return ParsedPayload::unavailable(None);
        }
    };

    let reference = envelope.reference.filter(|r| !r.trim().is_empty());
    let Some(content) = envelope.content.filter(|c| !c.trim().is_empty()) else {
        warn!("Tagged payload has no content");
        return ParsedPayload::unavailable(reference);
    };

    let regions = extract_regions(&content);
    debug!(regions = regions.len(), "Extracted tagged regions");

    ParsedPayload {
        reference,
        blocks: merge_regions(&regions, preferences),
    }
}

/// Map offset-ordered regions to blocks
///
/// Subtitles are emitted once per distinct text, descriptions and
/// cross-references only when the preferences ask for them, and paragraphs go
/// through verse segmentation. Lines of one verse number gathered from several
/// paragraphs share one group positioned at its first occurrence.
pub fn merge_regions(
    regions: &[ExtractedRegion],
    preferences: &DisplayPreferences,
) -> Vec<ContentBlock> {
    let mut assembler = BlockAssembler::new();
    let mut seen_subtitles: HashSet<&str> = HashSet::new();

    for region in regions {
        match region.kind {
            RegionKind::Section => {
                assembler.push(BlockBody::SectionHeading {
                    text: region.text.clone(),
                });
            }
            RegionKind::Subtitle => {
                if seen_subtitles.insert(region.text.as_str()) {
                    assembler.push(BlockBody::Subtitle {
                        text: region.text.clone(),
                    });
                } else {
                    debug!(subtitle = %region.text, "Skipping duplicate subtitle");
                }
            }
            RegionKind::Description => {
                if preferences.show_description {
                    assembler.push(BlockBody::Description {
                        text: region.text.clone(),
                    });
                }
            }
            RegionKind::CrossReference => {
                if preferences.show_cross_reference {
                    assembler.push(BlockBody::CrossReference {
                        text: region.text.clone(),
                    });
                }
            }
            RegionKind::Paragraph => {
                let style = region.style_class.as_deref();
                match segment_paragraph(region, preferences.show_footnotes) {
                    Segment::Verses(verses) => {
                        for (number, text) in verses {
                            assembler.append_verse_line(&number, VerseLine::new(text, style));
                        }
                    }
                    Segment::Poetic(text) => {
                        assembler.push(BlockBody::PoeticParagraph {
                            text,
                            style_class: VerseLine::new("", style).style_class,
                        });
                    }
                    Segment::Dropped => {}
                }
            }
        }
    }

    assembler.finish()
}
