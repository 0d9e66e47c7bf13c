#![deny(
    clippy::panic,
    clippy::absolute_paths,
    clippy::print_stderr,
    clippy::print_stdout
)]

//! # Scripture Parser
//!
//! Normalizes scripture chapter payloads into one ordered sequence of
//! display-ready content blocks.
//!
//! Three structurally unrelated upstream formats are supported:
//!
//! - **Tagged JSON** ([`SourceFormat::TaggedJson`]): a JSON envelope around
//!   class-tagged markup, parsed by independent region scans merged by offset.
//! - **Legacy HTML** ([`SourceFormat::LegacyHtml`]): a hypertext page fragment
//!   with presentational `<font>` tags, parsed by walking its element tree.
//! - **Verse array** ([`SourceFormat::VerseArray`]): pre-segmented
//!   `{verse, text}` records mapped one to one.
//!
//! The crate performs no I/O and holds no state between calls. Data-quality
//! problems never surface as errors: they degrade to a single "content
//! unavailable" block. Only integration defects (an unknown format identifier,
//! a zero chapter number) are reported as [`NormalizeError`].

pub mod common;
pub mod error;
pub mod flat;
pub mod legacy;
pub mod models;
pub mod normalizer;
pub mod tagged;
pub mod title;

// Re-export main types for convenience
pub use error::{NormalizeError, Result};
pub use models::{
    BlockBody, BlockKind, ContentBlock, DisplayPreferences, FetchedPayload, NormalizedChapter,
    SourceFormat, VerseGroup, VerseLine,
};
pub use normalizer::{ChapterNormalizer, normalize_chapter};
pub use title::{BookCatalog, CountingUnit, DefaultBookCatalog};
