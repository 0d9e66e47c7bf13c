//! Entry point dispatching a payload to its format parser

use tracing::{debug, warn};

use crate::common::ParsedPayload;
use crate::error::{NormalizeError, Result};
use crate::flat::parse_flat_chapter;
use crate::legacy::parse_legacy_chapter;
use crate::models::{DisplayPreferences, FetchedPayload, NormalizedChapter, SourceFormat};
use crate::tagged::parse_tagged_chapter;
use crate::title::{BookCatalog, DefaultBookCatalog, resolve_title};

/// Chapter normalizer
///
/// Holds the display preferences and the book catalog used for titles. It
/// keeps no state between calls, so one instance can serve any number of
/// chapters.
///
/// # Example
///
/// ```
/// use scripture_parser::{ChapterNormalizer, DisplayPreferences, SourceFormat};
///
/// let normalizer = ChapterNormalizer::new()
///     .with_preferences(DisplayPreferences::default().with_footnotes(true));
/// let payload = r#"[{"verse": 1, "text": "In the beginning"}]"#;
/// let chapter = normalizer
///     .normalize(SourceFormat::VerseArray, payload, "gen", 1)
///     .unwrap();
/// assert_eq!(chapter.title, "창세기 1장");
/// assert_eq!(chapter.verse_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChapterNormalizer<C = DefaultBookCatalog> {
    catalog: C,
    preferences: DisplayPreferences,
}

impl ChapterNormalizer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: BookCatalog> ChapterNormalizer<C> {
    /// Use another book catalog for titles
    pub fn with_catalog<D: BookCatalog>(self, catalog: D) -> ChapterNormalizer<D> {
        ChapterNormalizer {
            catalog,
            preferences: self.preferences,
        }
    }

    pub fn with_preferences(mut self, preferences: DisplayPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn preferences(&self) -> &DisplayPreferences {
        &self.preferences
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Normalize one chapter payload
    ///
    /// Malformed or empty payloads never fail: they produce a chapter holding
    /// only the "content unavailable" block. Errors are reserved for calls
    /// that cannot be right whatever the payload (chapter 0, blank book id).
    pub fn normalize(
        &self,
        format: SourceFormat,
        payload: &str,
        book_id: &str,
        chapter: u32,
    ) -> Result<NormalizedChapter> {
        validate_request(book_id, chapter)?;
        debug!(%format, book_id, chapter, bytes = payload.len(), "Normalizing chapter");

        let parsed = match format {
            SourceFormat::TaggedJson => parse_tagged_chapter(payload, &self.preferences),
            SourceFormat::LegacyHtml => parse_legacy_chapter(payload),
            SourceFormat::VerseArray => parse_flat_chapter(payload),
        };

        Ok(self.finish(parsed, book_id, chapter))
    }

    /// Like [`normalize`](Self::normalize), with the format given by identifier
    ///
    /// An unknown identifier is the one payload-independent defect reported as
    /// [`NormalizeError::UnsupportedFormat`].
    pub fn normalize_with_id(
        &self,
        format_id: &str,
        payload: &str,
        book_id: &str,
        chapter: u32,
    ) -> Result<NormalizedChapter> {
        let format = format_id.parse::<SourceFormat>()?;
        self.normalize(format, payload, book_id, chapter)
    }

    /// Normalize the result of a fetch; an unsuccessful fetch skips parsing
    pub fn normalize_fetched(
        &self,
        format: SourceFormat,
        fetched: &FetchedPayload,
        book_id: &str,
        chapter: u32,
    ) -> Result<NormalizedChapter> {
        if fetched.success {
            return self.normalize(format, &fetched.content, book_id, chapter);
        }

        validate_request(book_id, chapter)?;
        warn!(%format, book_id, chapter, "Fetch failed, returning unavailable chapter");
        Ok(NormalizedChapter::unavailable(self.title(None, book_id, chapter)))
    }

    /// Title of a chapter, from a source reference when one is available
    pub fn title(&self, reference: Option<&str>, book_id: &str, chapter: u32) -> String {
        resolve_title(&self.catalog, reference, book_id, chapter)
    }

    fn finish(&self, parsed: ParsedPayload, book_id: &str, chapter: u32) -> NormalizedChapter {
        let title = self.title(parsed.reference.as_deref(), book_id, chapter);
        let chapter = NormalizedChapter {
            title,
            blocks: parsed.blocks,
        };
        if chapter.is_unavailable() {
            warn!(title = %chapter.title, "Chapter normalized to unavailable content");
        } else {
            debug!(
                title = %chapter.title,
                blocks = chapter.blocks.len(),
                verses = chapter.verse_count(),
                "Chapter normalized"
            );
        }
        chapter
    }
}

fn validate_request(book_id: &str, chapter: u32) -> Result<()> {
    if chapter == 0 {
        return Err(NormalizeError::InvalidChapter { chapter });
    }
    if book_id.trim().is_empty() {
        return Err(NormalizeError::InvalidBookId {
            book_id: book_id.to_string(),
        });
    }
    Ok(())
}

/// Normalize one chapter with the default book catalog
pub fn normalize_chapter(
    format: SourceFormat,
    payload: &str,
    book_id: &str,
    chapter: u32,
    preferences: &DisplayPreferences,
) -> Result<NormalizedChapter> {
    ChapterNormalizer::new()
        .with_preferences(*preferences)
        .normalize(format, payload, book_id, chapter)
}
