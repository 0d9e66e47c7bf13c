//! Dispatch, titles and error surface of the chapter normalizer

#[path = "common/mod.rs"]
mod common;

use common::{fixture, load_fixture};
use rstest::rstest;
use scripture_parser::{
    BookCatalog, ChapterNormalizer, CountingUnit, DisplayPreferences, FetchedPayload,
    NormalizeError, SourceFormat,
};
use tracing_test::traced_test;

#[rstest]
#[case::tagged("tagged-json", "tagged_json", "gen_1.json")]
#[case::tagged_alias("A", "tagged_json", "psa_1.json")]
#[case::legacy("legacy-html", "legacy_html", "gen_12.html")]
#[case::legacy_alias("format-b", "legacy_html", "malformed.html")]
#[case::verse_array("verse-array", "verse_array", "jhn_3.json")]
#[case::verse_array_alias("c", "verse_array", "psa_117.json")]
fn test_dispatch_by_identifier(
    #[case] format_id: &str,
    #[case] format_dir: &str,
    #[case] filename: &str,
) {
    let payload = load_fixture(format_dir, filename);
    let chapter = ChapterNormalizer::new()
        .normalize_with_id(format_id, &payload, "gen", 1)
        .unwrap();

    assert!(
        !chapter.is_unavailable(),
        "{} parsed as {format_id} was unavailable",
        fixture(format_dir, filename).name
    );
    assert!(chapter.verse_count() > 0);
}

#[test]
#[traced_test]
fn test_unknown_format_is_an_error() {
    let err = ChapterNormalizer::new()
        .normalize_with_id("usfm", "[]", "gen", 1)
        .unwrap_err();

    assert!(matches!(err, NormalizeError::UnsupportedFormat(ref id) if id == "usfm"));
    assert_eq!(err.to_string(), "Unsupported source format: usfm");
}

#[test]
fn test_wrong_format_degrades_to_sentinel() {
    // A legacy page handed to the JSON parsers is a data problem, not an error
    let payload = load_fixture("legacy_html", "gen_12.html");
    for format in [SourceFormat::TaggedJson, SourceFormat::VerseArray] {
        let chapter = ChapterNormalizer::new()
            .normalize(format, &payload, "gen", 12)
            .unwrap();
        assert!(chapter.is_unavailable(), "{format} accepted a legacy page");
        assert_eq!(chapter.title, "창세기 12장");
    }
}

#[test]
#[traced_test]
fn test_fetched_payload() {
    let normalizer = ChapterNormalizer::new();

    let failed = normalizer
        .normalize_fetched(SourceFormat::VerseArray, &FetchedPayload::failed(), "rev", 22)
        .unwrap();
    assert!(failed.is_unavailable());
    assert_eq!(failed.title, "요한계시록 22장");
    assert!(logs_contain("Fetch failed"));

    let fetched = FetchedPayload::ok(load_fixture("verse_array", "psa_117.json"));
    let chapter = normalizer
        .normalize_fetched(SourceFormat::VerseArray, &fetched, "psa", 117)
        .unwrap();
    assert_eq!(chapter.verse_count(), 2);
}

#[test]
fn test_preferences_apply_per_normalizer() {
    let payload = load_fixture("tagged_json", "gen_1.json");

    let plain = ChapterNormalizer::new();
    let with_notes = ChapterNormalizer::new()
        .with_preferences(DisplayPreferences::default().with_footnotes(true));
    assert!(with_notes.preferences().show_footnotes);

    let without = plain
        .normalize(SourceFormat::TaggedJson, &payload, "gen", 1)
        .unwrap();
    let with = with_notes
        .normalize(SourceFormat::TaggedJson, &payload, "gen", 1)
        .unwrap();

    assert!(!without.verse("2").unwrap().joined_text().contains("fn-marker"));
    assert!(with.verse("2").unwrap().joined_text().contains("fn-marker"));
}

struct EnglishCatalog;

impl BookCatalog for EnglishCatalog {
    fn display_name(&self, book_id: &str) -> Option<&str> {
        match book_id {
            "gen" => Some("Genesis"),
            "psa" => Some("Psalms"),
            _ => None,
        }
    }

    fn unit_word(&self, unit: CountingUnit) -> &str {
        match unit {
            CountingUnit::Chapter => "장",
            CountingUnit::Psalm => "편",
        }
    }
}

#[rstest]
#[case::chapter("gen", 3, "Genesis 3장")]
#[case::psalm("psa", 23, "Psalms 23편")]
#[case::unknown("1es", 4, "1es 4장")]
fn test_custom_catalog_titles(#[case] book_id: &str, #[case] chapter: u32, #[case] expected: &str) {
    let normalizer = ChapterNormalizer::new().with_catalog(EnglishCatalog);
    let result = normalizer
        .normalize(SourceFormat::VerseArray, "[]", book_id, chapter)
        .unwrap();
    assert_eq!(result.title, expected);
}

#[rstest]
#[case::zero_chapter("gen", 0)]
#[case::blank_book("  ", 1)]
fn test_invalid_requests(#[case] book_id: &str, #[case] chapter: u32) {
    let result = ChapterNormalizer::new().normalize(SourceFormat::VerseArray, "[]", book_id, chapter);
    assert!(matches!(
        result,
        Err(NormalizeError::InvalidChapter { .. } | NormalizeError::InvalidBookId { .. })
    ));
}

#[test]
fn test_chapter_serializes_to_json() {
    let payload = r#"[{"verse":1,"text":"A"}]"#;
    let chapter = ChapterNormalizer::new()
        .normalize(SourceFormat::VerseArray, payload, "gen", 1)
        .unwrap();
    let json = serde_json::to_value(&chapter).unwrap();

    assert_eq!(json["title"], "창세기 1장");
    assert_eq!(json["blocks"][0]["kind"], "verse_group");
    assert_eq!(json["blocks"][0]["verse_number"], "1");
    assert_eq!(json["blocks"][0]["lines"][0]["style_class"], "p");
}
