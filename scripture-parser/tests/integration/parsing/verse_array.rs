//! Verse array (format C) parsing against payload fixtures

#[path = "../common/mod.rs"]
mod common;

use common::{assert_ordered, fixtures, load_fixture};
use rstest::rstest;
use scripture_parser::{
    BlockKind, ContentBlock, DisplayPreferences, NormalizedChapter, SourceFormat, VerseLine,
    normalize_chapter,
};

fn normalize(payload: &str, book_id: &str, chapter: u32) -> NormalizedChapter {
    normalize_chapter(
        SourceFormat::VerseArray,
        payload,
        book_id,
        chapter,
        &DisplayPreferences::default(),
    )
    .unwrap_or_else(|e| panic!("Failed to normalize verse array: {e}"))
}

#[test]
fn test_two_verses_in_array_order() {
    let payload = r#"{"verses":[{"verse":1,"text":"A"},{"verse":2,"text":"B"}]}"#;
    let chapter = normalize(payload, "gen", 1);

    assert_eq!(chapter.title, "창세기 1장");
    assert_eq!(chapter.blocks.len(), 2);
    assert_ordered(&chapter);

    let groups: Vec<_> = chapter.verse_groups().collect();
    assert_eq!(groups[0].verse_number, "1");
    assert_eq!(groups[0].lines, vec![VerseLine::new("A", None)]);
    assert_eq!(groups[1].verse_number, "2");
    assert_eq!(groups[1].lines, vec![VerseLine::new("B", None)]);
}

#[test]
fn test_envelope_fixture() {
    let chapter = normalize(&load_fixture("verse_array", "jhn_3.json"), "jhn", 3);

    // Reference already carries its unit
    assert_eq!(chapter.title, "요한복음 3장");
    let numbers: Vec<_> = chapter
        .verse_groups()
        .map(|group| group.verse_number.as_str())
        .collect();
    assert_eq!(numbers, vec!["16", "17", "18"]);
    assert_eq!(
        chapter.verse("18").unwrap().joined_text(),
        "Whoever believes in him is not condemned & ..."
    );
}

#[test]
fn test_bare_array_fixture() {
    let chapter = normalize(&load_fixture("verse_array", "psa_117.json"), "psa", 117);

    assert_eq!(chapter.title, "시편 117편");
    assert_eq!(chapter.verse_count(), 2);
    assert!(chapter.blocks.iter().all(|b| b.kind() == BlockKind::VerseGroup));
}

#[test]
fn test_every_fixture_is_ordered() {
    let all = fixtures("verse_array");
    assert!(!all.is_empty());
    for fixture in all {
        let chapter = normalize(&fixture.read_content_or_panic(), "gen", 1);
        assert!(!chapter.is_unavailable(), "fixture {} unavailable", fixture.name);
        assert_ordered(&chapter);
    }
}

#[rstest]
#[case::empty_array("[]")]
#[case::empty_verses(r#"{"verses": []}"#)]
#[case::missing_verses(r#"{"reference": "창세기 1"}"#)]
#[case::wrong_shape(r#"{"verses": "1 In the beginning"}"#)]
#[case::not_json("<p>1 In the beginning</p>")]
fn test_malformed_array_yields_sentinel(#[case] payload: &str) {
    let chapter = normalize(payload, "gen", 1);
    assert_eq!(chapter.blocks, vec![ContentBlock::unavailable()]);
}
