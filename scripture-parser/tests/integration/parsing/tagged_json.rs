//! Tagged JSON (format A) parsing against payload fixtures

#[path = "../common/mod.rs"]
mod common;

use common::{assert_ordered, kinds, load_fixture};
use rstest::rstest;
use scripture_parser::{
    BlockBody, BlockKind, ContentBlock, DisplayPreferences, NormalizedChapter, SourceFormat,
    VerseLine, normalize_chapter,
};
use tracing_test::traced_test;

fn normalize(filename: &str, book_id: &str, prefs: DisplayPreferences) -> NormalizedChapter {
    let payload = load_fixture("tagged_json", filename);
    normalize_chapter(SourceFormat::TaggedJson, &payload, book_id, 1, &prefs)
        .unwrap_or_else(|e| panic!("Failed to normalize {filename}: {e}"))
}

#[test]
#[traced_test]
fn test_genesis_reading_order() {
    let chapter = normalize("gen_1.json", "gen", DisplayPreferences::default());

    assert_eq!(chapter.title, "창세기 1장");
    assert_eq!(
        kinds(&chapter.blocks),
        vec![
            BlockKind::SectionHeading,
            BlockKind::CrossReference,
            BlockKind::VerseGroup,
            BlockKind::VerseGroup,
            BlockKind::VerseGroup,
            BlockKind::VerseGroup,
            BlockKind::VerseGroup,
        ]
    );
    assert_ordered(&chapter);

    let numbers: Vec<_> = chapter
        .verse_groups()
        .map(|group| group.verse_number.as_str())
        .collect();
    assert_eq!(numbers, vec!["1", "2", "3", "4", "5"]);
    assert_eq!(
        chapter.blocks[1].body.text(),
        Some("(Jn 1:1-5; Heb 11:3)")
    );

    // The paragraph without any recoverable verse is dropped, not an error
    assert!(logs_contain("Dropping paragraph without recoverable verse"));
}

#[test]
fn test_segmentation_tiers() {
    let chapter = normalize("gen_1.json", "gen", DisplayPreferences::default());

    // Verse spans
    assert_eq!(
        chapter.verse("1").unwrap().lines,
        vec![VerseLine::new(
            "In the beginning God created the heavens and the earth.",
            Some("p")
        )]
    );
    // Explicit verse id
    assert_eq!(
        chapter.verse("4").unwrap().joined_text(),
        "And God saw that the light was good. And God separated the light from the darkness."
    );
    // Leading number
    assert_eq!(
        chapter.verse("5").unwrap().joined_text(),
        "God called the light Day, and the darkness he called Night."
    );
}

#[test]
fn test_notes_removed_when_footnotes_hidden() {
    let chapter = normalize("gen_1.json", "gen", DisplayPreferences::default());

    let verse_2 = chapter.verse("2").unwrap().joined_text();
    assert!(verse_2.contains("And the Spirit of God was hovering"));
    assert!(!verse_2.contains("fn-marker"));
    assert!(!verse_2.contains("wind"));

    let verse_3 = chapter.verse("3").unwrap().joined_text();
    assert!(verse_3.ends_with("and there was light."));
    assert!(!verse_3.contains("2 Cor"));
    // Entities outside the decoded set pass through untouched
    assert!(verse_3.contains("&ldquo;Let there be light,&rdquo;"));
}

#[test]
fn test_footnote_marker_when_shown() {
    let prefs = DisplayPreferences::default().with_footnotes(true);
    let chapter = normalize("gen_1.json", "gen", prefs);

    let verse_2 = chapter.verse("2").unwrap().joined_text();
    assert_eq!(verse_2.matches("class=\"fn-marker\"").count(), 1);
    assert!(verse_2.contains(
        r#"Spirit<span class="fn-marker" data-note="Or &quot;wind&quot;" title="Or &quot;wind&quot;">*</span> of God"#
    ));
    assert!(!verse_2.contains("class=\"fc\""));
    assert!(!verse_2.contains("1:2"));
}

#[rstest]
#[case::all_shown(true, true, 7)]
#[case::no_cross_reference(true, false, 6)]
#[case::no_description(false, true, 7)]
fn test_cross_reference_preference(
    #[case] show_description: bool,
    #[case] show_cross_reference: bool,
    #[case] expected_blocks: usize,
) {
    let prefs = DisplayPreferences::default()
        .with_description(show_description)
        .with_cross_reference(show_cross_reference);
    let chapter = normalize("gen_1.json", "gen", prefs);

    assert_eq!(chapter.blocks.len(), expected_blocks);
    assert_ordered(&chapter);
}

#[test]
#[traced_test]
fn test_psalm_lines_and_dedupe() {
    let chapter = normalize("psa_1.json", "psa", DisplayPreferences::default());

    assert_eq!(chapter.title, "시편 1편");
    assert_eq!(
        kinds(&chapter.blocks),
        vec![
            BlockKind::Subtitle,
            BlockKind::SectionHeading,
            BlockKind::VerseGroup,
            BlockKind::VerseGroup,
            BlockKind::Description,
            BlockKind::PoeticParagraph,
        ]
    );
    assert_ordered(&chapter);
    assert!(logs_contain("Skipping duplicate subtitle"));

    // Lines of verse 1 come from three non-adjacent paragraphs
    let verse_1 = chapter.verse("1").unwrap();
    assert_eq!(
        verse_1.lines,
        vec![
            VerseLine::new("Blessed is the man", Some("q1")),
            VerseLine::new("who walks not in the counsel of the wicked,", Some("q2")),
            VerseLine::new("nor sits in the seat of scoffers;", Some("q2")),
        ]
    );
    assert_eq!(verse_1.continuation_lines().len(), 2);

    assert_eq!(chapter.blocks[4].body.text(), Some("A Psalm of David."));
    assert_eq!(
        chapter.blocks[5].body,
        BlockBody::PoeticParagraph {
            text: "Selah".to_string(),
            style_class: "qr".to_string(),
        }
    );
}

#[test]
fn test_description_hidden() {
    let prefs = DisplayPreferences::default().with_description(false);
    let chapter = normalize("psa_1.json", "psa", prefs);

    assert!(!kinds(&chapter.blocks).contains(&BlockKind::Description));
    assert_eq!(chapter.blocks.last().unwrap().kind(), BlockKind::PoeticParagraph);
    assert_ordered(&chapter);
}

#[test]
fn test_single_verse_chapter() {
    let payload = r#"{"content": "<p class=\"p\" data-vid=\"oba:1:1\">The vision of Obadiah.</p>"}"#;
    let chapter = normalize_chapter(
        SourceFormat::TaggedJson,
        payload,
        "oba",
        1,
        &DisplayPreferences::default(),
    )
    .unwrap();

    assert_eq!(chapter.title, "오바댜 1장");
    assert_eq!(chapter.blocks.len(), 1);
    assert_eq!(chapter.blocks[0].sequence_index, 0);
    assert_eq!(chapter.blocks[0].as_verse_group().unwrap().lines.len(), 1);
}

#[traced_test]
#[rstest]
#[case::empty("")]
#[case::not_json("<p>plain html</p>")]
#[case::missing_content(r#"{"reference": "창세기 1"}"#)]
#[case::content_not_string(r#"{"content": 42}"#)]
#[case::no_regions(r#"{"content": "<div>nothing tagged</div>"}"#)]
fn test_malformed_payload_yields_sentinel(#[case] payload: &str) {
    let chapter = normalize_chapter(
        SourceFormat::TaggedJson,
        payload,
        "gen",
        1,
        &DisplayPreferences::default(),
    )
    .unwrap();

    assert!(chapter.is_unavailable());
    assert_eq!(chapter.blocks, vec![ContentBlock::unavailable()]);
    assert!(logs_contain("Chapter normalized to unavailable content"));
}
