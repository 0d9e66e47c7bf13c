//! Legacy HTML (format B) parsing against page fixtures

#[path = "../common/mod.rs"]
mod common;

use common::{assert_ordered, kinds, load_fixture};
use rstest::rstest;
use scripture_parser::{
    BlockKind, ContentBlock, DisplayPreferences, NormalizedChapter, SourceFormat, VerseLine,
    normalize_chapter,
};
use tracing_test::traced_test;

fn normalize(payload: &str, book_id: &str, chapter: u32) -> NormalizedChapter {
    normalize_chapter(
        SourceFormat::LegacyHtml,
        payload,
        book_id,
        chapter,
        &DisplayPreferences::default(),
    )
    .unwrap_or_else(|e| panic!("Failed to normalize legacy payload: {e}"))
}

#[test]
#[traced_test]
fn test_full_page() {
    let chapter = normalize(&load_fixture("legacy_html", "gen_12.html"), "gen", 12);

    assert_eq!(chapter.title, "창세기 12장");
    assert_eq!(
        kinds(&chapter.blocks),
        vec![
            BlockKind::SectionHeading,
            BlockKind::VerseGroup,
            BlockKind::VerseGroup,
            BlockKind::SectionHeading,
            BlockKind::VerseGroup,
        ]
    );
    assert_ordered(&chapter);
    assert!(logs_contain("Skipping repeated verse-number marker"));
}

#[test]
fn test_headings() {
    let chapter = normalize(&load_fixture("legacy_html", "gen_12.html"), "gen", 12);

    // Empty parentheses vanish, the rest become reference spans
    assert_eq!(chapter.blocks[0].body.text(), Some("아브람을 부르심"));
    assert_eq!(
        chapter.blocks[3].body.text(),
        Some(r#"애굽으로 내려간 아브람 <span class="reference">(창 20:1-18)</span>"#)
    );
}

#[test]
fn test_verse_text_keeps_name_and_area_spans() {
    let chapter = normalize(&load_fixture("legacy_html", "gen_12.html"), "gen", 12);

    let verse_1 = chapter.verse("1").unwrap();
    assert_eq!(verse_1.lines.len(), 1);
    assert!(verse_1.lines[0].text.starts_with(
        r#"<span class="name">여호와</span>께서 <span class="name">아브람</span>에게 이르시되"#
    ));

    let verse_10 = chapter.verse("10").unwrap();
    assert_eq!(
        verse_10.lines,
        vec![VerseLine::new(
            r#"그 땅에 기근이 들었으므로 <span class="name">아브람</span>이 <span class="area">애굽</span>에 거류하려고 그리로 내려갔으니 이는 그 땅에 기근이 심하였음이라"#,
            None
        )]
    );
    assert!(!verse_10.joined_text().contains("duplicate"));
}

#[test]
fn test_chapter_number_removed() {
    let chapter = normalize(&load_fixture("legacy_html", "gen_12.html"), "gen", 12);
    for block in &chapter.blocks {
        let text = block
            .body
            .text()
            .map(str::to_string)
            .or_else(|| block.as_verse_group().map(|g| g.joined_text()))
            .unwrap_or_default();
        assert!(!text.contains("제 12 장"), "chapter number leaked into {text:?}");
    }
}

#[test]
#[traced_test]
fn test_fallback_scan_on_malformed_tree() {
    let chapter = normalize(&load_fixture("legacy_html", "malformed.html"), "gen", 11);

    assert!(logs_contain("Primary walk found no verses"));
    assert_eq!(
        kinds(&chapter.blocks),
        vec![
            BlockKind::SectionHeading,
            BlockKind::VerseGroup,
            BlockKind::VerseGroup
        ]
    );
    assert_eq!(chapter.blocks[0].body.text(), Some("바벨탑"));
    assert_eq!(
        chapter.verse("1").unwrap().joined_text(),
        "온 땅의 언어가 하나요 말이 하나였더라"
    );
    assert_eq!(
        chapter.verse("2").unwrap().joined_text(),
        r#"이에 그들이 동쪽으로 옮기다가 <span class="area">시날</span> 평지를 만나 거기 거류하며"#
    );
}

#[test]
fn test_single_verse_page() {
    let payload = r#"<div id="tdBible1"><span><span class="number">1</span>할렐루야</span></div>"#;
    let chapter = normalize(payload, "psa", 150);

    assert_eq!(chapter.title, "시편 150편");
    assert_eq!(chapter.blocks.len(), 1);
    assert_eq!(chapter.blocks[0].sequence_index, 0);
    assert_eq!(chapter.blocks[0].as_verse_group().unwrap().lines.len(), 1);
}

#[rstest]
#[case::empty("")]
#[case::no_container(r#"<div id="other"><span><span class="number">1</span>text</span></div>"#)]
#[case::empty_container(r#"<td id="tdBible1"></td>"#)]
#[case::json_instead_of_html(r#"{"content": "<p>wrong format</p>"}"#)]
fn test_malformed_page_yields_sentinel(#[case] payload: &str) {
    let chapter = normalize(payload, "gen", 1);
    assert_eq!(chapter.blocks, vec![ContentBlock::unavailable()]);
    assert_eq!(chapter.title, "창세기 1장");
}
