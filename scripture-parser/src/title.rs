//! Chapter title resolution
//!
//! Titles read like "창세기 1장" or "시편 23편": a book name, the chapter
//! number and the book's counting-unit word.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Book id whose chapters are counted as psalms
pub const PSALMS_BOOK_ID: &str = "psa";

/// What a book's chapters are called
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountingUnit {
    Chapter,
    Psalm,
}

/// Book names and counting units
///
/// The default implementation carries the Korean table; hosts with their
/// own static data implement [`display_name`](Self::display_name) and keep the
/// rest.
pub trait BookCatalog {
    /// Display name of a book, `None` for unknown ids
    fn display_name(&self, book_id: &str) -> Option<&str>;

    fn counting_unit(&self, book_id: &str) -> CountingUnit {
        if book_id.trim().eq_ignore_ascii_case(PSALMS_BOOK_ID) {
            CountingUnit::Psalm
        } else {
            CountingUnit::Chapter
        }
    }

    fn unit_word(&self, unit: CountingUnit) -> &str {
        match unit {
            CountingUnit::Chapter => "장",
            CountingUnit::Psalm => "편",
        }
    }
}

/// `(id, Korean name)` for the 66 books of the Protestant canon
const BOOKS: &[(&str, &str)] = &[
    ("gen", "창세기"),
    ("exo", "출애굽기"),
    ("lev", "레위기"),
    ("num", "민수기"),
    ("deu", "신명기"),
    ("jos", "여호수아"),
    ("jdg", "사사기"),
    ("rut", "룻기"),
    ("1sa", "사무엘상"),
    ("2sa", "사무엘하"),
    ("1ki", "열왕기상"),
    ("2ki", "열왕기하"),
    ("1ch", "역대상"),
    ("2ch", "역대하"),
    ("ezr", "에스라"),
    ("neh", "느헤미야"),
    ("est", "에스더"),
    ("job", "욥기"),
    ("psa", "시편"),
    ("pro", "잠언"),
    ("ecc", "전도서"),
    ("sng", "아가"),
    ("isa", "이사야"),
    ("jer", "예레미야"),
    ("lam", "예레미야애가"),
    ("ezk", "에스겔"),
    ("dan", "다니엘"),
    ("hos", "호세아"),
    ("jol", "요엘"),
    ("amo", "아모스"),
    ("oba", "오바댜"),
    ("jon", "요나"),
    ("mic", "미가"),
    ("nam", "나훔"),
    ("hab", "하박국"),
    ("zep", "스바냐"),
    ("hag", "학개"),
    ("zec", "스가랴"),
    ("mal", "말라기"),
    ("mat", "마태복음"),
    ("mrk", "마가복음"),
    ("luk", "누가복음"),
    ("jhn", "요한복음"),
    ("act", "사도행전"),
    ("rom", "로마서"),
    ("1co", "고린도전서"),
    ("2co", "고린도후서"),
    ("gal", "갈라디아서"),
    ("eph", "에베소서"),
    ("php", "빌립보서"),
    ("col", "골로새서"),
    ("1th", "데살로니가전서"),
    ("2th", "데살로니가후서"),
    ("1ti", "디모데전서"),
    ("2ti", "디모데후서"),
    ("tit", "디도서"),
    ("phm", "빌레몬서"),
    ("heb", "히브리서"),
    ("jas", "야고보서"),
    ("1pe", "베드로전서"),
    ("2pe", "베드로후서"),
    ("1jn", "요한일서"),
    ("2jn", "요한이서"),
    ("3jn", "요한삼서"),
    ("jud", "유다서"),
    ("rev", "요한계시록"),
];

/// Built-in catalog keyed by lower-case three-letter ids (`gen` .. `rev`)
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBookCatalog;

impl DefaultBookCatalog {
    pub fn book_ids() -> impl Iterator<Item = &'static str> {
        BOOKS.iter().map(|(id, _)| *id)
    }
}

impl BookCatalog for DefaultBookCatalog {
    fn display_name(&self, book_id: &str) -> Option<&str> {
        let wanted = book_id.trim();
        BOOKS
            .iter()
            .find(|(id, _)| id.eq_ignore_ascii_case(wanted))
            .map(|(_, name)| *name)
    }
}

/// Whether `reference` already ends a chapter number with a unit word, e.g. "23편"
fn has_unit_suffix<C: BookCatalog + ?Sized>(catalog: &C, reference: &str) -> bool {
    static DIGITS_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = DIGITS_REGEX
        .get_or_init(|| Regex::new(r"\d+\s*").expect("Failed to compile digits regex"));

    let words = [
        catalog.unit_word(CountingUnit::Chapter),
        catalog.unit_word(CountingUnit::Psalm),
    ];
    re.find_iter(reference)
        .any(|m| words.iter().any(|word| reference[m.end()..].starts_with(word)))
}

/// Resolve the display title of a chapter
///
/// A reference that already names its unit is used verbatim; any other
/// reference gets the book's unit word appended. Without a reference the title
/// is composed from the book name (or the raw id for unknown books), the
/// chapter number and the unit word.
pub fn resolve_title<C: BookCatalog + ?Sized>(
    catalog: &C,
    reference: Option<&str>,
    book_id: &str,
    chapter: u32,
) -> String {
    let unit = catalog.unit_word(catalog.counting_unit(book_id));

    if let Some(reference) = reference.map(str::trim).filter(|r| !r.is_empty()) {
        if has_unit_suffix(catalog, reference) {
            return reference.to_string();
        }
        return format!("{reference}{unit}");
    }

    let name = catalog
        .display_name(book_id)
        .unwrap_or_else(|| book_id.trim());
    format!("{name} {chapter}{unit}")
}
