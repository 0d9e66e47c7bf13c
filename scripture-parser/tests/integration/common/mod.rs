//! Common test utilities for chapter payload fixtures
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use scripture_parser::{BlockKind, ContentBlock, NormalizedChapter};

/// One payload fixture under `tests/integration/test_data/<format>/`
#[derive(Debug, Clone)]
pub struct PayloadFixture {
    pub file_path: PathBuf,
    pub name: String,
}

impl PayloadFixture {
    pub fn new(file_path: PathBuf) -> Self {
        let name = file_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();
        Self { file_path, name }
    }

    pub fn read_content(&self) -> Result<String, std::io::Error> {
        fs::read_to_string(&self.file_path)
    }

    pub fn read_content_or_panic(&self) -> String {
        self.read_content()
            .unwrap_or_else(|_| panic!("Failed to read fixture: {:?}", self.file_path))
    }
}

fn test_data_dir(format_dir: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/integration/test_data")
        .join(format_dir)
}

/// A specific fixture, e.g. `fixture("tagged_json", "gen_1.json")`
pub fn fixture(format_dir: &str, filename: &str) -> PayloadFixture {
    PayloadFixture::new(test_data_dir(format_dir).join(filename))
}

/// Shorthand for reading a fixture's content
pub fn load_fixture(format_dir: &str, filename: &str) -> String {
    fixture(format_dir, filename).read_content_or_panic()
}

/// All fixtures of one format, sorted by file name
pub fn fixtures(format_dir: &str) -> Vec<PayloadFixture> {
    let dir = test_data_dir(format_dir);
    let mut files: Vec<PathBuf> = fs::read_dir(&dir)
        .map(|entries| entries.flatten().map(|entry| entry.path()).collect())
        .unwrap_or_default();
    files.sort();
    files.into_iter().map(PayloadFixture::new).collect()
}

pub fn kinds(blocks: &[ContentBlock]) -> Vec<BlockKind> {
    blocks.iter().map(ContentBlock::kind).collect()
}

/// Sequence indices are unique and blocks are sorted by them
pub fn assert_ordered(chapter: &NormalizedChapter) {
    let indices: Vec<usize> = chapter.blocks.iter().map(|b| b.sequence_index).collect();
    let expected: Vec<usize> = (0..chapter.blocks.len()).collect();
    assert_eq!(indices, expected, "block order of {:?}", chapter.title);
}
