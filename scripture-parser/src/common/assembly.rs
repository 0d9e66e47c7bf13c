//! Sequencing of blocks assembled from several extraction passes

use std::collections::HashMap;

use crate::models::{BlockBody, ContentBlock, VerseGroup, VerseLine};

/// A verse group together with the index of its first occurrence
#[derive(Debug)]
struct VerseSlot {
    sequence_index: usize,
    group: VerseGroup,
}

/// Collects blocks in reading order and assigns their `sequence_index`
///
/// Every new block or verse group claims the next index. Lines for a verse
/// number already seen are appended to that verse's group, which keeps the
/// index of its first occurrence. [`finish`](Self::finish) merges both lists
/// and sorts them once by index.
#[derive(Debug, Default)]
pub struct BlockAssembler {
    next_index: usize,
    blocks: Vec<ContentBlock>,
    verses: Vec<VerseSlot>,
    verse_lookup: HashMap<String, usize>,
}

impl BlockAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    fn claim_index(&mut self) -> usize {
        let index = self.next_index;
        self.next_index += 1;
        index
    }

    /// Add a standalone block, returning its sequence index
    pub fn push(&mut self, body: BlockBody) -> usize {
        let index = self.claim_index();
        self.blocks.push(ContentBlock::new(index, body));
        index
    }

    /// Append a line to the group for `verse_number`, creating it if needed
    ///
    /// Returns the group's sequence index (that of its first occurrence).
    pub fn append_verse_line(&mut self, verse_number: &str, line: VerseLine) -> usize {
        if let Some(&slot) = self.verse_lookup.get(verse_number) {
            let slot = &mut self.verses[slot];
            slot.group.lines.push(line);
            return slot.sequence_index;
        }

        let index = self.claim_index();
        self.verse_lookup
            .insert(verse_number.to_string(), self.verses.len());
        self.verses.push(VerseSlot {
            sequence_index: index,
            group: VerseGroup::new(verse_number, line),
        });
        index
    }

    pub fn contains_verse(&self, verse_number: &str) -> bool {
        self.verse_lookup.contains_key(verse_number)
    }

    pub fn verse_count(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.verses.is_empty()
    }

    /// All blocks ordered by sequence index, or the sentinel when nothing was collected
    pub fn finish(self) -> Vec<ContentBlock> {
        if self.is_empty() {
            return vec![ContentBlock::unavailable()];
        }

        let mut blocks = self.blocks;
        blocks.extend(self.verses.into_iter().map(|slot| {
            ContentBlock::new(slot.sequence_index, BlockBody::VerseGroup(slot.group))
        }));
        blocks.sort_by_key(|block| block.sequence_index);
        blocks
    }
}
