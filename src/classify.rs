//! Block classification.
//!
//! Labels each fragment from the page reader before any sequence-level
//! decision is made.
//!
//! ```text
//! "[IMAGE]"              -> special (image)
//! "| a | b |\n|---|---|" -> special (table)
//! "  17 "                -> noise   (page number)
//! "Scope"                -> noise   (short, one word, no colon)
//! "Kapsam:"              -> text    (ends with a colon, may head a block)
//! anything else          -> text
//! ```
//!
//! Classification is a pure function of one block, so classifying the same
//! block twice gives the same answer.
//!
//! ## Table Containment
//!
//! Readers that detect tables usually also emit the table's cells as loose
//! text blocks. [`drop_table_covered`] removes any non-table block whose
//! midpoint falls inside a table's box on the same page, so table content is
//! represented once, as markup.

use unicode_segmentation::UnicodeSegmentation;

use crate::block::{BlockKind, ClassifiedBlock, RawBlock};
use crate::patterns::{self, BlockShape};

/// Blocks shorter than this (in chars) are candidates for short-fragment noise.
const SHORT_BLOCK: usize = 20;

/// Short-fragment noise needs fewer words than this.
const MIN_WORDS: usize = 2;

/// Classify one block.
///
/// ```rust
/// use folio::{classify, RawBlock};
///
/// assert!(classify(&RawBlock::text("42", 3)).noise);
/// assert!(classify(&RawBlock::image(3)).special);
/// assert!(!classify(&RawBlock::text("Kapsam:", 0)).noise);
/// ```
#[must_use]
pub fn classify(raw: &RawBlock) -> ClassifiedBlock {
    let shape = patterns::block_shape(&raw.text);
    let table = raw.kind == BlockKind::Table || shape == Some(BlockShape::Table);
    let special =
        table || raw.kind == BlockKind::ImageMarker || shape == Some(BlockShape::Image);

    let noise = !special
        && (raw.kind == BlockKind::PageMarker
            || raw.text.trim().is_empty()
            || shape == Some(BlockShape::PageNumber)
            || is_short_fragment(&raw.text));

    ClassifiedBlock {
        raw: raw.clone(),
        noise,
        special,
        table,
    }
}

/// Classify a whole document, dropping table-covered text first.
#[must_use]
pub fn classify_all(blocks: &[RawBlock]) -> Vec<ClassifiedBlock> {
    let covered = drop_table_covered(blocks);
    let classified: Vec<ClassifiedBlock> = covered.into_iter().map(classify).collect();

    tracing::debug!(
        blocks = blocks.len(),
        kept = classified.len(),
        noise = classified.iter().filter(|b| b.noise).count(),
        special = classified.iter().filter(|b| b.special).count(),
        "classified blocks"
    );
    classified
}

/// Remove non-table blocks whose midpoint lies inside a table on the same page.
///
/// Blocks without geometry are always kept.
#[must_use]
pub fn drop_table_covered(blocks: &[RawBlock]) -> Vec<&RawBlock> {
    let tables: Vec<_> = blocks
        .iter()
        .filter(|b| b.kind == BlockKind::Table)
        .filter_map(|b| b.bbox.map(|bbox| (b.page, bbox)))
        .collect();

    blocks
        .iter()
        .filter(|block| {
            if block.kind == BlockKind::Table {
                return true;
            }
            let Some(bbox) = block.bbox else {
                return true;
            };
            let mid = bbox.midpoint();
            !tables
                .iter()
                .any(|(page, table)| *page == block.page && table.contains(mid))
        })
        .collect()
}

/// Short, under two words, not a lead-in ending with a colon, and not a
/// table annotation that the merge pass attaches to the table after it.
fn is_short_fragment(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.chars().count() < SHORT_BLOCK
        && trimmed.unicode_words().count() < MIN_WORDS
        && !trimmed.ends_with(':')
        && !patterns::is_table_annotation(trimmed)
}
