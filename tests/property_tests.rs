//! Property-based tests for document segmentation.
//!
//! These tests verify that the pipeline maintains key invariants:
//! - Order: surviving text appears in source order
//! - Idempotence: classifying a block twice gives the same result
//! - Length: every unit is within bounds and never purely numeric
//! - Atomicity: tables and image markers come out byte for byte

use proptest::prelude::*;
use folio::{
    classify, FinalUnit, LengthBounds, ParagraphSegmenter, Pipeline, RawBlock, Segmenter,
    SegmenterConfig,
};

// =============================================================================
// Test Generators
// =============================================================================

/// A sentence made of marker words, tagged with its position so order can be
/// recovered from the output.
fn tagged_sentence(tag: usize) -> impl Strategy<Value = String> {
    prop::collection::vec("[a-zçğıöşü]{2,10}", 4..12).prop_map(move |words| {
        format!("Blok{tag:03} {}.", words.join(" "))
    })
}

/// One block of body text, a header, a list, a page number or a table.
fn arbitrary_block() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => prop::collection::vec("[A-Za-zçğıöşüÇĞİÖŞÜ]{1,12}", 1..30)
            .prop_map(|words| words.join(" ")),
        1 => "[A-ZÇĞİÖŞÜ][a-zçğıöşü]{3,12}( [A-Za-z]{3,10}){0,3}",
        1 => "[1-9]{1,3}",
        1 => "[1-9]\\. [a-z ]{5,40}\n[a-z ]{5,40}",
        1 => Just("| a | b |\n|---|---|\n| 1 | 2 |".to_string()),
        1 => Just("İçindekiler".to_string()),
        1 => Just("1 Kapsam".to_string()),
        1 => Just("3 Terimler ........ 7".to_string()),
    ]
}

fn arbitrary_document() -> impl Strategy<Value = Vec<RawBlock>> {
    prop::collection::vec(arbitrary_block(), 0..40).prop_map(|texts| {
        texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| RawBlock::text(text, i / 5))
            .collect()
    })
}

fn tagged_document() -> impl Strategy<Value = Vec<RawBlock>> {
    (1usize..25)
        .prop_flat_map(|n| (0..n).map(tagged_sentence).collect::<Vec<_>>())
        .prop_map(|texts| {
            texts
                .into_iter()
                .map(|text| RawBlock::text(text, 0))
                .collect()
        })
}

// =============================================================================
// Invariant Helpers
// =============================================================================

/// Tags (`BlokNNN`) in the order they appear across all units.
fn tags_in_order(units: &[FinalUnit]) -> Vec<usize> {
    units
        .iter()
        .flat_map(|u| u.content.split_whitespace())
        .filter_map(|w| w.strip_prefix("Blok"))
        .filter_map(|n| n.parse().ok())
        .collect()
}

fn is_numeric(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit())
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn output_preserves_source_order(blocks in tagged_document()) {
        let segmenter = ParagraphSegmenter::new(LengthBounds::new(0));
        let units = segmenter.segment(&blocks);
        let tags = tags_in_order(&units);
        prop_assert!(tags.windows(2).all(|w| w[0] < w[1]), "out of order: {:?}", tags);
        prop_assert_eq!(tags.len(), blocks.len());
    }

    #[test]
    fn classification_is_idempotent(text in arbitrary_block(), page in 0usize..10) {
        let raw = RawBlock::text(text, page);
        prop_assert_eq!(classify(&raw), classify(&raw));
    }

    #[test]
    fn units_respect_length_bounds(blocks in arbitrary_document(), min in 0usize..120) {
        let config = SegmenterConfig::default().with_min_unit_length(min);
        let pipeline = Pipeline::new(config).unwrap();
        for unit in pipeline.segment(&blocks) {
            prop_assert!(unit.len() >= min, "unit shorter than {}: {:?}", min, unit.content);
            prop_assert!(unit.len() <= 2000);
            prop_assert!(!is_numeric(&unit.content));
        }
    }

    #[test]
    fn unit_indices_are_sequential(blocks in arbitrary_document()) {
        let pipeline = Pipeline::new(SegmenterConfig::default()).unwrap();
        let units = pipeline.segment(&blocks);
        for (i, unit) in units.iter().enumerate() {
            prop_assert_eq!(unit.index, i);
        }
    }

    #[test]
    fn tables_survive_byte_for_byte(
        before in tagged_sentence(0),
        rows in prop::collection::vec("[a-z]{1,8}", 6..20),
    ) {
        let table = format!(
            "| key | value |\n|---|---|\n{}",
            rows.chunks(2)
                .map(|pair| format!("|  {}  | {} |", pair[0], pair.get(1).map_or("", String::as_str)))
                .collect::<Vec<_>>()
                .join("\n")
        );
        let blocks = vec![RawBlock::text(before, 0), RawBlock::table(table.clone(), 0)];
        let units = ParagraphSegmenter::new(LengthBounds::new(0)).segment(&blocks);

        prop_assert!(units.iter().any(|u| u.content.contains(&table)));
    }

    #[test]
    fn segmentation_never_panics(blocks in arbitrary_document()) {
        let pipeline = Pipeline::new(SegmenterConfig::default()).unwrap();
        let _ = pipeline.segment(&blocks);
    }
}

// =============================================================================
// Consistency Tests
// =============================================================================

#[test]
fn segmentation_is_deterministic() {
    let blocks = vec![
        RawBlock::text("Genel Bakış", 0),
        RawBlock::text("Bu bölüm sistemin genel yapısını açıklar ve bileşenleri tanıtır.", 0),
        RawBlock::text("14", 0),
    ];
    let pipeline = Pipeline::new(SegmenterConfig::default()).unwrap();
    assert_eq!(pipeline.segment(&blocks), pipeline.segment(&blocks));
}
