//! The segmentation pipeline.
//!
//! ```text
//! RawBlock* ─ classify ─ filter_sections ─ merge_blocks ─ normalize ─ FinalUnit*
//! ```
//!
//! Each stage consumes the complete output of the one before it. A run holds
//! no state beyond its own locals, so separate documents can be segmented on
//! separate threads with one shared [`Pipeline`].

use crate::block::{BlockKind, RawBlock};
use crate::bounds::LengthBounds;
use crate::classify::classify_all;
use crate::config::{Mode, SegmenterConfig};
use crate::filter::filter_sections;
use crate::merge::merge_blocks;
use crate::patterns;
use crate::unit::FinalUnit;
use crate::unwrap::normalize;
use crate::{Error, Result, Segmenter};

/// The four-stage paragraph segmenter.
///
/// ## Example
///
/// ```rust
/// use folio::{LengthBounds, ParagraphSegmenter, RawBlock, Segmenter};
///
/// let segmenter = ParagraphSegmenter::new(LengthBounds::new(20));
/// let units = segmenter.segment(&[
///     RawBlock::text("İçindekiler", 0),
///     RawBlock::text("1 Kapsam ........ 3", 0),
///     RawBlock::text("1 Kapsam", 1),
///     RawBlock::text("Bu standart sabit erişim araçlarını kapsar.", 1),
/// ]);
///
/// assert_eq!(units.len(), 1);
/// assert_eq!(units[0].content, "1 Kapsam\n\nBu standart sabit erişim araçlarını kapsar.");
/// ```
#[derive(Debug, Clone)]
pub struct ParagraphSegmenter {
    bounds: LengthBounds,
}

impl ParagraphSegmenter {
    /// Create a paragraph segmenter.
    #[must_use]
    pub fn new(bounds: LengthBounds) -> Self {
        Self { bounds }
    }
}

impl Segmenter for ParagraphSegmenter {
    fn segment(&self, blocks: &[RawBlock]) -> Vec<FinalUnit> {
        if blocks.is_empty() {
            return vec![];
        }
        let classified = classify_all(blocks);
        let kept = filter_sections(classified);
        let units = merge_blocks(kept, &self.bounds);
        normalize(&units, &self.bounds)
    }
}

/// One unit per page.
///
/// Skips every heuristic: blocks between page markers are joined with a blank
/// line. Empty, numeric and too-short pages are dropped; the maximum does not
/// apply to whole pages.
#[derive(Debug, Clone)]
pub struct PageSegmenter {
    min_len: usize,
}

impl PageSegmenter {
    /// Create a page segmenter.
    #[must_use]
    pub fn new(bounds: LengthBounds) -> Self {
        Self {
            min_len: bounds.min(),
        }
    }
}

impl Segmenter for PageSegmenter {
    fn segment(&self, blocks: &[RawBlock]) -> Vec<FinalUnit> {
        blocks
            .split(|b| b.kind == BlockKind::PageMarker)
            .map(|page| {
                page.iter()
                    .map(|b| b.text.trim())
                    .filter(|t| !t.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n\n")
            })
            .filter(|page| !patterns::is_numeric(page) && page.chars().count() >= self.min_len)
            .enumerate()
            .map(|(index, content)| FinalUnit::new(content, index))
            .collect()
    }
}

/// A configured segmenter.
///
/// ```rust
/// use folio::{Pipeline, RawBlock, SegmenterConfig};
///
/// let pipeline = Pipeline::new(SegmenterConfig::default()).unwrap();
/// assert!(pipeline.segment(&[]).is_empty());
///
/// let blocks = vec![RawBlock::text("3", 0)];
/// let err = pipeline.segment_document("empty.pdf", &blocks).unwrap_err();
/// assert!(err.is_recoverable());
/// ```
pub struct Pipeline {
    config: SegmenterConfig,
    segmenter: Box<dyn Segmenter>,
}

impl Pipeline {
    /// Build a pipeline from settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the length bounds are invalid.
    pub fn new(config: SegmenterConfig) -> Result<Self> {
        let bounds = config.bounds()?;
        let segmenter: Box<dyn Segmenter> = match config.mode {
            Mode::Paragraph => Box::new(ParagraphSegmenter::new(bounds)),
            Mode::Page => Box::new(PageSegmenter::new(bounds)),
        };
        Ok(Self { config, segmenter })
    }

    /// The settings this pipeline was built from.
    #[must_use]
    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Segment one document's blocks. Never fails.
    #[must_use]
    pub fn segment(&self, blocks: &[RawBlock]) -> Vec<FinalUnit> {
        self.segmenter.segment(blocks)
    }

    /// Segment one document, reporting a non-empty document that produced
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoContent`] if `blocks` is non-empty and no unit
    /// survives. An empty block list is `Ok(vec![])`.
    pub fn segment_document(&self, document: &str, blocks: &[RawBlock]) -> Result<Vec<FinalUnit>> {
        let units = self.segment(blocks);
        if units.is_empty() && !blocks.is_empty() {
            tracing::warn!(document, blocks = blocks.len(), "no content extracted");
            return Err(Error::NoContent {
                document: document.to_string(),
            });
        }
        tracing::debug!(document, units = units.len(), "segmented document");
        Ok(units)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .finish()
    }
}
