//! # folio
//!
//! Document segmentation for retrieval-augmented generation (RAG) pipelines.
//!
//! ## The Problem
//!
//! A structural page reader turns a PDF into positioned fragments: text
//! blocks, tables, image placeholders, page boundaries. Those fragments are
//! not paragraphs. Headers sit alone, lists wrap across blocks, page numbers
//! and table-of-contents lines are mixed in with the body, and the first
//! pages of a standard are a foreword nobody wants to retrieve.
//!
//! Embedding those fragments as-is gives poor retrieval:
//!
//! - A header embedded alone matches every question and answers none
//! - A list split mid-item loses its subject
//! - A table-of-contents line matches the query better than the clause it points to
//!
//! folio reorganizes fragments into clean, ordered, retrieval-ready units.
//!
//! ## The Stages
//!
//! ```text
//! RawBlock*
//!   │  classify         page numbers / short fragments -> noise
//!   │                   tables, image markers          -> special
//!   │  filter_sections  skip boilerplate sections, drop leader-dot lines
//!   │  merge_blocks     glue headers, lists, citations, tables
//!   │  normalize        unwrap lines, apply length bounds
//!   ▼
//! FinalUnit*
//! ```
//!
//! ### Section Filter
//!
//! A single `skipping` flag is threaded through the document. Boilerplate
//! headers (`İçindekiler`, `Foreword`, `Bibliography`, `Annex A`) set it;
//! numbered clause headers (`1 Scope`, `4.2 Gereklilikler`) clear it. A block
//! with both clears it.
//!
//! ### Merge Engine
//!
//! One forward pass, one block of lookahead, no revisiting. See
//! [`merge_blocks`] for the rules.
//!
//! ### Unwrap & Normalize
//!
//! Line breaks from the page layout become spaces; list items get one line
//! each. Tables and image markers are never touched.
//!
//! ## Quick Start
//!
//! ```rust
//! use folio::{Pipeline, RawBlock, SegmenterConfig};
//!
//! let pipeline = Pipeline::new(SegmenterConfig::default()).unwrap();
//! let blocks = vec![
//!     RawBlock::text("Önsöz", 0),
//!     RawBlock::text("Bu standart teknik komite tarafından hazırlanmıştır.", 0),
//!     RawBlock::text("2", 0),
//!     RawBlock::text("1 Kapsam", 1),
//!     RawBlock::text("Bu standart, makinelere sabit erişim araçlarının\ngenel gereklerini kapsar.", 1),
//! ];
//!
//! let units = pipeline.segment(&blocks);
//! assert_eq!(units.len(), 1);
//! assert!(units[0].content.starts_with("1 Kapsam"));
//! ```
//!
//! ## Page Mode
//!
//! `Mode::Page` skips every heuristic and emits one unit per page.
//!
//! ## Ingesting (embedding + index)
//!
//! ```rust
//! use folio::{ingest, Embedder, FinalUnit, MemoryIndex, Result, Visibility};
//!
//! struct Constant;
//! impl Embedder for Constant {
//!     fn embed(&self, _text: &str) -> Result<Vec<f32>> {
//!         Ok(vec![1.0, 0.0])
//!     }
//! }
//!
//! let units = vec![FinalUnit::new("Bu bölüm sistemin genel yapısını açıklar.", 0)];
//! let mut index = MemoryIndex::new();
//! let report = ingest(&units, "iso.pdf", "alice", Visibility::Private, &Constant, &mut index)?;
//! assert_eq!(report.indexed, 1);
//! # Ok::<(), folio::Error>(())
//! ```
//!
//! ## Question/Answer Datasets
//!
//! [`generate_dataset`] asks a [`Completer`] for question/answer pairs per
//! unit and appends them to a JSONL file, with a [`Checkpoint`] so an
//! interrupted run resumes where it stopped.

mod block;
mod bounds;
mod classify;
mod config;
mod dataset;
mod error;
mod filter;
mod ingest;
mod merge;
mod patterns;
mod pipeline;
mod reader;
mod unit;
mod unwrap;

pub use block::{BlockKind, BoundingBox, ClassifiedBlock, RawBlock};
pub use bounds::{LengthBounds, LengthBoundsError};
pub use classify::{classify, classify_all, drop_table_covered};
pub use config::{Mode, SegmenterConfig};
pub use dataset::{
    generate_dataset, parse_response, Checkpoint, Completer, CompletionOptions, Confidence,
    DatasetReport, DatasetWriter, QaPair, QuestionGenerator,
};
pub use error::{Error, Result};
pub use filter::{filter_sections, step as filter_step};
pub use ingest::{
    ingest, Embedder, Filter, IndexRecord, IngestReport, MemoryIndex, SearchHit, UnitMetadata,
    VectorIndex, Visibility,
};
pub use merge::{merge_blocks, merge_rule, MergeRule, SegmentUnit};
pub use patterns::{LineTag, IMAGE_MARKER};
pub use pipeline::{PageSegmenter, ParagraphSegmenter, Pipeline};
pub use reader::{blocks_from_text, read_document, Format, PageReader, PlainTextReader, Readers};
pub use unit::FinalUnit;
pub use unwrap::{normalize, unwrap_text, unwrap_unit};

#[cfg(feature = "semantic")]
pub use ingest::FastEmbedder;

/// A document segmentation strategy.
///
/// Both strategies implement this trait, so they can be chosen at runtime:
///
/// ```rust
/// use folio::{LengthBounds, PageSegmenter, ParagraphSegmenter, RawBlock, Segmenter};
///
/// fn count_units(segmenter: &dyn Segmenter, blocks: &[RawBlock]) -> usize {
///     segmenter.segment(blocks).len()
/// }
///
/// let bounds = LengthBounds::new(10);
/// let blocks = vec![RawBlock::text("Bir paragraf metni burada.", 0)];
/// assert_eq!(count_units(&ParagraphSegmenter::new(bounds), &blocks), 1);
/// assert_eq!(count_units(&PageSegmenter::new(bounds), &blocks), 1);
/// ```
pub trait Segmenter: Send + Sync {
    /// Turn one document's blocks into ordered units.
    ///
    /// Total over any input: malformed blocks are dropped, never an error.
    fn segment(&self, blocks: &[RawBlock]) -> Vec<FinalUnit>;
}
