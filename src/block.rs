//! Block types: what the page reader emits and what the classifier makes of it.

use serde::{Deserialize, Serialize};

/// What the page reader says a fragment is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    /// Body text.
    Text,
    /// A table, rendered to markdown.
    Table,
    /// A placeholder for an embedded image.
    ImageMarker,
    /// A page boundary.
    PageMarker,
}

/// Axis-aligned box in page coordinates: `(x0, y0)` top-left,
/// `(x1, y1)` bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge.
    pub x0: f32,
    /// Top edge.
    pub y0: f32,
    /// Right edge.
    pub x1: f32,
    /// Bottom edge.
    pub y1: f32,
}

impl BoundingBox {
    /// Create a new box.
    #[must_use]
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// The center point.
    #[must_use]
    pub fn midpoint(&self) -> (f32, f32) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    /// Whether a point lies inside the box, edges included.
    #[must_use]
    pub fn contains(&self, (x, y): (f32, f32)) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }
}

/// One fragment as emitted by a structural page reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    /// Raw text, possibly with internal line breaks.
    pub text: String,
    /// Reader-assigned kind.
    pub kind: BlockKind,
    /// Geometry, when the reader has it. Only used for table containment.
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
    /// Zero-based page index.
    #[serde(default)]
    pub page: usize,
}

impl RawBlock {
    /// A body text block without geometry.
    #[must_use]
    pub fn text(text: impl Into<String>, page: usize) -> Self {
        Self {
            text: text.into(),
            kind: BlockKind::Text,
            bbox: None,
            page,
        }
    }

    /// A markdown table block.
    #[must_use]
    pub fn table(markup: impl Into<String>, page: usize) -> Self {
        Self {
            text: markup.into(),
            kind: BlockKind::Table,
            bbox: None,
            page,
        }
    }

    /// An image placeholder block.
    #[must_use]
    pub fn image(page: usize) -> Self {
        Self {
            text: crate::patterns::IMAGE_MARKER.to_string(),
            kind: BlockKind::ImageMarker,
            bbox: None,
            page,
        }
    }

    /// A page boundary block.
    #[must_use]
    pub fn page_marker(page: usize) -> Self {
        Self {
            text: String::new(),
            kind: BlockKind::PageMarker,
            bbox: None,
            page,
        }
    }

    /// Attach geometry.
    #[must_use]
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }
}

/// A [`RawBlock`] annotated by the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedBlock {
    /// The block as read.
    pub raw: RawBlock,
    /// Page numbers and other fragments that never reach the output.
    pub noise: bool,
    /// Table markup or image marker: kept verbatim, never unwrapped.
    pub special: bool,
    /// Table markup specifically.
    pub table: bool,
}

impl ClassifiedBlock {
    /// The block text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.raw.text
    }
}
