//! Segmentation settings.

use serde::{Deserialize, Serialize};

use crate::bounds::{LengthBounds, LengthBoundsError};

/// How a document is cut into units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Classify, filter, merge and unwrap into paragraphs.
    #[default]
    Paragraph,
    /// One unit per page, split on page markers.
    Page,
}

/// Settings consumed by the pipeline.
///
/// Missing fields take their defaults, so a partial document works:
///
/// ```rust
/// use folio::{Mode, SegmenterConfig};
///
/// let config: SegmenterConfig = serde_json::from_str(r#"{ "mode": "page" }"#).unwrap();
/// assert_eq!(config.mode, Mode::Page);
/// assert_eq!(config.min_unit_length, 50);
/// assert_eq!(config.max_unit_length, 2000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Shortest unit kept, in chars.
    pub min_unit_length: usize,
    /// Longest unit kept, in chars. Also caps merging.
    pub max_unit_length: usize,
    /// Paragraph or page segmentation.
    pub mode: Mode,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            min_unit_length: 50,
            max_unit_length: 2000,
            mode: Mode::Paragraph,
        }
    }
}

impl SegmenterConfig {
    /// Override the minimum unit length.
    #[must_use]
    pub fn with_min_unit_length(mut self, min: usize) -> Self {
        self.min_unit_length = min;
        self
    }

    /// Override the maximum unit length.
    #[must_use]
    pub fn with_max_unit_length(mut self, max: usize) -> Self {
        self.max_unit_length = max;
        self
    }

    /// Override the mode.
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// The validated length bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_unit_length < min_unit_length`.
    pub fn bounds(&self) -> Result<LengthBounds, LengthBoundsError> {
        LengthBounds::new(self.min_unit_length).with_max(self.max_unit_length)
    }
}
