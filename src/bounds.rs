//! Unit length bounds.
//!
//! ## The Problem
//!
//! Extracted documents are full of fragments that are technically text but
//! useless for retrieval: running headers, stray captions, lone words left
//! over from a broken layout. At the other end, a merge pass left alone will
//! happily glue a whole chapter together.
//!
//! ```text
//! min = 50, max = 2000
//!
//! "Sayfa 3"                       7 chars  -> dropped (too short)
//! "Bu bölüm sistemin ... açıklar." 180 chars -> kept
//! <one 5000-char block>          5000 chars -> dropped (too long)
//! ```
//!
//! `LengthBounds` carries both limits. Lengths are counted in `char`s, not
//! bytes, so Turkish or Cyrillic text is measured the same way as ASCII.

use std::cmp::Ordering;

/// Minimum and maximum unit length, in characters.
///
/// # Examples
///
/// ```rust
/// use folio::LengthBounds;
///
/// let bounds = LengthBounds::new(50);
/// assert_eq!(bounds.min(), 50);
/// assert_eq!(bounds.max(), usize::MAX);
///
/// let bounds = LengthBounds::new(50).with_max(2000).unwrap();
/// assert_eq!(bounds.max(), 2000);
///
/// let bounds = LengthBounds::from(50..=2000);
/// assert_eq!(bounds.min(), 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    min: usize,
    max: usize,
}

impl LengthBounds {
    /// Bounds with a minimum and no maximum.
    #[must_use]
    pub const fn new(min: usize) -> Self {
        Self {
            min,
            max: usize::MAX,
        }
    }

    /// The shortest unit that is kept.
    #[must_use]
    pub const fn min(&self) -> usize {
        self.min
    }

    /// The longest unit that is kept.
    #[must_use]
    pub const fn max(&self) -> usize {
        self.max
    }

    /// Set the maximum.
    ///
    /// # Errors
    ///
    /// Returns an error if `max < min`.
    pub fn with_max(self, max: usize) -> Result<Self, LengthBoundsError> {
        if max < self.min {
            Err(LengthBoundsError::MaxLessThanMin { min: self.min, max })
        } else {
            Ok(Self { max, ..self })
        }
    }

    /// Where a length falls relative to the bounds.
    ///
    /// - `Ordering::Less`: shorter than `min`, drop
    /// - `Ordering::Equal`: within `min..=max`, keep
    /// - `Ordering::Greater`: longer than `max`, drop
    #[must_use]
    pub fn fits(&self, len: usize) -> Ordering {
        if len < self.min {
            Ordering::Less
        } else if len > self.max {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// Whether `len` characters are within the bounds.
    #[must_use]
    pub fn contains(&self, len: usize) -> bool {
        self.fits(len) == Ordering::Equal
    }

    /// Whether growing a unit of `current` chars by `additional` chars would
    /// exceed `max`.
    #[must_use]
    pub fn would_overflow(&self, current: usize, additional: usize) -> bool {
        current.saturating_add(additional) > self.max
    }
}

impl Default for LengthBounds {
    fn default() -> Self {
        Self { min: 50, max: 2000 }
    }
}

impl From<std::ops::RangeInclusive<usize>> for LengthBounds {
    fn from(range: std::ops::RangeInclusive<usize>) -> Self {
        Self {
            min: *range.start(),
            max: (*range.end()).max(*range.start()),
        }
    }
}

/// Error when configuring length bounds.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LengthBoundsError {
    /// Max length must be >= min length.
    #[error("max unit length ({max}) must be >= min unit length ({min})")]
    MaxLessThanMin {
        /// The minimum length.
        min: usize,
        /// The max that was too small.
        max: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_only() {
        let bounds = LengthBounds::new(10);
        assert_eq!(bounds.fits(5), Ordering::Less);
        assert_eq!(bounds.fits(10), Ordering::Equal);
        assert_eq!(bounds.fits(100_000), Ordering::Equal);
    }

    #[test]
    fn test_min_and_max() {
        let bounds = LengthBounds::new(10).with_max(20).unwrap();
        assert_eq!(bounds.fits(9), Ordering::Less);
        assert_eq!(bounds.fits(20), Ordering::Equal);
        assert_eq!(bounds.fits(21), Ordering::Greater);
        assert!(bounds.contains(15));
        assert!(!bounds.contains(21));
    }

    #[test]
    fn test_default_matches_pipeline_defaults() {
        let bounds = LengthBounds::default();
        assert_eq!(bounds.min(), 50);
        assert_eq!(bounds.max(), 2000);
    }

    #[test]
    fn test_would_overflow() {
        let bounds = LengthBounds::new(0).with_max(100).unwrap();
        assert!(!bounds.would_overflow(50, 50));
        assert!(bounds.would_overflow(50, 51));
        assert!(!LengthBounds::new(0).would_overflow(usize::MAX, 1));
    }

    #[test]
    fn test_max_less_than_min_error() {
        assert!(LengthBounds::new(100).with_max(50).is_err());
    }
}
