//! The FinalUnit type: one retrieval-ready paragraph.

/// A retrieval-ready text unit.
///
/// `index` is the zero-based position of the unit in the document's output
/// sequence. Units are always emitted in source order, so `index` also orders
/// them by where their text appeared in the document.
///
/// ```rust
/// use folio::FinalUnit;
///
/// let unit = FinalUnit::new("Bu bölüm sistemin genel yapısını açıklar.", 0);
/// assert_eq!(unit.index, 0);
/// assert_eq!(unit.len(), 41);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalUnit {
    /// The normalized unit text.
    pub content: String,
    /// Zero-based index of this unit in the document.
    pub index: usize,
}

impl FinalUnit {
    /// Create a new unit.
    #[must_use]
    pub fn new(content: impl Into<String>, index: usize) -> Self {
        Self {
            content: content.into(),
            index,
        }
    }

    /// Length of the content in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    /// Whether the content is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl std::fmt::Display for FinalUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unit {{ index: {}, len: {} }}", self.index, self.len())
    }
}
