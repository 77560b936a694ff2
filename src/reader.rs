//! Document readers.
//!
//! Structural extraction (PDF layout, DOCX paragraphs, table detection) is the
//! job of an external page reader; this module defines the seam it plugs into
//! and a plain-text reader for `.txt` files.
//!
//! Plain text has no geometry, so blocks come from blank lines and pages from
//! form feeds, the same conventions `pdftotext` output follows:
//!
//! ```text
//! "Genel Bakış\n\nBu bölüm ...\x0cİkinci sayfa"
//!   -> Text("Genel Bakış"), Text("Bu bölüm ..."), PageMarker, Text("İkinci sayfa")
//! ```

use std::path::Path;

use crate::block::RawBlock;
use crate::{Error, Result};

/// Turns a document on disk into ordered blocks.
pub trait PageReader: Send + Sync {
    /// Read every block of the document, in page order.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read. Callers treat this as
    /// fatal for that document.
    fn read(&self, path: &Path) -> Result<Vec<RawBlock>>;
}

/// Reader for UTF-8 text files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextReader;

impl PageReader for PlainTextReader {
    fn read(&self, path: &Path) -> Result<Vec<RawBlock>> {
        let text = std::fs::read_to_string(path)?;
        Ok(blocks_from_text(&text))
    }
}

/// Split in-memory text into blocks on blank lines, with a page marker at
/// every form feed.
///
/// ```rust
/// use folio::{blocks_from_text, BlockKind};
///
/// let blocks = blocks_from_text("Birinci paragraf.\n\nİkinci\nparagraf.\x0cÜçüncü.");
/// assert_eq!(blocks.len(), 4);
/// assert_eq!(blocks[1].text, "İkinci\nparagraf.");
/// assert_eq!(blocks[2].kind, BlockKind::PageMarker);
/// assert_eq!(blocks[3].page, 1);
/// ```
#[must_use]
pub fn blocks_from_text(text: &str) -> Vec<RawBlock> {
    let mut blocks = Vec::new();
    for (page, page_text) in text.split('\x0c').enumerate() {
        if page > 0 {
            blocks.push(RawBlock::page_marker(page - 1));
        }
        let mut current: Vec<&str> = Vec::new();
        for line in page_text.lines() {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    blocks.push(RawBlock::text(current.join("\n"), page));
                    current.clear();
                }
            } else {
                current.push(line);
            }
        }
        if !current.is_empty() {
            blocks.push(RawBlock::text(current.join("\n"), page));
        }
    }
    blocks
}

/// Supported document formats, by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// `.pdf`
    Pdf,
    /// `.docx`, `.doc`
    Docx,
    /// `.txt`
    Text,
}

impl Format {
    /// Guess the format from a path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" | "doc" => Ok(Self::Docx),
            "txt" => Ok(Self::Text),
            _ => Err(Error::UnsupportedFormat(ext)),
        }
    }
}

/// Readers by format. Plain text is registered by default; PDF and DOCX need
/// an external structural reader.
pub struct Readers {
    pdf: Option<Box<dyn PageReader>>,
    docx: Option<Box<dyn PageReader>>,
    text: Box<dyn PageReader>,
}

impl Default for Readers {
    fn default() -> Self {
        Self {
            pdf: None,
            docx: None,
            text: Box::new(PlainTextReader),
        }
    }
}

impl Readers {
    /// Register a PDF reader.
    #[must_use]
    pub fn with_pdf(mut self, reader: impl PageReader + 'static) -> Self {
        self.pdf = Some(Box::new(reader));
        self
    }

    /// Register a DOCX reader.
    #[must_use]
    pub fn with_docx(mut self, reader: impl PageReader + 'static) -> Self {
        self.docx = Some(Box::new(reader));
        self
    }

    fn get(&self, format: Format) -> Option<&dyn PageReader> {
        match format {
            Format::Pdf => self.pdf.as_deref(),
            Format::Docx => self.docx.as_deref(),
            Format::Text => Some(self.text.as_ref()),
        }
    }
}

impl std::fmt::Debug for Readers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Readers")
            .field("pdf", &self.pdf.is_some())
            .field("docx", &self.docx.is_some())
            .finish()
    }
}

/// Read a document with the reader registered for its extension.
///
/// # Errors
///
/// - [`Error::Io`] if the file does not exist
/// - [`Error::UnsupportedFormat`] for an unknown extension or one with no
///   registered reader
/// - whatever the reader returns
pub fn read_document(path: &Path, readers: &Readers) -> Result<Vec<RawBlock>> {
    if !path.exists() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("file not found: {}", path.display()),
        )));
    }
    let format = Format::from_path(path)?;
    let reader = readers
        .get(format)
        .ok_or_else(|| Error::UnsupportedFormat(format!("{format:?} (no reader registered)")))?;

    let blocks = reader.read(path)?;
    tracing::debug!(path = %path.display(), ?format, blocks = blocks.len(), "read document");
    Ok(blocks)
}
