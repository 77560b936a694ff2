//! Handing units to the embedding and index collaborators.
//!
//! ```text
//! FinalUnit* ─ embed ─ upsert(id = "{source}_{index}", vector, text, metadata)
//! ```
//!
//! Both collaborators are traits. Re-ingesting a document first deletes
//! everything previously indexed for that source, so an updated file never
//! leaves stale units behind. A unit whose embedding fails is logged and
//! skipped; the rest of the document still goes in.

use serde::{Deserialize, Serialize};

use crate::unit::FinalUnit;
use crate::{Error, Result};

/// Text to vector.
pub trait Embedder: Send + Sync {
    /// Embed one text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Embedding`] if the provider fails.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Who may retrieve a unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Only the owner.
    #[default]
    Private,
    /// Everyone.
    Public,
}

/// Metadata stored with every indexed unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitMetadata {
    /// Originating document file name.
    pub source: String,
    /// Position of the unit in the document.
    pub index: usize,
    /// Owning user.
    pub owner: String,
    /// Who may retrieve it.
    pub visibility: Visibility,
}

/// One entry in the similarity index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// `"{source}_{index}"`.
    pub id: String,
    /// The embedding.
    pub vector: Vec<f32>,
    /// The unit text.
    pub text: String,
    /// Where it came from and who can see it.
    pub metadata: UnitMetadata,
}

/// Metadata filter for search and deletion. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    /// Match this source only.
    pub source: Option<String>,
    /// Match this owner only.
    pub owner: Option<String>,
}

impl Filter {
    /// Everything from one source.
    #[must_use]
    pub fn source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            owner: None,
        }
    }

    /// Restrict to an owner.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Whether `metadata` passes.
    #[must_use]
    pub fn matches(&self, metadata: &UnitMetadata) -> bool {
        self.source.as_ref().map_or(true, |s| *s == metadata.source)
            && self.owner.as_ref().map_or(true, |o| *o == metadata.owner)
    }
}

/// A ranked search result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Record id.
    pub id: String,
    /// Similarity to the query, higher is closer.
    pub score: f32,
    /// The unit text.
    pub text: String,
    /// The unit metadata.
    pub metadata: UnitMetadata,
}

/// Similarity index.
pub trait VectorIndex {
    /// Insert or replace a record by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Index`] if the store rejects the write.
    fn upsert(&mut self, record: IndexRecord) -> Result<()>;

    /// The `k` records closest to `vector` that pass `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Index`] if the store fails.
    fn search(&self, vector: &[f32], filter: &Filter, k: usize) -> Result<Vec<SearchHit>>;

    /// Delete every record that passes `filter`, returning how many went.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Index`] if the store fails.
    fn delete_by_filter(&mut self, filter: &Filter) -> Result<usize>;
}

/// What an ingest run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Records written.
    pub indexed: usize,
    /// Units whose embedding failed.
    pub skipped: usize,
    /// Records removed from an earlier ingest of the same source.
    pub replaced: usize,
}

/// Embed and index one document's units.
///
/// # Errors
///
/// Index failures abort the run. Embedding failures only skip the unit.
pub fn ingest<E, I>(
    units: &[FinalUnit],
    source: &str,
    owner: &str,
    visibility: Visibility,
    embedder: &E,
    index: &mut I,
) -> Result<IngestReport>
where
    E: Embedder + ?Sized,
    I: VectorIndex + ?Sized,
{
    let mut report = IngestReport {
        replaced: index.delete_by_filter(&Filter::source(source))?,
        ..IngestReport::default()
    };

    for unit in units {
        let vector = match embedder.embed(&unit.content) {
            Ok(vector) => vector,
            Err(err) => {
                tracing::warn!(source, index = unit.index, %err, "embedding failed, skipping unit");
                report.skipped += 1;
                continue;
            }
        };
        index.upsert(IndexRecord {
            id: format!("{source}_{}", unit.index),
            vector,
            text: unit.content.clone(),
            metadata: UnitMetadata {
                source: source.to_string(),
                index: unit.index,
                owner: owner.to_string(),
                visibility,
            },
        })?;
        report.indexed += 1;
    }

    tracing::info!(
        source,
        indexed = report.indexed,
        skipped = report.skipped,
        replaced = report.replaced,
        "ingested document"
    );
    Ok(report)
}

/// An in-process [`VectorIndex`] ranked by cosine similarity.
///
/// Records keep insertion order; upserting an existing id replaces it in
/// place.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    records: Vec<IndexRecord>,
}

impl MemoryIndex {
    /// An empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look a record up by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&IndexRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}

impl VectorIndex for MemoryIndex {
    fn upsert(&mut self, record: IndexRecord) -> Result<()> {
        if let Some(first) = self.records.first() {
            if first.vector.len() != record.vector.len() {
                return Err(Error::Index(format!(
                    "dimension mismatch: index has {}, record {} has {}",
                    first.vector.len(),
                    record.id,
                    record.vector.len()
                )));
            }
        }
        match self.records.iter().position(|r| r.id == record.id) {
            Some(i) => self.records[i] = record,
            None => self.records.push(record),
        }
        Ok(())
    }

    fn search(&self, vector: &[f32], filter: &Filter, k: usize) -> Result<Vec<SearchHit>> {
        let mut hits: Vec<SearchHit> = self
            .records
            .iter()
            .filter(|r| filter.matches(&r.metadata))
            .map(|r| SearchHit {
                id: r.id.clone(),
                score: cosine_similarity(vector, &r.vector),
                text: r.text.clone(),
                metadata: r.metadata.clone(),
            })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);
        Ok(hits)
    }

    fn delete_by_filter(&mut self, filter: &Filter) -> Result<usize> {
        let before = self.records.len();
        self.records.retain(|r| !filter.matches(&r.metadata));
        Ok(before - self.records.len())
    }
}

/// Cosine similarity; zero when either vector has no length.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    #[cfg(feature = "innr")]
    {
        innr::cosine(a, b)
    }

    #[cfg(not(feature = "innr"))]
    {
        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a > 0.0 && norm_b > 0.0 {
            dot / (norm_a * norm_b)
        } else {
            0.0
        }
    }
}

/// [`Embedder`] over a local fastembed model.
///
/// Uses fastembed's default model (BGE-small-en, 384 dimensions).
#[cfg(feature = "semantic")]
pub struct FastEmbedder {
    model: fastembed::TextEmbedding,
}

#[cfg(feature = "semantic")]
impl FastEmbedder {
    /// Load the default model.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedding model fails to load.
    pub fn new() -> Result<Self> {
        let model = fastembed::TextEmbedding::try_new(Default::default())
            .map_err(|e| Error::Embedding(e.to_string()))?;
        Ok(Self { model })
    }
}

#[cfg(feature = "semantic")]
impl Embedder for FastEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.model
            .embed(vec![text], None)
            .map_err(|e| Error::Embedding(e.to_string()))?
            .pop()
            .ok_or_else(|| Error::Embedding("model returned no embedding".into()))
    }
}

#[cfg(feature = "semantic")]
impl std::fmt::Debug for FastEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedder").finish_non_exhaustive()
    }
}
