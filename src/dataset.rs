//! Question/answer dataset generation.
//!
//! Each unit is sent to a completion model with a prompt asking for
//! question/answer pairs grounded in the unit text. The model's reply is
//! parsed as a JSON array, entries missing required fields are dropped, and
//! the rest are appended to a JSONL file:
//!
//! ```text
//! FinalUnit* ─ prompt ─ complete ─ parse ─ JSONL
//!                                        └ checkpoint(unit.index)
//! ```
//!
//! A checkpoint file records which unit indices are done, so an interrupted
//! run picks up where it stopped. A unit whose completion fails is logged and
//! left out of the checkpoint; the next run retries it.

use std::collections::BTreeSet;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::unit::FinalUnit;
use crate::{Error, Result};

/// Sampling settings passed to the completion model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionOptions {
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_tokens: usize,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

/// Prompt to text.
pub trait Completer: Send + Sync {
    /// Complete one prompt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Completion`] if the provider fails.
    fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String>;
}

/// How sure the model is that the answer is stated in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Stated plainly in the text.
    High,
    /// Anything else.
    Low,
}

impl Confidence {
    /// `"high"` is high; every other label is low.
    fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("high") {
            Self::High
        } else {
            Self::Low
        }
    }
}

/// One dataset entry, in instruction-tuning layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    /// The question.
    pub instruction: String,
    /// Extra input; empty for plain questions.
    pub input: String,
    /// The answer.
    pub output: String,
    /// How well the text supports the answer.
    pub confidence: Confidence,
}

impl QaPair {
    fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            instruction: str_field(value, "instruction")?.to_string(),
            input: str_field(value, "input").unwrap_or_default().to_string(),
            output: str_field(value, "output")?.to_string(),
            confidence: Confidence::from_label(str_field(value, "confidence")?),
        })
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

/// Parse a completion into question/answer pairs.
///
/// The reply may wrap the array in prose or a code fence; everything from the
/// first `[` to the last `]` is taken as the array. Entries without an
/// instruction, output and confidence are dropped.
///
/// ```rust
/// use folio::{parse_response, Confidence};
///
/// let reply = r#"İşte sorular:
/// [{"instruction": "Eğim kaç derece?", "output": "45", "confidence": "orta"}]"#;
/// let pairs = parse_response(reply).unwrap();
/// assert_eq!(pairs[0].input, "");
/// assert_eq!(pairs[0].confidence, Confidence::Low);
/// ```
///
/// # Errors
///
/// Returns [`Error::Response`] if there is no array and [`Error::Json`] if
/// the array does not parse.
pub fn parse_response(response: &str) -> Result<Vec<QaPair>> {
    let array = response
        .find('[')
        .zip(response.rfind(']'))
        .filter(|(start, end)| start < end)
        .map(|(start, end)| &response[start..=end])
        .ok_or_else(|| Error::Response("no JSON array in completion".into()))?;

    let entries: Vec<Value> = serde_json::from_str(array)?;
    let pairs: Vec<QaPair> = entries.iter().filter_map(QaPair::from_value).collect();
    if pairs.len() < entries.len() {
        tracing::debug!(
            entries = entries.len(),
            kept = pairs.len(),
            "dropped incomplete entries"
        );
    }
    Ok(pairs)
}

/// Builds prompts and turns completions into pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionGenerator {
    min_questions: usize,
    max_questions: usize,
    options: CompletionOptions,
}

impl Default for QuestionGenerator {
    fn default() -> Self {
        Self::new(3, 8)
    }
}

impl QuestionGenerator {
    /// Ask for between `min_questions` and `max_questions` pairs per unit.
    #[must_use]
    pub fn new(min_questions: usize, max_questions: usize) -> Self {
        Self {
            min_questions,
            max_questions: max_questions.max(min_questions),
            options: CompletionOptions::default(),
        }
    }

    /// Override the sampling settings.
    #[must_use]
    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    /// The prompt for one unit of text.
    #[must_use]
    pub fn prompt(&self, text: &str) -> String {
        format!(
            "Aşağıdaki metinden {min}-{max} adet soru-cevap çifti üret.\n\
             \n\
             Kurallar:\n\
             1. Sorular yalnızca metinde açıkça yer alan bilgilere dayanmalı.\n\
             2. Cevaplar kısa, net ve doğru olmalı.\n\
             3. Metinde olmayan hiçbir bilgiyi ekleme.\n\
             4. Soru türlerini çeşitlendir (ne, nasıl, neden, kaç, hangi).\n\
             5. Her çifte bir güven değeri ver: metinde açıkça yazıyorsa \"high\", \
             belirsizse ya da dış bilgi gerektiriyorsa \"low\".\n\
             \n\
             Metin:\n\
             {text}\n\
             \n\
             Yalnızca şu biçimde bir JSON dizisi döndür:\n\
             [{{\"instruction\": \"soru\", \"input\": \"\", \"output\": \"cevap\", \"confidence\": \"high\"}}]\n",
            min = self.min_questions,
            max = self.max_questions,
        )
    }

    /// Generate pairs for one unit of text.
    ///
    /// # Errors
    ///
    /// Returns the completer's error, or a parse error from
    /// [`parse_response`].
    pub fn generate<C>(&self, completer: &C, text: &str) -> Result<Vec<QaPair>>
    where
        C: Completer + ?Sized,
    {
        let response = completer.complete(&self.prompt(text), &self.options)?;
        parse_response(&response)
    }
}

/// Appends pairs to a JSONL file, one object per line.
#[derive(Debug)]
pub struct DatasetWriter {
    path: PathBuf,
    file: File,
}

impl DatasetWriter {
    /// Open `path`, creating parent directories. With `append` set, existing
    /// lines are kept; otherwise the file is truncated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>, append: bool) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// The output path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write one pair as a line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the write fails.
    pub fn write(&mut self, pair: &QaPair) -> Result<()> {
        let mut line = serde_json::to_vec(pair)?;
        line.push(b'\n');
        self.file.write_all(&line)?;
        Ok(())
    }

    /// Write pairs in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] on the first failed write.
    pub fn write_batch(&mut self, pairs: &[QaPair]) -> Result<()> {
        pairs.iter().try_for_each(|pair| self.write(pair))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct CheckpointFile {
    processed_indices: BTreeSet<usize>,
    total_processed: usize,
}

/// The unit indices already turned into pairs for one input document.
///
/// Stored as `<dir>/<input file name>.checkpoint.json`. A checkpoint that
/// cannot be parsed is treated as empty.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    path: PathBuf,
    processed: BTreeSet<usize>,
}

impl Checkpoint {
    /// Load the checkpoint for `input` from `dir`, creating `dir` if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the directory or an existing file cannot be
    /// read.
    pub fn load(dir: impl AsRef<Path>, input: &Path) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let path = dir.join(format!("{name}.checkpoint.json"));

        let processed = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<CheckpointFile>(&bytes) {
                Ok(file) => file.processed_indices,
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "unreadable checkpoint, starting over");
                    BTreeSet::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeSet::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, processed })
    }

    /// The checkpoint file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether unit `index` is done.
    #[must_use]
    pub fn is_processed(&self, index: usize) -> bool {
        self.processed.contains(&index)
    }

    /// Number of units done.
    #[must_use]
    pub fn progress(&self) -> usize {
        self.processed.len()
    }

    /// Mark unit `index` done and persist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be written.
    pub fn save(&mut self, index: usize) -> Result<()> {
        self.processed.insert(index);
        let file = CheckpointFile {
            processed_indices: self.processed.clone(),
            total_processed: self.processed.len(),
        };
        std::fs::write(&self.path, serde_json::to_vec(&file)?)?;
        Ok(())
    }

    /// Forget everything and delete the file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file exists and cannot be removed.
    pub fn clear(&mut self) -> Result<()> {
        self.processed.clear();
        match std::fs::remove_file(&self.path) {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

/// What a dataset run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatasetReport {
    /// Units turned into pairs on this run.
    pub processed: usize,
    /// Units skipped because the checkpoint had them.
    pub resumed: usize,
    /// Units whose completion or parse failed.
    pub failed: usize,
    /// Pairs written.
    pub pairs: usize,
}

/// Generate pairs for every unit not yet in `checkpoint` and append them to
/// `writer`.
///
/// # Errors
///
/// Write and checkpoint failures abort the run. Completion and parse
/// failures only skip the unit.
pub fn generate_dataset<C>(
    units: &[FinalUnit],
    generator: &QuestionGenerator,
    completer: &C,
    writer: &mut DatasetWriter,
    mut checkpoint: Option<&mut Checkpoint>,
) -> Result<DatasetReport>
where
    C: Completer + ?Sized,
{
    let mut report = DatasetReport::default();

    for unit in units {
        if checkpoint.as_ref().is_some_and(|c| c.is_processed(unit.index)) {
            report.resumed += 1;
            continue;
        }
        let pairs = match generator.generate(completer, &unit.content) {
            Ok(pairs) => pairs,
            Err(err) => {
                tracing::warn!(index = unit.index, %err, "question generation failed, skipping unit");
                report.failed += 1;
                continue;
            }
        };
        writer.write_batch(&pairs)?;
        if let Some(checkpoint) = checkpoint.as_deref_mut() {
            checkpoint.save(unit.index)?;
        }
        tracing::debug!(index = unit.index, pairs = pairs.len(), "generated questions");
        report.processed += 1;
        report.pairs += pairs.len();
    }

    tracing::info!(
        path = %writer.path().display(),
        processed = report.processed,
        resumed = report.resumed,
        failed = report.failed,
        pairs = report.pairs,
        "generated dataset"
    );
    Ok(report)
}
