//! Question/answer dataset generation over segmented documents.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use folio::{
    blocks_from_text, generate_dataset, Checkpoint, Completer, CompletionOptions, Confidence,
    DatasetWriter, Error, Pipeline, QaPair, QuestionGenerator, Result, SegmenterConfig,
};

const DOCUMENT: &str = "1 Kapsam\n\nBu standart, makinelere sabit erişim araçlarının tasarımı için genel gereklilikleri belirtir.\n\nMerdiven eğimi 45 dereceyi aşmamalı ve basamak derinliği tüm merdiven boyunca eşit olmalıdır.\n\nRampalar yalnızca eğimin 20 dereceden az olduğu yerlerde kullanılmalı ve kaymaz yüzeyle kaplanmalıdır.";

/// Answers with one pair quoting the first words of the unit, and fails
/// once for every unit mentioning `fail_on` until `failures` runs out.
struct Echo {
    fail_on: &'static str,
    failures: AtomicUsize,
    calls: AtomicUsize,
}

impl Echo {
    fn new(fail_on: &'static str, failures: usize) -> Self {
        Self {
            fail_on,
            failures: AtomicUsize::new(failures),
            calls: AtomicUsize::new(0),
        }
    }
}

impl Completer for Echo {
    fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String> {
        assert_eq!(options.max_tokens, 2000);
        self.calls.fetch_add(1, Ordering::SeqCst);
        if prompt.contains(self.fail_on) && self.failures.load(Ordering::SeqCst) > 0 {
            self.failures.fetch_sub(1, Ordering::SeqCst);
            return Err(Error::Completion("timeout".into()));
        }
        Ok(r#"[{"instruction": "Bu metin neyi anlatır?", "input": "", "output": "Erişim araçlarını.", "confidence": "HIGH"}]"#.to_string())
    }
}

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("folio-tests-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn read_pairs(path: &std::path::Path) -> Vec<QaPair> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn dataset_resumes_after_failed_unit() {
    let dir = scratch("resume");
    let input = dir.join("standard.pdf");
    let output = dir.join("dataset.jsonl");

    let units = Pipeline::new(SegmenterConfig::default())
        .unwrap()
        .segment(&blocks_from_text(DOCUMENT));
    assert_eq!(units.len(), 3);

    let generator = QuestionGenerator::default();
    let completer = Echo::new("Rampalar", 1);

    let mut checkpoint = Checkpoint::load(&dir, &input).unwrap();
    let mut writer = DatasetWriter::open(&output, false).unwrap();
    let first = generate_dataset(&units, &generator, &completer, &mut writer, Some(&mut checkpoint)).unwrap();
    assert_eq!((first.processed, first.failed, first.pairs), (2, 1, 2));
    drop(writer);

    let mut checkpoint = Checkpoint::load(&dir, &input).unwrap();
    assert_eq!(checkpoint.progress(), 2);
    let mut writer = DatasetWriter::open(&output, true).unwrap();
    let second = generate_dataset(&units, &generator, &completer, &mut writer, Some(&mut checkpoint)).unwrap();
    assert_eq!((second.resumed, second.processed, second.failed), (2, 1, 0));
    drop(writer);

    assert_eq!(completer.calls.load(Ordering::SeqCst), 4);
    let pairs = read_pairs(&output);
    assert_eq!(pairs.len(), 3);
    assert!(pairs.iter().all(|p| p.confidence == Confidence::High));
}

#[test]
fn dataset_without_checkpoint_regenerates_everything() {
    let dir = scratch("fresh");
    let output = dir.join("dataset.jsonl");
    let units = Pipeline::new(SegmenterConfig::default())
        .unwrap()
        .segment(&blocks_from_text(DOCUMENT));
    let completer = Echo::new("", 0);

    for _ in 0..2 {
        let mut writer = DatasetWriter::open(&output, false).unwrap();
        let report = generate_dataset(&units, &QuestionGenerator::default(), &completer, &mut writer, None).unwrap();
        assert_eq!(report.processed, units.len());
    }
    assert_eq!(read_pairs(&output).len(), units.len());
}
