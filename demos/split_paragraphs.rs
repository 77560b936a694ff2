//! Split a Document into Paragraphs
//!
//! Reads a document, segments it, and writes every unit to
//! `<name>.paragraphs.txt` next to the input, framed by start/end markers.
//!
//! ```bash
//! cargo run --example split_paragraphs -- standard.txt --min-length 80
//! RUST_LOG=folio=debug cargo run --example split_paragraphs -- standard.txt
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use folio::{read_document, Pipeline, Readers, SegmenterConfig};
use tracing_subscriber::EnvFilter;

fn usage() -> ExitCode {
    eprintln!("usage: split_paragraphs <input-file> [--min-length N]");
    ExitCode::FAILURE
}

fn output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{stem}.paragraphs.txt"))
}

fn run(input: &Path, min_length: usize) -> folio::Result<PathBuf> {
    let pipeline = Pipeline::new(SegmenterConfig::default().with_min_unit_length(min_length))?;
    let document = input.file_name().unwrap_or_default().to_string_lossy();

    let blocks = read_document(input, &Readers::default())?;
    let units = pipeline.segment_document(&document, &blocks)?;
    println!("Found {} paragraphs.", units.len());

    let mut out = String::new();
    for unit in &units {
        let n = unit.index + 1;
        out.push_str(&format!(
            "--- PARAGRAPH {n} START ---\n{}\n--- PARAGRAPH {n} END ---\n\n",
            unit.content
        ));
    }

    let path = output_path(input);
    std::fs::write(&path, out)?;
    Ok(path)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (input, min_length) = match args.as_slice() {
        [input] => (input, 50),
        [input, flag, n] if flag == "--min-length" => match n.parse() {
            Ok(n) => (input, n),
            Err(_) => return usage(),
        },
        _ => return usage(),
    };

    println!("Processing: {input}");
    match run(Path::new(input), min_length) {
        Ok(path) => {
            println!("Output saved to: {}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) if err.is_recoverable() => {
            eprintln!("warning: {err}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
