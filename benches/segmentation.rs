//! Benchmarks for document segmentation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use folio::{
    blocks_from_text, classify_all, filter_sections, merge_blocks, LengthBounds, PageSegmenter,
    ParagraphSegmenter, RawBlock, Segmenter,
};

fn sample_document(pages: usize) -> Vec<RawBlock> {
    // A standard-shaped document: contents, foreword, then numbered clauses
    let clauses = [
        "Genel Bakış",
        "Bu bölüm, sabit erişim araçlarının tasarımı ve\nimalatı için genel gereklilikleri belirtir.",
        "Aşağıdaki koşullar sağlanmalıdır:",
        "a) merdiven eğimi 45 dereceyi\naşmamalıdır;\nb) basamak derinliği eşit olmalıdır.",
        "| Tip | Eğim |\n|---|---|\n| Merdiven | 45° |\n| Rampa | 10° |",
        "Ancak geçici yapılarda bu değerler aşılabilir.",
    ];
    let mut text = String::from("İçindekiler\n1 Kapsam ........ 3\n\nÖnsöz\n\nBu standart komite tarafından hazırlanmıştır.\x0c");
    for page in 0..pages {
        text.push_str(&format!("{} Madde {}\n\n", page + 1, page + 1));
        text.push_str(&clauses.join("\n\n"));
        text.push_str(&format!("\n\n{}\x0c", page + 2));
    }
    blocks_from_text(&text)
}

fn bench_paragraph_segmenter(c: &mut Criterion) {
    let mut group = c.benchmark_group("paragraph_segmenter");
    let segmenter = ParagraphSegmenter::new(LengthBounds::default());

    for pages in [10, 100, 1_000] {
        let blocks = sample_document(pages);

        group.throughput(Throughput::Elements(blocks.len() as u64));
        group.bench_with_input(BenchmarkId::new("paragraph", pages), &blocks, |b, blocks| {
            b.iter(|| segmenter.segment(black_box(blocks)))
        });
    }

    group.finish();
}

fn bench_page_segmenter(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_segmenter");
    let segmenter = PageSegmenter::new(LengthBounds::default());

    for pages in [10, 100, 1_000] {
        let blocks = sample_document(pages);

        group.throughput(Throughput::Elements(blocks.len() as u64));
        group.bench_with_input(BenchmarkId::new("page", pages), &blocks, |b, blocks| {
            b.iter(|| segmenter.segment(black_box(blocks)))
        });
    }

    group.finish();
}

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");
    let blocks = sample_document(100);
    let bounds = LengthBounds::default();

    group.bench_function("classify", |b| b.iter(|| classify_all(black_box(&blocks))));
    group.bench_function("filter", |b| {
        b.iter_batched(
            || classify_all(&blocks),
            filter_sections,
            criterion::BatchSize::SmallInput,
        )
    });
    group.bench_function("merge", |b| {
        b.iter_batched(
            || filter_sections(classify_all(&blocks)),
            |kept| merge_blocks(kept, &bounds),
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_paragraph_segmenter,
    bench_page_segmenter,
    bench_stages
);
criterion_main!(benches);
