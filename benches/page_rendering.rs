//! Page Rendering Benchmarks
//!
//! Run with: `cargo bench --bench page_rendering`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use pdf_pages::{count_pages, render_all_pages, BatchOptions, OpenOptions, RenderOptions, Session};

#[path = "../tests/common/mod.rs"]
mod common;

/// Letter-sized PDF with `n` pages
fn create_pdf(n: usize) -> Vec<u8> {
    common::build_pdf(&vec![(612, 792); n])
}

/// Open + page count, the cost every helper pays up front
fn bench_open(c: &mut Criterion) {
    let pdf = create_pdf(10);

    let mut group = c.benchmark_group("open");
    group.throughput(Throughput::Bytes(pdf.len() as u64));

    group.bench_function("count_pages", |b| {
        b.iter(|| {
            let count = count_pages(black_box(pdf.as_slice()), &OpenOptions::default())
                .expect("Failed to count pages");
            black_box(count)
        })
    });

    group.finish();
}

/// Single page at several scales, both formats
fn bench_render_page(c: &mut Criterion) {
    let pdf = create_pdf(1);
    let session = Session::open(pdf, &OpenOptions::default()).expect("Failed to open PDF");

    let mut group = c.benchmark_group("render_page");
    group.measurement_time(Duration::from_secs(10));

    for scale in [1.0f32, 1.5, 2.0] {
        group.bench_with_input(BenchmarkId::new("png", scale), &scale, |b, &scale| {
            let options = RenderOptions::png(scale);
            b.iter(|| black_box(session.render_page(1, &options).expect("Failed to render")))
        });
        group.bench_with_input(BenchmarkId::new("jpeg", scale), &scale, |b, &scale| {
            let options = RenderOptions::jpeg(scale, 0.85);
            b.iter(|| black_box(session.render_page(1, &options).expect("Failed to render")))
        });
    }

    group.finish();
}

/// Whole-document stream
fn bench_render_all(c: &mut Criterion) {
    let pdf = create_pdf(10);

    let mut group = c.benchmark_group("render_all_pages");
    group.throughput(Throughput::Elements(10));
    group.measurement_time(Duration::from_secs(15));

    group.bench_function("ten_pages_jpeg", |b| {
        b.iter(|| {
            let bytes: usize = render_all_pages(black_box(pdf.as_slice()), BatchOptions::default())
                .expect("Failed to open PDF")
                .map(|page| page.expect("Failed to render").data.len())
                .sum();
            black_box(bytes)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_open, bench_render_page, bench_render_all);
criterion_main!(benches);
