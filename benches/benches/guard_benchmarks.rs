//! Guard Performance Benchmarks
//!
//! - Tokenizer throughput (bytes/second)
//! - Scanner throughput in report and fix mode
//! - Full pipeline over mostly-ASCII and mostly-RTL input

use bidi_scanner::ScanMode;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const MIXED: &str = include_str!("../fixtures/mixed.rs");

fn sizes() -> [(&'static str, String); 3] {
    [
        ("small", MIXED.to_string()),
        ("medium", MIXED.repeat(20)),
        ("large", MIXED.repeat(200)),
    ]
}

fn rtl_heavy(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("let א{i} = (\"ح{i}\", [ب, {i}]) // ש\n"))
        .collect()
}

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");

    for (name, source) in sizes().iter() {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, source| {
            b.iter(|| black_box(bidi_lexer::tokenize(black_box(source))))
        });
    }

    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");

    for (name, source) in sizes().iter() {
        let tokens = match bidi_lexer::tokenize(source) {
            Ok(tokenization) => tokenization.tokens,
            Err(e) => panic!("fixture failed to tokenize: {e}"),
        };
        group.throughput(Throughput::Bytes(source.len() as u64));

        for mode in [ScanMode::Report, ScanMode::Fix] {
            group.bench_with_input(
                BenchmarkId::new(format!("{mode:?}").to_lowercase(), name),
                &tokens,
                |b, tokens| b.iter(|| black_box(bidi_scanner::scan(black_box(tokens), mode))),
            );
        }
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    let inputs = [
        ("ascii", "fn f(a: u32) -> u32 { a * 2 + 1 }\n".repeat(500)),
        ("mixed", MIXED.repeat(50)),
        ("rtl_heavy", rtl_heavy(500)),
    ];

    for (name, source) in inputs.iter() {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, source| {
            b.iter(|| black_box(bidi_guard::process_source(black_box(source), ScanMode::Fix)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_scan, bench_pipeline);
criterion_main!(benches);
