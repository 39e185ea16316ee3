use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizforge_core::loader::{parse_bank_str, BankFormat};
use quizforge_core::selection::{collapse_to_ranges, format_ranges, parse_selection};

fn bench_parse_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_selection");

    let simple = "1,5~10,15";
    let messy = " 1 , abc , 5~3 , 7 - 9 , , 12~ , 40~60 ,x-y, 100";
    let wide = "1~50000";
    let many_terms = (0..500)
        .map(|i| {
            if i % 2 == 0 {
                format!("{}", i * 3)
            } else {
                format!("{}~{}", i * 3, i * 3 + 2)
            }
        })
        .collect::<Vec<_>>()
        .join(",");

    group.bench_function("simple", |b| b.iter(|| parse_selection(black_box(simple))));

    group.bench_function("messy", |b| b.iter(|| parse_selection(black_box(messy))));

    group.bench_function("wide_range", |b| {
        b.iter(|| parse_selection(black_box(wide)))
    });

    group.bench_function("many_terms", |b| {
        b.iter(|| parse_selection(black_box(&many_terms)))
    });

    group.finish();
}

fn bench_collapse(c: &mut Criterion) {
    let mut group = c.benchmark_group("collapse_to_ranges");

    let dense: Vec<u32> = (1..=10_000).collect();
    let sparse: Vec<u32> = (1..=10_000).filter(|n| n % 3 != 0).collect();

    group.bench_function("dense", |b| {
        b.iter(|| collapse_to_ranges(black_box(&dense)))
    });

    group.bench_function("sparse", |b| {
        b.iter(|| collapse_to_ranges(black_box(&sparse)))
    });

    group.bench_function("format_sparse", |b| {
        b.iter(|| format_ranges(black_box(&sparse)))
    });

    group.finish();
}

fn bench_load_bank(c: &mut Criterion) {
    let json = {
        let records: Vec<String> = (1..=500)
            .map(|i| {
                format!(
                    r#"{{"number": {i}, "question": "Question {i}", "options": {{"A": "a", "B": "b", "C": "c", "D": "d"}}, "answer": "{}"}}"#,
                    if i % 4 == 0 { "A,C" } else { "B" }
                )
            })
            .collect();
        format!("[{}]", records.join(","))
    };

    c.bench_function("parse_bank_500_json", |b| {
        b.iter(|| parse_bank_str(black_box(&json), BankFormat::Json))
    });
}

criterion_group!(benches, bench_parse_selection, bench_collapse, bench_load_bank);
criterion_main!(benches);
