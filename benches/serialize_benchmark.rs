//! Catalog serialization benchmarks for jsgettext
//!
//! This benchmark suite measures:
//! - MO parsing for catalogs of increasing size
//! - Script rendering of merged catalogs
//! - JavaScript string escaping
//! - Plural expression evaluation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use jsgettext::catalog::mo::parse_mo;
use jsgettext::js::{escape_js, render_script};
use jsgettext::plural::PluralExpr;
use jsgettext::{MessageKey, PluralRule, RawCatalog};

const RUSSIAN: &str =
    "(n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2)";

fn catalog(size: usize) -> RawCatalog {
    let mut catalog = RawCatalog::new();
    catalog.insert(
        MessageKey::metadata(),
        format!("Plural-Forms: nplurals=3; plural={};\n", RUSSIAN),
    );
    for i in 0..size {
        if i % 4 == 0 {
            for form in 0..3 {
                catalog.insert(
                    MessageKey::plural(format!("%d file {}", i), form),
                    format!("%d файл {} ({})", i, form),
                );
            }
        } else {
            catalog.insert(
                MessageKey::scalar(format!("Message {}", i)),
                format!("Сообщение \"{}\"", i),
            );
        }
    }
    catalog
}

/// Little-endian MO image with `size` scalar entries
fn mo_image(size: usize) -> Vec<u8> {
    let mut entries: Vec<(String, String)> = (0..size)
        .map(|i| (format!("Message {:05}", i), format!("Nachricht {}", i)))
        .collect();
    entries.sort();

    let n = size as u32;
    let translations = 20 + n * 8;
    let mut offset = translations + n * 8;
    let mut table = Vec::new();
    let mut data = Vec::new();
    for text in entries
        .iter()
        .map(|(id, _)| id)
        .chain(entries.iter().map(|(_, s)| s))
    {
        table.extend_from_slice(&(text.len() as u32).to_le_bytes());
        table.extend_from_slice(&offset.to_le_bytes());
        data.extend_from_slice(text.as_bytes());
        data.push(0);
        offset += text.len() as u32 + 1;
    }

    let mut out = Vec::new();
    for word in [0x9504_12de_u32, 0, n, 20, translations] {
        out.extend_from_slice(&word.to_le_bytes());
    }
    out.extend_from_slice(&table);
    out.extend_from_slice(&data);
    out
}

/// Benchmark MO parsing
fn bench_parse_mo(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_mo");

    for size in [10, 100, 1000, 5000].iter() {
        let bytes = mo_image(*size);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &bytes, |b, bytes| {
            b.iter(|| parse_mo(black_box(bytes)));
        });
    }

    group.finish();
}

/// Benchmark full script rendering
fn bench_render_script(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_script");
    let rule = PluralRule::Expression(RUSSIAN.to_string());

    for size in [10, 100, 1000, 5000].iter() {
        let catalog = catalog(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &catalog, |b, catalog| {
            b.iter(|| render_script(black_box(catalog), &rule));
        });
    }

    group.finish();
}

/// Benchmark escaping of typical message texts
fn bench_escape_js(c: &mut Criterion) {
    let mut group = c.benchmark_group("escape_js");

    let inputs = [
        ("ascii", "Save your changes before leaving the page"),
        ("quotes", "It's \"quoted\" and has a \\ backslash\n"),
        ("html", "<b>Bold</b> text with </script> inside"),
        ("cyrillic", "Сохраните изменения перед уходом со страницы"),
        ("emoji", "Done 🎉 and 😀"),
    ];

    for (name, input) in inputs {
        group.bench_function(name, |b| {
            b.iter(|| escape_js(black_box(input)));
        });
    }

    group.finish();
}

/// Benchmark plural expression evaluation
fn bench_plural_eval(c: &mut Criterion) {
    let expr = match PluralExpr::parse(RUSSIAN) {
        Ok(expr) => expr,
        Err(e) => panic!("benchmark expression does not parse: {}", e),
    };

    c.bench_function("plural_parse_russian", |b| {
        b.iter(|| PluralExpr::parse(black_box(RUSSIAN)))
    });

    c.bench_function("plural_index_russian_0_1000", |b| {
        b.iter(|| {
            for n in 0..1000u64 {
                black_box(expr.index(black_box(n)));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_parse_mo,
    bench_render_script,
    bench_escape_js,
    bench_plural_eval,
);

criterion_main!(benches);
