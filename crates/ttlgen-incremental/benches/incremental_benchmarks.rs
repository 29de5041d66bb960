//! Benchmarks for incremental generation
//!
//! Measure a cold pipeline over projects of increasing size against the cost
//! of re-evaluating after a single schema or source edit.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use salsa::Setter;
use std::path::PathBuf;
use ttlgen_core::Config;
use ttlgen_incremental::{queries, TtlgenDatabase};

/// Turtle document with N terms under `http://example.org/vocab_<i>/`
fn generate_schema(index: usize, num_terms: usize) -> String {
    let mut text = format!(
        "@prefix v: <http://example.org/vocab_{index}/> .\n\
         @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n"
    );

    for term in 0..num_terms {
        text.push_str(&format!(
            "v:term{term} a rdfs:Class ;\n    rdfs:label \"Term {term}\" ;\n    rdfs:comment \"Term number {term} of vocabulary {index}.\" .\n"
        ));
    }

    text
}

/// Source file with one bound struct per vocabulary in `range`
fn generate_source(range: std::ops::Range<usize>) -> String {
    let mut text = String::from("use ttlgen::from_ttl;\n");
    for index in range {
        text.push_str(&format!(
            "\n#[derive(Debug)]\n#[from_ttl(\"vocab_{index}.ttl\", \"v\", \"http://example.org/vocab_{index}/\")]\npub struct Vocab{index};\n"
        ));
    }
    text
}

fn schema_files(num_schemas: usize, num_terms: usize) -> Vec<(PathBuf, String)> {
    (0..num_schemas)
        .map(|i| (PathBuf::from(format!("schemas/vocab_{i}.ttl")), generate_schema(i, num_terms)))
        .collect()
}

fn source_files(num_schemas: usize) -> Vec<(PathBuf, String)> {
    (0..num_schemas)
        .step_by(10)
        .map(|start| {
            let end = (start + 10).min(num_schemas);
            (PathBuf::from(format!("src/vocab_{start}.rs")), generate_source(start..end))
        })
        .collect()
}

/// Benchmark: Full pipeline from scratch (10, 50, 100 schemas)
fn bench_cold_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("cold_pipeline");

    for num_schemas in [10, 50, 100].iter() {
        let schemas = schema_files(*num_schemas, 20);
        let sources = source_files(*num_schemas);

        group.bench_with_input(BenchmarkId::from_parameter(num_schemas), num_schemas, |b, _| {
            b.iter(|| {
                let db = TtlgenDatabase::default();
                let workspace = queries::new_workspace(&db, sources.clone(), schemas.clone());
                let config = queries::ConfigInput::new(&db, Config::default());
                black_box(queries::pipeline(&db, workspace, config))
            });
        });
    }

    group.finish();
}

/// Benchmark: Unchanged inputs (everything memoized)
fn bench_warm_pipeline(c: &mut Criterion) {
    let db = TtlgenDatabase::default();
    let workspace = queries::new_workspace(&db, source_files(100), schema_files(100, 20));
    let config = queries::ConfigInput::new(&db, Config::default());
    let _ = queries::pipeline(&db, workspace, config); // Prime cache

    c.bench_function("warm_pipeline_100", |b| {
        b.iter(|| black_box(queries::pipeline(&db, workspace, config)));
    });
}

/// Benchmark: Edit one schema of 100 (only its bindings regenerate)
fn bench_schema_edit(c: &mut Criterion) {
    let mut db = TtlgenDatabase::default();

    let schemas: Vec<queries::SchemaFile> = schema_files(100, 20)
        .into_iter()
        .map(|(path, text)| queries::SchemaFile::new(&db, path, text))
        .collect();
    let sources: Vec<queries::SourceFile> = source_files(100)
        .into_iter()
        .map(|(path, text)| queries::SourceFile::new(&db, path, text))
        .collect();
    let edited = schemas[50];
    let workspace = queries::Workspace::new(&db, sources, schemas);
    let config = queries::ConfigInput::new(&db, Config::default());
    let _ = queries::pipeline(&db, workspace, config);

    let mut num_terms = 20;
    c.bench_function("recompute_one_schema_of_100", |b| {
        b.iter(|| {
            num_terms += 1;
            edited.set_text(&mut db).to(generate_schema(50, num_terms));
            black_box(queries::pipeline(&db, workspace, config))
        });
    });
}

/// Benchmark: Edit one source file of 10
fn bench_source_edit(c: &mut Criterion) {
    let mut db = TtlgenDatabase::default();

    let sources: Vec<queries::SourceFile> = source_files(100)
        .into_iter()
        .map(|(path, text)| queries::SourceFile::new(&db, path, text))
        .collect();
    let edited = sources[5];
    let workspace = queries::new_workspace(&db, Vec::new(), schema_files(100, 20));
    workspace.set_sources(&mut db).to(sources);
    let config = queries::ConfigInput::new(&db, Config::default());
    let _ = queries::pipeline(&db, workspace, config);

    let mut padding = 0;
    c.bench_function("rescan_one_source_of_10", |b| {
        b.iter(|| {
            padding += 1;
            let text = format!("{}{}", "\n".repeat(padding % 8), generate_source(50..60));
            edited.set_text(&mut db).to(text);
            black_box(queries::pipeline(&db, workspace, config))
        });
    });
}

criterion_group!(
    benches,
    bench_cold_pipeline,
    bench_warm_pipeline,
    bench_schema_edit,
    bench_source_edit
);
criterion_main!(benches);
