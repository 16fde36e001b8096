//! Locator Operations Benchmarks
//!
//! Benchmarks for template expansion, literal escaping, and matcher evaluation.
//!
//! Run with: `cargo bench --bench locator_ops`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pagematch::prelude::*;
use pagematch::{css_literal, xpath_literal, MockSession};

fn bench_literal_escaping(c: &mut Criterion) {
    let mut group = c.benchmark_group("literal_escaping");

    let values = vec![
        ("plain", "Java Warnings"),
        ("single_quote", "Don't Panic"),
        ("double_quote", "say \"hi\""),
        ("mixed", "it's \"mixed\" o'clock"),
        ("long", "a fairly long display name with no quotes at all in it"),
    ];

    for (name, value) in &values {
        group.bench_with_input(BenchmarkId::new("xpath", name), value, |bench, v| {
            bench.iter(|| black_box(xpath_literal(black_box(v))));
        });
        group.bench_with_input(BenchmarkId::new("css", name), value, |bench, v| {
            bench.iter(|| black_box(css_literal(black_box(v))));
        });
    }

    group.finish();
}

fn bench_by_factories(c: &mut Criterion) {
    let mut group = c.benchmark_group("by_factories");

    let factories: Vec<(&str, fn(&str) -> Locator)> = vec![
        ("id", by::id),
        ("name", by::name),
        ("link", by::link),
        ("button", by::button),
        ("input", by::input),
        ("checkbox", by::checkbox),
        ("option", by::option),
        ("action", by::action),
    ];

    for (name, factory) in factories {
        group.bench_function(name, |bench| {
            bench.iter(|| black_box(factory(black_box("Java Warnings"))));
        });
    }

    group.finish();
}

fn bench_template_expansion(c: &mut Criterion) {
    let mut group = c.benchmark_group("template_expansion");

    let templates = vec![
        ("one_value", "//a[text()=%s]", vec!["Configure"]),
        (
            "two_values",
            "//div[@id=%s]//a[@href=%s]",
            vec!["tasks", "configure"],
        ),
        (
            "quoted",
            "//*[@name='%s' and @value=\"%s\"]",
            vec!["mode", "it's"],
        ),
    ];

    for (name, template, values) in &templates {
        group.bench_with_input(BenchmarkId::from_parameter(name), values, |bench, vals| {
            bench.iter(|| black_box(by::xpath(black_box(template), black_box(vals)).unwrap()));
        });
    }

    group.finish();
}

fn bench_matcher_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("matcher_evaluation");

    let session = MockSession::at("http://ci/job/warnings/1/");
    session.set_root_text("Build #1\nJava Warnings: 42\n".repeat(50));

    let content = has_content("Java Warnings: 42");
    group.bench_function("has_content", |bench| {
        bench.iter(|| black_box(content.matches(black_box(&session)).unwrap()));
    });

    let text = session.root_text().unwrap();
    let regexp = contains_regexp(r"Java Warnings: \d+").unwrap();
    group.bench_function("contains_regexp", |bench| {
        bench.iter(|| black_box(Matcher::<str>::matches(&regexp, black_box(text.as_str())).unwrap()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_literal_escaping,
    bench_by_factories,
    bench_template_expansion,
    bench_matcher_evaluation,
);
criterion_main!(benches);
