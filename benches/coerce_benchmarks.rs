use chartopt_core::{
    analyze, coerce_to, coercible, lexer::Lexer, parser::Parser, CoerceOptions, Input,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde::Deserialize;
use serde_json::json;

// ============================================================================
// Test Data
// ============================================================================

const SMALL_LITERAL: &str = r#"{ chart: { type: 'bar' }, title: { text: "Fruit" } }"#;

const MEDIUM_LITERAL: &str = r#"var options = {
    chart: { type: 'area', zoomType: 'x' },
    title: { text: 'US and USSR nuclear stockpiles' },
    xAxis: { allowDecimals: false, accessibility: { rangeDescription: 'Range: 1940 to 2017.' } },
    yAxis: { title: { text: 'Nuclear weapon states' } },
    plotOptions: {
        area: {
            pointStart: 1940,
            marker: {
                enabled: false,
                symbol: 'circle',
                radius: 2,
                states: { hover: { enabled: true } }
            }
        }
    },
    series: [
        { name: 'USA', data: [null, null, 6, 11, 32, 110, 235, 369, 640, 1005, 1436, 2063] },
        { name: 'USSR/Russia', data: [null, null, null, null, null, 5, 25, 50, 120, 150, 200, 426] }
    ]
};"#;

#[derive(Debug, Deserialize)]
struct DataPoint {
    x: f64,
    y: f64,
}

coercible!(DataPoint as "DataPoint": dict, json, js_literal, array);

fn generate_points_literal(size: usize) -> String {
    let mut literal = String::from("{\n    data: [\n");
    for i in 0..size {
        literal.push_str(&format!("        {{ x: {}, y: {}.5 }},\n", i, i * 3));
    }
    literal.push_str("    ]\n}");
    literal
}

fn generate_points_json(size: usize) -> String {
    let points: Vec<_> = (0..size).map(|i| json!({ "x": i, "y": i * 2 })).collect();
    serde_json::Value::Array(points).to_string()
}

// ============================================================================
// Literal parsing
// ============================================================================

fn bench_lexer_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_by_size");

    for (name, source) in [("small", SMALL_LITERAL), ("medium", MEDIUM_LITERAL)] {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, src| {
            b.iter(|| {
                let mut lexer = Lexer::new(black_box(src));
                lexer.lex()
            })
        });
    }

    group.finish();
}

fn bench_parser_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_array_scaling");

    for size in [10, 100, 1000] {
        let source = generate_points_literal(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, src| {
            b.iter(|| {
                let mut parser = Parser::new(black_box(src));
                parser.parse_document()
            })
        });
    }

    group.finish();
}

fn bench_literal_to_json(c: &mut Criterion) {
    c.bench_function("literal_to_json", |b| {
        b.iter(|| {
            let analysis = analyze(black_box(MEDIUM_LITERAL), "bench.js").unwrap();
            analysis.to_json().unwrap()
        })
    });
}

// ============================================================================
// Coercion
// ============================================================================

fn bench_coerce_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("coerce_single");

    group.bench_function("dict", |b| {
        let map = json!({ "x": 1, "y": 2 });
        b.iter(|| coerce_to::<DataPoint>(black_box(map.clone()), CoerceOptions::default()))
    });
    group.bench_function("json_text", |b| {
        let options = CoerceOptions::default().with_allow_js_literal(false);
        b.iter(|| coerce_to::<DataPoint>(black_box(r#"{"x": 1, "y": 2}"#), options))
    });
    group.bench_function("js_literal", |b| {
        b.iter(|| coerce_to::<DataPoint>(black_box("{ x: 1, y: 2 }"), CoerceOptions::default()))
    });

    group.finish();
}

fn bench_coerce_iterable(c: &mut Criterion) {
    let mut group = c.benchmark_group("coerce_iterable_scaling");

    for size in [10, 100, 1000] {
        let text = generate_points_json(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("json_text", size), &text, |b, text| {
            let options = CoerceOptions::iterable().with_allow_js_literal(false);
            b.iter(|| coerce_to::<DataPoint>(black_box(text.as_str()), options))
        });

        let pairs: Vec<Input<DataPoint>> = (0..size)
            .map(|i| Input::from(json!([i, i * 2])))
            .collect();
        group.bench_with_input(BenchmarkId::new("positional_pairs", size), &pairs, |b, pairs| {
            b.iter(|| {
                let input = Input::List(black_box(pairs.clone()));
                coerce_to::<DataPoint>(input, CoerceOptions::iterable())
            })
        });
    }

    group.finish();
}

criterion_group!(
    literal_benches,
    bench_lexer_sizes,
    bench_parser_scaling,
    bench_literal_to_json
);
criterion_group!(coerce_benches, bench_coerce_single, bench_coerce_iterable);
criterion_main!(literal_benches, coerce_benches);
