use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use qsck::{deserialize, serialize, Field, JsonMap, ListValue, Value};
use serde_json::json;

const TIMESTAMP: i64 = 1546902289;

fn scalar_fields(count: usize) -> Vec<Field> {
    (0..count)
        .map(|i| Field::scalar(format!("key{}", i), format!("value {}", i)))
        .collect()
}

fn nested_fields() -> Vec<Field> {
    let doc: JsonMap = match json!({"b": {"x": [1, 2, 3]}, "a": "text, with commas", "n": null}) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    };
    vec![
        Field::scalar("_model", "LG-M327"),
        Field::scalar("msg", "Connection lost, retrying in 5s, attempt 3"),
        Field::null("carrier"),
        Field::new(
            "event_vars",
            Value::list1([
                ("subtype", ListValue::from("disconnected")),
                (
                    "networkInfo",
                    ListValue::list2([
                        ("type", "MOBILE[LTE]"),
                        ("extra", "internet, roaming"),
                        ("state", "CONNECTED"),
                    ]),
                ),
                ("reason", ListValue::from("timeout, no ack")),
            ]),
        ),
        Field::new("doc", doc),
    ]
}

fn benchmark_serialize_scalars(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_scalars");

    for size in [1, 10, 50, 200].iter() {
        let fields = scalar_fields(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &fields, |b, fields| {
            b.iter(|| serialize("LOG", TIMESTAMP, black_box(fields)))
        });
    }
    group.finish();
}

fn benchmark_deserialize_scalars(c: &mut Criterion) {
    let mut group = c.benchmark_group("deserialize_scalars");

    for size in [1, 10, 50, 200].iter() {
        let line = serialize("LOG", TIMESTAMP, &scalar_fields(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &line, |b, line| {
            b.iter(|| deserialize(black_box(line)))
        });
    }
    group.finish();
}

fn benchmark_nested(c: &mut Criterion) {
    let fields = nested_fields();
    let line = serialize("LOG", TIMESTAMP, &fields).unwrap();

    c.bench_function("serialize_nested_record", |b| {
        b.iter(|| serialize("LOG", TIMESTAMP, black_box(&fields)))
    });

    c.bench_function("deserialize_nested_record", |b| {
        b.iter(|| deserialize(black_box(&line)))
    });
}

fn benchmark_comma_heavy_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("comma_heavy_text");

    for pieces in [4, 32, 128].iter() {
        let msg = vec!["word"; *pieces].join(", ");
        let line = serialize("LOG", TIMESTAMP, &[Field::scalar("msg", msg)]).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(pieces), &line, |b, line| {
            b.iter(|| deserialize(black_box(line)))
        });
    }
    group.finish();
}

fn benchmark_comparison_with_json(c: &mut Criterion) {
    let fields = nested_fields();
    let line = serialize("LOG", TIMESTAMP, &fields).unwrap();
    let record = deserialize(&line).unwrap();
    let json = serde_json::to_string(&record).unwrap();

    let mut group = c.benchmark_group("qs_vs_json");

    group.bench_function("qs_parse", |b| b.iter(|| deserialize(black_box(&line))));

    group.bench_function("json_parse", |b| {
        b.iter(|| serde_json::from_str::<serde_json::Value>(black_box(&json)))
    });

    group.bench_function("qs_to_json", |b| {
        b.iter(|| serde_json::to_string(&deserialize(black_box(&line)).unwrap()))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_serialize_scalars,
    benchmark_deserialize_scalars,
    benchmark_nested,
    benchmark_comma_heavy_text,
    benchmark_comparison_with_json
);
criterion_main!(benches);
