use criterion::{Criterion, black_box, criterion_group, criterion_main};
use trade_ingest::cleaning::{DatasetKind, get_transform, parse_number};
use trade_ingest::output::write_csv;
use trade_ingest::types::{DataSet, Schema, Value};

fn raw_world_exports(rows: usize) -> DataSet {
    let schema = Schema::utf8_from_headers([" Country ", " 2024", "2023"]);
    let mut data = vec![vec![
        Value::Utf8("World".to_string()),
        Value::Utf8("9,999,999".to_string()),
        Value::Utf8("9,000,000".to_string()),
    ]];
    for i in 0..rows {
        let value = if i % 17 == 0 {
            "(D)".to_string()
        } else {
            format!("{},{:03}", i * 7 % 1000, i % 1000)
        };
        data.push(vec![
            Value::Utf8(format!("Country {i}")),
            Value::Utf8(value),
            Value::Utf8(i.to_string()),
        ]);
    }
    DataSet::new(schema, data)
}

fn raw_state_finance(rows: usize) -> DataSet {
    let schema = Schema::utf8_from_headers(["NAME", "REVENUE", "EXPENDITURE"]);
    let data = (0..rows)
        .map(|i| {
            vec![
                Value::Utf8(format!("State {i}")),
                Value::Utf8(format!("{}", (i * 31) % 50_000)),
                Value::Utf8(if i % 13 == 0 { "N/A".to_string() } else { (i * 29).to_string() }),
            ]
        })
        .collect();
    DataSet::new(schema, data)
}

fn bench_transforms(c: &mut Criterion) {
    let world = get_transform(DatasetKind::WorldTrade).expect("world trade transform");
    let revenue = get_transform(DatasetKind::Revenue).expect("revenue transform");

    let small = raw_world_exports(250);
    let large = raw_world_exports(20_000);
    let states = raw_state_finance(5_000);

    c.bench_function("world_trade_apply_250", |b| {
        b.iter(|| world.apply(black_box(&small)))
    });

    c.bench_function("world_trade_apply_20k", |b| {
        b.iter(|| world.apply(black_box(&large)))
    });

    c.bench_function("revenue_apply_with_report_5k", |b| {
        b.iter(|| revenue.apply_with_report(black_box(&states)))
    });
}

fn bench_parse_number(c: &mut Criterion) {
    c.bench_function("parse_number_plain", |b| {
        b.iter(|| parse_number(black_box("350000")))
    });

    c.bench_function("parse_number_thousands", |b| {
        b.iter(|| parse_number(black_box(" 1,234,567.89 ")))
    });

    c.bench_function("parse_number_sentinel", |b| {
        b.iter(|| parse_number(black_box("(D)")))
    });
}

fn bench_write_csv(c: &mut Criterion) {
    let world = get_transform(DatasetKind::WorldTrade).expect("world trade transform");
    let cleaned = world.apply(&raw_world_exports(20_000)).expect("clean");
    let revenue = get_transform(DatasetKind::Revenue).expect("revenue transform");
    let states = revenue.apply(&raw_state_finance(5_000)).expect("clean");

    c.bench_function("write_csv_top_ten", |b| {
        b.iter(|| {
            let mut buf = Vec::new();
            write_csv(black_box(&cleaned), &mut buf).expect("write");
            buf
        })
    });

    c.bench_function("write_csv_5k_states", |b| {
        b.iter(|| {
            let mut buf = Vec::with_capacity(128 * 1024);
            write_csv(black_box(&states), &mut buf).expect("write");
            buf
        })
    });
}

criterion_group!(benches, bench_transforms, bench_parse_number, bench_write_csv);
criterion_main!(benches);
