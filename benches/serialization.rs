use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use serde_tabular::{
    decode, encode, from_str, record, to_string, RowValues, Schema, TabularOptions, Workbook,
};

record! {
    #[derive(Serialize, Deserialize, Clone, Default)]
    struct Product {
        sku: String => "sku",
        name: String => "name",
        price: f64 => "price,precision:2",
        quantity: u32 => "quantity",
    }
}

record! {
    #[derive(Serialize, Deserialize, Clone, Default)]
    struct Metadata {
        created: String => "created",
        updated: String => "updated",
        version: u32 => "version",
    }
}

record! {
    #[derive(Serialize, Deserialize, Clone, Default)]
    struct NestedData {
        id: u32 => "id",
        metadata: Metadata => ",inline",
        tags: Vec<String> => "tags",
    }
}

fn products(size: u32) -> Vec<Product> {
    (0..size)
        .map(|i| Product {
            sku: format!("SKU{}", i),
            name: format!("Product {}", i),
            price: 9.99 + f64::from(i),
            quantity: i,
        })
        .collect()
}

fn nested() -> NestedData {
    NestedData {
        id: 42,
        metadata: Metadata {
            created: "2023-01-01T00:00:00Z".to_string(),
            updated: "2023-12-31T23:59:59Z".to_string(),
            version: 3,
        },
        tags: vec!["important".to_string(), "verified".to_string()],
    }
}

fn benchmark_schema(c: &mut Criterion) {
    c.bench_function("schema_nested_record", |b| {
        b.iter(|| Schema::of::<NestedData>())
    });
}

fn benchmark_encode_row(c: &mut Criterion) {
    let schema = Schema::of::<NestedData>().unwrap();
    let options = TabularOptions::default();
    let data = nested();

    c.bench_function("encode_nested_row", |b| {
        b.iter(|| {
            let mut row: Vec<String> = Vec::with_capacity(schema.len());
            encode(black_box(&data), &schema, &options, &mut row).map(|()| row)
        })
    });
}

fn benchmark_decode_row(c: &mut Criterion) {
    let schema = Schema::of::<NestedData>().unwrap();
    let options = TabularOptions::default();
    let values: RowValues = [
        ("id", "42"),
        ("created", "2023-01-01T00:00:00Z"),
        ("updated", "2023-12-31T23:59:59Z"),
        ("version", "3"),
    ]
    .into_iter()
    .collect();

    c.bench_function("decode_nested_row", |b| {
        b.iter(|| decode::<NestedData, _>(&schema, &options, black_box(&values)))
    });
}

fn benchmark_dump_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("dump_text");

    for size in [10, 50, 100, 500].iter() {
        let records = products(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| to_string(black_box(records.as_slice())))
        });
    }
    group.finish();
}

fn benchmark_load_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_text");

    for size in [10, 50, 100, 500].iter() {
        let text = to_string(&products(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| from_str::<Product>(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_sheet(c: &mut Criterion) {
    let records = products(100);

    c.bench_function("sheet_dump_load_100", |b| {
        b.iter(|| {
            let mut book = Workbook::new();
            book.dump("products", black_box(records.as_slice()))?;
            let mut back: Vec<Product> = Vec::new();
            book.load("products", &mut back)
        })
    });
}

criterion_group!(
    benches,
    benchmark_schema,
    benchmark_encode_row,
    benchmark_decode_row,
    benchmark_dump_text,
    benchmark_load_text,
    benchmark_sheet
);
criterion_main!(benches);
