use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use finance_core::{
    domain::{AccountType, CategoryCatalog, Transaction, TransactionKind},
    export::to_csv_string,
    services::{AggregationService, QueryService, SortKey, SummaryService, TransactionQuery},
    storage::{JsonStorage, TransactionStorage},
};
use rust_decimal::Decimal;
use tempfile::tempdir;

fn build_sample_transactions(count: usize) -> Vec<Transaction> {
    let start_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let catalog = CategoryCatalog::standard();
    (0..count)
        .map(|idx| {
            let account = AccountType::ALL[idx % 2];
            let categories = catalog.categories(account);
            let kind = if idx % 4 == 0 {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            };
            Transaction::new(
                format!("Movimiento {idx}"),
                Decimal::new(1_000 + (idx % 50_000) as i64, 2),
                kind,
                categories[idx % categories.len()].clone(),
                start_date + Duration::days((idx % 730) as i64),
                account,
            )
        })
        .collect()
}

fn bench_queries(c: &mut Criterion) {
    let data = build_sample_transactions(black_box(10_000));
    let query = TransactionQuery::new(AccountType::Personal)
        .search("movimiento 1")
        .sort(SortKey::AmountDesc);

    c.bench_function("query_10k", |b| {
        b.iter(|| black_box(QueryService::query(&data, &query).len()))
    });

    let today = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
    c.bench_function("report_10k", |b| {
        b.iter(|| black_box(SummaryService::report(&data, AccountType::Business, 12, today)))
    });

    c.bench_function("category_totals_10k", |b| {
        b.iter(|| black_box(AggregationService::category_totals(&data)))
    });

    c.bench_function("csv_export_10k", |b| {
        b.iter(|| black_box(to_csv_string(&data).expect("export")))
    });
}

fn bench_storage_io(c: &mut Criterion) {
    let data = build_sample_transactions(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let storage = JsonStorage::new(Some(dir.path().to_path_buf()), Some(1)).expect("storage");

    c.bench_function("snapshot_save_10k", |b| {
        b.iter(|| storage.save(&data).expect("save snapshot"))
    });

    storage.save(&data).expect("seed");

    c.bench_function("snapshot_load_10k", |b| {
        b.iter(|| black_box(storage.load().expect("load snapshot")))
    });
}

criterion_group!(benches, bench_queries, bench_storage_io);
criterion_main!(benches);
