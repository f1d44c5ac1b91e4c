use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use finance_ledger::{
    core::time::FixedClock,
    domain::{MonthlyData, Transaction, TransactionInput, YearMonth},
    storage::{records, JsonFileStore, MemoryStore},
    FinanceStore,
};
use tempfile::tempdir;

fn build_sample_month(txn_count: usize) -> MonthlyData {
    let period = YearMonth::new(2025, 1).expect("valid month");
    let start_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let mut data = MonthlyData::empty(period);

    for idx in 0..txn_count {
        let date = start_date + Duration::days((idx % 31) as i64);
        let amount = 50.0 + (idx % 100) as f64;
        let input = if idx % 4 == 0 {
            TransactionInput::income(format!("income {idx}"), amount, "salary", date)
        } else {
            TransactionInput::expense(format!("expense {idx}"), amount, "food", date)
        };
        data.transactions.push(Transaction::from_input(input));
    }
    data.recalculate();
    data
}

fn bench_recalculate(c: &mut Criterion) {
    let data = build_sample_month(black_box(10_000));

    c.bench_function("month_recalculate_10k", |b| {
        b.iter_batched(
            || data.clone(),
            |mut month| {
                month.recalculate();
                black_box(month.balance);
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_add_transaction(c: &mut Criterion) {
    let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

    c.bench_function("store_add_transaction_1k", |b| {
        b.iter_batched(
            || {
                FinanceStore::with_clock(
                    Box::new(MemoryStore::new()),
                    Box::new(FixedClock::on(today)),
                )
            },
            |mut store| {
                for idx in 0..1_000 {
                    let input = TransactionInput::expense(
                        format!("txn {idx}"),
                        10.0 + idx as f64,
                        "food",
                        today,
                    );
                    store.add_transaction(input).expect("add transaction");
                }
                black_box(store.current_month_data().total_expense);
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_month_io(c: &mut Criterion) {
    let data = build_sample_month(black_box(10_000));
    let mut months = finance_ledger::domain::MonthMap::new();
    months.insert(data.period().key(), data);
    let dir = tempdir().expect("tempdir");
    let storage = JsonFileStore::new(dir.path()).expect("json store");

    c.bench_function("months_save_10k", |b| {
        b.iter(|| {
            records::save_months(&storage, &months).expect("save months");
        })
    });

    records::save_months(&storage, &months).expect("seed");

    c.bench_function("months_load_10k", |b| {
        b.iter(|| {
            let report = records::load(&storage);
            black_box(report.months);
        })
    });
}

criterion_group!(benches, bench_recalculate, bench_add_transaction, bench_month_io);
criterion_main!(benches);
