mod common;

use std::fs;
use std::sync::Arc;

use common::{date, file_store, memory_store_at, store_on, temp_data_dir, ReadOnlyStore};
use finance_ledger::{
    config::{Config, ConfigManager},
    domain::{EntryKind, TransactionInput, TRANSFER_IN, TRANSFER_OUT},
    storage::{KeyValueStore, MemoryStore, CATEGORIES_KEY, MONTHLY_DATA_KEY},
    FinanceStore,
};
use serde_json::Value;

#[test]
fn state_survives_reopen_from_disk() {
    let dir = temp_data_dir();
    {
        let mut store = store_on(Box::new(file_store(&dir)), 2024, 9);
        store
            .add_category("Pets", "#a855f7", EntryKind::Expense)
            .unwrap();
        store
            .add_transaction(TransactionInput::income("Salary", 2500.0, "salary", date(2024, 9, 1)))
            .unwrap();
        assert!(store.take_warnings().is_empty());
    }

    let reopened = store_on(Box::new(file_store(&dir)), 2024, 9);
    assert_eq!(reopened.current_month_data().total_income, 2500.0);
    assert!(reopened.categories().iter().any(|c| c.name == "Pets"));

    let raw = fs::read_to_string(dir.join("monthly-data.json")).unwrap();
    let json: Value = serde_json::from_str(&raw).unwrap();
    assert!(json.get("2024-09").is_some(), "month keys are zero-padded");
    assert_eq!(json["2024-09"]["totalIncome"], 2500.0);
    assert!(dir.join("categories.json").exists());
}

#[test]
fn every_mutation_rewrites_its_record() {
    let (mut store, backend) = memory_store_at(2024, 3);
    assert!(backend.get(MONTHLY_DATA_KEY).unwrap().is_none());

    let txn = store
        .add_transaction(TransactionInput::expense("Fuel", 70.0, "transport", date(2024, 3, 9)))
        .unwrap();
    let raw = backend.get(MONTHLY_DATA_KEY).unwrap().unwrap();
    assert!(raw.contains(&txn.id));

    store.delete_transaction(&txn.id);
    let raw = backend.get(MONTHLY_DATA_KEY).unwrap().unwrap();
    assert!(!raw.contains(&txn.id));

    assert!(backend.get(CATEGORIES_KEY).unwrap().is_none());
    store.delete_category("leisure").unwrap();
    let raw = backend.get(CATEGORIES_KEY).unwrap().unwrap();
    assert!(!raw.contains("\"leisure\""));
}

#[test]
fn navigation_and_reads_do_not_write() {
    let (mut store, backend) = memory_store_at(2024, 3);
    store.navigate_month(finance_ledger::domain::MonthDirection::Next);
    let _ = store.current_month_data();
    let _ = store.show_balance_prompt();
    assert!(backend.is_empty());
}

#[test]
fn corrupted_records_fall_back_to_defaults() {
    let backend = Arc::new(MemoryStore::new());
    backend.set(CATEGORIES_KEY, "not json").unwrap();
    backend.set(MONTHLY_DATA_KEY, "{\"2024-03\": 12}").unwrap();

    let mut store = store_on(Box::new(backend.clone()), 2024, 3);

    assert!(store.category_registry().contains("salary"));
    assert!(store.months().is_empty());
    let warnings = store.take_warnings();
    assert_eq!(warnings.len(), 2, "{warnings:?}");
    assert!(store.take_warnings().is_empty());
}

#[test]
fn write_failures_are_reported_not_fatal() {
    let mut store = store_on(Box::new(ReadOnlyStore::default()), 2024, 3);

    let txn = store
        .add_transaction(TransactionInput::income("Salary", 100.0, "salary", date(2024, 3, 1)))
        .expect("in-memory state still updates");

    assert_eq!(store.current_month_data().transactions, vec![txn]);
    let warnings = store.take_warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("quota exceeded"));
}

#[test]
fn legacy_records_are_migrated_on_load() {
    let backend = Arc::new(MemoryStore::new());
    backend
        .set(
            CATEGORIES_KEY,
            r##"[{"id":"salary","name":"Salário","color":"#22c55e","type":"income"},
                {"id":"transfer-in","name":"Saldo anterior","color":"#0ea5e9","type":"income"}]"##,
        )
        .unwrap();
    backend
        .set(
            MONTHLY_DATA_KEY,
            r#"{"2024-9":{"year":2024,"month":9,"transactions":[
                {"id":"1","description":"Salário","amount":3000,"type":"income",
                 "categoryId":"salary","date":"2024-09-01"}],
                "totalIncome":3000,"totalExpense":0,"balance":3000}}"#,
        )
        .unwrap();

    let store = store_on(Box::new(backend.clone()), 2024, 10);

    assert_eq!(store.previous_balance(), 3000.0);
    let registry = store.category_registry();
    assert!(registry.get(TRANSFER_IN).unwrap().system);
    assert!(registry.get(TRANSFER_OUT).unwrap().system);
    assert_eq!(registry.get(TRANSFER_IN).unwrap().name, "Saldo anterior");

    let months = backend.get(MONTHLY_DATA_KEY).unwrap().unwrap();
    assert!(months.contains("\"2024-09\""));
    let categories = backend.get(CATEGORIES_KEY).unwrap().unwrap();
    assert!(categories.contains(TRANSFER_OUT));
}

#[test]
fn snapshot_export_import_roundtrip() {
    let (mut source, _backend) = memory_store_at(2024, 3);
    source
        .add_transaction(TransactionInput::income("Salary", 900.0, "salary", date(2024, 3, 1)))
        .unwrap();
    let snapshot = source.export_snapshot();
    let json = serde_json::to_string(&snapshot).unwrap();

    let (mut target, target_backend) = memory_store_at(2024, 4);
    target.import_snapshot(serde_json::from_str(&json).unwrap());

    assert_eq!(target.previous_balance(), 900.0);
    assert!(target.show_balance_prompt());
    assert!(target_backend.get(MONTHLY_DATA_KEY).unwrap().is_some());
    assert!(target_backend.get(CATEGORIES_KEY).unwrap().is_some());
}

#[test]
fn reload_picks_up_external_changes() {
    let dir = temp_data_dir();
    let mut first = store_on(Box::new(file_store(&dir)), 2024, 3);
    let mut second = store_on(Box::new(file_store(&dir)), 2024, 3);

    second
        .add_transaction(TransactionInput::expense("Pharmacy", 22.0, "health", date(2024, 3, 2)))
        .unwrap();
    assert!(first.current_month_data().is_empty());

    first.reload();
    assert_eq!(first.current_month_data().total_expense, 22.0);
}

#[test]
fn open_uses_configured_data_dir() {
    let base = temp_data_dir();
    let manager = ConfigManager::with_base_dir(base.clone()).unwrap();
    let config = Config {
        data_dir: Some(base.join("ledger")),
        seed_default_categories: false,
        ..Config::default()
    };
    manager.save(&config).unwrap();

    let loaded = manager.load().unwrap();
    let mut store = FinanceStore::open(&loaded, manager.base_dir()).unwrap();

    assert_eq!(store.categories().len(), 2, "only reserved categories");
    store
        .add_category("Side gig", "#123", EntryKind::Income)
        .unwrap();
    assert!(base.join("ledger").join("categories.json").exists());
}
