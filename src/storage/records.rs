//! Reading and writing the two persisted records through a [`KeyValueStore`].

use std::collections::BTreeMap;

use crate::domain::category::Category;
use crate::domain::ledger::{MonthMap, MonthlyData};
use crate::domain::month::MonthKey;
use crate::errors::LedgerResult;

use super::{KeyValueStore, CATEGORIES_KEY, MONTHLY_DATA_KEY};

/// Outcome of reading both records.
///
/// Missing records yield `None`/empty values; unreadable ones are reported in
/// `warnings` and treated as missing.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub categories: Option<Vec<Category>>,
    pub months: MonthMap,
    pub warnings: Vec<String>,
    pub migrations: Vec<String>,
}

pub fn load(store: &dyn KeyValueStore) -> LoadReport {
    let mut report = LoadReport::default();
    report.categories = load_categories(store, &mut report.warnings);
    report.months = load_months(store, &mut report.warnings, &mut report.migrations);
    for warning in &report.warnings {
        tracing::warn!("{warning}");
    }
    for migration in &report.migrations {
        tracing::info!("{migration}");
    }
    report
}

fn load_categories(store: &dyn KeyValueStore, warnings: &mut Vec<String>) -> Option<Vec<Category>> {
    let raw = match store.get(CATEGORIES_KEY) {
        Ok(raw) => raw?,
        Err(err) => {
            warnings.push(format!("could not read `{CATEGORIES_KEY}`: {err}; using defaults"));
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(categories) => Some(categories),
        Err(err) => {
            warnings.push(format!("`{CATEGORIES_KEY}` is corrupted ({err}); using defaults"));
            None
        }
    }
}

fn load_months(
    store: &dyn KeyValueStore,
    warnings: &mut Vec<String>,
    migrations: &mut Vec<String>,
) -> MonthMap {
    let raw = match store.get(MONTHLY_DATA_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return MonthMap::new(),
        Err(err) => {
            warnings.push(format!(
                "could not read `{MONTHLY_DATA_KEY}`: {err}; starting empty"
            ));
            return MonthMap::new();
        }
    };
    let entries: BTreeMap<String, MonthlyData> = match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(err) => {
            warnings.push(format!(
                "`{MONTHLY_DATA_KEY}` is corrupted ({err}); starting empty"
            ));
            return MonthMap::new();
        }
    };

    let mut months = MonthMap::new();
    for (raw_key, mut data) in entries {
        let key: MonthKey = match raw_key.parse() {
            Ok(key) => key,
            Err(_) => {
                warnings.push(format!("skipping month with invalid key `{raw_key}`"));
                continue;
            }
        };
        if MonthKey::is_legacy(&raw_key) {
            migrations.push(format!("month key `{raw_key}` normalized to `{key}`"));
        }
        let period = key.year_month();
        data.year = period.year;
        data.month = period.month;
        data.recalculate();
        match months.get_mut(&key) {
            // `2024-3` and `2024-03` both present: keep every transaction.
            Some(existing) => {
                existing.transactions.append(&mut data.transactions);
                existing.recalculate();
                migrations.push(format!("merged duplicate records for `{key}`"));
            }
            None => {
                months.insert(key, data);
            }
        }
    }
    months
}

pub fn save_categories(store: &dyn KeyValueStore, categories: &[Category]) -> LedgerResult<()> {
    let json = serde_json::to_string(categories)?;
    store.set(CATEGORIES_KEY, &json)
}

pub fn save_months(store: &dyn KeyValueStore, months: &MonthMap) -> LedgerResult<()> {
    let json = serde_json::to_string(months)?;
    store.set(MONTHLY_DATA_KEY, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn empty_store_loads_nothing() {
        let report = load(&MemoryStore::new());
        assert!(report.categories.is_none());
        assert!(report.months.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn corrupted_records_fall_back_with_warnings() {
        let store = MemoryStore::new();
        store.set(CATEGORIES_KEY, "{oops").unwrap();
        store.set(MONTHLY_DATA_KEY, "[1, 2").unwrap();
        let report = load(&store);
        assert!(report.categories.is_none());
        assert!(report.months.is_empty());
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn legacy_keys_are_normalized_and_totals_recomputed() {
        let raw = r#"{
            "2024-3": {
                "year": 2024, "month": 3,
                "transactions": [
                    {"id": "a", "description": "Salary", "amount": 3000, "type": "income",
                     "categoryId": "salary", "date": "2024-03-01"}
                ],
                "totalIncome": 1, "totalExpense": 1, "balance": 1
            },
            "nonsense": {"year": 1, "month": 1}
        }"#;
        let store = MemoryStore::with_value(MONTHLY_DATA_KEY, raw);
        let report = load(&store);

        let key: MonthKey = "2024-03".parse().unwrap();
        let march = report.months.get(&key).expect("normalized month");
        assert_eq!(march.total_income, 3000.0);
        assert_eq!(march.balance, 3000.0);
        assert_eq!(report.migrations.len(), 1);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn saved_months_use_padded_keys() {
        let store = MemoryStore::new();
        let mut months = MonthMap::new();
        let key: MonthKey = "2024-9".parse().unwrap();
        months.insert(key, MonthlyData::empty(key.year_month()));
        save_months(&store, &months).unwrap();
        let raw = store.get(MONTHLY_DATA_KEY).unwrap().unwrap();
        assert!(raw.contains("\"2024-09\""));
    }
}
