//! The state container consumed by presentation code.
//!
//! [`FinanceStore`] owns the month-partitioned ledger, the category registry and the
//! month cursor. Every command runs synchronously: it validates, mutates, recomputes
//! the affected month's totals and writes the changed record back to storage before
//! returning. Reads are recomputed from current state on every call.

use std::collections::BTreeSet;
use std::path::Path;

use crate::config::{Config, ConfigManager};
use crate::core::services::summary_service::amounts_match;
use crate::core::services::{CategoryRegistry, SummaryService, TransactionService};
use crate::core::time::{Clock, SystemClock};
use crate::domain::category::{is_transfer_id, system_categories, Category, CategoryLabel, CategoryUpdate};
use crate::domain::common::EntryKind;
use crate::domain::ledger::{
    CarryForwardState, CategoryTotal, FinanceSnapshot, MonthMap, MonthSummary, MonthlyData,
};
use crate::domain::month::{MonthDirection, MonthKey, YearMonth};
use crate::domain::transaction::{Transaction, TransactionInput, TransactionUpdate};
use crate::errors::{LedgerError, LedgerResult};
use crate::storage::{records, JsonFileStore, KeyValueStore};

/// Monthly ledger, categories and carry-forward workflow behind one facade.
pub struct FinanceStore {
    current: YearMonth,
    months: MonthMap,
    registry: CategoryRegistry,
    dismissed: BTreeSet<MonthKey>,
    warnings: Vec<String>,
    seed_defaults: bool,
    storage: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
}

impl FinanceStore {
    /// Loads state from `storage`, viewing the current calendar month.
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self::with_clock(storage, Box::new(SystemClock))
    }

    pub fn with_clock(storage: Box<dyn KeyValueStore>, clock: Box<dyn Clock>) -> Self {
        Self::with_options(storage, clock, true)
    }

    /// `seed_defaults` controls whether an empty store starts with the default
    /// category set or only the reserved transfer categories.
    pub fn with_options(
        storage: Box<dyn KeyValueStore>,
        clock: Box<dyn Clock>,
        seed_defaults: bool,
    ) -> Self {
        let current = YearMonth::from_date(clock.today());
        let mut store = Self {
            current,
            months: MonthMap::new(),
            registry: CategoryRegistry::default(),
            dismissed: BTreeSet::new(),
            warnings: Vec::new(),
            seed_defaults,
            storage,
            clock,
        };
        store.load_from_storage();
        store
    }

    /// Opens a file-backed store in the data directory described by `config`.
    pub fn open(config: &Config, base: &Path) -> LedgerResult<Self> {
        let data_dir = config.resolve_data_dir(base);
        let storage = JsonFileStore::new(&data_dir)?;
        tracing::info!(path = %data_dir.display(), "opening finance ledger");
        Ok(Self::with_options(
            Box::new(storage),
            Box::new(SystemClock),
            config.seed_default_categories,
        ))
    }

    /// Opens the store using the configuration in the application directory.
    pub fn open_default() -> LedgerResult<Self> {
        let manager = ConfigManager::new()?;
        let config = manager.load()?;
        Self::open(&config, manager.base_dir())
    }

    /// Re-reads both records from storage, keeping the month cursor.
    pub fn reload(&mut self) {
        self.load_from_storage();
    }

    fn load_from_storage(&mut self) {
        let report = records::load(self.storage.as_ref());
        let stored_categories = report.categories.is_some();
        self.registry = match report.categories {
            Some(categories) => CategoryRegistry::new(categories),
            None if self.seed_defaults => CategoryRegistry::with_defaults(),
            None => CategoryRegistry::new(system_categories()),
        };
        let repaired = self.registry.ensure_system_categories();
        self.months = report.months;
        self.warnings.extend(report.warnings);

        if stored_categories && !repaired.is_empty() {
            tracing::info!(ids = ?repaired, "restored reserved categories");
            self.persist_categories();
        }
        if !report.migrations.is_empty() {
            self.persist_months();
        }
        tracing::info!(
            categories = self.registry.len(),
            months = self.months.len(),
            "ledger state loaded"
        );
    }

    // ---------------------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------------------

    pub fn current_date(&self) -> YearMonth {
        self.current
    }

    pub fn current_month_key(&self) -> MonthKey {
        self.current.key()
    }

    /// Stored record for `key`, or an empty one synthesized without being stored.
    pub fn month_data(&self, key: MonthKey) -> MonthlyData {
        self.months
            .get(&key)
            .cloned()
            .unwrap_or_else(|| MonthlyData::empty(key.year_month()))
    }

    pub fn current_month_data(&self) -> MonthlyData {
        self.month_data(self.current_month_key())
    }

    /// Record for `key` only if it has been materialized by a mutation.
    pub fn stored_month(&self, key: MonthKey) -> Option<&MonthlyData> {
        self.months.get(&key)
    }

    pub fn months(&self) -> &MonthMap {
        &self.months
    }

    pub fn categories(&self) -> &[Category] {
        self.registry.as_slice()
    }

    pub fn category_registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn category_label(&self, id: &str) -> CategoryLabel {
        self.registry.label_for(id)
    }

    pub fn previous_balance(&self) -> f64 {
        SummaryService::previous_balance(&self.months, self.current_month_key())
    }

    pub fn carry_forward_state(&self) -> CarryForwardState {
        SummaryService::carry_forward_state(&self.months, self.current_month_key(), &self.dismissed)
    }

    pub fn show_balance_prompt(&self) -> bool {
        self.carry_forward_state().is_pending()
    }

    /// Per-category totals of the viewed month for one side, largest first.
    pub fn category_breakdown(&self, kind: EntryKind) -> Vec<CategoryTotal> {
        SummaryService::category_breakdown(&self.current_month_data(), &self.registry, kind)
    }

    pub fn year_overview(&self, year: i32) -> LedgerResult<Vec<MonthSummary>> {
        SummaryService::year_overview(&self.months, year)
    }

    /// Persistence problems collected since the last call, oldest first.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    // ---------------------------------------------------------------------------------
    // Transaction commands
    // ---------------------------------------------------------------------------------

    /// Records a transaction in the **currently viewed** month.
    ///
    /// The month is chosen by the cursor, never by `input.date`: a transaction dated
    /// 2024-05-10 added while viewing March 2024 is stored under March. The date only
    /// drives display and ordering.
    pub fn add_transaction(&mut self, input: TransactionInput) -> LedgerResult<Transaction> {
        let key = self.current_month_key();
        let mut data = self.month_data(key);
        let txn = TransactionService::add(&mut data, input, &self.registry)?;
        tracing::debug!(month = %key, id = %txn.id, amount = txn.amount, kind = %txn.kind, "transaction added");
        self.months.insert(key, data);
        self.persist_months();
        Ok(txn)
    }

    /// Edits a transaction of the viewed month. Returns `Ok(false)` when `id` is not in
    /// that month; other months are not searched.
    pub fn update_transaction(&mut self, id: &str, update: TransactionUpdate) -> LedgerResult<bool> {
        let key = self.current_month_key();
        let Some(data) = self.months.get_mut(&key) else {
            tracing::debug!(month = %key, id, "update ignored: month has no record");
            return Ok(false);
        };
        let updated = TransactionService::update(data, id, update, &self.registry)?;
        if updated {
            tracing::debug!(month = %key, id, "transaction updated");
            self.persist_months();
        } else {
            tracing::debug!(month = %key, id, "update ignored: transaction not found");
        }
        Ok(updated)
    }

    /// Removes a transaction of the viewed month, returning it when found.
    pub fn delete_transaction(&mut self, id: &str) -> Option<Transaction> {
        let key = self.current_month_key();
        let removed = TransactionService::remove(self.months.get_mut(&key)?, id);
        match &removed {
            Some(_) => {
                tracing::debug!(month = %key, id, "transaction deleted");
                self.persist_months();
            }
            None => tracing::debug!(month = %key, id, "delete ignored: transaction not found"),
        }
        removed
    }

    // ---------------------------------------------------------------------------------
    // Category commands
    // ---------------------------------------------------------------------------------

    pub fn add_category(
        &mut self,
        name: impl Into<String>,
        color: impl Into<String>,
        kind: EntryKind,
    ) -> LedgerResult<Category> {
        let category = self.registry.add(name, color, kind)?;
        self.persist_categories();
        Ok(category)
    }

    pub fn update_category(&mut self, id: &str, update: CategoryUpdate) -> LedgerResult<bool> {
        let updated = self.registry.update(id, update)?;
        if updated {
            self.persist_categories();
        }
        Ok(updated)
    }

    /// Removes a category. Transactions referencing it are kept unchanged.
    pub fn delete_category(&mut self, id: &str) -> LedgerResult<bool> {
        let removed = self.registry.delete(id)?;
        if removed {
            self.persist_categories();
        }
        Ok(removed)
    }

    // ---------------------------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------------------------

    pub fn navigate_month(&mut self, direction: MonthDirection) -> YearMonth {
        let next = self.current.step(direction);
        match YearMonth::new(next.year, next.month) {
            Ok(next) => self.current = next,
            Err(err) => tracing::debug!(%err, "navigation stopped at calendar bounds"),
        }
        tracing::debug!(month = %self.current, "navigated");
        self.current
    }

    pub fn set_specific_month(&mut self, year: i32, month: u32) -> LedgerResult<()> {
        self.current = YearMonth::new(year, month)?;
        tracing::debug!(month = %self.current, "month selected");
        Ok(())
    }

    /// Moves the cursor to the clock's current month.
    pub fn go_to_today(&mut self) -> YearMonth {
        self.current = YearMonth::from_date(self.clock.today());
        self.current
    }

    // ---------------------------------------------------------------------------------
    // Carry-forward
    // ---------------------------------------------------------------------------------

    /// Inserts a caller-built carry-forward transaction.
    ///
    /// Only takes effect while the prompt is pending, so a second call for the same
    /// month returns `Ok(None)` instead of inserting a duplicate transfer. The caller
    /// picks description and date; category, kind and amount must match the previous
    /// month's balance (to the cent).
    pub fn accept_balance(&mut self, input: TransactionInput) -> LedgerResult<Option<Transaction>> {
        if !is_transfer_id(&input.category_id) {
            return Err(LedgerError::validation(format!(
                "carry-forward must use a transfer category, got `{}`",
                input.category_id
            )));
        }
        let state = self.carry_forward_state();
        let CarryForwardState::Pending { previous_balance } = state else {
            tracing::debug!(month = %self.current, ?state, "carry-forward ignored");
            return Ok(None);
        };
        let expected = SummaryService::carry_forward_input(previous_balance, self.current)?;
        if input.category_id != expected.category_id || input.kind != expected.kind {
            return Err(LedgerError::validation(format!(
                "a balance of {previous_balance:.2} carries as {} into `{}`",
                expected.kind, expected.category_id
            )));
        }
        if !amounts_match(input.amount, expected.amount) {
            return Err(LedgerError::validation(format!(
                "carry-forward amount {:.2} does not match previous balance {:.2}",
                input.amount, expected.amount
            )));
        }
        let txn = self.add_transaction(input)?;
        tracing::info!(month = %self.current, amount = txn.amount, kind = %txn.kind, "previous balance carried forward");
        Ok(Some(txn))
    }

    /// Carries the previous month's balance into the viewed month.
    pub fn accept_previous_balance(&mut self) -> LedgerResult<Option<Transaction>> {
        let CarryForwardState::Pending { previous_balance } = self.carry_forward_state() else {
            return Ok(None);
        };
        let input = SummaryService::carry_forward_input(previous_balance, self.current)?;
        self.accept_balance(input)
    }

    /// Dismisses the prompt for the viewed month. Returns `false` when nothing was
    /// pending.
    pub fn reject_previous_balance(&mut self) -> bool {
        if !self.show_balance_prompt() {
            return false;
        }
        self.dismissed.insert(self.current_month_key());
        tracing::debug!(month = %self.current, "carry-forward rejected");
        true
    }

    // ---------------------------------------------------------------------------------
    // Snapshots
    // ---------------------------------------------------------------------------------

    pub fn export_snapshot(&self) -> FinanceSnapshot {
        FinanceSnapshot {
            categories: self.registry.as_slice().to_vec(),
            monthly_data: self.months.clone(),
        }
    }

    /// Replaces all categories and months with `snapshot` and persists both records.
    pub fn import_snapshot(&mut self, snapshot: FinanceSnapshot) {
        let FinanceSnapshot {
            categories,
            monthly_data,
        } = snapshot;
        let mut registry = CategoryRegistry::new(categories);
        registry.ensure_system_categories();
        let months: MonthMap = monthly_data
            .into_iter()
            .map(|(key, mut data)| {
                let period = key.year_month();
                data.year = period.year;
                data.month = period.month;
                data.recalculate();
                (key, data)
            })
            .collect();
        self.registry = registry;
        self.months = months;
        self.dismissed.clear();
        tracing::info!(
            categories = self.registry.len(),
            months = self.months.len(),
            "snapshot imported"
        );
        self.persist_categories();
        self.persist_months();
    }

    // ---------------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------------

    fn persist_months(&mut self) {
        if let Err(err) = records::save_months(self.storage.as_ref(), &self.months) {
            self.record_write_failure("monthly data", err);
        }
    }

    fn persist_categories(&mut self) {
        if let Err(err) = records::save_categories(self.storage.as_ref(), self.registry.as_slice()) {
            self.record_write_failure("categories", err);
        }
    }

    fn record_write_failure(&mut self, what: &str, err: LedgerError) {
        tracing::warn!(%err, "failed to save {what}; changes are kept in memory only");
        self.warnings
            .push(format!("Could not save {what}: {err}"));
    }
}
