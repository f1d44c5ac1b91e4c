use std::collections::BTreeSet;

use crate::core::services::CategoryRegistry;
use crate::domain::category::{TRANSFER_IN, TRANSFER_OUT};
use crate::domain::common::EntryKind;
use crate::domain::ledger::{CarryForwardState, CategoryTotal, MonthMap, MonthSummary, MonthlyData};
use crate::domain::month::{MonthKey, YearMonth};
use crate::domain::transaction::TransactionInput;
use crate::errors::{LedgerError, LedgerResult};

pub const CARRY_FORWARD_DESCRIPTION: &str = "Previous month balance";

/// Amounts closer than half a cent are the same amount.
const CENT_TOLERANCE: f64 = 0.005;

/// Rounds `value` to whole cents, folding float residue such as `0.1 + 0.2 - 0.3`
/// to zero.
pub fn round_to_cents(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

pub fn amounts_match(a: f64, b: f64) -> bool {
    (a - b).abs() < CENT_TOLERANCE
}

/// Read-side derivations over the month map.
pub struct SummaryService;

impl SummaryService {
    /// Balance of the month before `key` in whole cents, or 0 when that month has no
    /// record.
    pub fn previous_balance(months: &MonthMap, key: MonthKey) -> f64 {
        months
            .get(&key.previous())
            .map(|data| round_to_cents(data.balance))
            .unwrap_or(0.0)
    }

    pub fn carry_forward_state(
        months: &MonthMap,
        key: MonthKey,
        dismissed: &BTreeSet<MonthKey>,
    ) -> CarryForwardState {
        if months.get(&key).is_some_and(MonthlyData::has_carry_forward) {
            return CarryForwardState::Accepted;
        }
        if dismissed.contains(&key) {
            return CarryForwardState::Rejected;
        }
        let previous_balance = Self::previous_balance(months, key);
        if previous_balance == 0.0 {
            CarryForwardState::Idle
        } else {
            CarryForwardState::Pending { previous_balance }
        }
    }

    /// Transfer entry carrying `previous_balance` into `period`, dated on its first day.
    pub fn carry_forward_input(
        previous_balance: f64,
        period: YearMonth,
    ) -> LedgerResult<TransactionInput> {
        let date = period.first_day().ok_or_else(|| {
            LedgerError::validation(format!("{period} has no valid first day"))
        })?;
        let (kind, category) = if previous_balance >= 0.0 {
            (EntryKind::Income, TRANSFER_IN)
        } else {
            (EntryKind::Expense, TRANSFER_OUT)
        };
        Ok(TransactionInput::new(
            CARRY_FORWARD_DESCRIPTION,
            round_to_cents(previous_balance.abs()),
            kind,
            category,
            date,
        ))
    }

    /// Per-category sums of `kind` entries, largest first.
    pub fn category_breakdown(
        month: &MonthlyData,
        categories: &CategoryRegistry,
        kind: EntryKind,
    ) -> Vec<CategoryTotal> {
        let mut totals: Vec<CategoryTotal> = Vec::new();
        for txn in month.transactions.iter().filter(|txn| txn.kind == kind) {
            match totals
                .iter_mut()
                .find(|entry| entry.category_id == txn.category_id)
            {
                Some(entry) => {
                    entry.total += txn.amount;
                    entry.transaction_count += 1;
                }
                None => {
                    let label = categories.label_for(&txn.category_id);
                    totals.push(CategoryTotal {
                        category_id: txn.category_id.clone(),
                        name: label.name,
                        color: label.color,
                        total: txn.amount,
                        transaction_count: 1,
                    });
                }
            }
        }
        totals.sort_by(|a, b| b.total.total_cmp(&a.total));
        totals
    }

    /// Twelve monthly summaries for `year`; months without records report zeros.
    pub fn year_overview(months: &MonthMap, year: i32) -> LedgerResult<Vec<MonthSummary>> {
        (1..=12)
            .map(|month| {
                let period = YearMonth::new(year, month)?;
                Ok(months
                    .get(&period.key())
                    .map(MonthlyData::summary)
                    .unwrap_or_else(|| MonthlyData::empty(period).summary()))
            })
            .collect()
    }
}
