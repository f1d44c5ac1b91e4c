//! Business logic helpers for managing one month's transactions.

use crate::core::services::CategoryRegistry;
use crate::domain::ledger::MonthlyData;
use crate::domain::transaction::{Transaction, TransactionInput, TransactionUpdate};
use crate::errors::{LedgerError, LedgerResult};

/// Provides validated mutations over a [`MonthlyData`] record.
///
/// Every successful mutation leaves the record's totals recalculated.
pub struct TransactionService;

impl TransactionService {
    /// Appends a new transaction and returns it with its assigned id.
    pub fn add(
        month: &mut MonthlyData,
        input: TransactionInput,
        categories: &CategoryRegistry,
    ) -> LedgerResult<Transaction> {
        let input = Self::validate_input(input, categories)?;
        let txn = Transaction::from_input(input);
        month.transactions.push(txn.clone());
        month.recalculate();
        Ok(txn)
    }

    /// Merges `update` into the transaction identified by `id`.
    ///
    /// Returns `Ok(false)` without touching the record when `id` is not in `month`.
    pub fn update(
        month: &mut MonthlyData,
        id: &str,
        update: TransactionUpdate,
        categories: &CategoryRegistry,
    ) -> LedgerResult<bool> {
        let Some(current) = month.transaction(id) else {
            return Ok(false);
        };
        // A category that was deleted after the fact stays valid until it is changed.
        let category_changed = update
            .category_id
            .as_deref()
            .is_some_and(|category| category != current.category_id);
        let mut candidate = current.clone();
        candidate.apply(update);
        validate_description(&candidate.description)?;
        validate_amount(candidate.amount)?;
        if category_changed {
            validate_category(&candidate.category_id, categories)?;
        }
        candidate.description = candidate.description.trim().to_string();

        if let Some(txn) = month.transaction_mut(id) {
            *txn = candidate;
        }
        month.recalculate();
        Ok(true)
    }

    /// Removes the transaction identified by `id`, returning the removed instance.
    pub fn remove(month: &mut MonthlyData, id: &str) -> Option<Transaction> {
        let removed = month.remove_transaction(id)?;
        month.recalculate();
        Some(removed)
    }

    /// Checks a new transaction before it touches any state.
    pub fn validate_input(
        mut input: TransactionInput,
        categories: &CategoryRegistry,
    ) -> LedgerResult<TransactionInput> {
        validate_description(&input.description)?;
        validate_amount(input.amount)?;
        validate_category(&input.category_id, categories)?;
        input.description = input.description.trim().to_string();
        Ok(input)
    }
}

fn validate_description(description: &str) -> LedgerResult<()> {
    if description.trim().is_empty() {
        return Err(LedgerError::validation("description must not be empty"));
    }
    Ok(())
}

fn validate_amount(amount: f64) -> LedgerResult<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(LedgerError::validation(format!(
            "amount must be a positive number, got {amount}"
        )));
    }
    Ok(())
}

fn validate_category(category_id: &str, categories: &CategoryRegistry) -> LedgerResult<()> {
    if category_id.trim().is_empty() {
        return Err(LedgerError::validation("a category is required"));
    }
    if !categories.contains(category_id) {
        return Err(LedgerError::validation(format!(
            "category `{category_id}` does not exist"
        )));
    }
    Ok(())
}
