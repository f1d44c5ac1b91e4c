use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::category::Category;
use crate::domain::common::EntryKind;
use crate::domain::month::{MonthKey, YearMonth};
use crate::domain::transaction::Transaction;

/// Month-keyed transaction partitions.
pub type MonthMap = BTreeMap<MonthKey, MonthlyData>;

/// One month's transactions plus the totals derived from them.
///
/// Totals are only ever written by [`MonthlyData::recalculate`], which every mutation
/// path calls before the record is exposed again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyData {
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub total_income: f64,
    #[serde(default)]
    pub total_expense: f64,
    #[serde(default)]
    pub balance: f64,
}

impl MonthlyData {
    pub fn empty(period: YearMonth) -> Self {
        Self {
            year: period.year,
            month: period.month,
            transactions: Vec::new(),
            total_income: 0.0,
            total_expense: 0.0,
            balance: 0.0,
        }
    }

    pub fn period(&self) -> YearMonth {
        YearMonth {
            year: self.year,
            month: self.month,
        }
    }

    pub fn recalculate(&mut self) {
        let (income, expense) =
            self.transactions
                .iter()
                .fold((0.0, 0.0), |(income, expense), txn| match txn.kind {
                    EntryKind::Income => (income + txn.amount, expense),
                    EntryKind::Expense => (income, expense + txn.amount),
                });
        self.total_income = income;
        self.total_expense = expense;
        self.balance = income - expense;
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn transaction_mut(&mut self, id: &str) -> Option<&mut Transaction> {
        self.transactions.iter_mut().find(|txn| txn.id == id)
    }

    pub fn remove_transaction(&mut self, id: &str) -> Option<Transaction> {
        let index = self.transactions.iter().position(|txn| txn.id == id)?;
        Some(self.transactions.remove(index))
    }

    pub fn has_carry_forward(&self) -> bool {
        self.transactions.iter().any(Transaction::is_carry_forward)
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Transactions ordered newest date first; ties keep insertion order.
    pub fn transactions_by_date(&self) -> Vec<&Transaction> {
        let mut sorted: Vec<&Transaction> = self.transactions.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }

    pub fn summary(&self) -> MonthSummary {
        MonthSummary {
            period: self.period(),
            total_income: self.total_income,
            total_expense: self.total_expense,
            balance: self.balance,
            transaction_count: self.transactions.len(),
        }
    }
}

/// Totals of one month without its transaction list.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthSummary {
    pub period: YearMonth,
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub transaction_count: usize,
}

/// Sum of one category's transactions within a month.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category_id: String,
    pub name: String,
    pub color: String,
    pub total: f64,
    pub transaction_count: usize,
}

/// State of the "carry last month's balance" prompt for the viewed month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarryForwardState {
    /// Nothing to carry: the previous month has no record or a zero balance.
    Idle,
    /// The previous month closed with a non-zero balance that has not been handled.
    Pending { previous_balance: f64 },
    /// The month already holds a transfer transaction.
    Accepted,
    /// The prompt was dismissed for this month.
    Rejected,
}

impl CarryForwardState {
    pub fn is_pending(&self) -> bool {
        matches!(self, CarryForwardState::Pending { .. })
    }
}

/// Whole-state export of both persisted records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSnapshot {
    pub categories: Vec<Category>,
    pub monthly_data: MonthMap,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction::TransactionInput;
    use chrono::NaiveDate;

    fn march() -> YearMonth {
        YearMonth::new(2024, 3).unwrap()
    }

    fn txn(input: TransactionInput) -> Transaction {
        Transaction::from_input(input)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn recalculate_matches_transaction_sums() {
        let mut data = MonthlyData::empty(march());
        data.transactions
            .push(txn(TransactionInput::income("Salary", 3000.0, "salary", day(1))));
        data.transactions
            .push(txn(TransactionInput::expense("Rent", 1200.0, "housing", day(5))));
        data.transactions
            .push(txn(TransactionInput::expense("Lunch", 25.5, "food", day(6))));
        data.recalculate();
        assert_eq!(data.total_income, 3000.0);
        assert_eq!(data.total_expense, 1225.5);
        assert_eq!(data.balance, 1774.5);
    }

    #[test]
    fn stale_totals_are_replaced() {
        let mut data = MonthlyData::empty(march());
        data.total_income = 99.0;
        data.balance = 99.0;
        data.recalculate();
        assert_eq!(data.total_income, 0.0);
        assert_eq!(data.balance, 0.0);
    }

    #[test]
    fn sorted_view_is_newest_first() {
        let mut data = MonthlyData::empty(march());
        data.transactions
            .push(txn(TransactionInput::expense("Early", 1.0, "food", day(2))));
        data.transactions
            .push(txn(TransactionInput::expense("Late", 1.0, "food", day(20))));
        let sorted = data.transactions_by_date();
        assert_eq!(sorted[0].description, "Late");
        assert_eq!(sorted[1].description, "Early");
    }

    #[test]
    fn persisted_shape_matches_monthly_record() {
        let data = MonthlyData::empty(march());
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["totalIncome"], 0.0);
        assert_eq!(json["totalExpense"], 0.0);
        assert_eq!(json["month"], 3);
    }
}
