use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::category::is_transfer_id;
use crate::domain::common::{new_id, EntryKind};

/// A single income or expense entry recorded against a month.
///
/// `amount` is always positive; `kind` decides which total it feeds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub category_id: String,
    pub date: NaiveDate,
}

impl Transaction {
    pub fn from_input(input: TransactionInput) -> Self {
        Self {
            id: new_id(),
            description: input.description,
            amount: input.amount,
            kind: input.kind,
            category_id: input.category_id,
            date: input.date,
        }
    }

    /// Returns `true` for entries created by the balance carry-forward workflow.
    pub fn is_carry_forward(&self) -> bool {
        is_transfer_id(&self.category_id)
    }

    /// Applies the fields present in `update`.
    pub fn apply(&mut self, update: TransactionUpdate) {
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(kind) = update.kind {
            self.kind = kind;
        }
        if let Some(category_id) = update.category_id {
            self.category_id = category_id;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
    }

    /// Amount with the sign implied by `kind`.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            EntryKind::Income => self.amount,
            EntryKind::Expense => -self.amount,
        }
    }
}

/// User-supplied fields for a new transaction. The id is assigned on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionInput {
    pub description: String,
    pub amount: f64,
    pub kind: EntryKind,
    pub category_id: String,
    pub date: NaiveDate,
}

impl TransactionInput {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        kind: EntryKind,
        category_id: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            kind,
            category_id: category_id.into(),
            date,
        }
    }

    pub fn income(
        description: impl Into<String>,
        amount: f64,
        category_id: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self::new(description, amount, EntryKind::Income, category_id, date)
    }

    pub fn expense(
        description: impl Into<String>,
        amount: f64,
        category_id: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self::new(description, amount, EntryKind::Expense, category_id, date)
    }
}

impl From<&Transaction> for TransactionInput {
    fn from(txn: &Transaction) -> Self {
        Self {
            description: txn.description.clone(),
            amount: txn.amount,
            kind: txn.kind,
            category_id: txn.category_id.clone(),
            date: txn.date,
        }
    }
}

/// Field mask for transaction edits. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionUpdate {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub kind: Option<EntryKind>,
    pub category_id: Option<String>,
    pub date: Option<NaiveDate>,
}

impl TransactionUpdate {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

impl From<TransactionInput> for TransactionUpdate {
    fn from(input: TransactionInput) -> Self {
        Self {
            description: Some(input.description),
            amount: Some(input.amount),
            kind: Some(input.kind),
            category_id: Some(input.category_id),
            date: Some(input.date),
        }
    }
}
