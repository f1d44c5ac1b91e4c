use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which side of the month's totals an entry contributes to.
///
/// Shared by categories and transactions. The two are independent: a transaction's
/// kind is never derived from its category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Income => "Income",
            EntryKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

/// Generates a fresh identifier for user-created entities.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
