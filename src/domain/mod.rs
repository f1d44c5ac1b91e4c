pub mod category;
pub mod common;
pub mod ledger;
pub mod month;
pub mod transaction;

pub use category::{Category, CategoryLabel, CategoryUpdate, TRANSFER_IN, TRANSFER_OUT};
pub use common::EntryKind;
pub use ledger::{
    CarryForwardState, CategoryTotal, FinanceSnapshot, MonthMap, MonthSummary, MonthlyData,
};
pub use month::{MonthDirection, MonthKey, YearMonth};
pub use transaction::{Transaction, TransactionInput, TransactionUpdate};
