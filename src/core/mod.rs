pub mod finance_store;
pub mod services;
pub mod time;

pub use finance_store::FinanceStore;
