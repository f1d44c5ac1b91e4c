#![doc(test(attr(deny(warnings))))]

//! Finance Ledger keeps income and expense transactions partitioned by calendar
//! month, derives each month's totals, and carries a month's closing balance into
//! the next one on request.
//!
//! [`FinanceStore`](crate::core::FinanceStore) is the entry point; persistence goes through
//! the [`KeyValueStore`](crate::storage::KeyValueStore) port.

pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

pub use crate::core::FinanceStore;
pub use crate::errors::{LedgerError, LedgerResult};

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    if utils::init_tracing() {
        tracing::info!("Finance Ledger tracing initialized.");
    }
}

/// Initializes tracing with the log filter from `config`.
///
/// Fails when the filter does not parse. If tracing was already initialized, the
/// filter is not applied and a warning is logged instead.
pub fn init_with(config: &config::Config) -> LedgerResult<()> {
    if utils::init_tracing_with(&config.log_filter)? {
        tracing::info!(filter = %config.log_filter, "Finance Ledger tracing initialized.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_does_not_panic() {
        init();
        init();
    }

    #[test]
    fn init_with_uses_config_filter() {
        let config = config::Config {
            log_filter: "finance_ledger=debug".into(),
            ..config::Config::default()
        };
        assert!(init_with(&config).is_ok());

        let broken = config::Config {
            log_filter: "finance_ledger=loud".into(),
            ..config::Config::default()
        };
        assert!(matches!(init_with(&broken), Err(LedgerError::Config(_))));
    }
}
