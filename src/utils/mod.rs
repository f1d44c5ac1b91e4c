pub mod paths;

use std::sync::Once;

use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

use crate::errors::{LedgerError, LedgerResult};

static TRACING_INIT: Once = Once::new();

pub const DEFAULT_LOG_FILTER: &str = "finance_ledger=info";

/// Initializes the global tracing subscriber with sensible defaults.
///
/// Returns `true` when this call installed the subscriber.
pub fn init_tracing() -> bool {
    init_tracing_with(DEFAULT_LOG_FILTER).unwrap_or(false)
}

/// Initializes the global tracing subscriber, adding `filter` on top of `RUST_LOG`.
///
/// Only the first call installs a subscriber. Later calls leave it in place and log
/// that `filter` was not applied. An unparsable `filter` is a [`LedgerError::Config`].
pub fn init_tracing_with(filter: &str) -> LedgerResult<bool> {
    let directive: Directive = filter
        .parse()
        .map_err(|err| LedgerError::Config(format!("invalid log filter `{filter}`: {err}")))?;

    let mut installed = false;
    TRACING_INIT.call_once(|| {
        let env_filter = EnvFilter::from_default_env().add_directive(directive);
        installed = fmt().with_env_filter(env_filter).try_init().is_ok();
    });
    if !installed {
        tracing::warn!(filter, "tracing already initialized; log filter not applied");
    }
    Ok(installed)
}
