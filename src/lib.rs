#![doc(test(attr(deny(warnings))))]

//! gofinances records income and expense transactions in a local key-value
//! store and derives dashboard totals and monthly category breakdowns.

pub mod app;
pub mod errors;
pub mod utils;

pub use app::FinanceApp;
pub use errors::AppError;
pub use gofinances_config;
pub use gofinances_core;
pub use gofinances_domain;
pub use gofinances_storage_json;

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    init_with_filter(None);
}

/// Like [`init`], with a filter directive used when `RUST_LOG` is unset.
pub fn init_with_filter(filter: Option<&str>) {
    utils::init_tracing(filter);
    tracing::info!("gofinances tracing initialized");
}

/// Initializes tracing with the filter stored in `config`.
pub fn init_with_config(config: &gofinances_config::Config) {
    init_with_filter(config.log_filter.as_deref());
}
