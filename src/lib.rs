//! Tallyup turns a list of income, expense and savings transactions into
//! weekly, monthly and all-time reports ready for charting.
//!
//! The reporting core lives in [report] and is free of I/O: it takes the
//! transactions, the local date and (for monthly reports) a carry-over from
//! earlier years, and returns plain numeric series. Around it this library
//! provides a JSON report service built on axum that reads transactions from
//! a [TransactionSource] on every request.

#![warn(missing_docs)]

use tokio::signal;

mod app_state;
mod error;
mod logging;
mod report_api;
mod routing;

pub mod charts;
pub mod date_policy;
pub mod endpoints;
pub mod report;
pub mod source;
pub mod timezone;
pub mod transaction;

pub use app_state::{AppState, Clock};
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use report::{CarryOver, Report, ReportAggregator};
pub use routing::build_router;
pub use source::{InMemorySource, JsonFileSource, TransactionSource};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first.
///
/// Pass it to `axum::serve(..).with_graceful_shutdown` to stop accepting new
/// connections once a signal arrives.
pub async fn graceful_shutdown() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
        },
    }
}
