//! Application router configuration.

use axum::{Router, middleware, routing::get};

use crate::{
    AppState, endpoints,
    logging::logging_middleware,
    report_api::{get_report, get_report_chart, get_transaction_totals},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::REPORT, get(get_report))
        .route(endpoints::REPORT_CHART, get(get_report_chart))
        .route(endpoints::TRANSACTION_TOTALS, get(get_transaction_totals))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}
