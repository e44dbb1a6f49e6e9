//! HTTP handlers that serve reports and chart options as JSON.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    app_state::Clock,
    charts::{ChartView, report_chart},
    date_policy::retain_past_transactions,
    report::{
        CarryOver, Report, ReportAggregator,
        bucket::{PeriodKind, Totals, summarize},
    },
    source::{TransactionSource, carry_over},
    transaction::Transaction,
};

/// The state needed for serving reports.
#[derive(Clone)]
pub struct ReportState {
    /// Where transactions are read from.
    pub source: Arc<dyn TransactionSource>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The source of "now".
    pub clock: Clock,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            source: state.source.clone(),
            local_timezone: state.local_timezone.clone(),
            clock: state.clock,
        }
    }
}

/// Query parameters accepted by the report endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// Canonical timezone name that decides what "today" is.
    pub tz: Option<String>,
    /// The year of a monthly report. Defaults to the current local year.
    pub year: Option<i32>,
    /// How to draw the chart: line, stack or cumulative.
    pub view: Option<String>,
}

/// Get a weekly, monthly or all-time report.
pub async fn get_report(
    State(state): State<ReportState>,
    Path(period): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Report>, Error> {
    build_report(&state, &period, &query).map(Json)
}

/// Get the ECharts options for a report.
pub async fn get_report_chart(
    State(state): State<ReportState>,
    Path(period): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let view = match query.view.as_deref() {
        Some(view) => view.parse()?,
        None => ChartView::default(),
    };
    let report = build_report(&state, &period, &query)?;

    let options = report_chart(&report, view).to_string();
    Ok(([(CONTENT_TYPE, "application/json")], options).into_response())
}

/// Get the unclipped totals of every transaction up to today.
pub async fn get_transaction_totals(
    State(state): State<ReportState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Totals>, Error> {
    let (aggregator, transactions) = load_transactions(&state, &query)?;
    tracing::debug!("summarising transactions up to {}", aggregator.today());

    Ok(Json(summarize(&transactions)))
}

fn build_report(state: &ReportState, period: &str, query: &ReportQuery) -> Result<Report, Error> {
    let period_kind: PeriodKind = period.parse()?;
    let (aggregator, transactions) = load_transactions(state, query)?;
    let today = aggregator.today();

    let year = query.year.unwrap_or(today.year());
    let carry = match period_kind {
        PeriodKind::Monthly => carry_over(&transactions, year, today),
        PeriodKind::Weekly | PeriodKind::Total => CarryOver::default(),
    };

    aggregator
        .report(period_kind, &transactions, Some(year), carry)
        .inspect_err(|error| tracing::error!("could not build {period_kind} report: {error}"))
}

/// Read the transactions as of today in the requested timezone, without
/// any that are dated after today.
fn load_transactions(
    state: &ReportState,
    query: &ReportQuery,
) -> Result<(ReportAggregator, Vec<Transaction>), Error> {
    let timezone = query.tz.as_deref().unwrap_or(&state.local_timezone);
    let aggregator = ReportAggregator::at(timezone, (state.clock)())?;

    let mut transactions = state
        .source
        .transactions()
        .inspect_err(|error| tracing::error!("could not load transactions: {error}"))?;
    retain_past_transactions(&mut transactions, aggregator.today());

    Ok((aggregator, transactions))
}
