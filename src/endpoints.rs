//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/reports/{period}', use [format_endpoint].

/// The route for a report of one period kind: weekly, monthly or total.
pub const REPORT: &str = "/api/reports/{period}";
/// The route for the chart options of a report.
pub const REPORT_CHART: &str = "/api/reports/{period}/chart";
/// The route for the unclipped all-time totals.
pub const TRANSACTION_TOTALS: &str = "/api/transactions/totals";

/// Replace the parameter in `endpoint_path` with `value`.
///
/// Only the first parameter is replaced, e.g. `format_endpoint(REPORT, "weekly")`
/// gives "/api/reports/weekly". Paths without a parameter are returned unchanged.
pub fn format_endpoint(endpoint_path: &str, value: &str) -> String {
    match (endpoint_path.find('{'), endpoint_path.find('}')) {
        (Some(start), Some(end)) if start < end => format!(
            "{}{}{}",
            &endpoint_path[..start],
            value,
            &endpoint_path[end + 1..]
        ),
        _ => endpoint_path.to_owned(),
    }
}
