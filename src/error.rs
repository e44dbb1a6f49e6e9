//! Defines the crate level error type and its conversion to JSON error responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use time::Date;

/// The errors that may occur while building reports.
///
/// Malformed transaction records are not errors, they are skipped during
/// decoding. Everything here is either a caller mistake or a failure to read
/// the transaction source.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The period kind is not one of "weekly", "monthly" or "total".
    #[error("unknown report period \"{0}\", expected one of weekly, monthly or total")]
    InvalidPeriod(String),

    /// A monthly report was requested without specifying the year.
    #[error("a year is required for monthly reports")]
    MissingYear,

    /// The year is outside the range of representable dates.
    #[error("the year {0} is out of range")]
    InvalidYear(i32),

    /// Some day of the week containing this date cannot be represented.
    #[error("the week of {0} is outside the supported date range")]
    WeekOutOfRange(Date),

    /// The canonical timezone name could not be resolved, e.g. "Mars/Olympus_Mons".
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// A date after the local today was given where only past dates make sense.
    ///
    /// Transactions record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// The chart view is not one of "line", "stack" or "cumulative".
    #[error("unknown chart view \"{0}\", expected one of line, stack or cumulative")]
    InvalidView(String),

    /// The transaction source could not be read, e.g. the file is missing.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("could not read transactions: {0}")]
    SourceRead(String),

    /// The transaction source was read but is not valid JSON.
    #[error("could not parse transactions: {0}")]
    SourceFormat(String),
}

impl Error {
    /// Whether the error was caused by the caller passing a bad argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::InvalidPeriod(_)
                | Error::MissingYear
                | Error::InvalidYear(_)
                | Error::WeekOutOfRange(_)
                | Error::InvalidTimezone(_)
                | Error::FutureDate(_)
                | Error::InvalidView(_)
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if self.is_invalid_argument() {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response();
        }

        // Source errors may contain file paths, keep them in the server logs.
        tracing::error!("An unexpected error occurred: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "An unexpected error occurred, check the server logs for more details."
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use time::Date;

    use super::Error;

    #[test]
    fn argument_errors_are_bad_requests() {
        for error in [
            Error::InvalidPeriod("daily".to_owned()),
            Error::MissingYear,
            Error::InvalidTimezone("Nowhere/Special".to_owned()),
            Error::InvalidView("radar".to_owned()),
            Error::WeekOutOfRange(Date::MAX),
        ] {
            assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn invalid_view_lists_every_view() {
        let message = Error::InvalidView("radar".to_owned()).to_string();

        for view in ["line", "stack", "cumulative"] {
            assert!(message.contains(view), "{message} should mention {view}");
        }
    }

    #[test]
    fn source_errors_are_internal_server_errors() {
        let response = Error::SourceRead("no such file".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
