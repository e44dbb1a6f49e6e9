//! Implements a struct that holds the state of the report server.

use std::sync::Arc;

use time::OffsetDateTime;

use crate::{Error, source::TransactionSource, timezone::get_local_offset};

/// Returns the current instant. Swapped for a fixed instant in tests.
pub type Clock = fn() -> OffsetDateTime;

/// The state of the report server.
#[derive(Clone)]
pub struct AppState {
    /// Where transactions are read from on every request.
    pub source: Arc<dyn TransactionSource>,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// Used when a request does not name its own timezone.
    pub local_timezone: String,

    /// The source of "now".
    pub clock: Clock,
}

impl AppState {
    /// Create a new [AppState] reading transactions from `source`.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] if `local_timezone` is not recognised.
    pub fn new(
        source: impl TransactionSource + 'static,
        local_timezone: &str,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone, OffsetDateTime::now_utc()).is_none() {
            return Err(Error::InvalidTimezone(local_timezone.to_owned()));
        }

        Ok(Self {
            source: Arc::new(source),
            local_timezone: local_timezone.to_owned(),
            clock: OffsetDateTime::now_utc,
        })
    }

    /// Replace the clock, e.g. with a fixed instant for tests.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::AppState;
    use crate::{Error, source::InMemorySource};

    #[test]
    fn rejects_unknown_timezone() {
        let got = AppState::new(InMemorySource::default(), "Atlantis/Central");

        assert_eq!(
            got.err(),
            Some(Error::InvalidTimezone("Atlantis/Central".to_owned()))
        );
    }

    #[test]
    fn accepts_canonical_timezone() {
        let state = AppState::new(InMemorySource::default(), "Asia/Kolkata").unwrap();

        assert_eq!(state.local_timezone, "Asia/Kolkata");
    }
}
