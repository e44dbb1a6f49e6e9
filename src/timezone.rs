//! Resolving canonical timezone names, e.g. "Pacific/Auckland", to local dates.
//!
//! Reports never read the system clock or the host timezone themselves, the
//! caller passes "now" and a timezone name in.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// The timezone used when the caller does not name one.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Get the UTC offset of `canonical_timezone` at the instant `at`.
///
/// Returns `None` if the name is not a known canonical timezone.
pub fn get_local_offset(canonical_timezone: &str, at: OffsetDateTime) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&at).to_utc())
}

/// Get the calendar date in `canonical_timezone` at the instant `now`.
///
/// # Errors
/// Returns [Error::InvalidTimezone] if the name is not a known canonical timezone.
pub fn local_today(canonical_timezone: &str, now: OffsetDateTime) -> Result<Date, Error> {
    let offset = get_local_offset(canonical_timezone, now).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", canonical_timezone);
        Error::InvalidTimezone(canonical_timezone.to_owned())
    })?;

    Ok(now.to_offset(offset).date())
}
