//! Grouping dated transactions into fixed period buckets.
//!
//! Buckets are never omitted: a week always has seven buckets and a year
//! always has twelve, so charts get a fixed axis. Alongside the buckets a
//! future mask marks the periods that have not started yet.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month, OffsetDateTime, Weekday};

use crate::{Error, report::sums::Sums, timezone::local_today, transaction::Transaction};

/// The label of the single bucket produced for [PeriodKind::Total].
pub const ALL_TIME_LABEL: &str = "All time";

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// How transactions are grouped into buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    /// One bucket per day of the current week, Monday to Sunday.
    Weekly,
    /// One bucket per month of a given year.
    Monthly,
    /// A single bucket holding the whole history.
    Total,
}

impl FromStr for PeriodKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "total" => Ok(Self::Total),
            other => Err(Error::InvalidPeriod(other.to_owned())),
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Total => "total",
        };

        f.write_str(name)
    }
}

/// The parameters that bucketing depends on besides the transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketOptions {
    /// The year to split into months. Required for [PeriodKind::Monthly].
    pub year: Option<i32>,
    /// The local calendar date that "now" falls on.
    pub today: Date,
}

impl BucketOptions {
    /// Options for reports as seen on `today`, without a year.
    pub fn new(today: Date) -> Self {
        Self { year: None, today }
    }

    /// Options for reports as seen at the instant `now` in `canonical_timezone`.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] if the timezone name is not recognised.
    pub fn at(canonical_timezone: &str, now: OffsetDateTime) -> Result<Self, Error> {
        local_today(canonical_timezone, now).map(Self::new)
    }

    /// Set the year used for monthly buckets.
    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }
}

/// The sums for one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodBucket {
    /// A short display label, e.g. "Mon" or "Jan".
    pub label: String,
    /// The first calendar date of the period.
    pub start: Date,
    /// The summed amounts of the transactions in the period.
    #[serde(flatten)]
    pub sums: Sums,
}

impl PeriodBucket {
    fn empty(label: &str, start: Date) -> Self {
        Self {
            label: label.to_owned(),
            start,
            sums: Sums::default(),
        }
    }
}

/// Buckets in chronological order with a parallel future mask.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucketed {
    /// The buckets in chronological order.
    pub buckets: Vec<PeriodBucket>,
    /// `true` for each bucket whose period starts after today.
    pub future_mask: Vec<bool>,
}

impl Bucketed {
    /// The raw sums of each bucket in order.
    pub fn sums(&self) -> Vec<Sums> {
        self.buckets.iter().map(|bucket| bucket.sums).collect()
    }

    /// The labels of each bucket in order.
    pub fn labels(&self) -> Vec<String> {
        self.buckets
            .iter()
            .map(|bucket| bucket.label.clone())
            .collect()
    }
}

/// The unclipped all-time summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    /// Total income.
    pub income: f64,
    /// Total expenses.
    pub expense: f64,
    /// Total moved into savings.
    pub savings: f64,
    /// Income minus expenses minus savings, negative after overspending.
    pub balance: f64,
}

impl From<Sums> for Totals {
    fn from(sums: Sums) -> Self {
        Self {
            income: sums.income,
            expense: sums.expense,
            savings: sums.savings,
            balance: sums.balance(),
        }
    }
}

/// Group `transactions` into the buckets of `period_kind`.
///
/// Each transaction adds its amount to the sum of its type in the bucket
/// covering its date. Transactions outside every bucket, e.g. last week's
/// for a weekly report, are ignored.
///
/// # Errors
/// Returns [Error::MissingYear] for a monthly report without a year, or
/// [Error::InvalidYear] if the year cannot be represented as a date.
pub fn bucketize(
    transactions: &[Transaction],
    period_kind: PeriodKind,
    options: &BucketOptions,
) -> Result<Bucketed, Error> {
    match period_kind {
        PeriodKind::Weekly => bucketize_week(transactions, options.today),
        PeriodKind::Monthly => {
            let year = options.year.ok_or(Error::MissingYear)?;
            bucketize_year(transactions, year, options.today)
        }
        PeriodKind::Total => Ok(bucketize_all_time(transactions, options.today)),
    }
}

/// Sum every transaction into the all-time summary.
pub fn summarize(transactions: &[Transaction]) -> Totals {
    transactions.iter().collect::<Sums>().into()
}

/// Replace the values of masked buckets with `None` for line charts.
///
/// Values past the end of the mask are kept.
pub fn gapped(values: &[f64], future_mask: &[bool]) -> Vec<Option<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(index, &value)| match future_mask.get(index) {
            Some(true) => None,
            _ => Some(value),
        })
        .collect()
}

/// The first day (Monday) of the week containing `date`, or `None` if that
/// Monday is before the earliest representable date.
pub fn week_start(date: Date) -> Option<Date> {
    let weekday_number = date.weekday().number_from_monday() as i64;
    date.checked_sub(Duration::days(weekday_number - 1))
}

/// The seven daily buckets of the week containing `today`.
///
/// # Errors
/// Returns [Error::WeekOutOfRange] if any day of the week cannot be
/// represented as a date.
pub(crate) fn bucketize_week(
    transactions: &[Transaction],
    today: Date,
) -> Result<Bucketed, Error> {
    let start = week_start(today).ok_or(Error::WeekOutOfRange(today))?;

    let mut buckets = (0..7)
        .map(|offset| {
            start
                .checked_add(Duration::days(offset))
                .map(|day| PeriodBucket::empty(weekday_label(day.weekday()), day))
                .ok_or(Error::WeekOutOfRange(today))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    for transaction in transactions {
        let offset = (transaction.date - start).whole_days();

        if let Some(bucket) = usize::try_from(offset)
            .ok()
            .and_then(|index| buckets.get_mut(index))
        {
            bucket.sums.record(transaction);
        }
    }

    let future_mask = buckets.iter().map(|bucket| bucket.start > today).collect();
    tracing::debug!("bucketed week starting {start} as of {today}");

    Ok(Bucketed {
        buckets,
        future_mask,
    })
}

fn bucketize_year(transactions: &[Transaction], year: i32, today: Date) -> Result<Bucketed, Error> {
    let mut buckets = MONTHS
        .iter()
        .map(|&month| {
            Date::from_calendar_date(year, month, 1)
                .map(|start| PeriodBucket::empty(month_label(month), start))
                .map_err(|_| Error::InvalidYear(year))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    for transaction in transactions.iter().filter(|t| t.date.year() == year) {
        let index = transaction.date.month() as usize - 1;
        buckets[index].sums.record(transaction);
    }

    let future_mask = buckets
        .iter()
        .map(|bucket| is_future_month(bucket.start, today))
        .collect();
    tracing::debug!("bucketed {year} by month as of {today}");

    Ok(Bucketed {
        buckets,
        future_mask,
    })
}

fn bucketize_all_time(transactions: &[Transaction], today: Date) -> Bucketed {
    Bucketed {
        buckets: vec![all_time_bucket(transactions, today)],
        future_mask: vec![false],
    }
}

/// The single bucket holding every transaction, starting at the earliest date.
///
/// `today` is used as the start when there are no transactions.
pub(crate) fn all_time_bucket(transactions: &[Transaction], today: Date) -> PeriodBucket {
    let start = transactions
        .iter()
        .map(|transaction| transaction.date)
        .min()
        .unwrap_or(today);

    PeriodBucket {
        label: ALL_TIME_LABEL.to_owned(),
        start,
        sums: transactions.iter().collect(),
    }
}

fn is_future_month(month_start: Date, today: Date) -> bool {
    (month_start.year(), month_start.month() as u8) > (today.year(), today.month() as u8)
}

/// Formats a month as a three-letter abbreviation, e.g. "Jan".
pub fn month_label(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

/// Formats a weekday as a three-letter abbreviation, e.g. "Mon".
pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "Mon",
        Weekday::Tuesday => "Tue",
        Weekday::Wednesday => "Wed",
        Weekday::Thursday => "Thu",
        Weekday::Friday => "Fri",
        Weekday::Saturday => "Sat",
        Weekday::Sunday => "Sun",
    }
}
