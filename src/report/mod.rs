//! Turns a flat list of dated transactions into period reports for charting.
//!
//! The pipeline runs in one direction:
//! - [bucket]: transactions to per-period sums plus a future mask
//! - [containment]: per-period sums to income-contained sums plus an overspend flag
//! - [rollup]: monthly sums to a carry-forward series (monthly reports only)
//!
//! [ReportAggregator] ties the three together. Every call recomputes its
//! report from scratch and nothing is cached.

pub mod bucket;
pub mod containment;
pub mod rollup;
pub mod sums;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    report::{
        bucket::{
            BucketOptions, PeriodBucket, PeriodKind, Totals, all_time_bucket, bucketize,
            bucketize_week, summarize,
        },
        containment::{ContainedBucket, ContainedSeries, normalize, normalize_series},
        rollup::{CumulativeSeries, rollup},
        sums::Sums,
    },
    transaction::Transaction,
};

/// Data about earlier periods that a monthly report needs but cannot compute
/// from the transactions of the year alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CarryOver {
    /// The sums of every transaction before the reported year.
    pub baseline: Sums,
    /// The last month (1-based) of the reported year that the cumulative
    /// series should cover, or `None` if no month should be shown.
    pub latest_month: Option<u8>,
}

/// This week, Monday to Sunday.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyReport {
    /// One bucket per day.
    pub buckets: Vec<PeriodBucket>,
    /// `true` for the days after today.
    pub future_mask: Vec<bool>,
    /// The daily buckets clipped to income.
    pub contained: ContainedSeries,
    /// The contained days collapsed into one bucket.
    pub week: ContainedBucket,
}

/// The months of one year, with a carry-forward series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReport {
    /// The reported year.
    pub year: i32,
    /// One bucket per month, January to December.
    pub buckets: Vec<PeriodBucket>,
    /// `true` for the months after the current month.
    pub future_mask: Vec<bool>,
    /// The monthly buckets clipped to income.
    pub contained: ContainedSeries,
    /// Running totals starting from the carry baseline.
    pub cumulative: CumulativeSeries,
}

/// The whole history in one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalReport {
    /// The single all-time bucket.
    pub bucket: PeriodBucket,
    /// The all-time bucket clipped to income.
    pub contained: ContainedBucket,
    /// The unclipped totals and balance.
    pub totals: Totals,
}

/// A report of any period kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "period", rename_all = "lowercase")]
pub enum Report {
    /// See [WeeklyReport].
    Weekly(WeeklyReport),
    /// See [MonthlyReport].
    Monthly(MonthlyReport),
    /// See [TotalReport].
    Total(TotalReport),
}

impl Report {
    /// The kind of period the report covers.
    pub fn period_kind(&self) -> PeriodKind {
        match self {
            Report::Weekly(_) => PeriodKind::Weekly,
            Report::Monthly(_) => PeriodKind::Monthly,
            Report::Total(_) => PeriodKind::Total,
        }
    }
}

/// Builds reports as seen from a fixed local date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportAggregator {
    today: Date,
}

impl ReportAggregator {
    /// Create an aggregator for reports as seen on `today`.
    pub fn new(today: Date) -> Self {
        Self { today }
    }

    /// Create an aggregator for reports as seen at the instant `now` in `canonical_timezone`.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] if the timezone name is not recognised.
    pub fn at(canonical_timezone: &str, now: OffsetDateTime) -> Result<Self, Error> {
        BucketOptions::at(canonical_timezone, now).map(|options| Self::new(options.today))
    }

    /// The local date the reports are built for.
    pub fn today(&self) -> Date {
        self.today
    }

    /// Build a report for `period_kind`.
    ///
    /// `year` and `carry_over` are only used for monthly reports.
    ///
    /// # Errors
    /// Returns [Error::MissingYear] for a monthly report without a year, or
    /// [Error::InvalidYear] if the year cannot be represented as a date.
    pub fn report(
        &self,
        period_kind: PeriodKind,
        transactions: &[Transaction],
        year: Option<i32>,
        carry_over: CarryOver,
    ) -> Result<Report, Error> {
        match period_kind {
            PeriodKind::Weekly => self.weekly(transactions).map(Report::Weekly),
            PeriodKind::Monthly => {
                let year = year.ok_or(Error::MissingYear)?;
                self.monthly(transactions, year, carry_over)
                    .map(Report::Monthly)
            }
            PeriodKind::Total => Ok(Report::Total(self.total(transactions))),
        }
    }

    /// Build the report for the week containing today.
    ///
    /// The week total is summed from the contained days, so spending on a
    /// day without income never eats into income earned on another day.
    ///
    /// # Errors
    /// Returns [Error::WeekOutOfRange] if the week runs past the range of
    /// representable dates.
    pub fn weekly(&self, transactions: &[Transaction]) -> Result<WeeklyReport, Error> {
        let bucketed = bucketize_week(transactions, self.today)?;
        let contained = normalize_series(&bucketed.sums());

        let contained_days: Vec<Sums> = contained
            .buckets
            .iter()
            .map(|day| Sums::new(day.income, day.expense, day.savings))
            .collect();

        Ok(WeeklyReport {
            week: normalize(&Sums::total(&contained_days)),
            contained,
            buckets: bucketed.buckets,
            future_mask: bucketed.future_mask,
        })
    }

    /// Build the report for the months of `year`.
    ///
    /// # Errors
    /// Returns [Error::InvalidYear] if the year cannot be represented as a date.
    pub fn monthly(
        &self,
        transactions: &[Transaction],
        year: i32,
        carry_over: CarryOver,
    ) -> Result<MonthlyReport, Error> {
        let options = BucketOptions::new(self.today).year(year);
        let bucketed = bucketize(transactions, PeriodKind::Monthly, &options)?;
        let sums = bucketed.sums();

        Ok(MonthlyReport {
            year,
            contained: normalize_series(&sums),
            cumulative: rollup(&sums, carry_over.baseline, carry_over.latest_month),
            buckets: bucketed.buckets,
            future_mask: bucketed.future_mask,
        })
    }

    /// Build the all-time report.
    pub fn total(&self, transactions: &[Transaction]) -> TotalReport {
        let bucket = all_time_bucket(transactions, self.today);

        TotalReport {
            contained: normalize(&bucket.sums),
            totals: summarize(transactions),
            bucket,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::{
        Date,
        macros::{date, datetime},
    };

    use super::{CarryOver, Report, ReportAggregator};
    use crate::{
        Error,
        report::{bucket::PeriodKind, sums::Sums},
        transaction::{Transaction, TransactionType},
    };

    const WEDNESDAY: time::Date = date!(2024 - 06 - 05);

    fn transaction(amount: f64, kind: TransactionType, date: time::Date) -> Transaction {
        Transaction::build(amount, kind, date)
    }

    #[test]
    fn weekly_report_collapses_the_contained_days() {
        let transactions = [
            transaction(100.0, TransactionType::Income, date!(2024 - 06 - 03)),
            transaction(80.0, TransactionType::Expense, date!(2024 - 06 - 04)),
            transaction(80.0, TransactionType::Savings, WEDNESDAY),
        ];

        let got = ReportAggregator::new(WEDNESDAY).weekly(&transactions).unwrap();

        assert_eq!(got.buckets.len(), 7);
        // Tuesday and Wednesday have no income, so nothing is spent or saved.
        assert_eq!(got.week.income, 100.0);
        assert_eq!(got.week.expense, 0.0);
        assert_eq!(got.week.savings, 0.0);
        assert_eq!(got.week.remaining, 100.0);
        assert!(!got.week.overspent);
        assert!(got.contained.overspend_any);
        assert_eq!(got.future_mask.iter().filter(|&&masked| masked).count(), 4);
    }

    #[test]
    fn weekly_total_keeps_spending_covered_on_the_same_day() {
        let transactions = [
            transaction(100.0, TransactionType::Income, date!(2024 - 06 - 03)),
            transaction(30.0, TransactionType::Expense, date!(2024 - 06 - 03)),
            transaction(20.0, TransactionType::Savings, date!(2024 - 06 - 03)),
            transaction(50.0, TransactionType::Expense, date!(2024 - 06 - 04)),
        ];

        let got = ReportAggregator::new(WEDNESDAY).weekly(&transactions).unwrap();

        assert_eq!(got.week.expense, 30.0);
        assert_eq!(got.week.savings, 20.0);
        assert_eq!(got.week.remaining, 50.0);
    }

    #[test]
    fn weekly_report_at_the_end_of_time_is_an_error() {
        let got = ReportAggregator::new(Date::MAX).weekly(&[]);

        assert_eq!(got, Err(Error::WeekOutOfRange(Date::MAX)));
    }

    #[test]
    fn monthly_report_includes_cumulative_series() {
        let transactions = [
            transaction(200.0, TransactionType::Income, date!(2024 - 01 - 10)),
            transaction(50.0, TransactionType::Expense, date!(2024 - 01 - 11)),
            transaction(300.0, TransactionType::Income, date!(2024 - 02 - 01)),
            transaction(100.0, TransactionType::Expense, date!(2024 - 02 - 02)),
            transaction(50.0, TransactionType::Savings, date!(2024 - 02 - 03)),
        ];
        let carry_over = CarryOver {
            baseline: Sums::new(1000.0, 400.0, 100.0),
            latest_month: Some(2),
        };

        let got = ReportAggregator::new(WEDNESDAY)
            .monthly(&transactions, 2024, carry_over)
            .unwrap();

        assert_eq!(got.buckets.len(), 12);
        assert_eq!(got.cumulative.contained.income()[..2], [1200.0, 1500.0]);
        assert_eq!(got.cumulative.contained.expense()[..2], [450.0, 550.0]);
        assert!(got.cumulative.contained.income()[2..].iter().all(|&v| v == 0.0));
        assert!(!got.contained.overspend_any);
    }

    #[test]
    fn total_report_keeps_negative_balance() {
        let transactions = [
            transaction(100.0, TransactionType::Income, date!(2023 - 01 - 10)),
            transaction(120.0, TransactionType::Expense, date!(2024 - 01 - 11)),
        ];

        let got = ReportAggregator::new(WEDNESDAY).total(&transactions);

        assert_eq!(got.totals.balance, -20.0);
        assert_eq!(got.contained.expense, 100.0);
        assert_eq!(got.contained.remaining, 0.0);
        assert!(got.contained.overspent);
    }

    #[test]
    fn report_dispatches_on_period_kind() {
        let aggregator = ReportAggregator::new(WEDNESDAY);

        for kind in [PeriodKind::Weekly, PeriodKind::Monthly, PeriodKind::Total] {
            let report = aggregator
                .report(kind, &[], Some(2024), CarryOver::default())
                .unwrap();
            assert_eq!(report.period_kind(), kind);
        }
    }

    #[test]
    fn monthly_report_without_year_is_an_error() {
        let got = ReportAggregator::new(WEDNESDAY).report(
            PeriodKind::Monthly,
            &[],
            None,
            CarryOver::default(),
        );

        assert_eq!(got, Err(Error::MissingYear));
    }

    #[test]
    fn aggregator_resolves_today_in_timezone() {
        let aggregator =
            ReportAggregator::at("Pacific/Auckland", datetime!(2024-06-04 14:30 UTC)).unwrap();

        assert_eq!(aggregator.today(), WEDNESDAY);
    }

    #[test]
    fn reports_are_idempotent() {
        let transactions = [
            transaction(0.1, TransactionType::Income, WEDNESDAY),
            transaction(0.7, TransactionType::Expense, WEDNESDAY),
        ];
        let aggregator = ReportAggregator::new(WEDNESDAY);

        assert_eq!(
            aggregator.weekly(&transactions),
            aggregator.weekly(&transactions)
        );
        assert!(matches!(
            aggregator.report(PeriodKind::Total, &transactions, None, CarryOver::default()),
            Ok(Report::Total(_))
        ));
    }
}
