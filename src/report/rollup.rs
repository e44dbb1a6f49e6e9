//! Running totals across the months of a year.
//!
//! The series starts from a carry baseline, the sums of everything before the
//! year, which the caller computes and passes in.

use serde::Serialize;

use crate::report::{
    containment::{ContainedBucket, ContainedSeries, normalize},
    sums::Sums,
};

/// Carry-forward totals for each month of a year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CumulativeSeries {
    /// Baseline plus the running sum of the raw monthly buckets.
    pub raw: Vec<Sums>,
    /// The raw cumulative sums clipped to income, zeroed after the latest month.
    pub contained: ContainedSeries,
}

/// Accumulate `raw_monthly` on top of `carry_baseline`.
///
/// `raw_monthly[i]` holds the sums of month `i + 1`. Entry `i` of the result
/// is the baseline plus the sums of months `1..=i + 1`. Contained entries for
/// months after `latest_month` (1-based) are zero rather than carried forward
/// flat, and every entry is zero when `latest_month` is `None`.
pub fn rollup(
    raw_monthly: &[Sums],
    carry_baseline: Sums,
    latest_month: Option<u8>,
) -> CumulativeSeries {
    let raw: Vec<Sums> = raw_monthly
        .iter()
        .scan(carry_baseline.clamped(), |running, month| {
            *running += month.clamped();
            Some(*running)
        })
        .collect();

    let buckets: Vec<ContainedBucket> = raw
        .iter()
        .enumerate()
        .map(|(index, sums)| {
            let month = index + 1;

            match latest_month {
                Some(latest) if month <= latest as usize => normalize(sums),
                _ => ContainedBucket::default(),
            }
        })
        .collect();
    let overspend_any = buckets.iter().any(|bucket| bucket.overspent);

    CumulativeSeries {
        raw,
        contained: ContainedSeries {
            buckets,
            overspend_any,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::rollup;
    use crate::report::{containment::ContainedBucket, sums::Sums};

    #[test]
    fn accumulates_on_top_of_baseline() {
        let baseline = Sums::new(1000.0, 400.0, 100.0);
        let months = [Sums::new(200.0, 50.0, 0.0), Sums::new(300.0, 100.0, 50.0)];

        let got = rollup(&months, baseline, Some(2));

        assert_eq!(got.contained.income(), vec![1200.0, 1500.0]);
        assert_eq!(got.contained.expense(), vec![450.0, 550.0]);
        assert_eq!(got.contained.savings(), vec![100.0, 150.0]);
        assert_eq!(got.contained.remaining(), vec![650.0, 800.0]);
        assert!(!got.contained.overspend_any);
    }

    #[test]
    fn months_after_latest_are_zeroed() {
        let baseline = Sums::new(1000.0, 400.0, 100.0);
        let mut months = vec![Sums::new(200.0, 50.0, 0.0), Sums::new(300.0, 100.0, 50.0)];
        months.extend([Sums::default(); 10]);

        let got = rollup(&months, baseline, Some(2));

        assert_eq!(got.contained.buckets.len(), 12);
        assert_eq!(got.contained.buckets[1].income, 1500.0);
        assert!(
            got.contained.buckets[2..]
                .iter()
                .all(|bucket| *bucket == ContainedBucket::default())
        );
        // The raw running totals still carry forward.
        assert_eq!(got.raw[11], Sums::new(1500.0, 550.0, 150.0));
    }

    #[test]
    fn no_latest_month_zeroes_everything() {
        let got = rollup(&[Sums::new(10.0, 0.0, 0.0)], Sums::new(5.0, 0.0, 0.0), None);

        assert_eq!(got.raw, vec![Sums::new(15.0, 0.0, 0.0)]);
        assert_eq!(got.contained.buckets, vec![ContainedBucket::default()]);
    }

    #[test]
    fn cumulative_entries_are_clipped_to_income() {
        let baseline = Sums::new(100.0, 90.0, 0.0);
        let months = [Sums::new(0.0, 50.0, 20.0), Sums::new(200.0, 0.0, 0.0)];

        let got = rollup(&months, baseline, Some(2));

        assert_eq!(
            got.contained.buckets[0],
            ContainedBucket {
                income: 100.0,
                expense: 100.0,
                savings: 0.0,
                remaining: 0.0,
                overspent: true,
            }
        );
        assert_eq!(got.contained.buckets[1].expense, 140.0);
        assert_eq!(got.contained.buckets[1].savings, 20.0);
        assert_eq!(got.contained.buckets[1].remaining, 140.0);
        assert!(got.contained.overspend_any);
    }

    #[test]
    fn empty_year_is_empty_series() {
        let got = rollup(&[], Sums::new(1.0, 2.0, 3.0), Some(12));

        assert!(got.raw.is_empty());
        assert!(got.contained.buckets.is_empty());
    }
}
