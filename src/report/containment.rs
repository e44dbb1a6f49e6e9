//! Clipping expenses and savings so that they always fit inside income.
//!
//! Expenses are clipped against income first, then savings are clipped
//! against whatever income is left after expenses, and the remainder is
//! whatever is left after both. Expenses therefore win when expenses and
//! savings compete for the same income.

use serde::Serialize;

use crate::report::sums::Sums;

/// An income-contained view of one bucket.
///
/// `expense + savings + remaining == income` for every contained bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ContainedBucket {
    /// The income, clamped to be non-negative.
    pub income: f64,
    /// Expenses, at most `income`.
    pub expense: f64,
    /// Savings, at most the income left after expenses.
    pub savings: f64,
    /// Income left after expenses and savings.
    pub remaining: f64,
    /// Whether the raw expenses plus savings exceeded income.
    pub overspent: bool,
}

/// A series of contained buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContainedSeries {
    /// The contained buckets in the same order as the input.
    pub buckets: Vec<ContainedBucket>,
    /// Whether any bucket was overspent.
    pub overspend_any: bool,
}

impl ContainedSeries {
    /// Income of each bucket.
    pub fn income(&self) -> Vec<f64> {
        self.column(|bucket| bucket.income)
    }

    /// Contained expenses of each bucket.
    pub fn expense(&self) -> Vec<f64> {
        self.column(|bucket| bucket.expense)
    }

    /// Contained savings of each bucket.
    pub fn savings(&self) -> Vec<f64> {
        self.column(|bucket| bucket.savings)
    }

    /// Remaining income of each bucket.
    pub fn remaining(&self) -> Vec<f64> {
        self.column(|bucket| bucket.remaining)
    }

    fn column(&self, field: impl Fn(&ContainedBucket) -> f64) -> Vec<f64> {
        self.buckets.iter().map(field).collect()
    }
}

/// Clip the expenses and savings of `sums` so they fit inside its income.
///
/// Negative and NaN amounts are treated as zero before clipping, so every
/// output is non-negative.
pub fn normalize(sums: &Sums) -> ContainedBucket {
    let raw = sums.clamped();
    let income = raw.income;

    let expense = raw.expense.min(income);
    let savings = raw.savings.min((income - expense).max(0.0));
    let remaining = (income - expense - savings).max(0.0);

    ContainedBucket {
        income,
        expense,
        savings,
        remaining,
        overspent: raw.expense + raw.savings > income,
    }
}

/// Clip every bucket in `buckets` and report whether any was overspent.
pub fn normalize_series(buckets: &[Sums]) -> ContainedSeries {
    let buckets: Vec<ContainedBucket> = buckets.iter().map(normalize).collect();
    let overspend_any = buckets.iter().any(|bucket| bucket.overspent);

    ContainedSeries {
        buckets,
        overspend_any,
    }
}

#[cfg(test)]
mod tests {
    use super::{ContainedBucket, normalize, normalize_series};
    use crate::report::sums::Sums;

    const CENT: f64 = 0.005;

    fn assert_contained(bucket: &ContainedBucket) {
        assert!(bucket.expense >= 0.0, "negative expense in {bucket:?}");
        assert!(bucket.savings >= 0.0, "negative savings in {bucket:?}");
        assert!(bucket.remaining >= 0.0, "negative remaining in {bucket:?}");

        let sum = bucket.expense + bucket.savings + bucket.remaining;
        assert!(
            (sum - bucket.income).abs() < CENT,
            "expense + savings + remaining = {sum}, want {} in {bucket:?}",
            bucket.income
        );
    }

    #[test]
    fn expense_is_clipped_before_savings() {
        let got = normalize_series(&[Sums::new(100.0, 80.0, 80.0)]);

        assert_eq!(
            got.buckets[0],
            ContainedBucket {
                income: 100.0,
                expense: 80.0,
                savings: 20.0,
                remaining: 0.0,
                overspent: true,
            }
        );
        assert!(got.overspend_any);
    }

    #[test]
    fn zero_income_contains_nothing() {
        let got = normalize_series(&[Sums::new(0.0, 50.0, 30.0)]);

        assert_eq!(
            got.buckets[0],
            ContainedBucket {
                income: 0.0,
                expense: 0.0,
                savings: 0.0,
                remaining: 0.0,
                overspent: true,
            }
        );
        assert!(got.overspend_any);
    }

    #[test]
    fn within_income_is_unchanged() {
        let got = normalize(&Sums::new(100.0, 30.0, 20.0));

        assert_eq!(got.expense, 30.0);
        assert_eq!(got.savings, 20.0);
        assert_eq!(got.remaining, 50.0);
        assert!(!got.overspent);
    }

    #[test]
    fn expense_alone_above_income_leaves_no_savings() {
        let got = normalize(&Sums::new(100.0, 150.0, 10.0));

        assert_eq!(got.expense, 100.0);
        assert_eq!(got.savings, 0.0);
        assert_eq!(got.remaining, 0.0);
        assert!(got.overspent);
    }

    #[test]
    fn overspend_any_is_false_when_every_bucket_fits() {
        let got = normalize_series(&[Sums::new(100.0, 50.0, 50.0), Sums::new(10.0, 0.0, 0.0)]);

        assert!(!got.overspend_any);
        assert_eq!(got.remaining(), vec![0.0, 10.0]);
    }

    #[test]
    fn negative_and_nan_inputs_are_treated_as_zero() {
        let got = normalize(&Sums::new(-100.0, f64::NAN, -5.0));

        assert_eq!(got, ContainedBucket::default());
    }

    #[test]
    fn every_combination_sums_to_income() {
        let amounts = [0.0, 0.01, 0.1, 0.2, 0.3, 19.99, 33.33, 100.0, 1234.56, -7.0];

        for &income in &amounts {
            for &expense in &amounts {
                for &savings in &amounts {
                    assert_contained(&normalize(&Sums::new(income, expense, savings)));
                }
            }
        }
    }

    #[test]
    fn normalize_is_deterministic() {
        let series = [Sums::new(0.1, 0.2, 0.3), Sums::new(1e9, 1.0, 1e-9)];

        assert_eq!(normalize_series(&series), normalize_series(&series));
    }
}
