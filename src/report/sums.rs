//! The income, expense and savings triple that every report is built from.

use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::transaction::{Transaction, TransactionType, clamp_amount};

/// Summed income, expense and savings amounts.
///
/// Used for a single period bucket, for the carry baseline of a cumulative
/// series, and for each entry of that series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sums {
    /// Total income.
    pub income: f64,
    /// Total expenses.
    pub expense: f64,
    /// Total moved into savings.
    pub savings: f64,
}

impl Sums {
    /// Create sums from the three amounts as given.
    pub fn new(income: f64, expense: f64, savings: f64) -> Self {
        Self {
            income,
            expense,
            savings,
        }
    }

    /// Add the transaction's amount to the sum matching its type.
    pub fn record(&mut self, transaction: &Transaction) {
        let amount = clamp_amount(transaction.amount);

        match transaction.kind {
            TransactionType::Income => self.income += amount,
            TransactionType::Expense => self.expense += amount,
            TransactionType::Savings => self.savings += amount,
        }
    }

    /// The same sums with every amount clamped to a finite, non-negative value.
    pub fn clamped(self) -> Self {
        Self {
            income: clamp_amount(self.income),
            expense: clamp_amount(self.expense),
            savings: clamp_amount(self.savings),
        }
    }

    /// Whether expenses and savings together exceed income.
    pub fn is_overspent(&self) -> bool {
        let clamped = self.clamped();
        clamped.expense + clamped.savings > clamped.income
    }

    /// Income minus expenses minus savings. Negative when overspent.
    pub fn balance(&self) -> f64 {
        self.income - self.expense - self.savings
    }

    /// Collapse many sums into one.
    pub fn total<'a>(sums: impl IntoIterator<Item = &'a Sums>) -> Sums {
        sums.into_iter().fold(Sums::default(), |total, sums| total + *sums)
    }
}

impl Add for Sums {
    type Output = Sums;

    fn add(self, rhs: Sums) -> Self::Output {
        Sums {
            income: self.income + rhs.income,
            expense: self.expense + rhs.expense,
            savings: self.savings + rhs.savings,
        }
    }
}

impl AddAssign for Sums {
    fn add_assign(&mut self, rhs: Sums) {
        *self = *self + rhs;
    }
}

impl<'a> FromIterator<&'a Transaction> for Sums {
    fn from_iter<T: IntoIterator<Item = &'a Transaction>>(iter: T) -> Self {
        let mut sums = Sums::default();

        for transaction in iter {
            sums.record(transaction);
        }

        sums
    }
}
