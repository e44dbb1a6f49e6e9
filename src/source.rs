//! Where transactions come from, and the figures that are derived from the
//! whole history rather than from a single reporting window.
//!
//! Sources are read again on every request. There is no cache to invalidate
//! and no change notification: a consumer that wants fresh numbers asks again.

use std::{fs, path::PathBuf};

use serde_json::Value;
use time::Date;

use crate::{
    Error,
    report::{CarryOver, sums::Sums},
    transaction::{Transaction, decode_records},
};

/// Supplies the complete list of transactions.
///
/// Each call returns a stable snapshot that a single report is computed from.
pub trait TransactionSource: Send + Sync {
    /// Get every transaction.
    ///
    /// # Errors
    /// Returns an error if the underlying store cannot be read. Malformed
    /// records are skipped rather than reported as errors.
    fn transactions(&self) -> Result<Vec<Transaction>, Error>;
}

/// Reads transactions from a JSON file on every call.
///
/// The file holds either a list of transaction records or an object with
/// the list under `"transactions"`.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Create a source reading from `path`. The file is not opened until the
    /// first call to [TransactionSource::transactions].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TransactionSource for JsonFileSource {
    fn transactions(&self) -> Result<Vec<Transaction>, Error> {
        let text = fs::read_to_string(&self.path)
            .inspect_err(|error| {
                tracing::error!("could not read {}: {error}", self.path.display())
            })
            .map_err(|error| Error::SourceRead(format!("{}: {error}", self.path.display())))?;

        let value: Value = serde_json::from_str(&text)
            .map_err(|error| Error::SourceFormat(format!("{}: {error}", self.path.display())))?;

        let records = match value {
            Value::Object(mut fields) => fields.remove("transactions").unwrap_or(Value::Null),
            other => other,
        };

        Ok(decode_records(&records))
    }
}

/// Holds a fixed list of transactions in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    transactions: Vec<Transaction>,
}

impl From<Vec<Transaction>> for InMemorySource {
    fn from(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }
}

impl TransactionSource for InMemorySource {
    fn transactions(&self) -> Result<Vec<Transaction>, Error> {
        Ok(self.transactions.clone())
    }
}

/// Sum every transaction dated before 1 January of `year`.
pub fn carry_baseline(transactions: &[Transaction], year: i32) -> Sums {
    transactions
        .iter()
        .filter(|transaction| transaction.date.year() < year)
        .collect()
}

/// The last month (1-based) of `year` that a cumulative series should cover.
///
/// A past year is covered in full. For the current year this is the last
/// month with a transaction, no later than the current month. A future year
/// has no months to cover, and neither does a current year without any
/// transactions yet.
pub fn latest_month(transactions: &[Transaction], year: i32, today: Date) -> Option<u8> {
    if year < today.year() {
        return Some(12);
    }

    if year > today.year() {
        return None;
    }

    transactions
        .iter()
        .filter(|transaction| transaction.date.year() == year)
        .map(|transaction| transaction.date.month() as u8)
        .max()
        .map(|month| month.min(today.month() as u8))
}

/// The carry baseline and latest month for a monthly report on `year`.
pub fn carry_over(transactions: &[Transaction], year: i32, today: Date) -> CarryOver {
    CarryOver {
        baseline: carry_baseline(transactions, year),
        latest_month: latest_month(transactions, year, today),
    }
}
