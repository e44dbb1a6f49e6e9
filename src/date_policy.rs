//! The single place that decides whether a transaction date is acceptable.
//!
//! Every input path (the report service and the report CLI) goes through
//! these functions rather than comparing dates on its own, so that "today"
//! always means the same thing: the calendar date in the configured timezone.

use time::Date;

use crate::{Error, transaction::Transaction};

/// Check that `date` is not after `today`.
///
/// # Errors
/// Returns [Error::FutureDate] if `date` is after `today`.
pub fn validate_not_future(date: Date, today: Date) -> Result<Date, Error> {
    if date > today {
        Err(Error::FutureDate(date))
    } else {
        Ok(date)
    }
}

/// Drop transactions dated after `today`, logging each one that is dropped.
pub fn retain_past_transactions(transactions: &mut Vec<Transaction>, today: Date) {
    transactions.retain(|transaction| match validate_not_future(transaction.date, today) {
        Ok(_) => true,
        Err(error) => {
            tracing::warn!("ignoring {} transaction: {error}", transaction.kind);
            false
        }
    });
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{retain_past_transactions, validate_not_future};
    use crate::{
        Error,
        transaction::{Transaction, TransactionType},
    };

    #[test]
    fn today_is_allowed() {
        let today = date!(2025 - 02 - 14);

        assert_eq!(validate_not_future(today, today), Ok(today));
    }

    #[test]
    fn tomorrow_is_rejected() {
        let today = date!(2025 - 02 - 14);
        let tomorrow = date!(2025 - 02 - 15);

        assert_eq!(
            validate_not_future(tomorrow, today),
            Err(Error::FutureDate(tomorrow))
        );
    }

    #[test]
    fn retain_past_transactions_drops_only_future_dates() {
        let today = date!(2025 - 02 - 14);
        let mut transactions = vec![
            Transaction::build(10.0, TransactionType::Income, date!(2025 - 02 - 13)),
            Transaction::build(20.0, TransactionType::Income, today),
            Transaction::build(30.0, TransactionType::Income, date!(2025 - 02 - 15)),
        ];

        retain_past_transactions(&mut transactions, today);

        let amounts: Vec<f64> = transactions.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![10.0, 20.0]);
    }
}
