//! Transactions as seen by the reports, and lenient decoding of raw JSON records.
//!
//! Records come from an external data source that is responsible for schema
//! validation. Decoding here never fails as a whole: a record that is missing
//! its amount, type or date is skipped, and an amount that is negative or not
//! a number counts as zero.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{Date, macros::format_description};

/// Whether money came in, went out, or was moved into savings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
    /// Money set aside. It is neither spent nor available.
    Savings,
}

impl FromStr for TransactionType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "savings" => Ok(Self::Savings),
            _ => Err(()),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Savings => "savings",
        };

        f.write_str(name)
    }
}

/// A single dated amount of income, expense or savings.
///
/// `category` and `note` are carried along for display only, the reports
/// never look at them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The non-negative amount of money.
    pub amount: f64,
    /// What kind of transaction this is.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The calendar day the transaction happened on.
    pub date: Date,
    /// A free-form category, e.g. "Grocery".
    #[serde(default)]
    pub category: String,
    /// A free-form note.
    #[serde(default)]
    pub note: String,
}

impl Transaction {
    /// Create a transaction without a category or note.
    ///
    /// The amount is clamped with [clamp_amount].
    pub fn build(amount: f64, kind: TransactionType, date: Date) -> Self {
        Self {
            amount: clamp_amount(amount),
            kind,
            date,
            category: String::new(),
            note: String::new(),
        }
    }

    /// Set the category.
    pub fn category(mut self, category: &str) -> Self {
        category.clone_into(&mut self.category);
        self
    }

    /// Set the note.
    pub fn note(mut self, note: &str) -> Self {
        note.clone_into(&mut self.note);
        self
    }
}

/// Clamp an amount so that it can be summed safely.
///
/// Negative, NaN and infinite amounts become zero.
pub fn clamp_amount(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

/// Decode a JSON value holding a list of transaction records.
///
/// Anything other than an array decodes to an empty list. Malformed records
/// are skipped and logged at the debug level.
pub fn decode_records(value: &Value) -> Vec<Transaction> {
    let Some(records) = value.as_array() else {
        tracing::warn!("expected a list of transactions, got {}", json_kind(value));
        return Vec::new();
    };

    let transactions: Vec<Transaction> = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let transaction = decode_record(record);

            if transaction.is_none() {
                tracing::debug!("skipping malformed transaction record #{index}: {record}");
            }

            transaction
        })
        .collect();

    if transactions.len() < records.len() {
        tracing::info!(
            "skipped {} of {} transaction records",
            records.len() - transactions.len(),
            records.len()
        );
    }

    transactions
}

/// Decode a single transaction record, or `None` if it is malformed.
///
/// Transaction types other than income, expense and savings are treated as
/// malformed.
pub fn decode_record(record: &Value) -> Option<Transaction> {
    let fields = record.as_object()?;

    let amount = match fields.get("amount")? {
        Value::Null => return None,
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    let kind = fields.get("type")?.as_str()?.parse().ok()?;
    let date = parse_date(fields.get("date")?.as_str()?)?;

    let text_field = |name: &str| {
        fields
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned()
    };

    Some(Transaction {
        amount: clamp_amount(amount),
        kind,
        date,
        category: text_field("category"),
        note: text_field("note"),
    })
}

/// Parse a date written as `YYYY-MM-DD`.
///
/// Anything after the date, such as the time of an ISO 8601 timestamp, is ignored.
pub fn parse_date(text: &str) -> Option<Date> {
    let date_part = text.trim().get(..10)?;

    Date::parse(date_part, format_description!("[year]-[month]-[day]")).ok()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use super::{Transaction, TransactionType, clamp_amount, decode_record, decode_records};

    #[test]
    fn decodes_well_formed_record() {
        let record = json!({
            "amount": 250.5,
            "type": "expense",
            "date": "2024-03-09",
            "category": "Grocery",
            "note": "weekly shop"
        });

        let got = decode_record(&record);

        assert_eq!(
            got,
            Some(
                Transaction::build(250.5, TransactionType::Expense, date!(2024 - 03 - 09))
                    .category("Grocery")
                    .note("weekly shop")
            )
        );
    }

    #[test]
    fn accepts_timestamps_and_numeric_strings() {
        let record = json!({ "amount": "42", "type": "Income", "date": "2024-03-09T00:00:00.000Z" });

        let got = decode_record(&record).unwrap();

        assert_eq!(got.amount, 42.0);
        assert_eq!(got.kind, TransactionType::Income);
        assert_eq!(got.date, date!(2024 - 03 - 09));
    }

    #[test]
    fn negative_and_non_numeric_amounts_count_as_zero() {
        let negative = json!({ "amount": -10, "type": "income", "date": "2024-01-01" });
        let garbage = json!({ "amount": "lots", "type": "income", "date": "2024-01-01" });
        let object = json!({ "amount": {"value": 5}, "type": "income", "date": "2024-01-01" });

        assert_eq!(decode_record(&negative).unwrap().amount, 0.0);
        assert_eq!(decode_record(&garbage).unwrap().amount, 0.0);
        assert_eq!(decode_record(&object).unwrap().amount, 0.0);
    }

    #[test]
    fn skips_records_missing_required_fields() {
        let records = json!([
            { "type": "income", "date": "2024-01-01" },
            { "amount": null, "type": "income", "date": "2024-01-01" },
            { "amount": 5, "date": "2024-01-01" },
            { "amount": 5, "type": "income" },
            { "amount": 5, "type": "transfer", "date": "2024-01-01" },
            { "amount": 5, "type": "income", "date": "yesterday" },
            "not even an object",
            { "amount": 5, "type": "savings", "date": "2024-01-02" },
        ]);

        let got = decode_records(&records);

        assert_eq!(
            got,
            vec![Transaction::build(5.0, TransactionType::Savings, date!(2024 - 01 - 02))]
        );
    }

    #[test]
    fn non_list_input_decodes_to_nothing() {
        assert!(decode_records(&json!({ "amount": 5 })).is_empty());
        assert!(decode_records(&json!(null)).is_empty());
    }

    #[test]
    fn clamp_amount_rejects_nan_and_infinity() {
        assert_eq!(clamp_amount(f64::NAN), 0.0);
        assert_eq!(clamp_amount(f64::INFINITY), 0.0);
        assert_eq!(clamp_amount(-0.01), 0.0);
        assert_eq!(clamp_amount(12.34), 12.34);
    }
}
