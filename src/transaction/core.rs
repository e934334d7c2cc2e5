//! Defines the core data models for transactions as exchanged with the finance API.
//!
//! The finance API is loose about its JSON: dates may arrive under `date` or
//! `transactionDate`, as strings or component arrays, and amounts may be
//! strings or `null`. Everything is normalized here during deserialization so
//! the rest of the crate only ever sees [Transaction] in its canonical form.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};
use time::{Date, macros::format_description};

/// The label used for transactions without a category.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// The ID the finance API assigns to a transaction.
pub type TransactionId = i64;

time::serde::format_description!(api_date, Date, "[year]-[month]-[day]");

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money earned.
    #[serde(rename = "RECEITA", alias = "INCOME", alias = "income")]
    Income,
    /// Money spent.
    #[serde(rename = "DESPESA", alias = "EXPENSE", alias = "expense")]
    Expense,
}

impl TransactionType {
    /// The human readable name of the type.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }

    /// The value used for this type in HTML forms.
    pub fn form_value(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "TransactionRecord")]
pub struct Transaction {
    /// The ID of the transaction, `None` for transactions that have not been
    /// saved yet (e.g., an import preview).
    pub id: Option<TransactionId>,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned in this transaction.
    ///
    /// Values that are missing, non-numeric or non-finite are read as zero.
    pub amount: f64,
    /// Whether the transaction is an income or an expense.
    #[serde(rename = "type")]
    pub type_: TransactionType,
    /// The free-text category, if any.
    pub category: Option<String>,
    /// When the transaction happened, `None` if the date was missing or could
    /// not be parsed.
    ///
    /// Read from `date` or `transactionDate`, whichever holds a valid date
    /// first.
    #[serde(
        rename = "transactionDate",
        serialize_with = "api_date::option::serialize"
    )]
    pub date: Option<Date>,
}

/// A transaction as it arrives from the finance API, before the date fields
/// are merged.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionRecord {
    #[serde(default)]
    id: Option<TransactionId>,
    #[serde(default, deserialize_with = "deserialize_description")]
    description: String,
    #[serde(default, deserialize_with = "deserialize_amount")]
    amount: f64,
    #[serde(rename = "type")]
    type_: TransactionType,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_date")]
    date: Option<Date>,
    #[serde(default, deserialize_with = "deserialize_date")]
    transaction_date: Option<Date>,
}

impl From<TransactionRecord> for Transaction {
    fn from(record: TransactionRecord) -> Self {
        Self {
            id: record.id,
            description: record.description,
            amount: record.amount,
            type_: record.type_,
            category: record.category,
            date: record.date.or(record.transaction_date),
        }
    }
}

impl Transaction {
    /// The category to group this transaction under.
    ///
    /// Missing and blank categories resolve to [UNCATEGORIZED_LABEL].
    pub fn category_label(&self) -> &str {
        match self.category.as_deref().map(str::trim) {
            Some(category) if !category.is_empty() => category,
            _ => UNCATEGORIZED_LABEL,
        }
    }

    /// The absolute amount of the transaction, zero if the amount is not a
    /// finite number.
    ///
    /// The sign of `amount` carries no meaning, [Transaction::type_] alone
    /// decides whether the money was earned or spent.
    pub fn magnitude(&self) -> f64 {
        if self.amount.is_finite() {
            self.amount.abs()
        } else {
            0.0
        }
    }
}

/// The body sent to the finance API to create, update or import a transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// When the transaction happened.
    #[serde(with = "api_date::option")]
    pub transaction_date: Option<Date>,
    /// The free-text category, if any.
    pub category: Option<String>,
    /// Whether the transaction is an income or an expense.
    #[serde(rename = "type")]
    pub type_: TransactionType,
}

impl From<&Transaction> for TransactionPayload {
    fn from(transaction: &Transaction) -> Self {
        Self {
            description: transaction.description.clone(),
            amount: transaction.amount,
            transaction_date: transaction.date,
            category: transaction.category.clone(),
            type_: transaction.type_,
        }
    }
}

// ============================================================================
// DESERIALIZATION
// ============================================================================

/// Parse an API date, accepting a plain `YYYY-MM-DD` date or an ISO date-time
/// that starts with one.
///
/// Returns `None` for anything else.
pub fn parse_date(text: &str) -> Option<Date> {
    let text = text.trim();
    let date_part = match text.get(..10) {
        Some(date_part) if text.len() == 10 => date_part,
        Some(date_part) if matches!(text.as_bytes().get(10), Some(b'T' | b't' | b' ')) => {
            date_part
        }
        _ => return None,
    };

    Date::parse(date_part, format_description!("[year]-[month]-[day]")).ok()
}

fn deserialize_description<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(number) => number,
        RawAmount::Text(text) => text.trim().parse().unwrap_or(0.0),
        RawAmount::Other(_) => 0.0,
    };

    Ok(if amount.is_finite() { amount } else { 0.0 })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Text(String),
    Parts((i32, u8, u8)),
    Other(IgnoredAny),
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let date = match RawDate::deserialize(deserializer)? {
        RawDate::Text(text) => parse_date(&text),
        RawDate::Parts((year, month, day)) => time::Month::try_from(month)
            .ok()
            .and_then(|month| Date::from_calendar_date(year, month, day).ok()),
        RawDate::Other(_) => None,
    };

    Ok(date)
}
