//! Defines the core data models for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    Error, category::CategoryId, database_id::DatabaseId, money::round_to_cents,
    person::PersonId,
};

/// Database identifier for a transaction.
pub type TransactionId = DatabaseId;

/// Whether money was spent or earned.
///
/// Serialized as `Despesa` and `Receita` for the web client, `Expense` and
/// `Income` are also accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money spent.
    #[serde(rename = "Despesa", alias = "Expense")]
    Expense,
    /// Money earned.
    #[serde(rename = "Receita", alias = "Income")]
    Income,
}

impl TransactionType {
    /// The name used in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "Expense",
            TransactionType::Income => "Income",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Expense" | "Despesa" => Ok(TransactionType::Expense),
            "Income" | "Receita" => Ok(TransactionType::Income),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// A non-empty transaction description of at most
/// [TransactionDescription::MAX_LENGTH] characters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct TransactionDescription(String);

impl TransactionDescription {
    /// The maximum number of characters (grapheme clusters) in a description.
    pub const MAX_LENGTH: usize = 400;

    /// Create a transaction description, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// This function will return:
    /// - [Error::EmptyDescription] if `description` is empty or only whitespace,
    /// - [Error::DescriptionTooLong] if it has more than [TransactionDescription::MAX_LENGTH] characters.
    pub fn new(description: &str) -> Result<Self, Error> {
        let description = description.trim();

        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        if description.graphemes(true).count() > Self::MAX_LENGTH {
            return Err(Error::DescriptionTooLong(Self::MAX_LENGTH));
        }

        Ok(Self(description.to_owned()))
    }

    /// Create a transaction description without validation.
    pub fn new_unchecked(description: &str) -> Self {
        Self(description.to_owned())
    }
}

impl AsRef<str> for TransactionDescription {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transaction values must be strictly less than this, i.e. at most 16 digits
/// before the decimal point.
pub const MAX_TRANSACTION_VALUE: f64 = 1e16;

/// Check that `value` is a positive, finite amount and round it to cents.
///
/// # Errors
///
/// Returns [Error::NonPositiveValue] if `value` is NaN, or is zero or
/// less after rounding. Returns [Error::ValueTooLarge] if `value` is not less
/// than [MAX_TRANSACTION_VALUE].
pub fn validate_value(value: f64) -> Result<f64, Error> {
    if value.is_nan() {
        return Err(Error::NonPositiveValue(value));
    }

    if value >= MAX_TRANSACTION_VALUE {
        return Err(Error::ValueTooLarge(MAX_TRANSACTION_VALUE));
    }

    let rounded = round_to_cents(value);

    if rounded <= 0.0 {
        return Err(Error::NonPositiveValue(value));
    }

    Ok(rounded)
}

/// An expense or income recorded by a person against a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// What the money was spent on or earned from.
    pub description: TransactionDescription,
    /// The amount of money, always positive. See [Transaction::transaction_type]
    /// for the direction.
    pub value: f64,
    /// Whether the money was spent or earned.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The person who spent or earned the money.
    pub person_id: PersonId,
    /// The category the transaction belongs to.
    pub category_id: CategoryId,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last updated, `None` if never.
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// A [Transaction] together with the name of its person and the description
/// of its category, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// What the money was spent on or earned from.
    pub description: TransactionDescription,
    /// The amount of money, always positive.
    pub value: f64,
    /// Whether the money was spent or earned.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The ID of the person who recorded the transaction.
    pub person_id: PersonId,
    /// The name of the person who recorded the transaction.
    pub person_name: String,
    /// The ID of the category of the transaction.
    pub category_id: CategoryId,
    /// The description of the category of the transaction.
    pub category_description: String,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last updated, `None` if never.
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl TransactionView {
    /// Attach the person name and category description to `transaction`.
    pub fn new(transaction: Transaction, person_name: &str, category_description: &str) -> Self {
        Self {
            id: transaction.id,
            description: transaction.description,
            value: transaction.value,
            transaction_type: transaction.transaction_type,
            person_id: transaction.person_id,
            person_name: person_name.to_owned(),
            category_id: transaction.category_id,
            category_description: category_description.to_owned(),
            created_at: transaction.created_at,
            updated_at: transaction.updated_at,
        }
    }
}

/// The JSON body for creating a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionForm {
    /// The raw description, validated by [TransactionDescription::new].
    pub description: String,
    /// The amount of money, validated by [validate_value].
    pub value: f64,
    /// Whether the money was spent or earned.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The person recording the transaction.
    pub person_id: PersonId,
    /// The category to record the transaction against.
    pub category_id: CategoryId,
}

/// A transaction whose fields have been checked and whose person and
/// category are known to be compatible with it.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTransaction {
    /// The trimmed description.
    pub description: TransactionDescription,
    /// The value rounded to cents.
    pub value: f64,
    /// Whether the money was spent or earned.
    pub transaction_type: TransactionType,
    /// An existing person allowed to record this type of transaction.
    pub person_id: PersonId,
    /// An existing category whose purpose allows this type of transaction.
    pub category_id: CategoryId,
}


#[cfg(test)]
mod transaction_description_tests {
    use crate::{Error, transaction::TransactionDescription};

    #[test]
    fn new_trims_whitespace() {
        let description = TransactionDescription::new("  Mercado  ").unwrap();

        assert_eq!(description.as_ref(), "Mercado");
    }

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(
            TransactionDescription::new(" \t"),
            Err(Error::EmptyDescription)
        );
    }

    #[test]
    fn new_fails_on_long_description() {
        let description = "x".repeat(TransactionDescription::MAX_LENGTH + 1);

        assert_eq!(
            TransactionDescription::new(&description),
            Err(Error::DescriptionTooLong(TransactionDescription::MAX_LENGTH))
        );
    }

    #[test]
    fn single_character_is_enough() {
        assert!(TransactionDescription::new("x").is_ok());
    }
}
