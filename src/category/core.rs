//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use unicode_segmentation::UnicodeSegmentation;

use crate::{Error, database_id::DatabaseId, transaction::TransactionType};

/// Database identifier for a category.
pub type CategoryId = DatabaseId;

/// What kind of transactions a category may be used for.
///
/// Serialized with the names the web client uses (`Despesa`, `Receita`,
/// `Ambas`), the English names are also accepted when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryPurpose {
    /// Only expenses.
    #[serde(rename = "Despesa", alias = "Expense")]
    Expense,
    /// Only income.
    #[serde(rename = "Receita", alias = "Income")]
    Income,
    /// Expenses and income.
    #[serde(rename = "Ambas", alias = "Both")]
    Both,
}

impl CategoryPurpose {
    /// Whether a transaction of `transaction_type` may use a category with this purpose.
    pub fn allows(&self, transaction_type: TransactionType) -> bool {
        match self {
            CategoryPurpose::Expense => transaction_type == TransactionType::Expense,
            CategoryPurpose::Income => transaction_type == TransactionType::Income,
            CategoryPurpose::Both => true,
        }
    }

    /// The name used in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryPurpose::Expense => "Expense",
            CategoryPurpose::Income => "Income",
            CategoryPurpose::Both => "Both",
        }
    }
}

impl Display for CategoryPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CategoryPurpose {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Expense" | "Despesa" => Ok(CategoryPurpose::Expense),
            "Income" | "Receita" => Ok(CategoryPurpose::Income),
            "Both" | "Ambas" => Ok(CategoryPurpose::Both),
            other => Err(Error::InvalidCategoryPurpose(other.to_owned())),
        }
    }
}

impl ToSql for CategoryPurpose {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for CategoryPurpose {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// A validated category description between [CategoryDescription::MIN_LENGTH]
/// and [CategoryDescription::MAX_LENGTH] characters long.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryDescription(String);

impl CategoryDescription {
    /// The minimum number of characters (grapheme clusters) in a description.
    pub const MIN_LENGTH: usize = 3;
    /// The maximum number of characters (grapheme clusters) in a description.
    pub const MAX_LENGTH: usize = 400;

    /// Create a category description, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// This function will return:
    /// - [Error::EmptyDescription] if `description` is empty or only whitespace,
    /// - [Error::DescriptionTooShort] if it has fewer than [CategoryDescription::MIN_LENGTH] characters,
    /// - [Error::DescriptionTooLong] if it has more than [CategoryDescription::MAX_LENGTH] characters.
    pub fn new(description: &str) -> Result<Self, Error> {
        let description = description.trim();

        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        let length = description.graphemes(true).count();

        if length < Self::MIN_LENGTH {
            return Err(Error::DescriptionTooShort(Self::MIN_LENGTH));
        }

        if length > Self::MAX_LENGTH {
            return Err(Error::DescriptionTooLong(Self::MAX_LENGTH));
        }

        Ok(Self(description.to_owned()))
    }

    /// Create a category description without validation.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because
    /// if the length invariant is violated it will cause incorrect behaviour
    /// but not affect memory safety.
    pub fn new_unchecked(description: &str) -> Self {
        Self(description.to_owned())
    }
}

impl AsRef<str> for CategoryDescription {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A label for transactions (e.g., 'Groceries', 'Salary') that also restricts
/// which type of transaction may use it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// What the category is for, e.g. 'Groceries'.
    pub description: CategoryDescription,
    /// Which transaction types may use the category.
    pub purpose: CategoryPurpose,
    /// When the category was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the category was last updated, `None` if never.
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// The JSON body for creating a category.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryForm {
    /// The raw description, validated by [CategoryDescription::new].
    pub description: String,
    /// The purpose of the new category.
    pub purpose: CategoryPurpose,
}

/// A [CategoryForm] that has passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCategory {
    /// The trimmed description.
    pub description: CategoryDescription,
    /// The purpose of the category.
    pub purpose: CategoryPurpose,
}

impl TryFrom<&CategoryForm> for ValidatedCategory {
    type Error = Error;

    fn try_from(form: &CategoryForm) -> Result<Self, Self::Error> {
        Ok(Self {
            description: CategoryDescription::new(&form.description)?,
            purpose: form.purpose,
        })
    }
}
