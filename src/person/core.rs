//! Core person domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use unicode_segmentation::UnicodeSegmentation;

use crate::{Error, database_id::DatabaseId};

/// Database identifier for a person.
pub type PersonId = DatabaseId;

/// The age from which a person may record income.
pub const AGE_OF_MAJORITY: u8 = 18;

/// A validated, non-empty person name of at most [PersonName::MAX_LENGTH] characters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct PersonName(String);

impl PersonName {
    /// The maximum number of characters (grapheme clusters) in a name.
    pub const MAX_LENGTH: usize = 200;

    /// Create a person name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// This function will return:
    /// - [Error::EmptyPersonName] if `name` is empty or only whitespace,
    /// - [Error::PersonNameTooLong] if `name` has more than [PersonName::MAX_LENGTH] characters.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            return Err(Error::EmptyPersonName);
        }

        if name.graphemes(true).count() > Self::MAX_LENGTH {
            return Err(Error::PersonNameTooLong(Self::MAX_LENGTH));
        }

        Ok(Self(name.to_owned()))
    }

    /// Create a person name without validation.
    ///
    /// The caller should ensure that the string is not empty and not too long.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PersonName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A person's age in whole years, between [Age::MIN] and [Age::MAX] inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
pub struct Age(u8);

impl Age {
    /// The youngest accepted age.
    pub const MIN: u8 = 1;
    /// The oldest accepted age.
    pub const MAX: u8 = 120;

    /// Create an age.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::InvalidAge] if `age` is outside of
    /// [Age::MIN]..=[Age::MAX].
    pub fn new(age: i64) -> Result<Self, Error> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&age) {
            Ok(Self(age as u8))
        } else {
            Err(Error::InvalidAge(age))
        }
    }

    /// Create an age without validation.
    pub fn new_unchecked(age: u8) -> Self {
        Self(age)
    }

    /// The age in years.
    pub fn years(&self) -> u8 {
        self.0
    }
}

/// A member of the household whose income and expenses are tracked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// The ID of the person.
    pub id: PersonId,
    /// The person's name.
    pub name: PersonName,
    /// The person's age.
    pub age: Age,
    /// When the person was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the person was last updated, `None` if never.
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl Person {
    /// Whether the person is old enough to record income.
    pub fn is_adult(&self) -> bool {
        self.age.years() >= AGE_OF_MAJORITY
    }
}

/// The JSON body for creating or updating a person.
#[derive(Debug, Serialize, Deserialize)]
pub struct PersonForm {
    /// The raw name, validated by [PersonName::new].
    pub name: String,
    /// The age in years, validated by [Age::new].
    pub age: i64,
}

/// A [PersonForm] that has passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPerson {
    /// The trimmed name.
    pub name: PersonName,
    /// The validated age.
    pub age: Age,
}

impl TryFrom<&PersonForm> for ValidatedPerson {
    type Error = Error;

    fn try_from(form: &PersonForm) -> Result<Self, Self::Error> {
        Ok(Self {
            name: PersonName::new(&form.name)?,
            age: Age::new(form.age)?,
        })
    }
}
