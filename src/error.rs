//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    category::{CategoryId, CategoryPurpose},
    person::PersonId,
    transaction::TransactionType,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string, or a string of only whitespace, was used as a person's name.
    #[error("name cannot be empty")]
    EmptyPersonName,

    /// A person's name was longer than the limit given in characters.
    #[error("name must be at most {0} characters long")]
    PersonNameTooLong(usize),

    /// A person's age was outside of the accepted range.
    #[error("age must be between 1 and 120, got {0}")]
    InvalidAge(i64),

    /// An empty string, or a string of only whitespace, was used as a description.
    #[error("description cannot be empty")]
    EmptyDescription,

    /// A description was shorter than the minimum given in characters.
    #[error("description must be at least {0} characters long")]
    DescriptionTooShort(usize),

    /// A description was longer than the limit given in characters.
    #[error("description must be at most {0} characters long")]
    DescriptionTooLong(usize),

    /// A transaction value was zero, negative, or not a number.
    ///
    /// Whether a transaction adds or removes money is given by its type, so
    /// the value itself must always be positive.
    #[error("value must be greater than zero, got {0}")]
    NonPositiveValue(f64),

    /// A transaction value was not less than the given limit.
    #[error("value must be less than {0}")]
    ValueTooLarge(f64),

    /// A category purpose stored in the database or given by the client is unknown.
    #[error("unknown category purpose \"{0}\", expected one of Despesa, Receita or Ambas")]
    InvalidCategoryPurpose(String),

    /// A transaction type stored in the database or given by the client is unknown.
    #[error("unknown transaction type \"{0}\", expected one of Despesa or Receita")]
    InvalidTransactionType(String),

    /// The request body could not be parsed as the expected JSON document.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// A required ID field was the nil UUID. Holds the name of the field.
    #[error("{0} is required")]
    MissingId(&'static str),

    /// The person ID used to create a transaction did not match a person.
    #[error("could not find a person with the ID {0}")]
    PersonNotFound(PersonId),

    /// The category ID used to create a transaction did not match a category.
    #[error("could not find a category with the ID {0}")]
    CategoryNotFound(CategoryId),

    /// A person under 18 tried to record income.
    #[error("minors can only record expenses, persons under 18 cannot record income")]
    MinorCannotRecordIncome,

    /// The category's purpose does not allow the type of the transaction.
    #[error(
        "the category \"{description}\" with purpose {purpose} cannot be used for {transaction_type} transactions"
    )]
    IncompatibleCategory {
        /// The description of the category.
        description: String,
        /// The purpose of the category.
        purpose: CategoryPurpose,
        /// The type of the rejected transaction.
        transaction_type: TransactionType,
    },

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a person that does not exist
    #[error("tried to update a person that is not in the database")]
    UpdateMissingPerson,

    /// Tried to delete a person that does not exist
    #[error("tried to delete a person that is not in the database")]
    DeleteMissingPerson,

    /// A query was given an ID that does not refer to an existing row.
    #[error("a referenced row does not exist")]
    InvalidForeignKey,

    /// Tried to delete a row that other rows still refer to, e.g. a category
    /// with transactions.
    #[error("the resource is still in use and cannot be deleted")]
    StillReferenced,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 787 => {
                Error::InvalidForeignKey
            }
            // Code 1811 occurs when an ON DELETE RESTRICT action blocked a delete.
            rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 1811 => {
                Error::StillReferenced
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequestBody(rejection.body_text())
    }
}

impl Error {
    /// The HTTP status code the client should see for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::EmptyPersonName
            | Error::PersonNameTooLong(_)
            | Error::InvalidAge(_)
            | Error::EmptyDescription
            | Error::DescriptionTooShort(_)
            | Error::DescriptionTooLong(_)
            | Error::NonPositiveValue(_)
            | Error::ValueTooLarge(_)
            | Error::InvalidCategoryPurpose(_)
            | Error::InvalidTransactionType(_)
            | Error::InvalidRequestBody(_)
            | Error::MissingId(_)
            | Error::MinorCannotRecordIncome
            | Error::IncompatibleCategory { .. }
            | Error::InvalidForeignKey => StatusCode::BAD_REQUEST,
            Error::PersonNotFound(_)
            | Error::CategoryNotFound(_)
            | Error::NotFound
            | Error::UpdateMissingPerson
            | Error::DeleteMissingPerson => StatusCode::NOT_FOUND,
            Error::StillReferenced => StatusCode::CONFLICT,
            Error::SqlError(_) | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Internal errors are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod from_sql_error_tests {
    use crate::Error;

    #[test]
    fn no_rows_is_not_found() {
        let error = Error::from(rusqlite::Error::QueryReturnedNoRows);

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn foreign_key_violation_is_invalid_foreign_key() {
        let sql_error = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: rusqlite::ErrorCode::ConstraintViolation,
                extended_code: 787,
            },
            Some("FOREIGN KEY constraint failed".to_owned()),
        );

        assert_eq!(Error::from(sql_error), Error::InvalidForeignKey);
    }

    #[test]
    fn restrict_violation_is_still_referenced() {
        let sql_error = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: rusqlite::ErrorCode::ConstraintViolation,
                extended_code: 1811,
            },
            Some("FOREIGN KEY constraint failed".to_owned()),
        );

        assert_eq!(Error::from(sql_error), Error::StillReferenced);
    }
}
