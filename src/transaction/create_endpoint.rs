//! Defines the endpoint and business rules for recording a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::get_category,
    person::get_person,
    transaction::{
        TransactionDescription, TransactionForm, TransactionType, TransactionView,
        ValidatedTransaction, insert_transaction, validate_value,
    },
};

/// Validate `form` against the household rules and store it.
///
/// The checks run in this order and the first failure is returned:
/// 1. the description is not empty and not too long,
/// 2. the value is positive and can be stored,
/// 3. the person and category IDs are not nil ([Error::MissingId]),
/// 4. the person exists ([Error::PersonNotFound]),
/// 5. the category exists ([Error::CategoryNotFound]),
/// 6. minors only record expenses ([Error::MinorCannotRecordIncome]),
/// 7. the category's purpose allows the transaction type ([Error::IncompatibleCategory]).
pub fn create_transaction(
    form: &TransactionForm,
    connection: &Connection,
) -> Result<TransactionView, Error> {
    let description = TransactionDescription::new(&form.description)?;
    let value = validate_value(form.value)?;

    if form.person_id.is_nil() {
        return Err(Error::MissingId("personId"));
    }

    if form.category_id.is_nil() {
        return Err(Error::MissingId("categoryId"));
    }

    let person = get_person(form.person_id, connection).map_err(|error| match error {
        Error::NotFound => Error::PersonNotFound(form.person_id),
        error => error,
    })?;

    let category = get_category(form.category_id, connection).map_err(|error| match error {
        Error::NotFound => Error::CategoryNotFound(form.category_id),
        error => error,
    })?;

    if form.transaction_type == TransactionType::Income && !person.is_adult() {
        return Err(Error::MinorCannotRecordIncome);
    }

    if !category.purpose.allows(form.transaction_type) {
        return Err(Error::IncompatibleCategory {
            description: category.description.to_string(),
            purpose: category.purpose,
            transaction_type: form.transaction_type,
        });
    }

    let transaction = insert_transaction(
        ValidatedTransaction {
            description,
            value,
            transaction_type: form.transaction_type,
            person_id: person.id,
            category_id: category.id,
        },
        connection,
    )?;

    Ok(TransactionView::new(
        transaction,
        person.name.as_ref(),
        category.description.as_ref(),
    ))
}

/// The state needed for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction, responds with `201 Created`
/// and the transaction including its person name and category description.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    body: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(form) = body?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = create_transaction(&form, &connection).inspect_err(|error| {
        tracing::debug!("Rejected transaction {form:?}: {error}");
    })?;
    tracing::info!(
        "Created {} transaction {} for person {}",
        transaction.transaction_type,
        transaction.id,
        transaction.person_id
    );

    Ok((StatusCode::CREATED, Json(transaction)).into_response())
}
