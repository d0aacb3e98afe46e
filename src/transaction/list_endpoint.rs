//! Defines the endpoints for listing transactions.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    person::{PersonId, get_person},
    transaction::{get_all_transactions, get_transactions_for_person},
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with every transaction, newest first.
pub async fn get_transactions_endpoint(
    State(state): State<ListTransactionsState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_all_transactions(&connection)?;

    Ok(Json(transactions).into_response())
}

/// A route handler that responds with the transactions of one person, newest first.
///
/// Responds with `404 Not Found` if there is no person with the ID.
pub async fn get_person_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Path(person_id): Path<PersonId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_person(person_id, &connection).map_err(|error| match error {
        Error::NotFound => Error::PersonNotFound(person_id),
        error => error,
    })?;

    let transactions = get_transactions_for_person(person_id, &connection)?;

    Ok(Json(transactions).into_response())
}
