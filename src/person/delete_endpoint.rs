//! Defines the endpoint for deleting a person.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    person::{PersonId, delete_person},
};

/// The state needed to delete a person.
#[derive(Debug, Clone)]
pub struct DeletePersonState {
    /// The database connection for managing persons.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeletePersonState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a person and their transactions.
///
/// Responds with `204 No Content` on success and `404 Not Found` if the
/// person does not exist.
pub async fn delete_person_endpoint(
    State(state): State<DeletePersonState>,
    Path(person_id): Path<PersonId>,
) -> Result<StatusCode, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match delete_person(person_id, &connection) {
        Ok(()) => {
            tracing::info!("Deleted person {person_id}");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(Error::DeleteMissingPerson) => Err(Error::DeleteMissingPerson),
        Err(error) => {
            tracing::error!("Could not delete person {person_id}: {error}");
            Err(error)
        }
    }
}
