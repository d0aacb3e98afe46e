//! Defines the endpoint for creating a new person.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    person::{PersonForm, ValidatedPerson, create_person},
};

/// The state needed to create a person.
#[derive(Debug, Clone)]
pub struct CreatePersonState {
    /// The database connection for managing persons.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreatePersonState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new person.
///
/// Responds with `201 Created`, the new person as JSON and a `Location`
/// header pointing at the person.
pub async fn create_person_endpoint(
    State(state): State<CreatePersonState>,
    body: Result<Json<PersonForm>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(form) = body?;
    let person = ValidatedPerson::try_from(&form)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let person = create_person(person, &connection).inspect_err(|error| {
        tracing::error!("Could not create person with {form:?}, got an unexpected error: {error}")
    })?;
    tracing::info!("Created person {}", person.id);

    let location = endpoints::format_endpoint(endpoints::PERSON, person.id);

    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(person)).into_response())
}
