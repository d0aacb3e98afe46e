//! Defines the endpoints for listing persons and getting a single person.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    person::{PersonId, get_all_persons, get_person},
};

/// The state needed to read persons.
#[derive(Debug, Clone)]
pub struct GetPersonState {
    /// The database connection for reading persons.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetPersonState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with every person as a JSON array.
pub async fn get_persons_endpoint(State(state): State<GetPersonState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let persons = get_all_persons(&connection)?;

    Ok(Json(persons).into_response())
}

/// A route handler for getting a person by their ID.
///
/// Responds with `404 Not Found` if there is no person with the ID.
pub async fn get_person_endpoint(
    State(state): State<GetPersonState>,
    Path(person_id): Path<PersonId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let person = get_person(person_id, &connection).map_err(|error| match error {
        Error::NotFound => Error::PersonNotFound(person_id),
        error => error,
    })?;

    Ok(Json(person).into_response())
}

#[cfg(test)]
mod tests {
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        AppState,
        database_id::new_database_id,
        endpoints,
        person::{
            Age, Person, PersonName, ValidatedPerson, create_person, get_person_endpoint,
            get_persons_endpoint,
        },
    };

    fn get_test_server() -> (TestServer, AppState) {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        let state = AppState::new(connection).expect("Could not create app state");
        let app = Router::new()
            .route(endpoints::PERSONS, get(get_persons_endpoint))
            .route(endpoints::PERSON, get(get_person_endpoint))
            .with_state(state.clone());

        (
            TestServer::new(app).expect("Could not create test server."),
            state,
        )
    }

    fn insert_person(state: &AppState, name: &str, age: u8) -> Person {
        create_person(
            ValidatedPerson {
                name: PersonName::new_unchecked(name),
                age: Age::new_unchecked(age),
            },
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test person")
    }

    #[tokio::test]
    async fn lists_all_persons() {
        let (server, state) = get_test_server();
        let bob = insert_person(&state, "Bob", 40);
        let alice = insert_person(&state, "Alice", 12);

        let response = server.get(endpoints::PERSONS).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Person>>(), vec![alice, bob]);
    }

    #[tokio::test]
    async fn lists_no_persons() {
        let (server, _) = get_test_server();

        let response = server.get(endpoints::PERSONS).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Person>>(), vec![]);
    }

    #[tokio::test]
    async fn gets_person_by_id() {
        let (server, state) = get_test_server();
        let person = insert_person(&state, "Bob", 40);

        let response = server
            .get(&endpoints::format_endpoint(endpoints::PERSON, person.id))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Person>(), person);
    }

    #[tokio::test]
    async fn missing_person_is_not_found() {
        let (server, _) = get_test_server();

        let response = server
            .get(&endpoints::format_endpoint(
                endpoints::PERSON,
                new_database_id(),
            ))
            .await;

        response.assert_status_not_found();
    }
}
