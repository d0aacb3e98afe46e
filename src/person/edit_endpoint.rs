//! Defines the endpoint for updating a person.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    person::{PersonForm, PersonId, ValidatedPerson, update_person},
};

/// The state needed to update a person.
#[derive(Debug, Clone)]
pub struct EditPersonState {
    /// The database connection for managing persons.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditPersonState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for replacing a person's name and age, responds with the updated person.
pub async fn edit_person_endpoint(
    State(state): State<EditPersonState>,
    Path(person_id): Path<PersonId>,
    body: Result<Json<PersonForm>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(form) = body?;
    let person = ValidatedPerson::try_from(&form)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match update_person(person_id, person, &connection) {
        Ok(person) => Ok(Json(person).into_response()),
        Err(Error::UpdateMissingPerson) => Err(Error::UpdateMissingPerson),
        Err(error) => {
            tracing::error!("Could not update person {person_id} with {form:?}: {error}");
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, routing::put};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        AppState,
        database_id::new_database_id,
        endpoints,
        person::{
            Age, Person, PersonName, ValidatedPerson, create_person, edit_person_endpoint,
            get_person,
        },
    };

    fn get_test_server() -> (TestServer, AppState) {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        let state = AppState::new(connection).expect("Could not create app state");
        let app = Router::new()
            .route(endpoints::PERSON, put(edit_person_endpoint))
            .with_state(state.clone());

        (
            TestServer::new(app).expect("Could not create test server."),
            state,
        )
    }

    fn insert_person(state: &AppState) -> Person {
        create_person(
            ValidatedPerson {
                name: PersonName::new_unchecked("Original"),
                age: Age::new_unchecked(17),
            },
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test person")
    }

    #[tokio::test]
    async fn can_update_person() {
        let (server, state) = get_test_server();
        let person = insert_person(&state);

        let response = server
            .put(&endpoints::format_endpoint(endpoints::PERSON, person.id))
            .json(&json!({ "name": "Updated", "age": 18 }))
            .await;

        response.assert_status_ok();
        let updated = response.json::<Person>();
        assert_eq!(updated.id, person.id);
        assert_eq!(updated.name, PersonName::new_unchecked("Updated"));
        assert_eq!(updated.age, Age::new_unchecked(18));
        assert!(updated.updated_at.is_some());

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_person(person.id, &connection), Ok(updated));
    }

    #[tokio::test]
    async fn invalid_update_leaves_person_unchanged() {
        let (server, state) = get_test_server();
        let person = insert_person(&state);

        let response = server
            .put(&endpoints::format_endpoint(endpoints::PERSON, person.id))
            .json(&json!({ "name": "", "age": 18 }))
            .await;

        response.assert_status_bad_request();
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_person(person.id, &connection), Ok(person));
    }

    #[tokio::test]
    async fn updating_missing_person_is_not_found() {
        let (server, _) = get_test_server();

        let response = server
            .put(&endpoints::format_endpoint(
                endpoints::PERSON,
                new_database_id(),
            ))
            .json(&json!({ "name": "Nobody", "age": 30 }))
            .await;

        response.assert_status_not_found();
    }
}
