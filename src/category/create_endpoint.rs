//! Defines the endpoint for creating a new category.
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
    category::{CategoryForm, ValidatedCategory, create_category},
};

/// The state needed to create a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new category, responds with `201 Created`
/// and the category as JSON.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryState>,
    body: Result<Json<CategoryForm>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(form) = body?;
    let category = ValidatedCategory::try_from(&form)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = create_category(category, &connection).inspect_err(|error| {
        tracing::error!("Could not create category with {form:?}, got an unexpected error: {error}")
    })?;
    tracing::info!("Created category {} ({})", category.id, category.description);

    Ok((StatusCode::CREATED, Json(category)).into_response())
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        AppState,
        category::{
            Category, CategoryDescription, CategoryPurpose, create_category_endpoint, get_category,
        },
        endpoints,
    };

    fn get_test_server() -> (TestServer, AppState) {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        let state = AppState::new(connection).expect("Could not create app state");
        let app = Router::new()
            .route(endpoints::CATEGORIES, post(create_category_endpoint))
            .with_state(state.clone());

        (
            TestServer::new(app).expect("Could not create test server."),
            state,
        )
    }

    #[tokio::test]
    async fn can_create_category() {
        let (server, state) = get_test_server();

        let response = server
            .post(endpoints::CATEGORIES)
            .json(&json!({ "description": "  Alimentação ", "purpose": "Despesa" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let category = response.json::<Category>();
        assert_eq!(
            category.description,
            CategoryDescription::new_unchecked("Alimentação")
        );
        assert_eq!(category.purpose, CategoryPurpose::Expense);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_category(category.id, &connection), Ok(category));
    }

    #[tokio::test]
    async fn responds_with_client_purpose_names() {
        let (server, _) = get_test_server();

        let response = server
            .post(endpoints::CATEGORIES)
            .json(&json!({ "description": "Salary", "purpose": "Income" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["purpose"], "Receita");
        assert!(body["createdAt"].is_string());
        assert!(body["updatedAt"].is_null());
    }

    #[tokio::test]
    async fn rejects_short_description() {
        let (server, _) = get_test_server();

        let response = server
            .post(endpoints::CATEGORIES)
            .json(&json!({ "description": "ab", "purpose": "Ambas" }))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({
            "error": "description must be at least 3 characters long"
        }));
    }

    #[tokio::test]
    async fn rejects_unknown_purpose() {
        let (server, _) = get_test_server();

        let response = server
            .post(endpoints::CATEGORIES)
            .json(&json!({ "description": "Misc", "purpose": "Outra" }))
            .await;

        response.assert_status_bad_request();
    }
}
