//! Defines the endpoint for listing categories.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, category::get_all_categories};

/// The state needed to list categories.
#[derive(Debug, Clone)]
pub struct ListCategoriesState {
    /// The database connection for reading categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListCategoriesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with every category as a JSON array.
pub async fn get_categories_endpoint(
    State(state): State<ListCategoriesState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection)?;

    Ok(Json(categories).into_response())
}

#[cfg(test)]
mod tests {
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        AppState,
        category::{
            Category, CategoryDescription, CategoryPurpose, ValidatedCategory, create_category,
            get_categories_endpoint,
        },
        endpoints,
    };

    #[tokio::test]
    async fn lists_categories_by_description() {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        let state = AppState::new(connection).expect("Could not create app state");
        let (transport, rent) = {
            let connection = state.db_connection.lock().unwrap();
            let rent = create_category(
                ValidatedCategory {
                    description: CategoryDescription::new_unchecked("Rent"),
                    purpose: CategoryPurpose::Expense,
                },
                &connection,
            )
            .unwrap();
            let transport = create_category(
                ValidatedCategory {
                    description: CategoryDescription::new_unchecked("Bus fare"),
                    purpose: CategoryPurpose::Both,
                },
                &connection,
            )
            .unwrap();
            (transport, rent)
        };
        let app = Router::new()
            .route(endpoints::CATEGORIES, get(get_categories_endpoint))
            .with_state(state);
        let server = TestServer::new(app).expect("Could not create test server.");

        let response = server.get(endpoints::CATEGORIES).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Category>>(), vec![transport, rent]);
    }
}
