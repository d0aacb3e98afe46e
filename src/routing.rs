//! Application router configuration.

use axum::{
    Json, Router,
    extract::Request,
    http::{StatusCode, Uri, uri::PathAndQuery},
    middleware::map_request,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tower::Layer;

use crate::{
    AppState,
    category::{create_category_endpoint, get_categories_endpoint, get_category_summary_endpoint},
    endpoints,
    person::{
        create_person_endpoint, delete_person_endpoint, edit_person_endpoint,
        get_person_endpoint, get_person_summary_endpoint, get_persons_endpoint,
    },
    transaction::{
        create_transaction_endpoint, get_person_transactions_endpoint, get_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Paths are matched case-insensitively, so `/api/Persons` is the same route
/// as `/api/persons`.
pub fn build_router(state: AppState) -> Router {
    let routes = Router::new()
        .route(
            endpoints::PERSONS,
            get(get_persons_endpoint).post(create_person_endpoint),
        )
        .route(endpoints::PERSON_SUMMARY, get(get_person_summary_endpoint))
        .route(
            endpoints::PERSON,
            get(get_person_endpoint)
                .put(edit_person_endpoint)
                .delete(delete_person_endpoint),
        )
        .route(
            endpoints::PERSON_TRANSACTIONS,
            get(get_person_transactions_endpoint),
        )
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY_SUMMARY,
            get(get_category_summary_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .fallback(get_404_not_found)
        .with_state(state);

    // The path must be rewritten before `routes` matches it, which
    // `Router::layer` cannot do.
    Router::new().fallback_service(map_request(lowercase_path).layer(routes))
}

async fn lowercase_path(mut request: Request) -> Request {
    let path = request.uri().path();

    if !path.bytes().any(|byte| byte.is_ascii_uppercase()) {
        return request;
    }

    let path_and_query = match request.uri().query() {
        Some(query) => format!("{}?{query}", path.to_ascii_lowercase()),
        None => path.to_ascii_lowercase(),
    };

    let mut parts = request.uri().clone().into_parts();
    parts.path_and_query = match path_and_query.parse::<PathAndQuery>() {
        Ok(path_and_query) => Some(path_and_query),
        Err(error) => {
            tracing::warn!("Could not lowercase the path {path_and_query}: {error}");
            return request;
        }
    };

    match Uri::from_parts(parts) {
        Ok(uri) => *request.uri_mut() = uri,
        Err(error) => tracing::warn!("Could not rebuild the URI {path_and_query}: {error}"),
    }

    request
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "the requested resource could not be found" })),
    )
        .into_response()
}
