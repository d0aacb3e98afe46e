//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The number of characters of a request or response body shown at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The largest request body, in bytes, that is read. Matches the default limit
/// axum applies to JSON bodies.
pub const REQUEST_BODY_SIZE_LIMIT: usize = 2 * 1024 * 1024;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
///
/// Requests with a body larger than [REQUEST_BODY_SIZE_LIMIT] bytes are
/// rejected with `413 Payload Too Large`.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, REQUEST_BODY_SIZE_LIMIT).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!("Could not read request body: {error}");
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
    };
    log_body("Received request", &parts, &String::from_utf8_lossy(&body_bytes));

    let response = next
        .run(Request::from_parts(parts, Body::from(body_bytes)))
        .await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    log_body("Sending response", &parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

fn log_body(message: &str, parts: &impl std::fmt::Debug, body: &str) {
    match truncate(body, LOG_BODY_LENGTH_LIMIT) {
        Some(truncated) => {
            tracing::info!("{message}: {parts:#?}\nbody: {truncated}...");
            tracing::debug!("Full body: {body:?}");
        }
        None => tracing::info!("{message}: {parts:#?}\nbody: {body:?}"),
    }
}

/// The first `limit` characters of `text`, or `None` if `text` is not longer than that.
fn truncate(text: &str, limit: usize) -> Option<&str> {
    text.char_indices()
        .nth(limit)
        .map(|(byte_index, _)| &text[..byte_index])
}


#[cfg(test)]
mod logging_middleware_tests {
    use axum::{Router, http::StatusCode, middleware, routing::post};
    use axum_test::TestServer;

    use super::{REQUEST_BODY_SIZE_LIMIT, logging_middleware};

    fn get_test_server() -> TestServer {
        let app = Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn(logging_middleware));

        TestServer::new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn passes_bodies_through() {
        let server = get_test_server();
        let body = "x".repeat(super::LOG_BODY_LENGTH_LIMIT * 2);

        let response = server.post("/echo").text(&body).await;

        response.assert_status_ok();
        response.assert_text(body);
    }

    #[tokio::test]
    async fn rejects_oversized_request_body() {
        let server = get_test_server();
        let body = "x".repeat(REQUEST_BODY_SIZE_LIMIT + 1);

        let response = server.post("/echo").text(&body).await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    }
}
