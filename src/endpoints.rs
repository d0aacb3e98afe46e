//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/persons/{person_id}', use [format_endpoint].

use std::fmt::Display;

/// The route to list and create persons.
pub const PERSONS: &str = "/api/persons";
/// The route to get, update and delete a single person.
pub const PERSON: &str = "/api/persons/{person_id}";
/// The route for the income and expense totals of every person.
pub const PERSON_SUMMARY: &str = "/api/persons/summary";
/// The route for the transactions of a single person.
pub const PERSON_TRANSACTIONS: &str = "/api/persons/{person_id}/transactions";
/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route for the income and expense totals of every category.
pub const CATEGORY_SUMMARY: &str = "/api/categories/summary";
/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/persons/{person_id}', '{person_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: impl Display) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
