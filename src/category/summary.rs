//! Per-category income and expense totals.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    category::{CategoryDescription, CategoryId, CategoryPurpose},
    money::{Totals, round_to_cents},
};

/// The income, expenses and balance recorded against a single category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    /// The ID of the category.
    pub id: CategoryId,
    /// The description of the category.
    pub description: CategoryDescription,
    /// The purpose of the category.
    pub purpose: CategoryPurpose,
    /// The sum of the income recorded against the category.
    pub total_income: f64,
    /// The sum of the expenses recorded against the category.
    pub total_expense: f64,
    /// `total_income - total_expense`
    pub balance: f64,
}

/// The summary of every category plus the overall totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummaryResponse {
    /// One summary per category, ordered by description.
    pub categories: Vec<CategorySummary>,
    /// The totals across all categories.
    #[serde(flatten)]
    pub totals: Totals,
}

/// Sum the income and expense transactions of every category, ordered by description.
pub fn get_category_summaries(connection: &Connection) -> Result<Vec<CategorySummary>, Error> {
    connection
        .prepare(
            "SELECT c.id, c.description, c.purpose,
                COALESCE(SUM(CASE WHEN t.type = 'Income' THEN t.value END), 0.0),
                COALESCE(SUM(CASE WHEN t.type = 'Expense' THEN t.value END), 0.0)
            FROM category c
            LEFT JOIN \"transaction\" t ON t.category_id = c.id
            GROUP BY c.id
            ORDER BY c.description ASC, c.created_at ASC;",
        )?
        .query_map([], map_summary_row)?
        .map(|maybe_summary| maybe_summary.map_err(|error| error.into()))
        .collect()
}

/// Summarise every category and add up the overall totals.
pub fn get_category_summary_response(
    connection: &Connection,
) -> Result<CategorySummaryResponse, Error> {
    let categories = get_category_summaries(connection)?;
    let totals = Totals::from_income_and_expenses(
        categories
            .iter()
            .map(|category| (category.total_income, category.total_expense)),
    );

    Ok(CategorySummaryResponse { categories, totals })
}

fn map_summary_row(row: &Row) -> Result<CategorySummary, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_description: String = row.get(1)?;
    let purpose = row.get(2)?;
    let total_income = round_to_cents(row.get(3)?);
    let total_expense = round_to_cents(row.get(4)?);

    Ok(CategorySummary {
        id,
        description: CategoryDescription::new_unchecked(&raw_description),
        purpose,
        total_income,
        total_expense,
        balance: round_to_cents(total_income - total_expense),
    })
}

/// The state needed to summarise categories.
#[derive(Debug, Clone)]
pub struct CategorySummaryState {
    /// The database connection for reading categories and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategorySummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with the income and expenses of every category.
pub async fn get_category_summary_endpoint(
    State(state): State<CategorySummaryState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let summary = get_category_summary_response(&connection)?;

    Ok(Json(summary).into_response())
}
