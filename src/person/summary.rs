//! Per-person income and expense totals.

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
    money::{Totals, round_to_cents},
    person::{Age, PersonId, PersonName},
};

/// The income, expenses and balance of a single person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSummary {
    /// The ID of the person.
    pub id: PersonId,
    /// The person's name.
    pub name: PersonName,
    /// The person's age.
    pub age: Age,
    /// The sum of the person's income.
    pub total_income: f64,
    /// The sum of the person's expenses.
    pub total_expense: f64,
    /// `total_income - total_expense`
    pub balance: f64,
}

/// The summary of every person plus the household totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSummaryResponse {
    /// One summary per person, ordered by name.
    pub persons: Vec<PersonSummary>,
    /// The household totals.
    #[serde(flatten)]
    pub totals: Totals,
}

/// Sum the income and expense transactions of every person.
///
/// Persons without transactions are included with zero totals. The result is
/// ordered by name.
pub fn get_person_summaries(connection: &Connection) -> Result<Vec<PersonSummary>, Error> {
    connection
        .prepare(
            "SELECT p.id, p.name, p.age,
                COALESCE(SUM(CASE WHEN t.type = 'Income' THEN t.value END), 0.0),
                COALESCE(SUM(CASE WHEN t.type = 'Expense' THEN t.value END), 0.0)
            FROM person p
            LEFT JOIN \"transaction\" t ON t.person_id = p.id
            GROUP BY p.id
            ORDER BY p.name ASC, p.created_at ASC;",
        )?
        .query_map([], map_summary_row)?
        .map(|maybe_summary| maybe_summary.map_err(|error| error.into()))
        .collect()
}

/// Summarise every person and add up the household totals.
pub fn get_person_summary_response(connection: &Connection) -> Result<PersonSummaryResponse, Error> {
    let persons = get_person_summaries(connection)?;
    let totals = Totals::from_income_and_expenses(
        persons
            .iter()
            .map(|person| (person.total_income, person.total_expense)),
    );

    Ok(PersonSummaryResponse { persons, totals })
}

fn map_summary_row(row: &Row) -> Result<PersonSummary, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let raw_age: u8 = row.get(2)?;
    let total_income = round_to_cents(row.get(3)?);
    let total_expense = round_to_cents(row.get(4)?);

    Ok(PersonSummary {
        id,
        name: PersonName::new_unchecked(&raw_name),
        age: Age::new_unchecked(raw_age),
        total_income,
        total_expense,
        balance: round_to_cents(total_income - total_expense),
    })
}

/// The state needed to summarise persons.
#[derive(Debug, Clone)]
pub struct PersonSummaryState {
    /// The database connection for reading persons and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for PersonSummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with the income and expenses of every person.
pub async fn get_person_summary_endpoint(
    State(state): State<PersonSummaryState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let summary = get_person_summary_response(&connection)?;

    Ok(Json(summary).into_response())
}
