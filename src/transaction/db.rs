//! Database operations for transactions.

use rusqlite::{Connection, Row, types::Type};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::new_database_id,
    person::PersonId,
    transaction::{Transaction, TransactionDescription, TransactionView, ValidatedTransaction},
};

const SELECT_TRANSACTION_VIEW: &str = "SELECT
        t.id, t.description, t.value, t.type,
        t.person_id, p.name, t.category_id, c.description,
        t.created_at, t.updated_at
    FROM \"transaction\" t
    INNER JOIN person p ON p.id = t.person_id
    INNER JOIN category c ON c.id = t.category_id";

/// Insert a transaction and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::InvalidForeignKey] if the person or category does not exist.
pub fn insert_transaction(
    transaction: ValidatedTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let id = new_database_id();
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO \"transaction\" (id, description, value, type, person_id, category_id, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        (
            id,
            transaction.description.as_ref(),
            transaction.value,
            transaction.transaction_type,
            transaction.person_id,
            transaction.category_id,
            created_at,
        ),
    )?;

    Ok(Transaction {
        id,
        description: transaction.description,
        value: transaction.value,
        transaction_type: transaction.transaction_type,
        person_id: transaction.person_id,
        category_id: transaction.category_id,
        created_at,
        updated_at: None,
    })
}

/// Retrieve every transaction, newest first.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<TransactionView>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_TRANSACTION_VIEW} ORDER BY t.created_at DESC, t.rowid DESC;"
        ))?
        .query_map([], map_transaction_view_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the transactions of a single person, newest first.
///
/// An unknown `person_id` yields an empty list, callers that need to tell the
/// difference should check the person exists first.
pub fn get_transactions_for_person(
    person_id: PersonId,
    connection: &Connection,
) -> Result<Vec<TransactionView>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_TRANSACTION_VIEW} WHERE t.person_id = :person_id
            ORDER BY t.created_at DESC, t.rowid DESC;"
        ))?
        .query_map(&[(":person_id", &person_id)], map_transaction_view_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Count the transactions stored in the database.
pub fn count_transactions(connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            let count: i64 = row.get(0)?;
            usize::try_from(count).map_err(|error| {
                rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, Box::new(error))
            })
        })
        .map_err(|error| error.into())
}

/// Initialize the transaction table and indexes.
///
/// Must be called after the person and category tables have been created.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id BLOB PRIMARY KEY,
            description TEXT NOT NULL,
            value REAL NOT NULL CHECK (value > 0),
            type TEXT NOT NULL CHECK (type IN ('Expense', 'Income')),
            person_id BLOB NOT NULL,
            category_id BLOB NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT,
            FOREIGN KEY(person_id) REFERENCES person(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_person_id ON \"transaction\"(person_id);
        CREATE INDEX IF NOT EXISTS idx_transaction_category_id ON \"transaction\"(category_id);
        CREATE INDEX IF NOT EXISTS idx_transaction_type ON \"transaction\"(type);
        CREATE INDEX IF NOT EXISTS idx_transaction_created_at ON \"transaction\"(created_at);",
    )?;

    Ok(())
}

/// Map a row selected with the transaction view columns to a [TransactionView].
pub fn map_transaction_view_row(row: &Row) -> Result<TransactionView, rusqlite::Error> {
    let raw_description: String = row.get(1)?;

    Ok(TransactionView {
        id: row.get(0)?,
        description: TransactionDescription::new_unchecked(&raw_description),
        value: row.get(2)?,
        transaction_type: row.get(3)?,
        person_id: row.get(4)?,
        person_name: row.get(5)?,
        category_id: row.get(6)?,
        category_description: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}
