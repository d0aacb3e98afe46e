/*! This module sets up the application's database schema. */

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, category::create_category_table, person::create_person_table,
    transaction::create_transaction_table,
};

/// Enable foreign keys and create the tables for persons, categories and
/// transactions if they do not exist yet.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Has no effect inside a transaction, so it must run first.
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_person_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use crate::db::initialize;

    fn table_names(connection: &Connection) -> Vec<String> {
        connection
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name;")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .map(|name| name.unwrap())
            .collect()
    }

    #[test]
    fn creates_tables() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");

        assert_eq!(
            table_names(&connection),
            vec!["category", "person", "transaction"]
        );
    }

    #[test]
    fn enables_foreign_keys() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        let enabled: bool = connection
            .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
            .unwrap();
        assert!(enabled);
    }

    #[test]
    fn can_initialize_twice() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        assert_eq!(initialize(&connection), Ok(()));
    }
}
