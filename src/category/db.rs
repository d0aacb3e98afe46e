//! Database operations for categories.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    category::{Category, CategoryDescription, CategoryId, ValidatedCategory},
    database_id::new_database_id,
};

/// Create a category and return it with its generated ID.
pub fn create_category(
    category: ValidatedCategory,
    connection: &Connection,
) -> Result<Category, Error> {
    let id = new_database_id();
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO category (id, description, purpose, created_at) VALUES (?1, ?2, ?3, ?4);",
        (id, category.description.as_ref(), category.purpose, created_at),
    )?;

    Ok(Category {
        id,
        description: category.description,
        purpose: category.purpose,
        created_at,
        updated_at: None,
    })
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, description, purpose, created_at, updated_at FROM category WHERE id = :id;",
        )?
        .query_row(&[(":id", &category_id)], map_category_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by description.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, description, purpose, created_at, updated_at FROM category
            ORDER BY description ASC, created_at ASC;",
        )?
        .query_map([], map_category_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id BLOB PRIMARY KEY,
            description TEXT NOT NULL,
            purpose TEXT NOT NULL CHECK (purpose IN ('Expense', 'Income', 'Both')),
            created_at TEXT NOT NULL,
            updated_at TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_category_description ON category(description);",
    )?;

    Ok(())
}

/// Map a row of `id, description, purpose, created_at, updated_at` to a [Category].
pub fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_description: String = row.get(1)?;
    let purpose = row.get(2)?;
    let created_at = row.get(3)?;
    let updated_at = row.get(4)?;

    Ok(Category {
        id,
        description: CategoryDescription::new_unchecked(&raw_description),
        purpose,
        created_at,
        updated_at,
    })
}

#[cfg(test)]
mod category_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        category::{
            CategoryDescription, CategoryPurpose, ValidatedCategory, create_category,
            get_all_categories, get_category,
        },
        database_id::new_database_id,
        db::initialize,
    };

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    fn category(description: &str, purpose: CategoryPurpose) -> ValidatedCategory {
        ValidatedCategory {
            description: CategoryDescription::new_unchecked(description),
            purpose,
        }
    }

    #[test]
    fn create_category_succeeds() {
        let connection = get_test_db_connection();

        let created = create_category(category("Groceries", CategoryPurpose::Expense), &connection)
            .expect("Could not create category");

        assert_eq!(
            created.description,
            CategoryDescription::new_unchecked("Groceries")
        );
        assert_eq!(created.purpose, CategoryPurpose::Expense);
        assert_eq!(created.updated_at, None);
    }

    #[test]
    fn get_category_round_trips_purpose() {
        let connection = get_test_db_connection();

        for purpose in [
            CategoryPurpose::Expense,
            CategoryPurpose::Income,
            CategoryPurpose::Both,
        ] {
            let inserted = create_category(category("Misc", purpose), &connection).unwrap();

            let selected = get_category(inserted.id, &connection);

            assert_eq!(selected, Ok(inserted));
        }
    }

    #[test]
    fn get_category_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();

        let selected = get_category(new_database_id(), &connection);

        assert_eq!(selected, Err(Error::NotFound));
    }

    #[test]
    fn get_all_categories_sorts_by_description() {
        let connection = get_test_db_connection();
        let salary = create_category(category("Salary", CategoryPurpose::Income), &connection)
            .unwrap();
        let food = create_category(category("Food", CategoryPurpose::Expense), &connection)
            .unwrap();

        let categories = get_all_categories(&connection).expect("Could not get categories");

        assert_eq!(categories, vec![food, salary]);
    }

    #[test]
    fn rejects_unknown_purpose_in_database() {
        let connection = get_test_db_connection();

        let result = connection.execute(
            "INSERT INTO category (id, description, purpose, created_at)
            VALUES (?1, 'Bad', 'Other', '2025-01-01T00:00:00Z')",
            [new_database_id()],
        );

        assert!(result.is_err());
    }
}
