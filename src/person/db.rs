//! Database operations for persons.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::new_database_id,
    person::{Age, Person, PersonId, PersonName, ValidatedPerson},
};

/// Create a person and return it with its generated ID.
pub fn create_person(person: ValidatedPerson, connection: &Connection) -> Result<Person, Error> {
    let id = new_database_id();
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO person (id, name, age, created_at) VALUES (?1, ?2, ?3, ?4);",
        (id, person.name.as_ref(), person.age.years(), created_at),
    )?;

    Ok(Person {
        id,
        name: person.name,
        age: person.age,
        created_at,
        updated_at: None,
    })
}

/// Retrieve a single person by ID.
pub fn get_person(person_id: PersonId, connection: &Connection) -> Result<Person, Error> {
    connection
        .prepare(
            "SELECT id, name, age, created_at, updated_at FROM person WHERE id = :id;",
        )?
        .query_row(&[(":id", &person_id)], map_person_row)
        .map_err(|error| error.into())
}

/// Retrieve all persons ordered alphabetically by name.
pub fn get_all_persons(connection: &Connection) -> Result<Vec<Person>, Error> {
    connection
        .prepare(
            "SELECT id, name, age, created_at, updated_at FROM person ORDER BY name ASC, created_at ASC;",
        )?
        .query_map([], map_person_row)?
        .map(|maybe_person| maybe_person.map_err(|error| error.into()))
        .collect()
}

/// Replace a person's name and age and stamp the update time.
///
/// # Errors
///
/// Returns [Error::UpdateMissingPerson] if the person doesn't exist.
pub fn update_person(
    person_id: PersonId,
    person: ValidatedPerson,
    connection: &Connection,
) -> Result<Person, Error> {
    let updated_at = OffsetDateTime::now_utc();

    let rows_affected = connection.execute(
        "UPDATE person SET name = ?1, age = ?2, updated_at = ?3 WHERE id = ?4",
        (person.name.as_ref(), person.age.years(), updated_at, person_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingPerson);
    }

    get_person(person_id, connection)
}

/// Delete a person by ID, along with all of their transactions.
///
/// # Errors
///
/// Returns [Error::DeleteMissingPerson] if the person doesn't exist.
pub fn delete_person(person_id: PersonId, connection: &Connection) -> Result<(), Error> {
    // Transactions are removed by the `ON DELETE CASCADE` on `transaction.person_id`.
    let rows_affected = connection.execute("DELETE FROM person WHERE id = ?1", [person_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingPerson);
    }

    Ok(())
}

/// Initialize the person table and indexes.
pub fn create_person_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS person (
            id BLOB PRIMARY KEY,
            name TEXT NOT NULL,
            age INTEGER NOT NULL CHECK (age BETWEEN 1 AND 120),
            created_at TEXT NOT NULL,
            updated_at TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_person_name ON person(name);",
    )?;

    Ok(())
}

/// Map a row of `id, name, age, created_at, updated_at` to a [Person].
pub fn map_person_row(row: &Row) -> Result<Person, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let raw_age: u8 = row.get(2)?;
    let created_at = row.get(3)?;
    let updated_at = row.get(4)?;

    Ok(Person {
        id,
        name: PersonName::new_unchecked(&raw_name),
        age: Age::new_unchecked(raw_age),
        created_at,
        updated_at,
    })
}

#[cfg(test)]
mod person_query_tests {
    use std::collections::HashSet;

    use rusqlite::Connection;

    use crate::{
        Error,
        database_id::new_database_id,
        db::initialize,
        person::{
            Age, PersonName, ValidatedPerson, create_person, delete_person, get_all_persons,
            get_person, update_person,
        },
    };

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    fn person(name: &str, age: u8) -> ValidatedPerson {
        ValidatedPerson {
            name: PersonName::new_unchecked(name),
            age: Age::new_unchecked(age),
        }
    }

    #[test]
    fn create_person_succeeds() {
        let connection = get_test_db_connection();

        let created = create_person(person("João Silva", 30), &connection)
            .expect("Could not create person");

        assert_eq!(created.name, PersonName::new_unchecked("João Silva"));
        assert_eq!(created.age, Age::new_unchecked(30));
        assert_eq!(created.updated_at, None);
    }

    #[test]
    fn create_person_generates_unique_ids() {
        let connection = get_test_db_connection();

        let first = create_person(person("Ana", 20), &connection).unwrap();
        let second = create_person(person("Ana", 20), &connection).unwrap();

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn get_person_succeeds() {
        let connection = get_test_db_connection();
        let inserted = create_person(person("Foo", 42), &connection).unwrap();

        let selected = get_person(inserted.id, &connection);

        assert_eq!(selected, Ok(inserted));
    }

    #[test]
    fn get_person_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();
        create_person(person("Foo", 42), &connection).unwrap();

        let selected = get_person(new_database_id(), &connection);

        assert_eq!(selected, Err(Error::NotFound));
    }

    #[test]
    fn get_all_persons_returns_every_person_sorted_by_name() {
        let connection = get_test_db_connection();
        let zoe = create_person(person("Zoe", 30), &connection).unwrap();
        let ana = create_person(person("Ana", 17), &connection).unwrap();

        let persons = get_all_persons(&connection).expect("Could not get persons");

        assert_eq!(persons, vec![ana, zoe]);
    }

    #[test]
    fn get_all_persons_on_empty_table_is_empty() {
        let connection = get_test_db_connection();

        let persons = get_all_persons(&connection).expect("Could not get persons");

        assert!(persons.is_empty());
    }

    #[test]
    fn update_person_succeeds() {
        let connection = get_test_db_connection();
        let original = create_person(person("Original", 17), &connection).unwrap();

        let updated = update_person(original.id, person("Updated", 18), &connection)
            .expect("Could not update person");

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.name, PersonName::new_unchecked("Updated"));
        assert_eq!(updated.age, Age::new_unchecked(18));
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at.is_some());
    }

    #[test]
    fn update_person_with_invalid_id_returns_error() {
        let connection = get_test_db_connection();

        let result = update_person(new_database_id(), person("Updated", 18), &connection);

        assert_eq!(result, Err(Error::UpdateMissingPerson));
    }

    #[test]
    fn delete_person_succeeds() {
        let connection = get_test_db_connection();
        let keep = create_person(person("Keep", 40), &connection).unwrap();
        let remove = create_person(person("Remove", 40), &connection).unwrap();

        delete_person(remove.id, &connection).expect("Could not delete person");

        assert_eq!(get_person(remove.id, &connection), Err(Error::NotFound));
        let remaining: HashSet<_> = get_all_persons(&connection)
            .unwrap()
            .into_iter()
            .map(|person| person.id)
            .collect();
        assert_eq!(remaining, HashSet::from([keep.id]));
    }

    #[test]
    fn delete_person_with_invalid_id_returns_error() {
        let connection = get_test_db_connection();

        let result = delete_person(new_database_id(), &connection);

        assert_eq!(result, Err(Error::DeleteMissingPerson));
    }
}
