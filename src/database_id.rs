//! Database ID type definition.

use uuid::Uuid;

/// The type used for the primary keys of every table.
///
/// IDs are random (v4) UUIDs generated by the server, so a client can never
/// guess the ID of a row from the IDs it has already seen.
pub type DatabaseId = Uuid;

/// Generate the ID for a new row.
pub fn new_database_id() -> DatabaseId {
    Uuid::new_v4()
}
