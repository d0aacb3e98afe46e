//! Persons: the members of the household whose money is tracked.

mod core;
mod create_endpoint;
mod db;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;
mod summary;

pub use core::{AGE_OF_MAJORITY, Age, Person, PersonForm, PersonId, PersonName, ValidatedPerson};
pub use create_endpoint::create_person_endpoint;
pub use db::{
    create_person, create_person_table, delete_person, get_all_persons, get_person,
    map_person_row, update_person,
};
pub use delete_endpoint::delete_person_endpoint;
pub use edit_endpoint::edit_person_endpoint;
pub use get_endpoint::{get_person_endpoint, get_persons_endpoint};
pub use summary::{
    PersonSummary, PersonSummaryResponse, get_person_summaries, get_person_summary_endpoint,
    get_person_summary_response,
};
