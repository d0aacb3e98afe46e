//! Transactions: expenses and income recorded by a person against a category.
//!
//! This module contains the transaction models, the database queries, and the
//! business rules that decide whether a person may record a transaction.

mod core;
mod create_endpoint;
mod db;
mod list_endpoint;

pub use core::{
    MAX_TRANSACTION_VALUE, Transaction, TransactionDescription, TransactionForm, TransactionId,
    TransactionType, TransactionView, ValidatedTransaction, validate_value,
};
pub use create_endpoint::{create_transaction, create_transaction_endpoint};
pub use db::{
    count_transactions, create_transaction_table, get_all_transactions,
    get_transactions_for_person, insert_transaction, map_transaction_view_row,
};
pub use list_endpoint::{get_person_transactions_endpoint, get_transactions_endpoint};
