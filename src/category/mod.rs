//! Categories: labels for transactions that restrict whether they may be used
//! for expenses, income, or both.

mod core;
mod create_endpoint;
mod db;
mod list_endpoint;
mod summary;

pub use core::{
    Category, CategoryDescription, CategoryForm, CategoryId, CategoryPurpose, ValidatedCategory,
};
pub use create_endpoint::create_category_endpoint;
pub use db::{
    create_category, create_category_table, get_all_categories, get_category, map_category_row,
};
pub use list_endpoint::get_categories_endpoint;
pub use summary::{
    CategorySummary, CategorySummaryResponse, get_category_summaries,
    get_category_summary_endpoint, get_category_summary_response,
};
