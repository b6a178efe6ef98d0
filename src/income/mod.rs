//! Income tracking.
//!
//! This module contains everything related to income records:
//! - The `Income` model and `IncomeBuilder` for creating records
//! - Store functions for fetching, adding, updating, and deleting records
//! - View handlers for income-related web pages

mod create;
mod delete;
mod domain;
mod edit;
mod form;
mod list;
mod store;

pub use create::{create_income_endpoint, get_new_income_page};
pub use delete::delete_income_endpoint;
pub use domain::{Income, IncomeBuilder, IncomeCategory};
pub use edit::{get_edit_income_page, update_income_endpoint};
pub use list::{get_income_page, get_income_table_fragment};
pub use store::{add_income, create_income_table, fetch_income};

#[cfg(test)]
pub use store::get_income;
