//! Expense tracking.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model and `ExpenseBuilder` for creating expenses
//! - Store functions for fetching, adding, updating, and deleting expenses
//! - The keyword heuristic behind the "suggest automatically" category
//! - View handlers for expense-related web pages

mod create;
mod delete;
mod domain;
mod edit;
mod form;
mod list;
mod store;
mod suggest;

pub use create::{create_expense_endpoint, get_new_expense_page};
pub use delete::delete_expense_endpoint;
pub use domain::{Expense, ExpenseBuilder, ExpenseCategory};
pub use edit::{get_edit_expense_page, update_expense_endpoint};
pub use list::{get_expense_table_fragment, get_expenses_page};
pub use store::{add_expense, create_expense_table, fetch_expenses};
pub use suggest::suggest_category;

#[cfg(test)]
pub use store::get_expense;
