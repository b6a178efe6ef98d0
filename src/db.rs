//! Database initialization for the application's tables.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{
    Error, attachment::create_attachment_table, expense::create_expense_table,
    income::create_income_table, reminder::create_reminder_table,
};

/// Create the application's tables if they do not exist.
///
/// # Errors
/// Returns an [Error::SqlError] if a table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_expense_table(&transaction)?;
    create_income_table(&transaction)?;
    create_reminder_table(&transaction)?;
    create_attachment_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
