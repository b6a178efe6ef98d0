//! Database functions for storing, querying, and managing reminders.

use rusqlite::{Connection, Row, named_params};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::ReminderId,
    session::{Session, UserId},
};

use super::domain::{Reminder, ReminderBuilder};

/// Create the reminder table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_reminder_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS reminder (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT,
                category TEXT NOT NULL,
                due_date TEXT NOT NULL,
                amount REAL,
                is_completed INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_reminder_user_due ON reminder(user_id, due_date);",
        (),
    )?;

    Ok(())
}

/// Fetch the signed in user's reminders, soonest due first.
///
/// Upcoming-first is the relevant order for actionable items, so reminders
/// sort by due date ascending rather than the descending order the
/// transaction lists use. Returns an empty list when signed out.
///
/// # Errors
/// Returns an [Error::SqlError] if the query fails.
pub fn fetch_reminders(
    session: Option<&Session>,
    connection: &Connection,
) -> Result<Vec<Reminder>, Error> {
    let Some(session) = session else {
        return Ok(Vec::new());
    };

    connection
        .prepare(
            "SELECT id, user_id, title, description, category, due_date, amount, is_completed, \
             created_at FROM reminder WHERE user_id = :user_id \
             ORDER BY due_date ASC, id ASC",
        )?
        .query_map(
            named_params! {":user_id": session.user_id},
            map_reminder_row,
        )?
        .map(|reminder_result| reminder_result.map_err(Error::SqlError))
        .collect()
}

/// Create a new reminder for the signed in user.
///
/// Returns `None` when signed out.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyTitle] if the title is empty,
/// - [Error::NegativeAmount] if an amount is present and negative,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn add_reminder(
    session: Option<&Session>,
    builder: ReminderBuilder,
    connection: &Connection,
) -> Result<Option<Reminder>, Error> {
    let Some(session) = session else {
        return Ok(None);
    };

    if builder.title.trim().is_empty() {
        return Err(Error::EmptyTitle);
    }

    if let Some(amount) = builder.amount
        && amount < 0.0
    {
        return Err(Error::NegativeAmount(amount));
    }

    let reminder = connection
        .prepare(
            "INSERT INTO reminder (user_id, title, description, category, due_date, amount, is_completed, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)
             RETURNING id, user_id, title, description, category, due_date, amount, is_completed, created_at",
        )?
        .query_one(
            (
                &session.user_id,
                &builder.title,
                &builder.description,
                &builder.category,
                builder.due_date,
                builder.amount,
                OffsetDateTime::now_utc(),
            ),
            map_reminder_row,
        )?;

    Ok(Some(reminder))
}

/// Retrieve one of the user's reminders by its `id`.
///
/// # Errors
/// Returns an [Error::NotFound] if `id` does not refer to a reminder owned
/// by `user_id`, or [Error::SqlError] for other SQL errors.
pub fn get_reminder(
    id: ReminderId,
    user_id: &UserId,
    connection: &Connection,
) -> Result<Reminder, Error> {
    let reminder = connection
        .prepare(
            "SELECT id, user_id, title, description, category, due_date, amount, is_completed, \
             created_at FROM reminder WHERE id = :id AND user_id = :user_id",
        )?
        .query_one(
            named_params! {":id": id, ":user_id": user_id},
            map_reminder_row,
        )?;

    Ok(reminder)
}

/// Set a reminder's completion flag. A no-op when signed out.
///
/// This only flips the flag; the income side effect of completing a
/// reminder lives with the toggle endpoint so that the flag commit never
/// depends on the bookkeeping call.
///
/// # Errors
/// Returns an [Error::UpdateMissingReminder] if the reminder does not exist
/// or belongs to another user, or [Error::SqlError] for other SQL errors.
pub fn set_reminder_completed(
    session: Option<&Session>,
    id: ReminderId,
    is_completed: bool,
    connection: &Connection,
) -> Result<(), Error> {
    let Some(session) = session else {
        return Ok(());
    };

    let rows_affected = connection.execute(
        "UPDATE reminder SET is_completed = :is_completed \
         WHERE id = :id AND user_id = :user_id",
        named_params! {
            ":is_completed": is_completed,
            ":id": id,
            ":user_id": session.user_id,
        },
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingReminder);
    }

    Ok(())
}

/// Delete one of the user's reminders. A no-op when signed out.
///
/// # Errors
/// Returns an [Error::DeleteMissingReminder] if the reminder does not exist
/// or belongs to another user, or [Error::SqlError] for other SQL errors.
pub fn delete_reminder(
    session: Option<&Session>,
    id: ReminderId,
    connection: &Connection,
) -> Result<(), Error> {
    let Some(session) = session else {
        return Ok(());
    };

    let rows_affected = connection.execute(
        "DELETE FROM reminder WHERE id = :id AND user_id = :user_id",
        named_params! {":id": id, ":user_id": session.user_id},
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingReminder);
    }

    Ok(())
}

fn map_reminder_row(row: &Row) -> Result<Reminder, rusqlite::Error> {
    Ok(Reminder {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        due_date: row.get(5)?,
        amount: row.get(6)?,
        is_completed: row.get(7)?,
        created_at: row.get(8)?,
    })
}
