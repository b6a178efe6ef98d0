//! Attachment metadata rows and their database functions.

use std::collections::HashMap;

use rusqlite::{Connection, Row, named_params};

use crate::{
    Error,
    database_id::{AttachmentId, ExpenseId},
    session::UserId,
};

/// A file attached to an expense record.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    /// The ID of the attachment row.
    pub id: AttachmentId,
    /// The ID of the expense the file belongs to.
    pub expense_id: ExpenseId,
    /// The file's original name, e.g. "receipt.png".
    pub file_name: String,
    /// The blob store key, e.g. "user/42/d41d8cd9….png".
    pub file_path: String,
    /// The file's MIME type.
    pub file_type: String,
    /// The file's size in bytes.
    pub file_size: i64,
}

/// A file submitted with a new record, before it has been stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttachmentFile {
    /// The file's original name.
    pub file_name: String,
    /// The file's MIME type.
    pub content_type: String,
    /// The file's contents.
    pub bytes: Vec<u8>,
}

/// Create the expense attachment table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_attachment_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense_attachment (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                expense_id INTEGER NOT NULL,
                file_name TEXT NOT NULL,
                file_path TEXT NOT NULL,
                file_type TEXT NOT NULL,
                file_size INTEGER NOT NULL,
                FOREIGN KEY(expense_id) REFERENCES expense(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_attachment_expense ON expense_attachment(expense_id);",
        (),
    )?;

    Ok(())
}

/// Insert an attachment metadata row for a stored file.
///
/// # Errors
/// Returns an [Error::SqlError] if the insert fails.
pub fn insert_attachment(
    expense_id: ExpenseId,
    file: &NewAttachmentFile,
    file_path: &str,
    connection: &Connection,
) -> Result<Attachment, Error> {
    let attachment = connection
        .prepare(
            "INSERT INTO expense_attachment (expense_id, file_name, file_path, file_type, file_size)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, expense_id, file_name, file_path, file_type, file_size",
        )?
        .query_one(
            (
                expense_id,
                &file.file_name,
                file_path,
                &file.content_type,
                file.bytes.len() as i64,
            ),
            map_attachment_row,
        )?;

    Ok(attachment)
}

/// Get every attachment belonging to `user_id`, grouped by expense ID.
///
/// # Errors
/// Returns an [Error::SqlError] if the query fails.
pub fn attachments_by_expense(
    user_id: &UserId,
    connection: &Connection,
) -> Result<HashMap<ExpenseId, Vec<Attachment>>, Error> {
    let attachments: Vec<Attachment> = connection
        .prepare(
            "SELECT a.id, a.expense_id, a.file_name, a.file_path, a.file_type, a.file_size
             FROM expense_attachment a
             INNER JOIN expense e ON a.expense_id = e.id
             WHERE e.user_id = :user_id
             ORDER BY a.id ASC",
        )?
        .query_map(named_params! {":user_id": user_id}, map_attachment_row)?
        .map(|attachment_result| attachment_result.map_err(Error::SqlError))
        .collect::<Result<_, _>>()?;

    let mut grouped: HashMap<ExpenseId, Vec<Attachment>> = HashMap::new();
    for attachment in attachments {
        grouped.entry(attachment.expense_id).or_default().push(attachment);
    }

    Ok(grouped)
}

/// Get an attachment by ID, re-asserting that the owning expense belongs to
/// `user_id`.
///
/// # Errors
/// Returns an [Error::NotFound] if the attachment does not exist or belongs
/// to another user.
pub fn get_attachment_for_user(
    id: AttachmentId,
    user_id: &UserId,
    connection: &Connection,
) -> Result<Attachment, Error> {
    let attachment = connection
        .prepare(
            "SELECT a.id, a.expense_id, a.file_name, a.file_path, a.file_type, a.file_size
             FROM expense_attachment a
             INNER JOIN expense e ON a.expense_id = e.id
             WHERE a.id = :id AND e.user_id = :user_id",
        )?
        .query_one(
            named_params! {":id": id, ":user_id": user_id},
            map_attachment_row,
        )?;

    Ok(attachment)
}

fn map_attachment_row(row: &Row) -> Result<Attachment, rusqlite::Error> {
    Ok(Attachment {
        id: row.get(0)?,
        expense_id: row.get(1)?,
        file_name: row.get(2)?,
        file_path: row.get(3)?,
        file_type: row.get(4)?,
        file_size: row.get(5)?,
    })
}
