//! Type aliases for database row identifiers.

/// An integer primary key assigned by the database.
pub type DatabaseId = i64;

/// The ID of an expense row.
pub type ExpenseId = DatabaseId;

/// The ID of an income row.
pub type IncomeId = DatabaseId;

/// The ID of a reminder row.
pub type ReminderId = DatabaseId;

/// The ID of an expense attachment row.
pub type AttachmentId = DatabaseId;
