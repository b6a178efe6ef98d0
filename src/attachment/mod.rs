//! File attachments for expense and income records.
//!
//! Attachment bytes live in a blob store (a directory tree) addressed by the
//! path convention `{owner}/{record}/{unique-suffix}.{ext}`; expense
//! attachments additionally get a metadata row in the database.

mod blob;
mod domain;
mod download;

pub use blob::AttachmentStore;
pub use domain::{
    Attachment, NewAttachmentFile, attachments_by_expense, create_attachment_table,
    insert_attachment,
};
pub use download::get_attachment_endpoint;
