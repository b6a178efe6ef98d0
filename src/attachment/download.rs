//! The attachment download endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, database_id::AttachmentId, session::Session,
};

use super::{AttachmentStore, domain::get_attachment_for_user};

/// The state needed for downloading an attachment.
#[derive(Debug, Clone)]
pub struct AttachmentState {
    /// The database connection holding the attachment metadata rows.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The blob store holding the attachment bytes.
    pub attachment_store: AttachmentStore,
}

impl FromRef<AppState> for AttachmentState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            attachment_store: state.attachment_store.clone(),
        }
    }
}

/// A route handler for downloading an attachment owned by the current user.
pub async fn get_attachment_endpoint(
    State(state): State<AttachmentState>,
    Extension(session): Extension<Session>,
    Path(attachment_id): Path<AttachmentId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let attachment = match get_attachment_for_user(attachment_id, &session.user_id, &connection) {
        Ok(attachment) => attachment,
        Err(error) => return error.into_response(),
    };

    let bytes = match state.attachment_store.read(&attachment.file_path) {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("could not read attachment {attachment_id}: {error}");
            return Error::NotFound.into_response();
        }
    };

    (
        [
            (CONTENT_TYPE, attachment.file_type),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", attachment.file_name),
            ),
        ],
        bytes,
    )
        .into_response()
}
