//! Reminder delete endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, database_id::ReminderId, session::Session};

use super::{
    panel::reminder_list_view,
    store::{delete_reminder, fetch_reminders},
};

/// The state needed for deleting a reminder.
#[derive(Debug, Clone)]
pub struct DeleteReminderState {
    /// The database connection for managing reminders.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteReminderState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a reminder.
///
/// Responds with the freshly queried reminder list.
pub async fn delete_reminder_endpoint(
    State(state): State<DeleteReminderState>,
    Extension(session): Extension<Session>,
    Path(reminder_id): Path<ReminderId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = delete_reminder(Some(&session), reminder_id, &connection) {
        tracing::error!("Could not delete reminder {reminder_id}: {error}");
        return error.into_alert_response();
    }

    match fetch_reminders(Some(&session), &connection) {
        Ok(reminders) => reminder_list_view(&reminders).into_response(),
        Err(error) => error.into_alert_response(),
    }
}

#[cfg(test)]
mod delete_reminder_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use time::macros::date;

    use crate::{
        Error,
        reminder::{Reminder, add_reminder, get_reminder},
        test_utils::{get_test_connection, test_session},
    };

    use super::{DeleteReminderState, delete_reminder_endpoint};

    #[tokio::test]
    async fn delete_removes_reminder() {
        let conn = get_test_connection();
        let session = test_session();

        let reminder = add_reminder(
            Some(&session),
            Reminder::build("Loan EMI", date!(2024 - 07 - 01)),
            &conn,
        )
        .unwrap()
        .unwrap();

        let state = DeleteReminderState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = delete_reminder_endpoint(
            State(state.clone()),
            Extension(session.clone()),
            Path(reminder.id),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_reminder(reminder.id, &session.user_id, &connection),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn delete_missing_reminder_returns_not_found_alert() {
        let state = DeleteReminderState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response = delete_reminder_endpoint(State(state), Extension(test_session()), Path(1337))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
