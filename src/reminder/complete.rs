//! The reminder completion toggle and its income side effect.
//!
//! Checking a reminder off moves it from pending to completed. If the
//! reminder carries an amount, exactly one income record is written for
//! "today" as a best-effort side call: the completion commits whether or not
//! the bookkeeping succeeds, so a reminder can never become un-completable.
//! Un-checking a reminder never deletes the synthesized income; the two stay
//! independent records with no back-reference.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    alert::Alert,
    attachment::AttachmentStore,
    database_id::ReminderId,
    income::{Income, IncomeCategory, add_income},
    money::Currency,
    session::Session,
    timezone::local_today,
};

use super::{
    domain::Reminder,
    panel::reminder_list_view,
    store::{fetch_reminders, get_reminder, set_reminder_completed},
};

/// The state needed for toggling a reminder.
#[derive(Debug, Clone)]
pub struct ToggleReminderState {
    /// The database connection for managing reminders.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The blob store, threaded through to the income add call.
    pub attachment_store: AttachmentStore,
    /// The local timezone as a canonical timezone name.
    pub local_timezone: String,
}

impl FromRef<AppState> for ToggleReminderState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            attachment_store: state.attachment_store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for toggling a reminder's completion state.
#[derive(Debug, Default, Deserialize)]
pub struct ToggleReminderForm {
    /// Present when the checkbox is checked; absent when cleared.
    pub is_completed: Option<String>,
}

/// A route handler for toggling a reminder's completion state.
///
/// Responds with the freshly queried reminder list.
pub async fn toggle_reminder_endpoint(
    State(state): State<ToggleReminderState>,
    Extension(session): Extension<Session>,
    Path(reminder_id): Path<ReminderId>,
    Form(form): Form<ToggleReminderForm>,
) -> Response {
    let Some(today) = local_today(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let reminder = match get_reminder(reminder_id, &session.user_id, &connection) {
        Ok(reminder) => reminder,
        Err(error) => return error.into_alert_response(),
    };

    let want_completed = form.is_completed.is_some();

    let mut alert = None;

    if want_completed && !reminder.is_completed {
        alert = record_income_for_completion(
            &session,
            &reminder,
            today,
            &state.attachment_store,
            &connection,
        );
    }

    if let Err(error) = set_reminder_completed(Some(&session), reminder_id, want_completed, &connection)
    {
        tracing::error!("Could not toggle reminder {reminder_id}: {error}");
        return error.into_alert_response();
    }

    match fetch_reminders(Some(&session), &connection) {
        Ok(reminders) => {
            let list = reminder_list_view(&reminders);

            match alert {
                Some(alert) => html! { (list) (alert.into_html()) }.into_response(),
                None => list.into_response(),
            }
        }
        Err(error) => error.into_alert_response(),
    }
}

/// Record the income entry for a completed reminder, if it carries an amount.
///
/// Failures are logged and reported as a non-blocking alert; the caller
/// commits the completion state regardless.
fn record_income_for_completion(
    session: &Session,
    reminder: &Reminder,
    today: Date,
    attachment_store: &AttachmentStore,
    connection: &Connection,
) -> Option<Alert> {
    let amount = reminder.amount?;

    let builder = Income::build(amount, today, &format!("Payment received: {}", reminder.title))
        .category(IncomeCategory::Other)
        .currency(Currency::Usd);

    match add_income(Some(session), builder, &[], attachment_store, connection) {
        Ok(_) => Some(Alert::success(
            "Reminder completed",
            format!("Recorded {amount:.2} as income."),
        )),
        Err(error) => {
            tracing::error!(
                "could not record income for completed reminder {}: {error}",
                reminder.id
            );
            Some(Alert::error(
                "Reminder completed",
                "The reminder was checked off, but the income entry could not be recorded.",
            ))
        }
    }
}
