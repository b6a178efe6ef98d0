//! Expense delete endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error, alert::Alert, database_id::ExpenseId, filter::RecordFilter, session::Session,
    timezone::local_today,
};

use super::{list::expense_table_view, store::{delete_expense, fetch_expenses}};

/// The state needed for deleting an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name.
    pub local_timezone: String,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for deleting an expense.
///
/// Responds with a freshly queried table so the list always reflects the
/// store after a mutation, plus a success alert swapped out-of-band.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    Extension(session): Extension<Session>,
    Path(expense_id): Path<ExpenseId>,
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

    if let Err(error) = delete_expense(Some(&session), expense_id, &connection) {
        tracing::error!("Could not delete expense {expense_id}: {error}");
        return error.into_alert_response();
    }

    match fetch_expenses(Some(&session), &RecordFilter::none(), today, &connection) {
        Ok(expenses) => {
            let alert = Alert::success("Expense deleted", "").into_html();

            html! {
                (expense_table_view(&expenses))
                (alert)
            }
            .into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}
