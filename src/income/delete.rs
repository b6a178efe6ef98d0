//! Income delete endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error, alert::Alert, database_id::IncomeId, filter::RecordFilter, session::Session,
    timezone::local_today,
};

use super::{
    list::income_table_view,
    store::{delete_income, fetch_income},
};

/// The state needed for deleting an income record.
#[derive(Debug, Clone)]
pub struct DeleteIncomeState {
    /// The database connection for managing income records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name.
    pub local_timezone: String,
}

impl FromRef<AppState> for DeleteIncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for deleting an income record.
///
/// Responds with a freshly queried table so the list always reflects the
/// store after a mutation, plus a success alert swapped out-of-band.
pub async fn delete_income_endpoint(
    State(state): State<DeleteIncomeState>,
    Extension(session): Extension<Session>,
    Path(income_id): Path<IncomeId>,
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

    if let Err(error) = delete_income(Some(&session), income_id, &connection) {
        tracing::error!("Could not delete income {income_id}: {error}");
        return error.into_alert_response();
    }

    match fetch_income(Some(&session), &RecordFilter::none(), today, &connection) {
        Ok(income) => {
            let alert = Alert::success("Income deleted", "").into_html();

            html! {
                (income_table_view(&income))
                (alert)
            }
            .into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}

#[cfg(test)]
mod delete_income_endpoint_tests {
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
        attachment::AttachmentStore,
        income::{Income, add_income, get_income},
        test_utils::{get_test_connection, test_session},
    };

    use super::{DeleteIncomeState, delete_income_endpoint};

    #[tokio::test]
    async fn delete_removes_income() {
        let conn = get_test_connection();
        let session = test_session();
        let blobs = AttachmentStore::new(std::env::temp_dir());

        let income = add_income(
            Some(&session),
            Income::build(1000.0, date!(2024 - 06 - 01), "Salary"),
            &[],
            &blobs,
            &conn,
        )
        .unwrap()
        .unwrap();

        let state = DeleteIncomeState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "UTC".to_owned(),
        };

        let response = delete_income_endpoint(
            State(state.clone()),
            Extension(session.clone()),
            Path(income.id),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_income(income.id, &session.user_id, &connection),
            Err(Error::NotFound)
        );
    }
}
