//! Pocketbook is a web app for tracking personal expenses, income, and
//! bill/loan reminders.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod aggregate;
mod alert;
mod app_state;
mod attachment;
mod calendar;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod expense;
mod filter;
mod html;
mod income;
mod internal_server_error;
mod money;
mod navigation;
mod not_found;
mod reminder;
mod report;
mod routing;
mod session;
#[cfg(test)]
mod test_utils;
mod timezone;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use routing::build_router;
pub use session::{Session, UserId};

use crate::{
    alert::Alert,
    internal_server_error::{InternalServerErrorPage, render_internal_server_error},
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used for an expense or income description.
    #[error("description cannot be empty")]
    EmptyDescription,

    /// An empty string was used for a reminder title.
    #[error("title cannot be empty")]
    EmptyTitle,

    /// A negative amount was used to create a record.
    ///
    /// Amounts record how much money moved, not its direction, therefore
    /// negative amounts are not allowed.
    #[error("{0} is a negative amount, which is not allowed")]
    NegativeAmount(f64),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update an expense that does not exist
    #[error("tried to update an expense that is not in the database")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist
    #[error("tried to delete an expense that is not in the database")]
    DeleteMissingExpense,

    /// Tried to update an income record that does not exist
    #[error("tried to update an income record that is not in the database")]
    UpdateMissingIncome,

    /// Tried to delete an income record that does not exist
    #[error("tried to delete an income record that is not in the database")]
    DeleteMissingIncome,

    /// Tried to update a reminder that does not exist
    #[error("tried to update a reminder that is not in the database")]
    UpdateMissingReminder,

    /// Tried to delete a reminder that does not exist
    #[error("tried to delete a reminder that is not in the database")]
    DeleteMissingReminder,

    /// The multipart form could not be parsed.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// An attachment could not be written to or read from the blob store.
    ///
    /// A failed attachment write does not roll back the record row it
    /// belongs to.
    #[error("could not store attachment: {0}")]
    AttachmentStorageError(String),

    /// A value could not be serialized to or deserialized from JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => {
                render_internal_server_error(InternalServerErrorPage {
                    description: "Invalid Timezone Settings",
                    fix: &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                    ),
                })
            }
            Error::DatabaseLockError => render_internal_server_error(Default::default()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(Default::default())
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::EmptyDescription => (
                StatusCode::BAD_REQUEST,
                Alert::error("Invalid description", "The description cannot be empty."),
            ),
            Error::EmptyTitle => (
                StatusCode::BAD_REQUEST,
                Alert::error("Invalid title", "The title cannot be empty."),
            ),
            Error::NegativeAmount(amount) => (
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid amount",
                    format!("{amount} is a negative amount, which is not allowed."),
                ),
            ),
            Error::UpdateMissingExpense => (
                StatusCode::NOT_FOUND,
                Alert::error("Could not update expense", "The expense could not be found."),
            ),
            Error::DeleteMissingExpense => (
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Could not delete expense",
                    "The expense could not be found. \
                    Try refreshing the page to see if the expense has already been deleted.",
                ),
            ),
            Error::UpdateMissingIncome => (
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Could not update income",
                    "The income record could not be found.",
                ),
            ),
            Error::DeleteMissingIncome => (
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Could not delete income",
                    "The income record could not be found. \
                    Try refreshing the page to see if it has already been deleted.",
                ),
            ),
            Error::UpdateMissingReminder => (
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Could not update reminder",
                    "The reminder could not be found.",
                ),
            ),
            Error::DeleteMissingReminder => (
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Could not delete reminder",
                    "The reminder could not be found. \
                    Try refreshing the page to see if it has already been deleted.",
                ),
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::error(
                    "Invalid Timezone Settings",
                    format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings \
                        and ensure the timezone has been set to a valid, canonical timezone string"
                    ),
                ),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::error(
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details.",
                ),
            ),
        };

        alert.into_response_with_status(status_code)
    }
}
