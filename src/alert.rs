//! Alert fragments for displaying success and error messages to users.
//!
//! Alerts are swapped out-of-band into the fixed `#alert-container` element
//! rendered by the base layout, so any htmx response can carry one alongside
//! its main content.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// A transient message shown to the user after an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The operation succeeded.
    Success {
        /// The headline, e.g. "Expense added".
        message: String,
        /// Supporting detail text.
        details: String,
    },
    /// The operation failed.
    Error {
        /// The headline, e.g. "Could not add expense".
        message: String,
        /// Supporting detail text.
        details: String,
    },
}

impl Alert {
    /// Create a success alert.
    pub fn success(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Success {
            message: message.into(),
            details: details.into(),
        }
    }

    /// Create an error alert.
    pub fn error(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            details: details.into(),
        }
    }

    /// Render the alert as an out-of-band swap targeting `#alert-container`.
    pub fn into_html(self) -> Markup {
        let (message, details, accent_style) = match self {
            Alert::Success { message, details } => (
                message,
                details,
                "text-green-800 bg-green-50 dark:bg-gray-800 dark:text-green-400",
            ),
            Alert::Error { message, details } => (
                message,
                details,
                "text-red-800 bg-red-50 dark:bg-gray-800 dark:text-red-400",
            ),
        };

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div
                    class={ "flex items-start p-4 mb-4 rounded-lg shadow-lg " (accent_style) }
                    role="alert"
                {
                    div class="text-sm font-medium"
                    {
                        p { (message) }

                        @if !details.is_empty() {
                            p class="font-normal mt-1" { (details) }
                        }
                    }

                    button
                        type="button"
                        class="ms-auto -mx-1.5 -my-1.5 rounded-lg p-1.5 inline-flex items-center justify-center h-8 w-8"
                        aria-label="Close"
                        onclick="this.closest('[role=alert]').remove()"
                    {
                        "✕"
                    }
                }
            }
        }
    }

    /// Render the alert with an explicit status code.
    pub fn into_response_with_status(self, status_code: StatusCode) -> Response {
        (status_code, self.into_html()).into_response()
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        (StatusCode::OK, self.into_html()).into_response()
    }
}
