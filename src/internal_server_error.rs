//! The internal server error page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::html::error_view;

/// The description and suggested fix shown on the 500 page.
pub struct InternalServerErrorPage<'a> {
    /// What went wrong.
    pub description: &'a str,
    /// What the user can do about it.
    pub fix: &'a str,
}

impl Default for InternalServerErrorPage<'_> {
    fn default() -> Self {
        Self {
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
        }
    }
}

/// A route handler for the internal server error page.
pub async fn get_internal_server_error_page() -> Response {
    render_internal_server_error(Default::default())
}

/// Render the 500 page with the given description and fix.
pub fn render_internal_server_error(page: InternalServerErrorPage) -> Response {
    let markup = error_view("Internal Server Error", "500", page.description, page.fix);

    (StatusCode::INTERNAL_SERVER_ERROR, markup).into_response()
}
