//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/expenses/{expense_id}/edit',
//! use [format_endpoint].

/// The root route which redirects to the dashboard or sign in page.
pub const ROOT: &str = "/";
/// The landing page for signed in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for displaying a user's expenses.
pub const EXPENSES_VIEW: &str = "/expenses";
/// The page for recording a new expense.
pub const NEW_EXPENSE_VIEW: &str = "/expenses/new";
/// The page for editing an existing expense.
pub const EDIT_EXPENSE_VIEW: &str = "/expenses/{expense_id}/edit";
/// The page for displaying a user's income records.
pub const INCOME_VIEW: &str = "/income";
/// The page for recording a new income record.
pub const NEW_INCOME_VIEW: &str = "/income/new";
/// The page for editing an existing income record.
pub const EDIT_INCOME_VIEW: &str = "/income/{income_id}/edit";
/// The page for displaying and managing bill/loan reminders.
pub const REMINDERS_VIEW: &str = "/reminders";
/// The month calendar page.
pub const CALENDAR_VIEW: &str = "/calendar";
/// The year overview calendar page.
pub const YEAR_OVERVIEW_VIEW: &str = "/calendar/year";
/// The page for generating period reports.
pub const REPORTS_VIEW: &str = "/reports";
/// The route for getting the sign in page.
pub const SIGN_IN_VIEW: &str = "/sign_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for establishing a session for an externally verified identity.
pub const SIGN_IN_API: &str = "/api/sign_in";
/// The route for the client to end the current session.
pub const SIGN_OUT: &str = "/api/sign_out";
/// The route to create an expense.
pub const EXPENSES_API: &str = "/api/expenses";
/// The route to fetch the filtered expense table fragment.
pub const EXPENSES_TABLE: &str = "/api/expenses/table";
/// The route to update or delete a single expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route to create an income record.
pub const INCOME_API: &str = "/api/income";
/// The route to fetch the filtered income table fragment.
pub const INCOME_TABLE: &str = "/api/income/table";
/// The route to update or delete a single income record.
pub const INCOME: &str = "/api/income/{income_id}";
/// The route to create a reminder.
pub const REMINDERS_API: &str = "/api/reminders";
/// The route to toggle a reminder's completion state.
pub const TOGGLE_REMINDER: &str = "/api/reminders/{reminder_id}/toggle";
/// The route to delete a reminder.
pub const REMINDER: &str = "/api/reminders/{reminder_id}";
/// The route to download an attachment.
pub const ATTACHMENT: &str = "/api/attachments/{attachment_id}";
/// The route to generate a period report.
pub const GENERATE_REPORT: &str = "/api/reports";
/// The route to email a period report (stub until a mail integration exists).
pub const EMAIL_REPORT: &str = "/api/reports/email";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/expenses/{expense_id}/edit',
/// '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EXPENSES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_EXPENSE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_EXPENSE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INCOME_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_INCOME_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_INCOME_VIEW);
        assert_endpoint_is_valid_uri(endpoints::REMINDERS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::CALENDAR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::YEAR_OVERVIEW_VIEW);
        assert_endpoint_is_valid_uri(endpoints::REPORTS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::SIGN_IN_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);

        assert_endpoint_is_valid_uri(endpoints::SIGN_IN_API);
        assert_endpoint_is_valid_uri(endpoints::SIGN_OUT);
        assert_endpoint_is_valid_uri(endpoints::EXPENSES_API);
        assert_endpoint_is_valid_uri(endpoints::EXPENSES_TABLE);
        assert_endpoint_is_valid_uri(endpoints::EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::INCOME_API);
        assert_endpoint_is_valid_uri(endpoints::INCOME_TABLE);
        assert_endpoint_is_valid_uri(endpoints::INCOME);
        assert_endpoint_is_valid_uri(endpoints::REMINDERS_API);
        assert_endpoint_is_valid_uri(endpoints::TOGGLE_REMINDER);
        assert_endpoint_is_valid_uri(endpoints::REMINDER);
        assert_endpoint_is_valid_uri(endpoints::ATTACHMENT);
        assert_endpoint_is_valid_uri(endpoints::GENERATE_REPORT);
        assert_endpoint_is_valid_uri(endpoints::EMAIL_REPORT);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
