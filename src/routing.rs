//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    attachment::get_attachment_endpoint,
    calendar::{get_calendar_page, get_year_overview_page},
    dashboard::get_dashboard_page,
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_edit_expense_page,
        get_expense_table_fragment, get_expenses_page, get_new_expense_page,
        update_expense_endpoint,
    },
    income::{
        create_income_endpoint, delete_income_endpoint, get_edit_income_page,
        get_income_page, get_income_table_fragment, get_new_income_page, update_income_endpoint,
    },
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    reminder::{
        create_reminder_endpoint, delete_reminder_endpoint, get_reminders_page,
        toggle_reminder_endpoint,
    },
    report::{email_report_endpoint, generate_report_endpoint, get_reports_page},
    session::{get_sign_in_page, get_sign_out, post_sign_in, session_guard, session_guard_hx},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::SIGN_IN_VIEW, get(get_sign_in_page))
        .route(endpoints::SIGN_IN_API, post(post_sign_in))
        .route(endpoints::SIGN_OUT, get(get_sign_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_pages = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::EXPENSES_VIEW, get(get_expenses_page))
        .route(endpoints::NEW_EXPENSE_VIEW, get(get_new_expense_page))
        .route(endpoints::EDIT_EXPENSE_VIEW, get(get_edit_expense_page))
        .route(endpoints::INCOME_VIEW, get(get_income_page))
        .route(endpoints::NEW_INCOME_VIEW, get(get_new_income_page))
        .route(endpoints::EDIT_INCOME_VIEW, get(get_edit_income_page))
        .route(endpoints::REMINDERS_VIEW, get(get_reminders_page))
        .route(endpoints::CALENDAR_VIEW, get(get_calendar_page))
        .route(endpoints::YEAR_OVERVIEW_VIEW, get(get_year_overview_page))
        .route(endpoints::REPORTS_VIEW, get(get_reports_page))
        .layer(middleware::from_fn_with_state(state.clone(), session_guard));

    // These API routes need to use the HX-Redirect header for session
    // redirects to work properly for HTMX requests.
    let protected_api = Router::new()
        .route(endpoints::EXPENSES_API, post(create_expense_endpoint))
        .route(endpoints::EXPENSES_TABLE, get(get_expense_table_fragment))
        .route(
            endpoints::EXPENSE,
            put(update_expense_endpoint).delete(delete_expense_endpoint),
        )
        .route(endpoints::INCOME_API, post(create_income_endpoint))
        .route(endpoints::INCOME_TABLE, get(get_income_table_fragment))
        .route(
            endpoints::INCOME,
            put(update_income_endpoint).delete(delete_income_endpoint),
        )
        .route(endpoints::REMINDERS_API, post(create_reminder_endpoint))
        .route(endpoints::TOGGLE_REMINDER, post(toggle_reminder_endpoint))
        .route(endpoints::REMINDER, delete(delete_reminder_endpoint))
        .route(endpoints::ATTACHMENT, get(get_attachment_endpoint))
        .route(endpoints::GENERATE_REPORT, post(generate_report_endpoint))
        .route(endpoints::EMAIL_REPORT, post(email_report_endpoint))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_guard_hx,
        ));

    protected_pages
        .merge(protected_api)
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
