//! The reminders page: an add form plus the upcoming-first reminder list.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base,
    },
    money::{Currency, format_money},
    navigation::NavBar,
    session::Session,
};

use super::{
    domain::{Reminder, ReminderCategory},
    store::{add_reminder, fetch_reminders},
};

/// The state needed for the reminders page and its endpoints.
#[derive(Debug, Clone)]
pub struct ReminderState {
    /// The database connection for managing reminders.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReminderState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating a reminder.
#[derive(Debug, Deserialize)]
pub struct ReminderFormData {
    /// What the reminder is about.
    pub title: String,
    /// Optional free-form detail text.
    pub description: Option<String>,
    /// The category label.
    pub category: String,
    /// When the reminder falls due.
    pub due_date: Date,
    /// The monetary amount, if any. The empty string means no amount.
    pub amount: Option<String>,
}

/// Display the signed in user's reminders.
pub async fn get_reminders_page(
    State(state): State<ReminderState>,
    Extension(session): Extension<Session>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match fetch_reminders(Some(&session), &connection) {
        Ok(reminders) => reminders_page_view(&reminders).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Handle reminder creation form submission.
///
/// Responds with the freshly queried reminder list plus a success alert.
pub async fn create_reminder_endpoint(
    State(state): State<ReminderState>,
    Extension(session): Extension<Session>,
    Form(form): Form<ReminderFormData>,
) -> Response {
    let amount = match parse_optional_amount(form.amount.as_deref()) {
        Ok(amount) => amount,
        Err(error) => return error.into_alert_response(),
    };

    let description = form
        .description
        .filter(|description| !description.trim().is_empty());

    let builder = Reminder::build(&form.title, form.due_date)
        .description(description)
        .category(ReminderCategory::from_label(&form.category))
        .amount(amount);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = add_reminder(Some(&session), builder, &connection) {
        tracing::error!("An unexpected error occurred while creating a reminder: {error}");
        return error.into_alert_response();
    }

    match fetch_reminders(Some(&session), &connection) {
        Ok(reminders) => {
            let alert = Alert::success("Reminder added", "").into_html();

            html! {
                (reminder_list_view(&reminders))
                (alert)
            }
            .into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}

/// Parse the optional amount field; the empty string means "no amount".
fn parse_optional_amount(raw: Option<&str>) -> Result<Option<f64>, Error> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| Error::MultipartError(format!("invalid amount {trimmed:?}")))
}

fn reminders_page_view(reminders: &[Reminder]) -> Markup {
    let nav_bar = NavBar::new(endpoints::REMINDERS_VIEW).into_html();

    let content = html! {
        (nav_bar)
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-2xl"
            {
                h1 class="text-2xl font-bold mb-4" { "Reminders" }

                (reminder_form())

                (reminder_list_view(reminders))
            }
        }
    };

    base("Reminders", &[], &content)
}

fn reminder_form() -> Markup {
    html! {
        form
            hx-post=(endpoints::REMINDERS_API)
            hx-target="#reminder-list"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="space-y-4 mb-6 p-4 bg-white dark:bg-gray-800 rounded-lg shadow"
        {
            div
            {
                label for="title" class=(FORM_LABEL_STYLE) { "Title" }

                input
                    name="title"
                    id="title"
                    type="text"
                    placeholder="Reminder title"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description (optional)" }

                input
                    name="description"
                    id="description"
                    type="text"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="grid grid-cols-3 gap-4"
            {
                div
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                    select
                        name="category"
                        id="category"
                        required
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for category in &ReminderCategory::FIXED {
                            option value=(category.label()) { (category.label()) }
                        }
                    }
                }

                div
                {
                    label for="due_date" class=(FORM_LABEL_STYLE) { "Due date" }

                    input
                        name="due_date"
                        id="due_date"
                        type="date"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount (optional)" }

                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        min="0"
                        placeholder="0.00"
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Reminder" }
        }
    }
}

/// Render the reminder list. Used by the page and by the create, toggle,
/// and delete endpoints' refreshed responses.
pub(super) fn reminder_list_view(reminders: &[Reminder]) -> Markup {
    html! {
        ul id="reminder-list" class="space-y-2"
        {
            @if reminders.is_empty() {
                li class="p-6 text-gray-500 dark:text-gray-400" { "No reminders yet." }
            }

            @for reminder in reminders {
                (reminder_list_item(reminder))
            }
        }
    }
}

fn reminder_list_item(reminder: &Reminder) -> Markup {
    let toggle_url = endpoints::format_endpoint(endpoints::TOGGLE_REMINDER, reminder.id);
    let delete_url = endpoints::format_endpoint(endpoints::REMINDER, reminder.id);
    let title_style = if reminder.is_completed {
        "line-through text-gray-400"
    } else {
        "text-gray-900 dark:text-white"
    };

    html! {
        li class="flex items-center gap-3 p-3 bg-white dark:bg-gray-800 rounded-lg shadow"
        {
            input
                type="checkbox"
                name="is_completed"
                checked[reminder.is_completed]
                aria-label=(format!("Mark {} as done", reminder.title))
                hx-post=(toggle_url)
                hx-target="#reminder-list"
                hx-swap="outerHTML"
                hx-target-error="#alert-container";

            div class="flex-1 min-w-0"
            {
                p class={ "font-medium truncate " (title_style) } { (reminder.title) }

                @if let Some(description) = &reminder.description {
                    p class="text-sm text-gray-500 dark:text-gray-400 truncate" { (description) }
                }

                p class="text-xs text-gray-500 dark:text-gray-400"
                {
                    "Due " (reminder.due_date)
                }
            }

            span class=(CATEGORY_BADGE_STYLE) { (reminder.category.label()) }

            @if let Some(amount) = reminder.amount {
                span class="text-sm font-semibold" { (format_money(amount, Currency::Usd)) }
            }

            button
                type="button"
                class=(BUTTON_DELETE_STYLE)
                hx-delete=(delete_url)
                hx-confirm="Delete this reminder?"
                hx-target="#reminder-list"
                hx-swap="outerHTML"
                hx-target-error="#alert-container"
            {
                "Delete"
            }
        }
    }
}

#[cfg(test)]
mod reminders_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::State,
        http::StatusCode,
        response::IntoResponse,
    };

    use crate::test_utils::{
        assert_form_input, assert_valid_html, get_test_connection, must_get_form,
        parse_html_document, test_session,
    };

    use super::{ReminderState, get_reminders_page};

    #[tokio::test]
    async fn render_page() {
        let state = ReminderState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response = get_reminders_page(State(state), Extension(test_session()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_form_input(&form, "title", "text");
        assert_form_input(&form, "due_date", "date");
    }
}

#[cfg(test)]
mod create_reminder_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Form,
        extract::State,
        http::StatusCode,
        response::IntoResponse,
    };
    use time::macros::date;

    use crate::{
        reminder::fetch_reminders,
        test_utils::{get_test_connection, test_session},
    };

    use super::{ReminderFormData, ReminderState, create_reminder_endpoint, parse_optional_amount};

    #[tokio::test]
    async fn create_reminder_persists() {
        let state = ReminderState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };
        let session = test_session();

        let form = ReminderFormData {
            title: "Electricity bill".to_owned(),
            description: Some("".to_owned()),
            category: "bill".to_owned(),
            due_date: date!(2024 - 07 - 01),
            amount: Some("120.50".to_owned()),
        };

        let response =
            create_reminder_endpoint(State(state.clone()), Extension(session.clone()), Form(form))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let connection = state.db_connection.lock().unwrap();
        let reminders = fetch_reminders(Some(&session), &connection).unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].amount, Some(120.5));
        // An empty description box is stored as no description.
        assert_eq!(reminders[0].description, None);
    }

    #[tokio::test]
    async fn create_with_empty_title_returns_alert() {
        let state = ReminderState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let form = ReminderFormData {
            title: " ".to_owned(),
            description: None,
            category: "bill".to_owned(),
            due_date: date!(2024 - 07 - 01),
            amount: None,
        };

        let response = create_reminder_endpoint(State(state), Extension(test_session()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn empty_amount_parses_to_none() {
        assert_eq!(parse_optional_amount(None).unwrap(), None);
        assert_eq!(parse_optional_amount(Some("")).unwrap(), None);
        assert_eq!(parse_optional_amount(Some("  ")).unwrap(), None);
        assert_eq!(parse_optional_amount(Some("42.5")).unwrap(), Some(42.5));
        assert!(parse_optional_amount(Some("abc")).is_err());
    }
}
