//! Expense edit page and update endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    database_id::ExpenseId,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    money::Currency,
    navigation::NavBar,
    session::Session,
};

use super::{
    domain::{Expense, ExpenseCategory},
    form::{ExpenseFormDefaults, expense_form_fields},
    store::{get_expense, update_expense},
};

/// The state needed for editing an expense.
#[derive(Debug, Clone)]
pub struct EditExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for updating an expense.
#[derive(Debug, Deserialize)]
pub struct EditExpenseForm {
    /// The new amount.
    pub amount: f64,
    /// The new description.
    pub description: String,
    /// The new category label.
    pub category: String,
    /// The new currency code.
    pub currency: Currency,
    /// The new date.
    pub date: Date,
}

/// Render the expense edit page, prefilled with the expense's fields.
pub async fn get_edit_expense_page(
    State(state): State<EditExpenseState>,
    Extension(session): Extension<Session>,
    Path(expense_id): Path<ExpenseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_expense(expense_id, &session.user_id, &connection) {
        Ok(expense) => edit_expense_view(&expense).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Handle the expense edit form submission.
pub async fn update_expense_endpoint(
    State(state): State<EditExpenseState>,
    Extension(session): Extension<Session>,
    Path(expense_id): Path<ExpenseId>,
    Form(form): Form<EditExpenseForm>,
) -> Response {
    let changes = Expense::build(form.amount, form.date, &form.description)
        .category(ExpenseCategory::from_label(&form.category))
        .currency(form.currency);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_expense(Some(&session), expense_id, changes, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while updating an expense: {error}");

            error.into_alert_response()
        }
    }
}

fn edit_expense_view(expense: &Expense) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();
    let update_url = endpoints::format_endpoint(endpoints::EXPENSE, expense.id);

    let form = html! {
        form
            hx-put=(update_url)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            (expense_form_fields(&ExpenseFormDefaults {
                amount: Some(expense.amount),
                date: expense.date,
                description: Some(&expense.description),
                category: Some(&expense.category),
                currency: expense.currency,
                offer_auto_category: false,
            }))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Changes" }
        }
    };

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4 mt-4" { "Edit Expense" }
            (form)
        }
    };

    base("Edit Expense", &[], &content)
}
