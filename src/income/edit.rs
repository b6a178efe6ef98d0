//! Income edit page and update endpoint.

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
    database_id::IncomeId,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    money::Currency,
    navigation::NavBar,
    session::Session,
};

use super::{
    domain::{Income, IncomeCategory},
    form::{IncomeFormDefaults, income_form_fields},
    store::{get_income, update_income},
};

/// The state needed for editing an income record.
#[derive(Debug, Clone)]
pub struct EditIncomeState {
    /// The database connection for managing income records.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditIncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for updating an income record.
#[derive(Debug, Deserialize)]
pub struct EditIncomeForm {
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

/// Render the income edit page, prefilled with the record's fields.
pub async fn get_edit_income_page(
    State(state): State<EditIncomeState>,
    Extension(session): Extension<Session>,
    Path(income_id): Path<IncomeId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_income(income_id, &session.user_id, &connection) {
        Ok(income) => edit_income_view(&income).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Handle the income edit form submission.
pub async fn update_income_endpoint(
    State(state): State<EditIncomeState>,
    Extension(session): Extension<Session>,
    Path(income_id): Path<IncomeId>,
    Form(form): Form<EditIncomeForm>,
) -> Response {
    let changes = Income::build(form.amount, form.date, &form.description)
        .category(IncomeCategory::from_label(&form.category))
        .currency(form.currency);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_income(Some(&session), income_id, changes, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::INCOME_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while updating income: {error}");

            error.into_alert_response()
        }
    }
}

fn edit_income_view(income: &Income) -> Markup {
    let nav_bar = NavBar::new(endpoints::INCOME_VIEW).into_html();
    let update_url = endpoints::format_endpoint(endpoints::INCOME, income.id);

    let form = html! {
        form
            hx-put=(update_url)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            (income_form_fields(&IncomeFormDefaults {
                amount: Some(income.amount),
                date: income.date,
                description: Some(&income.description),
                category: Some(&income.category),
                currency: income.currency,
            }))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Changes" }
        }
    };

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4 mt-4" { "Edit Income" }
            (form)
        }
    };

    base("Edit Income", &[], &content)
}

#[cfg(test)]
mod edit_income_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Form,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use time::macros::date;

    use crate::{
        attachment::AttachmentStore,
        endpoints,
        income::{Income, IncomeCategory, add_income, get_income},
        money::Currency,
        test_utils::{assert_hx_redirect, get_test_connection, test_session},
    };

    use super::{EditIncomeForm, EditIncomeState, update_income_endpoint};

    #[tokio::test]
    async fn update_redirects_and_persists() {
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

        let state = EditIncomeState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let form = EditIncomeForm {
            amount: 1200.0,
            description: "Salary with bonus".to_owned(),
            category: "Bonus".to_owned(),
            currency: Currency::Usd,
            date: date!(2024 - 06 - 01),
        };

        let response = update_income_endpoint(
            State(state.clone()),
            Extension(session.clone()),
            Path(income.id),
            Form(form),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::INCOME_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let updated = get_income(income.id, &session.user_id, &connection).unwrap();
        assert_eq!(updated.amount, 1200.0);
        assert_eq!(updated.category, IncomeCategory::Bonus);
    }
}
