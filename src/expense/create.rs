//! Expense creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use time::{Date, macros::format_description};

use crate::{
    AppState, Error,
    attachment::{AttachmentStore, NewAttachmentFile},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, loading_spinner},
    money::Currency,
    navigation::NavBar,
    session::Session,
    timezone::local_today,
};

use super::{
    domain::{Expense, ExpenseCategory},
    form::{AUTO_CATEGORY_VALUE, ExpenseFormDefaults, expense_form_fields},
    store::add_expense,
    suggest::suggest_category,
};

/// The state needed for creating an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The blob store attachments are written to.
    pub attachment_store: AttachmentStore,
    /// The local timezone as a canonical timezone name.
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            attachment_store: state.attachment_store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the expense creation page.
pub async fn get_new_expense_page(State(state): State<CreateExpenseState>) -> Response {
    let Some(today) = local_today(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_response();
    };

    new_expense_view(today).into_response()
}

/// Handle expense creation form submission.
///
/// The form is multipart so that attachment files can ride along with the
/// record fields.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Extension(session): Extension<Session>,
    multipart: Multipart,
) -> Response {
    let (form, files) = match parse_expense_multipart(multipart).await {
        Ok(parsed) => parsed,
        Err(error) => {
            tracing::error!("could not parse expense form: {error}");
            return error.into_alert_response();
        }
    };

    let (category, ai_suggested) = resolve_category(&form.category, &form.description);

    let builder = Expense::build(form.amount, form.date, &form.description)
        .category(category)
        .currency(form.currency)
        .ai_suggested(ai_suggested);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match add_expense(
        Some(&session),
        builder,
        &files,
        &state.attachment_store,
        &connection,
    ) {
        Ok(_) => (
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating an expense: {error}");

            error.into_alert_response()
        }
    }
}

/// The record fields parsed out of the multipart form.
struct ExpenseFormData {
    amount: f64,
    description: String,
    category: String,
    currency: Currency,
    date: Date,
}

/// Pick the category for a new expense.
///
/// The "auto" selector value hands the choice to the keyword heuristic and
/// marks the record as AI-suggested.
fn resolve_category(category_value: &str, description: &str) -> (ExpenseCategory, bool) {
    if category_value == AUTO_CATEGORY_VALUE {
        (suggest_category(description), true)
    } else {
        (ExpenseCategory::from_label(category_value), false)
    }
}

async fn parse_expense_multipart(
    mut multipart: Multipart,
) -> Result<(ExpenseFormData, Vec<NewAttachmentFile>), Error> {
    let date_format = format_description!("[year]-[month]-[day]");

    let mut amount = None;
    let mut description = None;
    let mut category = None;
    let mut currency = None;
    let mut date = None;
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_owned();

        match name.as_str() {
            "attachments" => {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|error| Error::MultipartError(error.to_string()))?;

                // Browsers submit an empty file part when no file was picked.
                if !file_name.is_empty() && !bytes.is_empty() {
                    files.push(NewAttachmentFile {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {
                let text = field
                    .text()
                    .await
                    .map_err(|error| Error::MultipartError(error.to_string()))?;

                match name.as_str() {
                    "amount" => {
                        amount = Some(text.parse::<f64>().map_err(|_| {
                            Error::MultipartError(format!("invalid amount {text:?}"))
                        })?);
                    }
                    "description" => description = Some(text),
                    "category" => category = Some(text),
                    "currency" => {
                        currency = Some(Currency::from_code(&text).ok_or_else(|| {
                            Error::MultipartError(format!("unknown currency {text:?}"))
                        })?);
                    }
                    "date" => {
                        date = Some(Date::parse(&text, date_format).map_err(|_| {
                            Error::MultipartError(format!("invalid date {text:?}"))
                        })?);
                    }
                    _ => {}
                }
            }
        }
    }

    let form = ExpenseFormData {
        amount: amount.ok_or_else(|| Error::MultipartError("missing amount".to_owned()))?,
        description: description
            .ok_or_else(|| Error::MultipartError("missing description".to_owned()))?,
        category: category.ok_or_else(|| Error::MultipartError("missing category".to_owned()))?,
        currency: currency.ok_or_else(|| Error::MultipartError("missing currency".to_owned()))?,
        date: date.ok_or_else(|| Error::MultipartError("missing date".to_owned()))?,
    };

    Ok((form, files))
}

fn new_expense_view(today: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_EXPENSE_VIEW).into_html();

    let form = html! {
        form
            hx-post=(endpoints::EXPENSES_API)
            hx-encoding="multipart/form-data"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="find button"
            class="w-full space-y-4 md:space-y-6"
        {
            (expense_form_fields(&ExpenseFormDefaults {
                amount: None,
                date: today,
                description: None,
                category: None,
                currency: Currency::Inr,
                offer_auto_category: true,
            }))

            div
            {
                label
                    for="attachments"
                    class=(FORM_LABEL_STYLE)
                {
                    "Attachments (receipts, invoices)"
                }

                input
                    name="attachments"
                    id="attachments"
                    type="file"
                    multiple
                    accept="image/*,.pdf"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="htmx-indicator" { (loading_spinner()) }
                "Add Expense"
            }
        }
    };

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4 mt-4" { "Add Expense" }
            (form)
        }
    };

    base("Add Expense", &[], &content)
}
