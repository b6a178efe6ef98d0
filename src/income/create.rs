//! Income creation page and endpoint.

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
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        loading_spinner,
    },
    money::Currency,
    navigation::NavBar,
    session::Session,
    timezone::local_today,
};

use super::{
    domain::{Income, IncomeCategory},
    form::{IncomeFormDefaults, income_form_fields},
    store::add_income,
};

/// The state needed for creating an income record.
#[derive(Debug, Clone)]
pub struct CreateIncomeState {
    /// The database connection for managing income records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The blob store attachments are written to.
    pub attachment_store: AttachmentStore,
    /// The local timezone as a canonical timezone name.
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateIncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            attachment_store: state.attachment_store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the income creation page.
pub async fn get_new_income_page(State(state): State<CreateIncomeState>) -> Response {
    let Some(today) = local_today(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_response();
    };

    new_income_view(today).into_response()
}

/// Handle income creation form submission.
pub async fn create_income_endpoint(
    State(state): State<CreateIncomeState>,
    Extension(session): Extension<Session>,
    multipart: Multipart,
) -> Response {
    let (builder, files) = match parse_income_multipart(multipart).await {
        Ok(parsed) => parsed,
        Err(error) => {
            tracing::error!("could not parse income form: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match add_income(
        Some(&session),
        builder,
        &files,
        &state.attachment_store,
        &connection,
    ) {
        Ok(_) => (
            HxRedirect(endpoints::INCOME_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating income: {error}");

            error.into_alert_response()
        }
    }
}

async fn parse_income_multipart(
    mut multipart: Multipart,
) -> Result<(super::domain::IncomeBuilder, Vec<NewAttachmentFile>), Error> {
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

    let amount = amount.ok_or_else(|| Error::MultipartError("missing amount".to_owned()))?;
    let description =
        description.ok_or_else(|| Error::MultipartError("missing description".to_owned()))?;
    let category = category.ok_or_else(|| Error::MultipartError("missing category".to_owned()))?;
    let currency = currency.ok_or_else(|| Error::MultipartError("missing currency".to_owned()))?;
    let date = date.ok_or_else(|| Error::MultipartError("missing date".to_owned()))?;

    let builder = Income::build(amount, date, &description)
        .category(IncomeCategory::from_label(&category))
        .currency(currency);

    Ok((builder, files))
}

fn new_income_view(today: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_INCOME_VIEW).into_html();

    let form = html! {
        form
            hx-post=(endpoints::INCOME_API)
            hx-encoding="multipart/form-data"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="find button"
            class="w-full space-y-4 md:space-y-6"
        {
            (income_form_fields(&IncomeFormDefaults {
                amount: None,
                date: today,
                description: None,
                category: None,
                currency: Currency::Usd,
            }))

            div
            {
                label
                    for="attachments"
                    class=(FORM_LABEL_STYLE)
                {
                    "Attachments (payslips, invoices)"
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
                "Add Income"
            }
        }
    };

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4 mt-4" { "Add Income" }
            (form)
        }
    };

    base("Add Income", &[], &content)
}

#[cfg(test)]
mod new_income_page_tests {
    use axum::extract::State;

    use crate::{
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_document,
        },
    };

    use super::{CreateIncomeState, get_new_income_page};

    #[tokio::test]
    async fn render_page() {
        let state = CreateIncomeState {
            db_connection: std::sync::Arc::new(std::sync::Mutex::new(
                rusqlite::Connection::open_in_memory().unwrap(),
            )),
            attachment_store: crate::attachment::AttachmentStore::new(std::env::temp_dir()),
            local_timezone: "UTC".to_owned(),
        };

        let response = get_new_income_page(State(state)).await;

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::INCOME_API, "hx-post");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "description", "text");
        assert_form_input(&form, "date", "date");
        assert_form_submit_button(&form);
    }
}
