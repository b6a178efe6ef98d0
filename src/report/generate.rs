//! Report generation and email-stub endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    aggregate::{ReportPeriod, ReportSummary, build_report, render_report_text},
    alert::Alert,
    filter::RecordFilter,
    html::BUTTON_SECONDARY_STYLE,
    session::Session,
    timezone::local_today,
};

/// The state needed for generating a report.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection for reading records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name.
    pub local_timezone: String,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for generating a report.
#[derive(Debug, Default, Deserialize)]
pub struct ReportForm {
    /// The selected period.
    #[serde(default)]
    pub period: ReportPeriod,
    /// Free-form requirements appended to the report document.
    pub requirements: Option<String>,
}

/// A route handler that builds the report for the selected period and
/// renders it as a plain-text document with a copy-to-clipboard button.
pub async fn generate_report_endpoint(
    State(state): State<ReportState>,
    Extension(session): Extension<Session>,
    Form(form): Form<ReportForm>,
) -> Response {
    let Some(today) = local_today(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let fetched = crate::expense::fetch_expenses(
        Some(&session),
        &RecordFilter::none(),
        today,
        &connection,
    )
    .and_then(|expenses| {
        let income = crate::income::fetch_income(
            Some(&session),
            &RecordFilter::none(),
            today,
            &connection,
        )?;
        Ok((expenses, income))
    });

    let (expenses, income) = match fetched {
        Ok(records) => records,
        Err(error) => return error.into_alert_response(),
    };

    let report = build_report(form.period, today, &expenses, &income);
    let text = render_report_text(&report, today, form.requirements.as_deref());

    let alert = Alert::success(
        "Report Generated!",
        format!(
            "Your {} report is ready. Use the copy button to place it on the clipboard.",
            form.period.as_query_value()
        ),
    )
    .into_html();

    html! {
        (report_output_view(&report, &text))
        (alert)
    }
    .into_response()
}

/// A route handler for the report email stub.
///
/// No mail is actually transmitted; delivery is a future backend
/// integration point.
pub async fn email_report_endpoint(Extension(session): Extension<Session>) -> Response {
    tracing::info!("report email requested for {}", session.email);

    Alert::success(
        "Email not sent",
        format!(
            "Email delivery to {} will be available once a mail integration is configured. \
            The report can be copied to the clipboard in the meantime.",
            session.email
        ),
    )
    .into_response()
}

fn report_output_view(report: &ReportSummary, text: &str) -> Markup {
    html! {
        div class="p-4 bg-white dark:bg-gray-800 rounded-lg shadow"
        {
            div class="flex items-center justify-between mb-2"
            {
                h2 class="font-semibold" { "Report - " (report.period_label) }

                div class="flex gap-2"
                {
                    button
                        type="button"
                        class=(BUTTON_SECONDARY_STYLE)
                        onclick="copyReportText()"
                    {
                        "Copy to clipboard"
                    }

                    button
                        type="button"
                        class=(BUTTON_SECONDARY_STYLE)
                        hx-post=(crate::endpoints::EMAIL_REPORT)
                        hx-swap="none"
                        hx-target-error="#alert-container"
                    {
                        "Email report"
                    }
                }
            }

            pre
                id="report-text"
                class="text-xs whitespace-pre-wrap text-gray-700 dark:text-gray-300"
            {
                (text)
            }
        }
    }
}
