//! The reports page: period selector, optional custom requirements, and the
//! generated report output.

use axum::{
    Extension,
    response::{IntoResponse, Response},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    aggregate::ReportPeriod,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement,
        PAGE_CONTAINER_STYLE, base,
    },
    navigation::NavBar,
    session::Session,
};

/// Display the report generation page.
pub async fn get_reports_page(Extension(session): Extension<Session>) -> Response {
    reports_page_view(&session).into_response()
}

fn reports_page_view(session: &Session) -> Markup {
    let nav_bar = NavBar::new(endpoints::REPORTS_VIEW).into_html();

    // The generated report is copied from the DOM, so the helper lives on
    // the page rather than in the fragment responses.
    let clipboard_script = HeadElement::ScriptSource(PreEscaped(
        r#"
        function copyReportText() {
            const report = document.getElementById('report-text');
            if (report) {
                navigator.clipboard.writeText(report.textContent);
            }
        }
        "#
        .to_owned(),
    ));

    let content = html! {
        (nav_bar)
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-2xl"
            {
                h1 class="text-2xl font-bold mb-4" { "Generate Financial Report" }

                form
                    hx-post=(endpoints::GENERATE_REPORT)
                    hx-target="#report-output"
                    hx-swap="innerHTML"
                    hx-target-error="#alert-container"
                    class="space-y-4 mb-6 p-4 bg-white dark:bg-gray-800 rounded-lg shadow"
                {
                    div
                    {
                        label for="period" class=(FORM_LABEL_STYLE) { "Report Type" }

                        select
                            name="period"
                            id="period"
                            required
                            class=(FORM_TEXT_INPUT_STYLE)
                        {
                            @for period in ReportPeriod::ALL_VALUES {
                                option value=(period.as_query_value()) { (period.label()) }
                            }
                        }
                    }

                    div
                    {
                        label for="requirements" class=(FORM_LABEL_STYLE)
                        {
                            "Custom Requirements (Optional)"
                        }

                        textarea
                            name="requirements"
                            id="requirements"
                            rows="3"
                            placeholder="Any specific analysis or insights you'd like included in the report..."
                            class=(FORM_TEXT_INPUT_STYLE)
                        {}
                    }

                    div
                    {
                        label class=(FORM_LABEL_STYLE) { "Email Address" }

                        input
                            type="email"
                            value=(session.email)
                            disabled
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Generate Report" }
                }

                div class="text-sm text-gray-600 dark:text-gray-400 mb-6"
                {
                    p { "The report will include:" }
                    ul class="list-disc list-inside mt-1 space-y-1"
                    {
                        li { "Income and expense summary" }
                        li { "Category-wise breakdown" }
                        li { "Top transactions" }
                        li { "Savings analysis" }
                        li { "Financial insights and recommendations" }
                    }
                }

                div id="report-output" {}
            }
        }
    };

    base("Reports", &[clipboard_script], &content)
}
