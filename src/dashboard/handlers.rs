//! Dashboard HTTP handlers and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    aggregate::{CategoryShare, Totals, compute_totals, expense_breakdown},
    endpoints,
    filter::RecordFilter,
    html::{CARD_STYLE, HeadElement, PAGE_CONTAINER_STYLE, base, link},
    money::{Currency, format_money},
    navigation::NavBar,
    reminder::{Reminder, fetch_reminders},
    session::Session,
    timezone::local_today,
};

use super::{
    cards::totals_cards_view,
    charts::{DashboardChart, breakdown_chart, chart_view, charts_script},
};

/// How many pending reminders the dashboard previews.
const UPCOMING_REMINDER_LIMIT: usize = 5;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display a page with an overview of the user's data.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(session): Extension<Session>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expenses = crate::expense::fetch_expenses(
        Some(&session),
        &RecordFilter::none(),
        today,
        &connection,
    )?;
    let income =
        crate::income::fetch_income(Some(&session), &RecordFilter::none(), today, &connection)?;
    let reminders = fetch_reminders(Some(&session), &connection)?;

    let totals = compute_totals(&income, &expenses);
    let breakdown = expense_breakdown(&expenses);

    let upcoming: Vec<&Reminder> = reminders
        .iter()
        .filter(|reminder| !reminder.is_completed)
        .take(UPCOMING_REMINDER_LIMIT)
        .collect();

    Ok(dashboard_view(&session, &totals, &breakdown, &upcoming).into_response())
}

fn dashboard_view(
    session: &Session,
    totals: &Totals,
    breakdown: &[CategoryShare],
    upcoming: &[&Reminder],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let chart = DashboardChart {
        id: "category-breakdown-chart",
        options: breakdown_chart(breakdown).to_string(),
    };

    let head_elements = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(std::slice::from_ref(&chart)),
    ];

    let content = html! {
        (nav_bar)
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-4xl"
            {
                p class="text-sm text-gray-500 dark:text-gray-400 mb-4"
                {
                    "Signed in as " (session.email)
                }

                (totals_cards_view(totals))

                div class="grid grid-cols-1 lg:grid-cols-2 gap-4"
                {
                    div class=(CARD_STYLE)
                    {
                        @if breakdown.is_empty() {
                            p class="text-gray-500 dark:text-gray-400" { "No data to display" }
                        } @else {
                            (chart_view(&chart))

                            ul class="space-y-1 mt-4"
                            {
                                @for share in breakdown {
                                    li class="flex justify-between text-sm"
                                    {
                                        span { (share.label) }
                                        span class="font-medium"
                                        {
                                            (format_money(share.total, Currency::Usd))
                                            span class="text-gray-500 ml-1" { " (" (share.percent) "%)" }
                                        }
                                    }
                                }
                            }
                        }
                    }

                    div class=(CARD_STYLE)
                    {
                        div class="flex justify-between items-baseline mb-2"
                        {
                            h3 class="font-semibold" { "Upcoming Reminders" }
                            p { (link(endpoints::REMINDERS_VIEW, "View all")) }
                        }

                        @if upcoming.is_empty() {
                            p class="text-gray-500 dark:text-gray-400" { "Nothing due." }
                        }

                        ul class="space-y-2"
                        {
                            @for reminder in upcoming {
                                li class="flex justify-between text-sm"
                                {
                                    span { (reminder.title) }
                                    span class="text-gray-500" { "due " (reminder.due_date) }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Dashboard", &head_elements, &content)
}
