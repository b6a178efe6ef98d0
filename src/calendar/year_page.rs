//! The year overview: one card per month with totals and reminder counts.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    AppState, Error,
    aggregate::{MonthSummary, month_summaries},
    endpoints,
    filter::RecordFilter,
    html::{CARD_STYLE, PAGE_CONTAINER_STYLE, base, link},
    money::{Currency, format_money_rounded},
    navigation::NavBar,
    session::Session,
    timezone::local_today,
};

use super::month_page::CalendarState;

/// Display every month of the current year with its expense and income
/// totals and the number of reminders due in it.
pub async fn get_year_overview_page(
    State(state): State<CalendarState>,
    Extension(session): Extension<Session>,
) -> Response {
    let Some(today) = local_today(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_response();
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
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
        let reminders = crate::reminder::fetch_reminders(Some(&session), &connection)?;
        Ok((expenses, income, reminders))
    });

    match fetched {
        Ok((expenses, income, reminders)) => {
            let summaries = month_summaries(today.year(), &expenses, &income, &reminders);

            year_overview_view(today, &summaries).into_response()
        }
        Err(error) => error.into_response(),
    }
}

fn year_overview_view(today: Date, summaries: &[MonthSummary]) -> Markup {
    let nav_bar = NavBar::new(endpoints::YEAR_OVERVIEW_VIEW).into_html();

    let content = html! {
        (nav_bar)
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl"
            {
                div class="flex items-center justify-between mb-4"
                {
                    h1 class="text-2xl font-bold" { (today.year()) }
                    p { (link(endpoints::CALENDAR_VIEW, "Month view")) }
                }

                div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 xl:grid-cols-4 gap-4"
                {
                    @for summary in summaries {
                        (month_card(summary))
                    }
                }
            }
        }
    };

    base("Year Overview", &[], &content)
}

fn month_card(summary: &MonthSummary) -> Markup {
    let has_events = summary.expense_total > 0.0
        || summary.income_total > 0.0
        || summary.reminder_count > 0;

    html! {
        div class=(CARD_STYLE)
        {
            h3 class="text-sm font-medium mb-2" { (month_label(summary.month)) }

            @if has_events {
                div class="space-y-1 text-sm"
                {
                    @if summary.income_total > 0.0 {
                        p class="text-green-600 dark:text-green-400"
                        {
                            "Income: " (format_money_rounded(summary.income_total, Currency::Usd))
                        }
                    }

                    @if summary.expense_total > 0.0 {
                        p class="text-red-600 dark:text-red-400"
                        {
                            "Expenses: " (format_money_rounded(summary.expense_total, Currency::Usd))
                        }
                    }

                    @if summary.reminder_count > 0 {
                        p class="text-orange-600 dark:text-orange-400"
                        {
                            (summary.reminder_count)
                            @if summary.reminder_count > 1 { " Reminders" } @else { " Reminder" }
                        }
                    }
                }
            } @else {
                p class="text-sm text-gray-400" { "No activity" }
            }
        }
    }
}

fn month_label(month: time::Month) -> &'static str {
    match month {
        time::Month::January => "January",
        time::Month::February => "February",
        time::Month::March => "March",
        time::Month::April => "April",
        time::Month::May => "May",
        time::Month::June => "June",
        time::Month::July => "July",
        time::Month::August => "August",
        time::Month::September => "September",
        time::Month::October => "October",
        time::Month::November => "November",
        time::Month::December => "December",
    }
}
