//! The current month's calendar grid.
//!
//! Each day cell shows presence bars for expenses, income, and reminders
//! falling on that day; no amounts are shown at day granularity.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::{Date, Weekday};

use crate::{
    AppState, Error,
    aggregate::{DayActivity, day_activity},
    endpoints,
    filter::RecordFilter,
    html::{CARD_STYLE, PAGE_CONTAINER_STYLE, base, link},
    navigation::NavBar,
    session::Session,
    timezone::local_today,
};

/// The state needed for the calendar pages.
#[derive(Debug, Clone)]
pub struct CalendarState {
    /// The database connection for reading records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name.
    pub local_timezone: String,
}

impl FromRef<AppState> for CalendarState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display the current month as a day grid with activity markers.
pub async fn get_calendar_page(
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
            let days = day_activity(today.year(), today.month(), &expenses, &income, &reminders);

            calendar_view(today, &days).into_response()
        }
        Err(error) => error.into_response(),
    }
}

fn calendar_view(today: Date, days: &[DayActivity]) -> Markup {
    let nav_bar = NavBar::new(endpoints::CALENDAR_VIEW).into_html();
    let first_of_month = today.replace_day(1).expect("day 1 is valid for every month");
    let leading_blanks = weekday_offset_from_sunday(first_of_month.weekday());
    let month_title = format!("{} {}", month_name(today.month()), today.year());

    let content = html! {
        (nav_bar)
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-4xl"
            {
                div class="flex items-center justify-between mb-4"
                {
                    h1 class="text-2xl font-bold" { (month_title) }
                    p { (link(endpoints::YEAR_OVERVIEW_VIEW, "Year overview")) }
                }

                div class=(CARD_STYLE)
                {
                    div class="grid grid-cols-7 mb-2"
                    {
                        @for weekday in ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"] {
                            div class="p-2 text-center font-medium text-gray-600 dark:text-gray-400"
                            {
                                (weekday)
                            }
                        }
                    }

                    div class="grid grid-cols-7 border border-gray-200 dark:border-gray-700"
                    {
                        @for _ in 0..leading_blanks {
                            div class="min-h-[80px] p-2 border border-gray-200 dark:border-gray-700 bg-gray-50 dark:bg-gray-800" {}
                        }

                        @for day in days {
                            (day_cell(day, today))
                        }
                    }
                }

                div class="flex gap-4 mt-4 text-sm text-gray-600 dark:text-gray-400"
                {
                    span { span class="inline-block w-3 h-1 bg-red-400 rounded mr-1" {} "Expenses" }
                    span { span class="inline-block w-3 h-1 bg-green-400 rounded mr-1" {} "Income" }
                    span { span class="inline-block w-3 h-1 bg-orange-400 rounded mr-1" {} "Reminders" }
                }
            }
        }
    };

    base("Calendar", &[], &content)
}

fn day_cell(day: &DayActivity, today: Date) -> Markup {
    let is_today = day.day == today.day();
    let cell_style = if is_today {
        "min-h-[80px] p-2 border border-blue-300 bg-blue-50 dark:bg-blue-900/30"
    } else {
        "min-h-[80px] p-2 border border-gray-200 dark:border-gray-700 bg-white dark:bg-gray-900"
    };
    let day_number_style = if is_today {
        "text-sm font-medium mb-1 text-blue-600 dark:text-blue-300"
    } else {
        "text-sm font-medium mb-1 text-gray-900 dark:text-white"
    };

    html! {
        div class=(cell_style)
        {
            div class=(day_number_style) { (day.day) }

            @if day.has_events() {
                div class="space-y-1"
                {
                    @if day.has_expenses {
                        div class="w-full h-1 bg-red-400 rounded" {}
                    }
                    @if day.has_income {
                        div class="w-full h-1 bg-green-400 rounded" {}
                    }
                    @if day.has_reminders {
                        div class="w-full h-1 bg-orange-400 rounded" {}
                    }
                }
            }
        }
    }
}

/// Days between Sunday and `weekday`, for the grid's leading blank cells.
fn weekday_offset_from_sunday(weekday: Weekday) -> u8 {
    weekday.number_days_from_sunday()
}

fn month_name(month: time::Month) -> &'static str {
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
