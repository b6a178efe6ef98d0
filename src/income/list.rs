//! The income list page with its time filter and search bar.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    filter::{FilterQuery, RecordFilter, TimeFilter},
    html::{
        BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, link,
    },
    money::format_money,
    navigation::NavBar,
    session::Session,
    timezone::local_today,
};

use super::{domain::Income, store::fetch_income};

/// The state needed for the income list page and table fragment.
#[derive(Debug, Clone)]
pub struct IncomeListState {
    /// The database connection for managing income records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name.
    pub local_timezone: String,
    /// The quiescence window for the search box, in milliseconds.
    pub search_debounce_ms: u64,
}

impl FromRef<AppState> for IncomeListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            search_debounce_ms: state.search_debounce_ms,
        }
    }
}

/// Display the signed in user's income records.
pub async fn get_income_page(
    State(state): State<IncomeListState>,
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

    let income = match fetch_income(Some(&session), &RecordFilter::none(), today, &connection) {
        Ok(income) => income,
        Err(error) => return error.into_response(),
    };

    income_page_view(&income, state.search_debounce_ms).into_response()
}

/// Return the income table fragment for the current filter and search.
pub async fn get_income_table_fragment(
    State(state): State<IncomeListState>,
    Extension(session): Extension<Session>,
    Query(query): Query<FilterQuery>,
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

    let filter = RecordFilter::from(query);

    match fetch_income(Some(&session), &filter, today, &connection) {
        Ok(income) => income_table_view(&income).into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn income_page_view(income: &[Income], search_debounce_ms: u64) -> Markup {
    let nav_bar = NavBar::new(endpoints::INCOME_VIEW).into_html();

    let content = html! {
        (nav_bar)
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-4xl"
            {
                div class="flex items-center justify-between mb-4"
                {
                    h1 class="text-2xl font-bold" { "Income" }
                    p { (link(endpoints::NEW_INCOME_VIEW, "Add income")) }
                }

                (filter_bar(search_debounce_ms))

                (income_table_view(income))
            }
        }
    };

    base("Income", &[], &content)
}

/// The time filter selector and debounced search box for income records.
fn filter_bar(search_debounce_ms: u64) -> Markup {
    let search_trigger = format!("input changed delay:{search_debounce_ms}ms, search");

    html! {
        form id="income-filter" class="flex gap-4 mb-4"
        {
            select
                name="filter"
                aria-label="Time filter"
                class=(FORM_TEXT_INPUT_STYLE)
                hx-get=(endpoints::INCOME_TABLE)
                hx-target="#income-table"
                hx-swap="outerHTML"
                hx-include="#income-filter"
                hx-trigger="change"
                hx-target-error="#alert-container"
            {
                @for time_filter in TimeFilter::ALL_VALUES {
                    option value=(time_filter.as_query_value()) { (time_filter.label()) }
                }
            }

            input
                name="search"
                type="search"
                placeholder="Search transactions..."
                aria-label="Search"
                class=(FORM_TEXT_INPUT_STYLE)
                hx-get=(endpoints::INCOME_TABLE)
                hx-target="#income-table"
                hx-swap="outerHTML"
                hx-include="#income-filter"
                hx-trigger=(search_trigger)
                hx-sync="this:replace"
                hx-target-error="#alert-container";
        }
    }
}

/// Render the income table. Used by the page, the filter fragment, and the
/// delete endpoint's refreshed response.
pub(super) fn income_table_view(income: &[Income]) -> Markup {
    html! {
        div id="income-table" class="w-full relative overflow-x-auto shadow-md sm:rounded"
        {
            @if income.is_empty() {
                p class="p-6 text-gray-500 dark:text-gray-400" { "No income recorded." }
            } @else {
                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for record in income {
                            (income_table_row(record))
                        }
                    }
                }
            }
        }
    }
}

fn income_table_row(income: &Income) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_INCOME_VIEW, income.id);
    let delete_url = endpoints::format_endpoint(endpoints::INCOME, income.id);

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (income.date) }

            td class=(TABLE_CELL_STYLE)
            {
                (income.description)

                @if !income.file_attachments.is_empty() {
                    " "
                    span
                        class="text-xs text-gray-400"
                        title=(format!("{} attached file(s)", income.file_attachments.len()))
                    {
                        "📎"
                    }
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (income.category.label()) }
            }

            td class=(TABLE_CELL_STYLE) { (format_money(income.amount, income.currency)) }

            td class=(TABLE_CELL_STYLE)
            {
                a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                " "
                button
                    type="button"
                    class=(BUTTON_DELETE_STYLE)
                    hx-delete=(delete_url)
                    hx-confirm="Delete this income record? This cannot be undone."
                    hx-target="#income-table"
                    hx-swap="outerHTML"
                    hx-target-error="#alert-container"
                {
                    "Delete"
                }
            }
        }
    }
}
