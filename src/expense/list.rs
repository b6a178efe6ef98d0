//! The expenses list page with its time filter and search bar.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints,
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

use super::{domain::Expense, store::fetch_expenses};

/// The state needed for the expenses list page and table fragment.
#[derive(Debug, Clone)]
pub struct ExpenseListState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name.
    pub local_timezone: String,
    /// The quiescence window for the search box, in milliseconds.
    pub search_debounce_ms: u64,
}

impl FromRef<AppState> for ExpenseListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            search_debounce_ms: state.search_debounce_ms,
        }
    }
}

/// Display the signed in user's expenses.
pub async fn get_expenses_page(
    State(state): State<ExpenseListState>,
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

    let expenses = match fetch_expenses(Some(&session), &RecordFilter::none(), today, &connection) {
        Ok(expenses) => expenses,
        Err(error) => return error.into_response(),
    };

    expenses_page_view(&expenses, state.search_debounce_ms).into_response()
}

/// Return the expense table fragment for the current filter and search.
pub async fn get_expense_table_fragment(
    State(state): State<ExpenseListState>,
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

    match fetch_expenses(Some(&session), &filter, today, &connection) {
        Ok(expenses) => expense_table_view(&expenses).into_response(),
        // The previously rendered table stays in place: error responses only
        // swap the alert container.
        Err(error) => error.into_alert_response(),
    }
}

fn expenses_page_view(expenses: &[Expense], search_debounce_ms: u64) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();

    let content = html! {
        (nav_bar)
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-4xl"
            {
                div class="flex items-center justify-between mb-4"
                {
                    h1 class="text-2xl font-bold" { "Expenses" }
                    p { (link(endpoints::NEW_EXPENSE_VIEW, "Add expense")) }
                }

                (filter_bar(search_debounce_ms))

                (expense_table_view(expenses))
            }
        }
    };

    base("Expenses", &[], &content)
}

/// The time filter selector and debounced search box.
///
/// Both controls target the table container; the search input waits for the
/// configured quiescence window and aborts any in-flight request when a newer
/// one starts, so the latest request always wins.
fn filter_bar(search_debounce_ms: u64) -> Markup {
    let search_trigger = format!("input changed delay:{search_debounce_ms}ms, search");

    html! {
        form id="expense-filter" class="flex gap-4 mb-4"
        {
            select
                name="filter"
                aria-label="Time filter"
                class=(FORM_TEXT_INPUT_STYLE)
                hx-get=(endpoints::EXPENSES_TABLE)
                hx-target="#expenses-table"
                hx-swap="outerHTML"
                hx-include="#expense-filter"
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
                hx-get=(endpoints::EXPENSES_TABLE)
                hx-target="#expenses-table"
                hx-swap="outerHTML"
                hx-include="#expense-filter"
                hx-trigger=(search_trigger)
                hx-sync="this:replace"
                hx-target-error="#alert-container";
        }
    }
}

/// Render the expense table. Used by the page, the filter fragment, and the
/// delete endpoint's refreshed response.
pub(super) fn expense_table_view(expenses: &[Expense]) -> Markup {
    html! {
        div id="expenses-table" class="w-full relative overflow-x-auto shadow-md sm:rounded"
        {
            @if expenses.is_empty() {
                p class="p-6 text-gray-500 dark:text-gray-400" { "No expenses found." }
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
                            th scope="col" class=(TABLE_CELL_STYLE) { "Attachments" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for expense in expenses {
                            (expense_table_row(expense))
                        }
                    }
                }
            }
        }
    }
}

fn expense_table_row(expense: &Expense) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_EXPENSE_VIEW, expense.id);
    let delete_url = endpoints::format_endpoint(endpoints::EXPENSE, expense.id);

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (expense.date) }

            td class=(TABLE_CELL_STYLE)
            {
                (expense.description)

                @if expense.ai_suggested {
                    " "
                    span
                        class="text-xs text-purple-600 dark:text-purple-400"
                        title="Category was suggested automatically"
                    {
                        "(auto)"
                    }
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (expense.category.label()) }
            }

            td class=(TABLE_CELL_STYLE) { (format_money(expense.amount, expense.currency)) }

            td class=(TABLE_CELL_STYLE)
            {
                @for attachment in &expense.attachments {
                    a
                        href=(endpoints::format_endpoint(endpoints::ATTACHMENT, attachment.id))
                        class=(LINK_STYLE)
                        title=(format!("{} ({} bytes)", attachment.file_name, attachment.file_size))
                    {
                        "📎"
                    }
                    " "
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                " "
                button
                    type="button"
                    class=(BUTTON_DELETE_STYLE)
                    hx-delete=(delete_url)
                    hx-confirm="Delete this expense? This cannot be undone."
                    hx-target="#expenses-table"
                    hx-swap="outerHTML"
                    hx-target-error="#alert-container"
                {
                    "Delete"
                }
            }
        }
    }
}

#[cfg(test)]
mod expense_table_tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        expense::{Expense, ExpenseCategory},
        money::Currency,
        session::UserId,
    };

    use super::expense_table_view;

    fn test_expense(description: &str, amount: f64) -> Expense {
        Expense {
            id: 1,
            user_id: UserId::new("user-1"),
            amount,
            description: description.to_owned(),
            category: ExpenseCategory::FoodAndDining,
            currency: Currency::Usd,
            date: date!(2024 - 06 - 24),
            ai_suggested: false,
            created_at: time::OffsetDateTime::now_utc(),
            attachments: Vec::new(),
        }
    }

    #[test]
    fn renders_rows_with_formatted_amounts() {
        let expenses = vec![test_expense("Morning coffee", 45.99)];

        let html = Html::parse_fragment(&expense_table_view(&expenses).into_string());

        let cell = Selector::parse("td").unwrap();
        let cells: Vec<String> = html
            .select(&cell)
            .map(|cell| cell.text().collect::<String>())
            .collect();

        assert!(cells.iter().any(|text| text.contains("Morning coffee")));
        assert!(cells.iter().any(|text| text.contains("$45.99")));
    }

    #[test]
    fn empty_list_shows_placeholder() {
        let html = Html::parse_fragment(&expense_table_view(&[]).into_string());

        let table = Selector::parse("table").unwrap();
        assert_eq!(html.select(&table).count(), 0);
        assert!(
            html.root_element()
                .text()
                .collect::<String>()
                .contains("No expenses found.")
        );
    }

    #[test]
    fn delete_button_asks_for_confirmation() {
        let expenses = vec![test_expense("Morning coffee", 45.99)];

        let html = Html::parse_fragment(&expense_table_view(&expenses).into_string());

        let button = Selector::parse("button[hx-delete]").unwrap();
        let delete_button = html.select(&button).next().expect("No delete button");

        assert!(delete_button.value().attr("hx-confirm").is_some());
    }

    #[test]
    fn ai_suggested_expenses_are_marked() {
        let mut expense = test_expense("lunch", 10.0);
        expense.ai_suggested = true;

        let html = Html::parse_fragment(&expense_table_view(&[expense]).into_string());

        assert!(
            html.root_element()
                .text()
                .collect::<String>()
                .contains("(auto)")
        );
    }
}
