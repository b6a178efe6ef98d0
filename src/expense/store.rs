//! Database functions for storing, querying, and managing expenses.
//!
//! Every operation takes the session explicitly and is a silent no-op when
//! no user is signed in. Ownership is re-asserted per call through the
//! `user_id` column.

use rusqlite::{Connection, Row, named_params};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    attachment::{AttachmentStore, NewAttachmentFile, attachments_by_expense, insert_attachment},
    database_id::ExpenseId,
    filter::{RecordFilter, apply_search},
    session::{Session, UserId},
};

use super::domain::{Expense, ExpenseBuilder};

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                amount REAL NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                currency TEXT NOT NULL,
                date TEXT NOT NULL,
                ai_suggested INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    // Composite index used by every list and aggregation query.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_user_date ON expense(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Fetch the signed in user's expenses, most recent first.
///
/// The filter's time component is applied as a SQL predicate
/// (`date >= cutoff` relative to `today`); the search component narrows the
/// fetched rows afterwards. Returns an empty list when signed out.
///
/// # Errors
/// Returns an [Error::SqlError] if a query fails.
pub fn fetch_expenses(
    session: Option<&Session>,
    filter: &RecordFilter,
    today: Date,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    let Some(session) = session else {
        return Ok(Vec::new());
    };

    let mut expenses = select_expenses(&session.user_id, filter.time.cutoff(today), connection)?;

    let mut attachments = attachments_by_expense(&session.user_id, connection)?;
    for expense in &mut expenses {
        if let Some(expense_attachments) = attachments.remove(&expense.id) {
            expense.attachments = expense_attachments;
        }
    }

    match &filter.search {
        Some(query) => Ok(apply_search(expenses, query)),
        None => Ok(expenses),
    }
}

fn select_expenses(
    user_id: &UserId,
    cutoff: Option<Date>,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    const BASE_QUERY: &str = "SELECT id, user_id, amount, description, category, currency, date, \
         ai_suggested, created_at FROM expense WHERE user_id = :user_id";
    // Sort by date, and then ID to keep row order stable after updates.
    const ORDER_CLAUSE: &str = " ORDER BY date DESC, id ASC";

    let rows = match cutoff {
        Some(cutoff) => connection
            .prepare(&format!("{BASE_QUERY} AND date >= :cutoff{ORDER_CLAUSE}"))?
            .query_map(
                named_params! {":user_id": user_id, ":cutoff": cutoff},
                map_expense_row,
            )?
            .collect::<Result<Vec<_>, _>>(),
        None => connection
            .prepare(&format!("{BASE_QUERY}{ORDER_CLAUSE}"))?
            .query_map(named_params! {":user_id": user_id}, map_expense_row)?
            .collect::<Result<Vec<_>, _>>(),
    };

    rows.map_err(Error::from)
}

/// Create a new expense for the signed in user, storing any attached files.
///
/// Attachment files are written to the blob store after the row exists, then
/// recorded as metadata rows. A failed upload fails the whole call, but the
/// already-inserted expense row and any already-stored files are not rolled
/// back; callers re-fetch the list to pick up attachments.
///
/// Returns `None` when signed out.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount] if the amount is negative,
/// - [Error::EmptyDescription] if the description is empty,
/// - [Error::AttachmentStorageError] if a file cannot be written,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn add_expense(
    session: Option<&Session>,
    builder: ExpenseBuilder,
    attachments: &[NewAttachmentFile],
    attachment_store: &AttachmentStore,
    connection: &Connection,
) -> Result<Option<Expense>, Error> {
    let Some(session) = session else {
        return Ok(None);
    };

    if builder.amount < 0.0 {
        return Err(Error::NegativeAmount(builder.amount));
    }

    if builder.description.trim().is_empty() {
        return Err(Error::EmptyDescription);
    }

    let expense = connection
        .prepare(
            "INSERT INTO expense (user_id, amount, description, category, currency, date, ai_suggested, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING id, user_id, amount, description, category, currency, date, ai_suggested, created_at",
        )?
        .query_one(
            (
                &session.user_id,
                builder.amount,
                &builder.description,
                &builder.category,
                builder.currency,
                builder.date,
                builder.ai_suggested,
                OffsetDateTime::now_utc(),
            ),
            map_expense_row,
        )?;

    for file in attachments {
        let file_path = attachment_store.save(&session.user_id, expense.id, file)?;
        insert_attachment(expense.id, file, &file_path, connection)?;
    }

    Ok(Some(expense))
}

/// Retrieve one of the user's expenses by its `id`.
///
/// # Errors
/// Returns an [Error::NotFound] if `id` does not refer to an expense owned
/// by `user_id`, or [Error::SqlError] for other SQL errors.
pub fn get_expense(
    id: ExpenseId,
    user_id: &UserId,
    connection: &Connection,
) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "SELECT id, user_id, amount, description, category, currency, date, ai_suggested, \
             created_at FROM expense WHERE id = :id AND user_id = :user_id",
        )?
        .query_one(
            named_params! {":id": id, ":user_id": user_id},
            map_expense_row,
        )?;

    Ok(expense)
}

/// Update an expense's editable fields. The heuristic flag is left as-is.
///
/// Returns `None` when signed out.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount] if the amount is negative,
/// - [Error::EmptyDescription] if the description is empty,
/// - [Error::UpdateMissingExpense] if the expense does not exist or belongs
///   to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_expense(
    session: Option<&Session>,
    id: ExpenseId,
    changes: ExpenseBuilder,
    connection: &Connection,
) -> Result<Option<Expense>, Error> {
    let Some(session) = session else {
        return Ok(None);
    };

    if changes.amount < 0.0 {
        return Err(Error::NegativeAmount(changes.amount));
    }

    if changes.description.trim().is_empty() {
        return Err(Error::EmptyDescription);
    }

    let rows_affected = connection.execute(
        "UPDATE expense SET amount = :amount, description = :description, \
         category = :category, currency = :currency, date = :date \
         WHERE id = :id AND user_id = :user_id",
        named_params! {
            ":amount": changes.amount,
            ":description": changes.description,
            ":category": changes.category,
            ":currency": changes.currency,
            ":date": changes.date,
            ":id": id,
            ":user_id": session.user_id,
        },
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingExpense);
    }

    get_expense(id, &session.user_id, connection).map(Some)
}

/// Delete one of the user's expenses. A no-op when signed out.
///
/// # Errors
/// Returns an [Error::DeleteMissingExpense] if the expense does not exist or
/// belongs to another user, or [Error::SqlError] for other SQL errors.
pub fn delete_expense(
    session: Option<&Session>,
    id: ExpenseId,
    connection: &Connection,
) -> Result<(), Error> {
    let Some(session) = session else {
        return Ok(());
    };

    let rows_affected = connection.execute(
        "DELETE FROM expense WHERE id = :id AND user_id = :user_id",
        named_params! {":id": id, ":user_id": session.user_id},
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    Ok(())
}

/// Map a database row to an [Expense] with no attachments.
fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        currency: row.get(5)?,
        date: row.get(6)?,
        ai_suggested: row.get(7)?,
        created_at: row.get(8)?,
        attachments: Vec::new(),
    })
}

#[cfg(test)]
mod store_tests {
    use time::{Duration, macros::date};

    use crate::{
        Error,
        attachment::{AttachmentStore, NewAttachmentFile},
        expense::{Expense, ExpenseCategory},
        filter::{RecordFilter, TimeFilter},
        money::Currency,
        test_utils::{get_test_connection, other_session, test_session},
    };

    use super::{add_expense, delete_expense, fetch_expenses, get_expense, update_expense};

    fn temp_attachment_store() -> (tempfile::TempDir, AttachmentStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = AttachmentStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    #[test]
    fn add_and_fetch_round_trip() {
        let conn = get_test_connection();
        let session = test_session();
        let (_dir, blobs) = temp_attachment_store();
        let today = date!(2024 - 06 - 24);

        let added = add_expense(
            Some(&session),
            Expense::build(45.99, today, "Morning coffee")
                .category(ExpenseCategory::FoodAndDining)
                .currency(Currency::Usd),
            &[],
            &blobs,
            &conn,
        )
        .expect("Could not add expense")
        .expect("Add should return the record when signed in");

        assert_eq!(added.amount, 45.99);
        assert_eq!(added.category, ExpenseCategory::FoodAndDining);
        assert!(!added.ai_suggested);

        let fetched = fetch_expenses(Some(&session), &RecordFilter::none(), today, &conn).unwrap();

        assert_eq!(fetched, vec![added]);
    }

    #[test]
    fn add_signed_out_is_a_noop() {
        let conn = get_test_connection();
        let session = test_session();
        let (_dir, blobs) = temp_attachment_store();
        let today = date!(2024 - 06 - 24);

        let result = add_expense(
            None,
            Expense::build(1.0, today, "Ghost expense"),
            &[],
            &blobs,
            &conn,
        )
        .unwrap();

        assert_eq!(result, None);
        assert!(
            fetch_expenses(Some(&session), &RecordFilter::none(), today, &conn)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn fetch_signed_out_returns_empty() {
        let conn = get_test_connection();

        let got = fetch_expenses(None, &RecordFilter::none(), date!(2024 - 06 - 24), &conn).unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn add_rejects_negative_amount() {
        let conn = get_test_connection();
        let session = test_session();
        let (_dir, blobs) = temp_attachment_store();

        let result = add_expense(
            Some(&session),
            Expense::build(-1.0, date!(2024 - 06 - 24), "Refund?"),
            &[],
            &blobs,
            &conn,
        );

        assert_eq!(result, Err(Error::NegativeAmount(-1.0)));
    }

    #[test]
    fn add_rejects_empty_description() {
        let conn = get_test_connection();
        let session = test_session();
        let (_dir, blobs) = temp_attachment_store();

        let result = add_expense(
            Some(&session),
            Expense::build(1.0, date!(2024 - 06 - 24), "  "),
            &[],
            &blobs,
            &conn,
        );

        assert_eq!(result, Err(Error::EmptyDescription));
    }

    #[test]
    fn fetch_applies_time_filter() {
        let conn = get_test_connection();
        let session = test_session();
        let (_dir, blobs) = temp_attachment_store();
        let today = date!(2024 - 06 - 24);

        for days_ago in [0i64, 3, 6, 10, 40, 400] {
            add_expense(
                Some(&session),
                Expense::build(1.0, today - Duration::days(days_ago), "expense"),
                &[],
                &blobs,
                &conn,
            )
            .unwrap();
        }

        let cases = [
            (TimeFilter::Week, 3),
            (TimeFilter::Month, 4),
            (TimeFilter::Year, 5),
            (TimeFilter::All, 6),
        ];

        for (time_filter, want_count) in cases {
            let got = fetch_expenses(
                Some(&session),
                &RecordFilter::time(time_filter),
                today,
                &conn,
            )
            .unwrap();

            assert_eq!(
                got.len(),
                want_count,
                "filter {time_filter:?}: got {} expenses, want {want_count}",
                got.len()
            );

            if let Some(cutoff) = time_filter.cutoff(today) {
                assert!(
                    got.iter().all(|expense| expense.date >= cutoff),
                    "filter {time_filter:?} returned a record older than the cutoff"
                );
            }
        }
    }

    #[test]
    fn search_is_applied_after_time_filter() {
        let conn = get_test_connection();
        let session = test_session();
        let (_dir, blobs) = temp_attachment_store();
        let today = date!(2024 - 06 - 24);

        // A coffee inside the week window and one well outside it.
        add_expense(
            Some(&session),
            Expense::build(4.5, today - Duration::days(2), "Coffee at the corner"),
            &[],
            &blobs,
            &conn,
        )
        .unwrap();
        add_expense(
            Some(&session),
            Expense::build(3.5, today - Duration::days(30), "Coffee downtown"),
            &[],
            &blobs,
            &conn,
        )
        .unwrap();

        let filter = RecordFilter {
            time: TimeFilter::Week,
            search: Some("coffee".to_owned()),
        };
        let got = fetch_expenses(Some(&session), &filter, today, &conn).unwrap();

        assert_eq!(got.len(), 1, "search must not escape the time window");
        assert_eq!(got[0].description, "Coffee at the corner");

        // The searched result set is a subset of the unsearched one.
        let unsearched = fetch_expenses(
            Some(&session),
            &RecordFilter::time(TimeFilter::Week),
            today,
            &conn,
        )
        .unwrap();
        assert!(got.iter().all(|expense| unsearched.contains(expense)));
    }

    #[test]
    fn search_matches_category_label() {
        let conn = get_test_connection();
        let session = test_session();
        let (_dir, blobs) = temp_attachment_store();
        let today = date!(2024 - 06 - 24);

        add_expense(
            Some(&session),
            Expense::build(12.0, today, "Monthly pass").category(ExpenseCategory::Transportation),
            &[],
            &blobs,
            &conn,
        )
        .unwrap();

        let filter = RecordFilter {
            time: TimeFilter::All,
            search: Some("TRANSPORT".to_owned()),
        };
        let got = fetch_expenses(Some(&session), &filter, today, &conn).unwrap();

        assert_eq!(got.len(), 1);
    }

    #[test]
    fn fetch_is_scoped_to_the_user() {
        let conn = get_test_connection();
        let session = test_session();
        let stranger = other_session();
        let (_dir, blobs) = temp_attachment_store();
        let today = date!(2024 - 06 - 24);

        add_expense(
            Some(&session),
            Expense::build(1.0, today, "Mine"),
            &[],
            &blobs,
            &conn,
        )
        .unwrap();

        let got = fetch_expenses(Some(&stranger), &RecordFilter::none(), today, &conn).unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn fetch_orders_by_date_descending() {
        let conn = get_test_connection();
        let session = test_session();
        let (_dir, blobs) = temp_attachment_store();
        let today = date!(2024 - 06 - 24);

        for days_ago in [5i64, 1, 3] {
            add_expense(
                Some(&session),
                Expense::build(1.0, today - Duration::days(days_ago), "expense"),
                &[],
                &blobs,
                &conn,
            )
            .unwrap();
        }

        let got = fetch_expenses(Some(&session), &RecordFilter::none(), today, &conn).unwrap();

        let dates: Vec<_> = got.iter().map(|expense| expense.date).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
    }

    #[test]
    fn update_changes_fields() {
        let conn = get_test_connection();
        let session = test_session();
        let (_dir, blobs) = temp_attachment_store();
        let today = date!(2024 - 06 - 24);

        let added = add_expense(
            Some(&session),
            Expense::build(10.0, today, "Taxi"),
            &[],
            &blobs,
            &conn,
        )
        .unwrap()
        .unwrap();

        let updated = update_expense(
            Some(&session),
            added.id,
            Expense::build(12.5, today, "Taxi home")
                .category(ExpenseCategory::Transportation)
                .currency(Currency::Eur),
            &conn,
        )
        .unwrap()
        .unwrap();

        assert_eq!(updated.amount, 12.5);
        assert_eq!(updated.description, "Taxi home");
        assert_eq!(updated.category, ExpenseCategory::Transportation);
        assert_eq!(updated.currency, Currency::Eur);
    }

    #[test]
    fn update_missing_expense_fails() {
        let conn = get_test_connection();
        let session = test_session();

        let result = update_expense(
            Some(&session),
            1337,
            Expense::build(1.0, date!(2024 - 06 - 24), "Nothing"),
            &conn,
        );

        assert_eq!(result, Err(Error::UpdateMissingExpense));
    }

    #[test]
    fn update_cannot_touch_another_users_expense() {
        let conn = get_test_connection();
        let session = test_session();
        let stranger = other_session();
        let (_dir, blobs) = temp_attachment_store();
        let today = date!(2024 - 06 - 24);

        let added = add_expense(
            Some(&session),
            Expense::build(10.0, today, "Taxi"),
            &[],
            &blobs,
            &conn,
        )
        .unwrap()
        .unwrap();

        let result = update_expense(
            Some(&stranger),
            added.id,
            Expense::build(0.0, today, "Hijacked"),
            &conn,
        );

        assert_eq!(result, Err(Error::UpdateMissingExpense));
    }

    #[test]
    fn update_signed_out_is_a_noop() {
        let conn = get_test_connection();
        let session = test_session();
        let (_dir, blobs) = temp_attachment_store();
        let today = date!(2024 - 06 - 24);

        let added = add_expense(
            Some(&session),
            Expense::build(10.0, today, "Taxi"),
            &[],
            &blobs,
            &conn,
        )
        .unwrap()
        .unwrap();

        let result = update_expense(
            None,
            added.id,
            Expense::build(99.0, today, "Nobody"),
            &conn,
        )
        .unwrap();

        assert_eq!(result, None);
        assert_eq!(
            get_expense(added.id, &session.user_id, &conn).unwrap().amount,
            10.0
        );
    }

    #[test]
    fn delete_removes_the_row() {
        let conn = get_test_connection();
        let session = test_session();
        let (_dir, blobs) = temp_attachment_store();
        let today = date!(2024 - 06 - 24);

        let added = add_expense(
            Some(&session),
            Expense::build(10.0, today, "Taxi"),
            &[],
            &blobs,
            &conn,
        )
        .unwrap()
        .unwrap();

        delete_expense(Some(&session), added.id, &conn).expect("Could not delete expense");

        assert_eq!(
            get_expense(added.id, &session.user_id, &conn),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_missing_expense_fails() {
        let conn = get_test_connection();
        let session = test_session();

        let result = delete_expense(Some(&session), 1337, &conn);

        assert_eq!(result, Err(Error::DeleteMissingExpense));
    }

    #[test]
    fn delete_signed_out_is_a_noop() {
        let conn = get_test_connection();
        let session = test_session();
        let (_dir, blobs) = temp_attachment_store();
        let today = date!(2024 - 06 - 24);

        let added = add_expense(
            Some(&session),
            Expense::build(10.0, today, "Taxi"),
            &[],
            &blobs,
            &conn,
        )
        .unwrap()
        .unwrap();

        delete_expense(None, added.id, &conn).expect("Signed out delete should be a no-op");

        assert!(get_expense(added.id, &session.user_id, &conn).is_ok());
    }

    #[test]
    fn add_with_attachments_stores_files_and_rows() {
        let conn = get_test_connection();
        let session = test_session();
        let (_dir, blobs) = temp_attachment_store();
        let today = date!(2024 - 06 - 24);

        let files = vec![
            NewAttachmentFile {
                file_name: "receipt.png".to_owned(),
                content_type: "image/png".to_owned(),
                bytes: vec![1, 2, 3],
            },
            NewAttachmentFile {
                file_name: "invoice.pdf".to_owned(),
                content_type: "application/pdf".to_owned(),
                bytes: vec![4, 5, 6, 7],
            },
        ];

        let added = add_expense(
            Some(&session),
            Expense::build(99.0, today, "Laptop repair"),
            &files,
            &blobs,
            &conn,
        )
        .unwrap()
        .unwrap();

        // The add call returns the bare record; attachments appear on re-fetch.
        assert!(added.attachments.is_empty());

        let fetched = fetch_expenses(Some(&session), &RecordFilter::none(), today, &conn).unwrap();
        assert_eq!(fetched[0].attachments.len(), 2);
        assert_eq!(fetched[0].attachments[0].file_name, "receipt.png");
        assert_eq!(fetched[0].attachments[1].file_size, 4);

        let stored = blobs.read(&fetched[0].attachments[0].file_path).unwrap();
        assert_eq!(stored, vec![1, 2, 3]);
    }

    #[test]
    fn externally_inserted_unknown_category_does_not_break_fetch() {
        let conn = get_test_connection();
        let session = test_session();

        conn.execute(
            "INSERT INTO expense (user_id, amount, description, category, currency, date, ai_suggested, created_at)
             VALUES (?1, 1.0, 'Imported', 'Pet Supplies', 'USD', ?2, 0, ?3)",
            rusqlite::params![
                session.user_id.as_str(),
                date!(2024 - 06 - 01),
                time::OffsetDateTime::now_utc()
            ],
        )
        .unwrap();

        let got = fetch_expenses(
            Some(&session),
            &RecordFilter::none(),
            date!(2024 - 06 - 24),
            &conn,
        )
        .unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(
            got[0].category,
            ExpenseCategory::Unknown("Pet Supplies".to_owned())
        );
    }
}
