//! Database functions for storing, querying, and managing income records.
//!
//! Income attachments differ from expense attachments: the blob store keys
//! are kept as a JSON array directly on the row instead of in a separate
//! metadata table.

use rusqlite::{Connection, Row, named_params};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    attachment::{AttachmentStore, NewAttachmentFile},
    database_id::IncomeId,
    filter::{RecordFilter, apply_search},
    session::{Session, UserId},
};

use super::domain::{Income, IncomeBuilder};

/// Create the income table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_income_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS income (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                amount REAL NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                currency TEXT NOT NULL,
                date TEXT NOT NULL,
                created_at TEXT NOT NULL,
                file_attachments TEXT NOT NULL DEFAULT '[]'
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_income_user_date ON income(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Fetch the signed in user's income records, most recent first.
///
/// The filter's time component is applied as a SQL predicate
/// (`date >= cutoff` relative to `today`); the search component narrows the
/// fetched rows afterwards. Returns an empty list when signed out.
///
/// # Errors
/// Returns an [Error::SqlError] if a query fails.
pub fn fetch_income(
    session: Option<&Session>,
    filter: &RecordFilter,
    today: Date,
    connection: &Connection,
) -> Result<Vec<Income>, Error> {
    let Some(session) = session else {
        return Ok(Vec::new());
    };

    let income = select_income(&session.user_id, filter.time.cutoff(today), connection)?;

    match &filter.search {
        Some(query) => Ok(apply_search(income, query)),
        None => Ok(income),
    }
}

fn select_income(
    user_id: &UserId,
    cutoff: Option<Date>,
    connection: &Connection,
) -> Result<Vec<Income>, Error> {
    const BASE_QUERY: &str = "SELECT id, user_id, amount, description, category, currency, date, \
         created_at, file_attachments FROM income WHERE user_id = :user_id";
    // Sort by date, and then ID to keep row order stable after updates.
    const ORDER_CLAUSE: &str = " ORDER BY date DESC, id ASC";

    let rows = match cutoff {
        Some(cutoff) => connection
            .prepare(&format!("{BASE_QUERY} AND date >= :cutoff{ORDER_CLAUSE}"))?
            .query_map(
                named_params! {":user_id": user_id, ":cutoff": cutoff},
                map_income_row,
            )?
            .collect::<Result<Vec<_>, _>>(),
        None => connection
            .prepare(&format!("{BASE_QUERY}{ORDER_CLAUSE}"))?
            .query_map(named_params! {":user_id": user_id}, map_income_row)?
            .collect::<Result<Vec<_>, _>>(),
    };

    rows.map_err(Error::from)
}

/// Create a new income record for the signed in user, storing any attached
/// files.
///
/// The row is inserted first, then each file is written to the blob store
/// and the row's `file_attachments` column updated with the stored keys. A
/// failed upload fails the whole call but does not roll back the row or
/// already-stored files.
///
/// Returns `None` when signed out.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount] if the amount is negative,
/// - [Error::EmptyDescription] if the description is empty,
/// - [Error::AttachmentStorageError] if a file cannot be written,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn add_income(
    session: Option<&Session>,
    builder: IncomeBuilder,
    attachments: &[NewAttachmentFile],
    attachment_store: &AttachmentStore,
    connection: &Connection,
) -> Result<Option<Income>, Error> {
    let Some(session) = session else {
        return Ok(None);
    };

    if builder.amount < 0.0 {
        return Err(Error::NegativeAmount(builder.amount));
    }

    if builder.description.trim().is_empty() {
        return Err(Error::EmptyDescription);
    }

    let mut income = connection
        .prepare(
            "INSERT INTO income (user_id, amount, description, category, currency, date, created_at, file_attachments)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, '[]')
             RETURNING id, user_id, amount, description, category, currency, date, created_at, file_attachments",
        )?
        .query_one(
            (
                &session.user_id,
                builder.amount,
                &builder.description,
                &builder.category,
                builder.currency,
                builder.date,
                OffsetDateTime::now_utc(),
            ),
            map_income_row,
        )?;

    if !attachments.is_empty() {
        let mut stored_keys = Vec::with_capacity(attachments.len());

        for file in attachments {
            stored_keys.push(attachment_store.save(&session.user_id, income.id, file)?);
        }

        let stored_keys_json = serde_json::to_string(&stored_keys)
            .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

        connection.execute(
            "UPDATE income SET file_attachments = :file_attachments \
             WHERE id = :id AND user_id = :user_id",
            named_params! {
                ":file_attachments": stored_keys_json,
                ":id": income.id,
                ":user_id": session.user_id,
            },
        )?;

        income.file_attachments = stored_keys;
    }

    Ok(Some(income))
}

/// Retrieve one of the user's income records by its `id`.
///
/// # Errors
/// Returns an [Error::NotFound] if `id` does not refer to an income record
/// owned by `user_id`, or [Error::SqlError] for other SQL errors.
pub fn get_income(
    id: IncomeId,
    user_id: &UserId,
    connection: &Connection,
) -> Result<Income, Error> {
    let income = connection
        .prepare(
            "SELECT id, user_id, amount, description, category, currency, date, created_at, \
             file_attachments FROM income WHERE id = :id AND user_id = :user_id",
        )?
        .query_one(
            named_params! {":id": id, ":user_id": user_id},
            map_income_row,
        )?;

    Ok(income)
}

/// Update an income record's editable fields.
///
/// Returns `None` when signed out.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount] if the amount is negative,
/// - [Error::EmptyDescription] if the description is empty,
/// - [Error::UpdateMissingIncome] if the record does not exist or belongs to
///   another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_income(
    session: Option<&Session>,
    id: IncomeId,
    changes: IncomeBuilder,
    connection: &Connection,
) -> Result<Option<Income>, Error> {
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
        "UPDATE income SET amount = :amount, description = :description, \
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
        return Err(Error::UpdateMissingIncome);
    }

    get_income(id, &session.user_id, connection).map(Some)
}

/// Delete one of the user's income records. A no-op when signed out.
///
/// # Errors
/// Returns an [Error::DeleteMissingIncome] if the record does not exist or
/// belongs to another user, or [Error::SqlError] for other SQL errors.
pub fn delete_income(
    session: Option<&Session>,
    id: IncomeId,
    connection: &Connection,
) -> Result<(), Error> {
    let Some(session) = session else {
        return Ok(());
    };

    let rows_affected = connection.execute(
        "DELETE FROM income WHERE id = :id AND user_id = :user_id",
        named_params! {":id": id, ":user_id": session.user_id},
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingIncome);
    }

    Ok(())
}

/// Map a database row to an [Income].
fn map_income_row(row: &Row) -> Result<Income, rusqlite::Error> {
    let file_attachments_json: String = row.get(8)?;
    // Tolerate malformed JSON from external writers; the attachments are
    // display-only.
    let file_attachments = serde_json::from_str(&file_attachments_json).unwrap_or_default();

    Ok(Income {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        currency: row.get(5)?,
        date: row.get(6)?,
        created_at: row.get(7)?,
        file_attachments,
    })
}

#[cfg(test)]
mod store_tests {
    use time::{Duration, macros::date};

    use crate::{
        Error,
        attachment::{AttachmentStore, NewAttachmentFile},
        filter::{RecordFilter, TimeFilter},
        income::{Income, IncomeCategory},
        money::Currency,
        test_utils::{get_test_connection, other_session, test_session},
    };

    use super::{add_income, delete_income, fetch_income, get_income, update_income};

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

        let added = add_income(
            Some(&session),
            Income::build(1000.0, date!(2024 - 06 - 01), "June salary")
                .category(IncomeCategory::Salary)
                .currency(Currency::Inr),
            &[],
            &blobs,
            &conn,
        )
        .unwrap()
        .unwrap();

        assert_eq!(added.amount, 1000.0);
        assert_eq!(added.category, IncomeCategory::Salary);
        assert!(added.file_attachments.is_empty());

        let fetched = fetch_income(Some(&session), &RecordFilter::none(), today, &conn).unwrap();

        assert_eq!(fetched, vec![added]);
    }

    #[test]
    fn add_signed_out_is_a_noop() {
        let conn = get_test_connection();
        let session = test_session();
        let (_dir, blobs) = temp_attachment_store();
        let today = date!(2024 - 06 - 24);

        let result = add_income(
            None,
            Income::build(1.0, today, "Ghost income"),
            &[],
            &blobs,
            &conn,
        )
        .unwrap();

        assert_eq!(result, None);
        assert!(
            fetch_income(Some(&session), &RecordFilter::none(), today, &conn)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn fetch_applies_time_filter_and_search_in_order() {
        let conn = get_test_connection();
        let session = test_session();
        let (_dir, blobs) = temp_attachment_store();
        let today = date!(2024 - 06 - 24);

        add_income(
            Some(&session),
            Income::build(500.0, today - Duration::days(2), "Freelance invoice"),
            &[],
            &blobs,
            &conn,
        )
        .unwrap();
        add_income(
            Some(&session),
            Income::build(700.0, today - Duration::days(60), "Freelance invoice"),
            &[],
            &blobs,
            &conn,
        )
        .unwrap();

        let filter = RecordFilter {
            time: TimeFilter::Week,
            search: Some("freelance".to_owned()),
        };
        let got = fetch_income(Some(&session), &filter, today, &conn).unwrap();

        assert_eq!(got.len(), 1, "search must not escape the time window");
        assert_eq!(got[0].amount, 500.0);
    }

    #[test]
    fn fetch_is_scoped_to_the_user() {
        let conn = get_test_connection();
        let session = test_session();
        let stranger = other_session();
        let (_dir, blobs) = temp_attachment_store();
        let today = date!(2024 - 06 - 24);

        add_income(
            Some(&session),
            Income::build(1000.0, today, "Mine"),
            &[],
            &blobs,
            &conn,
        )
        .unwrap();

        let got = fetch_income(Some(&stranger), &RecordFilter::none(), today, &conn).unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn add_with_attachments_stores_keys_on_the_row() {
        let conn = get_test_connection();
        let session = test_session();
        let (_dir, blobs) = temp_attachment_store();
        let today = date!(2024 - 06 - 24);

        let files = vec![NewAttachmentFile {
            file_name: "payslip.pdf".to_owned(),
            content_type: "application/pdf".to_owned(),
            bytes: vec![1, 2, 3],
        }];

        let added = add_income(
            Some(&session),
            Income::build(1000.0, today, "June salary"),
            &files,
            &blobs,
            &conn,
        )
        .unwrap()
        .unwrap();

        assert_eq!(added.file_attachments.len(), 1);
        assert!(added.file_attachments[0].ends_with(".pdf"));

        // The stored keys survive a re-fetch.
        let fetched = fetch_income(Some(&session), &RecordFilter::none(), today, &conn).unwrap();
        assert_eq!(fetched[0].file_attachments, added.file_attachments);

        let stored = blobs.read(&added.file_attachments[0]).unwrap();
        assert_eq!(stored, vec![1, 2, 3]);
    }

    #[test]
    fn update_changes_fields() {
        let conn = get_test_connection();
        let session = test_session();
        let (_dir, blobs) = temp_attachment_store();
        let today = date!(2024 - 06 - 24);

        let added = add_income(
            Some(&session),
            Income::build(1000.0, today, "Salary"),
            &[],
            &blobs,
            &conn,
        )
        .unwrap()
        .unwrap();

        let updated = update_income(
            Some(&session),
            added.id,
            Income::build(1200.0, today, "Salary with bonus")
                .category(IncomeCategory::Bonus)
                .currency(Currency::Eur),
            &conn,
        )
        .unwrap()
        .unwrap();

        assert_eq!(updated.amount, 1200.0);
        assert_eq!(updated.category, IncomeCategory::Bonus);
        assert_eq!(updated.currency, Currency::Eur);
    }

    #[test]
    fn update_missing_income_fails() {
        let conn = get_test_connection();
        let session = test_session();

        let result = update_income(
            Some(&session),
            1337,
            Income::build(1.0, date!(2024 - 06 - 24), "Nothing"),
            &conn,
        );

        assert_eq!(result, Err(Error::UpdateMissingIncome));
    }

    #[test]
    fn delete_removes_the_row() {
        let conn = get_test_connection();
        let session = test_session();
        let (_dir, blobs) = temp_attachment_store();
        let today = date!(2024 - 06 - 24);

        let added = add_income(
            Some(&session),
            Income::build(1000.0, today, "Salary"),
            &[],
            &blobs,
            &conn,
        )
        .unwrap()
        .unwrap();

        delete_income(Some(&session), added.id, &conn).expect("Could not delete income");

        assert_eq!(
            get_income(added.id, &session.user_id, &conn),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_signed_out_is_a_noop() {
        let conn = get_test_connection();
        let session = test_session();
        let (_dir, blobs) = temp_attachment_store();
        let today = date!(2024 - 06 - 24);

        let added = add_income(
            Some(&session),
            Income::build(1000.0, today, "Salary"),
            &[],
            &blobs,
            &conn,
        )
        .unwrap()
        .unwrap();

        delete_income(None, added.id, &conn).expect("Signed out delete should be a no-op");

        assert!(get_income(added.id, &session.user_id, &conn).is_ok());
    }
}
