//! Creates a database pre-filled with sample data for manual testing.
//!
//! The rows belong to the session derived from `demo@example.com`, so
//! signing in with that address shows the seeded data.

use clap::Parser;
use rusqlite::{Connection, named_params};
use time::{Duration, OffsetDateTime};

use pocketbook_rs::{Session, initialize_db};

/// Creates a SQLite database with sample records for manual testing.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to write the SQLite database to.
    #[arg(long, default_value = "test.db")]
    db_path: String,
}

fn main() {
    let args = Args::parse();

    let conn = Connection::open(&args.db_path).expect("Could not open database");
    initialize_db(&conn).expect("Could not initialize database");

    let session = Session::for_email("demo@example.com");
    let user_id = session.user_id.as_str();
    let now = OffsetDateTime::now_utc();
    let today = now.date();

    let expenses = [
        (45.99, "Morning coffee", "Food & Dining", 2i64),
        (89.99, "Electric bill", "Bills & Utilities", 4),
        (1200.0, "Flight to Auckland", "Travel", 20),
        (25.5, "Taxi home", "Transportation", 1),
        (350.0, "New headphones", "Shopping", 45),
    ];

    for (amount, description, category, days_ago) in expenses {
        conn.execute(
            "INSERT INTO expense (user_id, amount, description, category, currency, date, ai_suggested, created_at)
             VALUES (:user_id, :amount, :description, :category, 'USD', :date, 0, :created_at)",
            named_params! {
                ":user_id": user_id,
                ":amount": amount,
                ":description": description,
                ":category": category,
                ":date": today - Duration::days(days_ago),
                ":created_at": now,
            },
        )
        .expect("Could not insert expense");
    }

    let income = [
        (4200.0, "Monthly salary", "Salary", 10i64),
        (650.0, "Website contract", "Freelance", 25),
    ];

    for (amount, description, category, days_ago) in income {
        conn.execute(
            "INSERT INTO income (user_id, amount, description, category, currency, date, created_at, file_attachments)
             VALUES (:user_id, :amount, :description, :category, 'USD', :date, :created_at, '[]')",
            named_params! {
                ":user_id": user_id,
                ":amount": amount,
                ":description": description,
                ":category": category,
                ":date": today - Duration::days(days_ago),
                ":created_at": now,
            },
        )
        .expect("Could not insert income");
    }

    let reminders = [
        ("Internet bill", "bill", 3i64, Some(59.99)),
        ("Car loan EMI", "loan", 7, Some(412.0)),
        ("Blood pressure tablets", "medicine", 1, None),
    ];

    for (title, category, days_ahead, amount) in reminders {
        conn.execute(
            "INSERT INTO reminder (user_id, title, description, category, due_date, amount, is_completed, created_at)
             VALUES (:user_id, :title, NULL, :category, :due_date, :amount, 0, :created_at)",
            named_params! {
                ":user_id": user_id,
                ":title": title,
                ":category": category,
                ":due_date": today + Duration::days(days_ahead),
                ":amount": amount,
                ":created_at": now,
            },
        )
        .expect("Could not insert reminder");
    }

    println!(
        "Created {} with sample data for demo@example.com",
        args.db_path
    );
}
