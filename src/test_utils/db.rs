use rusqlite::Connection;

use crate::{db::initialize, session::Session};

/// An in-memory database with the application's tables created.
pub(crate) fn get_test_connection() -> Connection {
    let conn = Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&conn).expect("Could not initialize database");
    conn
}

/// The session most tests operate as.
pub(crate) fn test_session() -> Session {
    Session::for_email("test@example.com")
}

/// A second user's session, for ownership isolation tests.
pub(crate) fn other_session() -> Session {
    Session::for_email("stranger@example.com")
}
