//! Implements a struct that holds the state of the REST server.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{Error, attachment::AttachmentStore, db::initialize};

/// How long the search box waits for the input to settle before it triggers
/// a fetch. Every keystroke restarts the window, so at most one request is
/// in flight per pause in typing.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

/// The default duration for which session cookies are valid.
const DEFAULT_COOKIE_DURATION: Duration = Duration::days(7);

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for sessions are valid.
    pub cookie_duration: Duration,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The quiescence window for the search box, in milliseconds.
    pub search_debounce_ms: u64,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The blob store for expense and income attachments.
    pub attachment_store: AttachmentStore,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    /// `attachment_path` is the directory attachments are stored under.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        local_timezone: &str,
        attachment_path: PathBuf,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: local_timezone.to_owned(),
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            db_connection: connection,
            attachment_store: AttachmentStore::new(attachment_path),
        })
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret` string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
