//! Session handling.
//!
//! Identity verification happens outside this application: the sign in
//! endpoint accepts an externally verified identity and establishes a
//! signed+encrypted cookie session carrying the user's opaque ID and email.
//! Every store operation takes the session explicitly, and the absence of a
//! session is the valid "signed out" steady state rather than an error.

mod cookie;
mod middleware;
mod sign_in;

use std::fmt::Display;

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

pub use middleware::{SessionState, session_guard, session_guard_hx};
pub use sign_in::{get_sign_in_page, get_sign_out, post_sign_in};

#[cfg(test)]
pub(crate) use cookie::{get_session_from_cookies, set_session_cookie};

/// The opaque ID the identity provider assigns to a user.
///
/// Every database row is scoped to a user ID, which is the sole
/// authorization boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Wrap an identity provider's user ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for UserId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.as_str()))
    }
}

impl FromSql for UserId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().map(UserId::new)
    }
}

/// The signed in user's identity for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The user's opaque ID.
    pub user_id: UserId,
    /// The user's email address.
    pub email: String,
}

impl Session {
    /// Create a session for an externally verified email address.
    ///
    /// The user ID is a stable opaque identifier derived from the normalized
    /// address; it stands in for the ID an external identity provider would
    /// supply alongside the email.
    pub fn for_email(email: &str) -> Self {
        let email = email.trim().to_lowercase();
        let user_id = UserId::new(format!("{:x}", md5::compute(email.as_bytes())));

        Self { user_id, email }
    }
}

#[cfg(test)]
mod session_tests {
    use super::Session;

    #[test]
    fn user_id_is_stable_for_an_email() {
        let first = Session::for_email("foo@bar.baz");
        let second = Session::for_email("foo@bar.baz");

        assert_eq!(first.user_id, second.user_id);
    }

    #[test]
    fn user_id_ignores_case_and_whitespace() {
        let canonical = Session::for_email("foo@bar.baz");
        let shouty = Session::for_email("  FOO@BAR.BAZ ");

        assert_eq!(canonical.user_id, shouty.user_id);
        assert_eq!(shouty.email, "foo@bar.baz");
    }

    #[test]
    fn different_emails_get_different_ids() {
        let first = Session::for_email("foo@bar.baz");
        let second = Session::for_email("qux@bar.baz");

        assert_ne!(first.user_id, second.user_id);
    }
}
