//! Reading and writing the session cookies.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use super::{Session, UserId};

pub(crate) const COOKIE_USER_ID: &str = "session_user_id";
pub(crate) const COOKIE_EMAIL: &str = "session_email";

/// The default duration for which session cookies are valid.
pub(crate) const DEFAULT_SESSION_DURATION: Duration = Duration::days(7);

/// Add the session cookies to the cookie jar, indicating that a user is
/// signed in.
///
/// The cookies expire `duration` from the current time. Returns the cookie
/// jar with the cookies added.
pub(crate) fn set_session_cookie(
    jar: PrivateCookieJar,
    session: &Session,
    duration: Duration,
) -> PrivateCookieJar {
    let expiry = OffsetDateTime::now_utc() + duration;

    jar.add(
        Cookie::build((COOKIE_USER_ID, session.user_id.as_str().to_owned()))
            .expires(expiry)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
    .add(
        Cookie::build((COOKIE_EMAIL, session.email.clone()))
            .expires(expiry)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Set the session cookies to an invalid value and set their max age to zero,
/// which should delete the cookies on the client side.
pub(crate) fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_USER_ID, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
    .add(
        Cookie::build((COOKIE_EMAIL, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read the session from the cookie jar.
///
/// Returns `None` when either cookie is missing or has been invalidated,
/// i.e. when no user is signed in. This is the valid signed out state, not
/// an error.
pub(crate) fn get_session_from_cookies(jar: &PrivateCookieJar) -> Option<Session> {
    let user_id_cookie = jar.get(COOKIE_USER_ID)?;
    let email_cookie = jar.get(COOKIE_EMAIL)?;

    let user_id = user_id_cookie.value_trimmed();
    let email = email_cookie.value_trimmed();

    if user_id.is_empty() || user_id == "deleted" || email.is_empty() || email == "deleted" {
        return None;
    }

    Some(Session {
        user_id: UserId::new(user_id),
        email: email.to_owned(),
    })
}
