//! Middleware that gates pages and API routes behind a signed in session.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;

use crate::{AppState, endpoints, session::cookie::get_session_from_cookies};

/// The state needed for the session middleware.
#[derive(Clone)]
pub struct SessionState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
}

impl FromRef<AppState> for SessionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<SessionState> for Key {
    fn from_ref(state: &SessionState) -> Self {
        state.cookie_key.clone()
    }
}

/// Middleware function that checks for a valid session cookie pair.
/// The session is placed into the request and the request executed normally
/// if the cookies are valid, otherwise the response from `get_redirect` is
/// returned.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(session): Extension<Session>` to receive the session.
#[inline]
async fn session_guard_internal(
    state: SessionState,
    request: Request,
    next: Next,
    get_redirect: impl Fn() -> Response,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}. Redirecting to sign in page.");
            return get_redirect();
        }
    };

    let session = match get_session_from_cookies(&jar) {
        Some(session) => session,
        None => return get_redirect(),
    };

    parts.extensions.insert(session);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}

/// Session guard for page routes: redirects signed out requests to the sign
/// in page.
pub async fn session_guard(
    State(state): State<SessionState>,
    request: Request,
    next: Next,
) -> Response {
    session_guard_internal(state, request, next, || {
        Redirect::to(endpoints::SIGN_IN_VIEW).into_response()
    })
    .await
}

/// Session guard for htmx API routes: uses the HX-Redirect header so that
/// redirects work for requests initiated by htmx.
pub async fn session_guard_hx(
    State(state): State<SessionState>,
    request: Request,
    next: Next,
) -> Response {
    session_guard_internal(state, request, next, || {
        (
            HxRedirect(endpoints::SIGN_IN_VIEW.to_owned()),
            StatusCode::UNAUTHORIZED,
        )
            .into_response()
    })
    .await
}
