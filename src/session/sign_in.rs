//! Sign in and sign out pages and endpoints.
//!
//! Verifying the user's identity (passwords, magic links, OAuth) is the job
//! of an external identity provider; this module only turns an asserted
//! email address into a cookie session.

use axum::{
    Form,
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use maud::{Markup, html};
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, sign_in_card},
    session::{
        Session,
        cookie::{invalidate_session_cookie, set_session_cookie},
    },
};

/// The state needed for signing a user in.
#[derive(Clone)]
pub struct SignInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which session cookies are valid.
    pub cookie_duration: Duration,
}

impl FromRef<AppState> for SignInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
        }
    }
}

impl FromRef<SignInState> for Key {
    fn from_ref(state: &SignInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The form data for signing in.
#[derive(Debug, Deserialize)]
pub struct SignInForm {
    /// The externally verified email address.
    pub email: String,
}

/// Render the sign in page.
pub async fn get_sign_in_page() -> Response {
    sign_in_view("").into_response()
}

/// Establish a session for the submitted email address and redirect to the
/// dashboard.
pub async fn post_sign_in(
    State(state): State<SignInState>,
    jar: PrivateCookieJar,
    Form(form): Form<SignInForm>,
) -> Response {
    if form.email.trim().is_empty() {
        return sign_in_view("Error: email cannot be empty").into_response();
    }

    let session = Session::for_email(&form.email);
    tracing::info!("signed in {}", session.email);

    let jar = set_session_cookie(jar, &session, state.cookie_duration);

    (jar, Redirect::to(endpoints::DASHBOARD_VIEW)).into_response()
}

/// End the current session and redirect to the sign in page.
pub async fn get_sign_out(jar: PrivateCookieJar) -> Response {
    let jar = invalidate_session_cookie(jar);

    (jar, Redirect::to(endpoints::SIGN_IN_VIEW)).into_response()
}

fn sign_in_view(error_message: &str) -> Markup {
    let form = html! {
        form
            method="post"
            action=(endpoints::SIGN_IN_API)
            class="space-y-4 md:space-y-6"
        {
            div
            {
                label
                    for="email"
                    class=(FORM_LABEL_STYLE)
                {
                    "Email"
                }

                input
                    id="email"
                    type="email"
                    name="email"
                    placeholder="you@example.com"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Sign in" }
        }
    };

    let content = sign_in_card("Sign in to your account", &form);

    base("Sign in", &[], &content)
}

#[cfg(test)]
mod sign_in_page_tests {
    use axum::http::StatusCode;

    use crate::{
        endpoints,
        session::get_sign_in_page,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_valid_html, must_get_form,
            parse_html_document,
        },
    };

    #[tokio::test]
    async fn render_page() {
        let response = get_sign_in_page().await;

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_eq!(
            form.value().attr("action"),
            Some(endpoints::SIGN_IN_API),
            "form should post to the sign in endpoint"
        );
        assert_form_input(&form, "email", "email");
        assert_form_submit_button(&form);
    }
}
