//! The routes for displaying the log-in page and handling sign-in requests.
//!
//! There are no credentials: a visitor either submits a display name, which
//! deterministically resumes the collection belonging to that name, or
//! continues as an anonymous guest with a fresh collection.

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{Identity, Session, cookie::set_session_cookie, resolve_session},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, base,
    },
};

/// The state needed to sign a visitor in.
#[derive(Clone)]
pub struct LogInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which session cookies are valid.
    pub cookie_duration: Duration,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The form data for signing in with a display name.
#[derive(Debug, Deserialize)]
pub struct LogInForm {
    /// The display name to sign in as.
    pub name: String,
}

/// Display the log-in page.
///
/// A visitor who already holds a valid session is sent straight to the
/// dashboard.
pub async fn get_log_in_page(State(_state): State<LogInState>, jar: PrivateCookieJar) -> Response {
    if let Session::SignedIn(_) = resolve_session(&jar) {
        return Redirect::to(endpoints::DASHBOARD_VIEW).into_response();
    }

    Html(log_in_page().into_string()).into_response()
}

fn log_in_page() -> Markup {
    let content = html! {
        div class="flex flex-col items-center justify-center px-6 py-8 mx-auto"
        {
            p class="flex items-center mb-6 text-2xl font-semibold text-gray-900 dark:text-white"
            {
                "DompetKu"
            }

            div class=(CARD_STYLE)
            {
                div class="space-y-4 md:space-y-6"
                {
                    h1 class="text-xl font-bold leading-tight tracking-tight text-gray-900 md:text-2xl dark:text-white"
                    {
                        "Masuk"
                    }

                    form
                        hx-post=(endpoints::LOG_IN)
                        hx-target-error="#alert-container"
                        class="space-y-4"
                    {
                        div
                        {
                            label for="name" class=(FORM_LABEL_STYLE) { "Nama" }

                            input
                                type="text"
                                name="name"
                                id="name"
                                placeholder="Nama kamu"
                                class=(FORM_TEXT_INPUT_STYLE)
                                required
                                autofocus;
                        }

                        button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Masuk" }
                    }

                    p class="text-center text-sm text-gray-500 dark:text-gray-400" { "atau" }

                    button
                        hx-post=(endpoints::LOG_IN_GUEST)
                        hx-target-error="#alert-container"
                        class=(BUTTON_SECONDARY_STYLE)
                    {
                        "Lanjut sebagai Tamu"
                    }
                }
            }
        }
    };

    base("Masuk", &content)
}

/// Handler for sign-in requests via the POST method.
///
/// Signing in with the same name resumes the same collection; names are case
/// sensitive. On success the session cookie is set and the client is
/// redirected to the dashboard page.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    Form(form): Form<LogInForm>,
) -> Response {
    if form.name.trim().is_empty() {
        return Error::EmptyDisplayName.into_alert_response();
    }

    let identity = Identity::named(&form.name);

    sign_in(jar, &identity, state.cookie_duration)
}

/// Handler for anonymous guest sign-in via the POST method.
///
/// Every guest sign-in mints a fresh identity; a guest who signs out can
/// never resume their collection.
pub async fn post_log_in_guest(State(state): State<LogInState>, jar: PrivateCookieJar) -> Response {
    sign_in(jar, &Identity::guest(), state.cookie_duration)
}

fn sign_in(jar: PrivateCookieJar, identity: &Identity, cookie_duration: Duration) -> Response {
    let jar = match set_session_cookie(jar, identity, cookie_duration) {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("could not set session cookie: {error}");
            return error.into_alert_response();
        }
    };

    (
        jar,
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
