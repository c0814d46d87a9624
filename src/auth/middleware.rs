//! The guard middleware that resolves the session once per request.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use time::Duration;

use crate::{
    AppState,
    auth::{Session, cookie::extend_session_if_needed, resolve_session},
    endpoints,
};

/// The state needed for the auth middleware.
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which session cookies are valid.
    pub cookie_duration: Duration,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// The minimum validity a session is topped up to on each authenticated
/// request.
const SESSION_EXTENSION: Duration = Duration::days(1);

/// Middleware that resolves the session cookie exactly once per request.
///
/// A signed-in request proceeds with the [Identity](crate::auth::Identity)
/// placed in the request extensions and its session cookie topped up on the
/// way out; a signed-out request is answered with `get_redirect` to the
/// log-in page. The choice of view follows only from the resolved state,
/// never from whatever data might be cached.
#[inline]
async fn guard_internal(
    state: AuthState,
    request: Request,
    next: Next,
    get_redirect: impl Fn(&str) -> Response,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}. Redirecting to log in page.");
            return get_redirect(endpoints::LOG_IN_VIEW);
        }
    };

    let identity = match resolve_session(&jar) {
        Session::SignedIn(identity) => identity,
        Session::SignedOut => return get_redirect(endpoints::LOG_IN_VIEW),
    };

    parts.extensions.insert(identity);
    let request = Request::from_parts(parts, body);
    let response = next.run(request).await;

    let (mut parts, body) = response.into_parts();
    let jar = match extend_session_if_needed(jar.clone(), SESSION_EXTENSION) {
        Ok(updated_jar) => updated_jar,
        Err(err) => {
            tracing::error!("Error extending session: {err:?}. Rolling back cookie jar.");
            jar
        }
    };
    for (key, val) in jar.into_response().headers().iter() {
        if key != SET_COOKIE {
            continue;
        }

        parts.headers.append(key, val.to_owned());
    }

    Response::from_parts(parts, body)
}

/// Guard for browser-navigated routes: signed-out requests get an HTTP
/// redirect to the log-in page.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(identity): Extension<Identity>` to receive the identity.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    guard_internal(state, request, next, |redirect_url| {
        Redirect::to(redirect_url).into_response()
    })
    .await
}

/// Guard for htmx-driven routes: signed-out requests get an `HX-Redirect`
/// header, which htmx turns into a full-page navigation.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(identity): Extension<Identity>` to receive the identity.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    guard_internal(state, request, next, |redirect_url| {
        (HxRedirect(redirect_url.to_owned()), StatusCode::OK).into_response()
    })
    .await
}
