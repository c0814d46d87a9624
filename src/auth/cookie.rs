//! Handling of the private session cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    auth::{identity::Identity, token::Token},
};

/// The name of the session cookie.
pub(crate) const COOKIE_TOKEN: &str = "session_token";

/// The default duration for which session cookies are valid.
pub(crate) const DEFAULT_COOKIE_DURATION: Duration = Duration::days(7);

/// Add the session cookie to the cookie jar, signing `identity` in.
///
/// The token expires `duration` from now; the cookie's own expiry matches,
/// so a well-behaved client drops it at the same moment the token stops
/// being accepted.
///
/// # Errors
/// Returns an [Error::InvalidSessionToken] if the token cannot be serialized.
pub(crate) fn set_session_cookie(
    jar: PrivateCookieJar,
    identity: &Identity,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let expires_at = OffsetDateTime::now_utc() + duration;
    let token = Token {
        uid: identity.uid.clone(),
        label: identity.label.clone(),
        expires_at,
    };
    let token_string =
        serde_json::to_string(&token).map_err(|error| Error::InvalidSessionToken(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_TOKEN, token_string))
            .expires(expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Set the session cookie to an invalid value and a zero max age, which
/// deletes it on the client side.
pub(crate) fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read and validate the session token from the cookie jar.
///
/// # Errors
/// Returns a:
/// - [Error::CookieMissing] if there is no session cookie,
/// - [Error::InvalidSessionToken] if the cookie value does not decode,
/// - [Error::SessionExpired] if the token's expiry has passed.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::CookieMissing)?;
    let token: Token = serde_json::from_str(cookie.value_trimmed())
        .map_err(|error| Error::InvalidSessionToken(error.to_string()))?;

    if token.expires_at <= OffsetDateTime::now_utc() {
        return Err(Error::SessionExpired);
    }

    Ok(token)
}

/// Re-issue the session cookie if it would otherwise expire within
/// `minimum_remaining`.
///
/// # Errors
/// The cookie jar is unmodified if an error is returned; the errors are the
/// same as [get_token_from_cookies] and [set_session_cookie].
pub(crate) fn extend_session_if_needed(
    jar: PrivateCookieJar,
    minimum_remaining: Duration,
) -> Result<PrivateCookieJar, Error> {
    let token = get_token_from_cookies(&jar)?;

    if token.expires_at >= OffsetDateTime::now_utc() + minimum_remaining {
        return Ok(jar);
    }

    let identity = Identity {
        uid: token.uid,
        label: token.label,
    };

    set_session_cookie(jar, &identity, minimum_remaining)
}
