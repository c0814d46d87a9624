//! Cookie-session identity.
//!
//! There are no passwords and no user table: a visitor either signs in by
//! typing a display name or continues as a guest, and the resulting
//! [Identity] lives entirely in a private (signed and encrypted) cookie.

pub mod cookie;
pub mod identity;
pub mod middleware;
mod token;

pub use identity::{GUEST_LABEL, Identity};
pub use middleware::{AuthState, auth_guard, auth_guard_hx};

use axum_extra::extract::PrivateCookieJar;

use crate::auth::cookie::get_token_from_cookies;

/// Whether the client of an HTTP request is signed in or not.
pub enum Session {
    /// No valid session cookie accompanied the request.
    SignedOut,
    /// A valid session cookie resolved to this identity.
    SignedIn(Identity),
}

/// Resolve the session cookie in `jar` into a [Session].
///
/// An absent, malformed or expired cookie all resolve to
/// [Session::SignedOut]; only the expiry failure is worth logging since the
/// other two are routine for first-time visitors.
pub fn resolve_session(jar: &PrivateCookieJar) -> Session {
    match get_token_from_cookies(jar) {
        Ok(token) => Session::SignedIn(Identity {
            uid: token.uid,
            label: token.label,
        }),
        Err(error) => {
            tracing::debug!("Treating request as signed out: {error:?}");
            Session::SignedOut
        }
    }
}
