//! A fallback router for when the server configuration is unusable.
//!
//! Starting with a missing or empty configuration parameter is not a crash:
//! the server still comes up, but every route answers with a page naming the
//! parameter so the operator can tell at a glance what to fix. There is no
//! recovery path other than restarting with the parameter set.

use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse},
};

use crate::html::error_view;

/// Return a router that answers every route with a configuration error page
/// naming `parameter_name`.
pub fn build_config_error_router(parameter_name: &str) -> Router {
    let page = error_view(
        "Kesalahan Konfigurasi",
        "500",
        "Server belum dikonfigurasi dengan benar.",
        &format!(
            "Parameter konfigurasi \"{parameter_name}\" belum diatur. \
            Atur parameter tersebut lalu mulai ulang server."
        ),
    )
    .into_string();

    Router::new().fallback(move || {
        let page = page.clone();
        async move { (StatusCode::INTERNAL_SERVER_ERROR, Html(page)).into_response() }
    })
}
