//! Defines the page to display for an internal server error.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// The description and suggested fix shown on the 500 page.
pub struct InternalServerError<'a> {
    /// What went wrong, in one sentence.
    pub description: &'a str,
    /// What the reader can do about it.
    pub fix: &'a str,
}

impl Default for InternalServerError<'_> {
    fn default() -> Self {
        Self {
            description: "Maaf, terjadi kesalahan.",
            fix: "Coba lagi nanti atau periksa log server.",
        }
    }
}

/// Render the internal server error page as a 500 response.
pub fn render_internal_server_error(error: InternalServerError) -> Response {
    let page = error_view("Kesalahan Server", "500", error.description, error.fix);

    (StatusCode::INTERNAL_SERVER_ERROR, Html(page.into_string())).into_response()
}
