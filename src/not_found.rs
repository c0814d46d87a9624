//! The 404 page and fallback handler.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// The fallback handler for unrouted paths.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

/// The 404 page as a response.
pub fn get_404_not_found_response() -> Response {
    let page = error_view(
        "Tidak Ditemukan",
        "404",
        "Halaman tidak ditemukan.",
        "Periksa kembali alamatnya, atau kembali ke beranda.",
    );

    (StatusCode::NOT_FOUND, Html(page.into_string())).into_response()
}
