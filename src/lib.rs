//! DompetKu is a small web app for tracking personal income and expenses.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod config_error;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod live;
mod log_in;
mod log_out;
mod logging;
mod not_found;
mod routing;
mod store;
mod timezone;
mod transaction;

pub use app_state::AppState;
pub use config_error::build_config_error_router;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

use crate::{
    alert::{Alert, render},
    internal_server_error::{InternalServerError, render_internal_server_error},
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The session token cookie is missing from the cookie jar in the
    /// request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// The session token cookie was present but past its expiry date-time.
    #[error("the session has expired")]
    SessionExpired,

    /// The session token cookie could not be parsed.
    ///
    /// Callers should pass in the original error as a string. The error
    /// string should only be logged for debugging on the server.
    #[error("could not parse the session token: {0}")]
    InvalidSessionToken(String),

    /// An empty (or whitespace-only) display name was submitted on the log-in
    /// form.
    #[error("display name cannot be empty")]
    EmptyDisplayName,

    /// An empty (or whitespace-only) description was submitted for a
    /// transaction.
    #[error("transaction description cannot be empty")]
    EmptyDescription,

    /// The amount submitted for a transaction was not a positive number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// A reorder request referred to a transaction that does not exist, so
    /// the whole batch was rolled back.
    #[error("tried to reorder a transaction that is not in the database")]
    ReorderMissingTransaction,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezone(timezone) => {
                render_internal_server_error(InternalServerError {
                    description: "Invalid Timezone Settings",
                    fix: &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings \
                        and ensure the timezone has been set to a valid, canonical timezone string"
                    ),
                })
            }
            Error::DatabaseLockError => render_internal_server_error(Default::default()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(Default::default())
            }
        }
    }
}

impl Error {
    /// Convert the error into an alert fragment for htmx requests.
    ///
    /// The alert text is user-facing and therefore in Indonesian, matching
    /// the rest of the UI.
    fn into_alert_response(self) -> Response {
        match self {
            Error::EmptyDisplayName => render(
                StatusCode::BAD_REQUEST,
                Alert::error("Nama tidak boleh kosong", "Masukkan nama untuk masuk."),
            ),
            Error::EmptyDescription => render(
                StatusCode::BAD_REQUEST,
                Alert::error("Deskripsi tidak boleh kosong", "Masukkan deskripsi transaksi."),
            ),
            Error::InvalidAmount(amount) => render(
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Jumlah tidak valid",
                    &format!("\"{amount}\" bukan jumlah yang valid. Masukkan angka lebih dari nol."),
                ),
            ),
            Error::UpdateMissingTransaction => render(
                StatusCode::NOT_FOUND,
                Alert::error("Gagal mengubah transaksi", "Transaksi tidak ditemukan."),
            ),
            Error::DeleteMissingTransaction => render(
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Gagal menghapus transaksi",
                    "Transaksi tidak ditemukan. Muat ulang halaman untuk melihat apakah \
                    transaksi sudah dihapus.",
                ),
            ),
            Error::ReorderMissingTransaction => render(
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Gagal mengubah urutan",
                    "Salah satu transaksi tidak ditemukan, urutan dikembalikan seperti semula.",
                ),
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::error("Terjadi kesalahan", "Gagal menyimpan data. Cek koneksi internet."),
                )
            }
        }
    }
}
