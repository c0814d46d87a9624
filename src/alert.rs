//! Alert fragments for displaying error messages to users.
//!
//! Alerts are swapped into the `#alert-container` element of the base layout,
//! either by htmx's response-targets extension (`hx-target-error`) or as an
//! out-of-band swap alongside a 200 OK response.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, Render, html};

const ALERT_ERROR_STYLE: &str = "flex items-start gap-3 w-full p-4 rounded border \
    border-red-300 bg-red-50 text-red-800 dark:bg-gray-800 \
    dark:text-red-400 dark:border-red-800";

/// An alert message with a short heading and a longer explanation.
pub struct Alert<'a> {
    message: &'a str,
    details: &'a str,
}

impl<'a> Alert<'a> {
    /// Create a new error alert
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self { message, details }
    }
}

impl Render for Alert<'_> {
    fn render(&self) -> Markup {
        html! {
            div class=(ALERT_ERROR_STYLE) role="alert"
            {
                div class="flex-1"
                {
                    p class="font-medium" { (self.message) }

                    @if !self.details.is_empty()
                    {
                        p class="text-sm" { (self.details) }
                    }
                }

                button
                    type="button"
                    class="font-bold cursor-pointer"
                    aria-label="Tutup"
                    onclick="dismissAlert(this)"
                {
                    "\u{00d7}"
                }
            }
        }
    }
}

/// Render `alert` into an HTML response with the given status code.
#[inline]
pub fn render(status_code: StatusCode, alert: Alert) -> Response {
    (status_code, Html(alert.render().into_string())).into_response()
}
