//! The application's endpoint URIs.
//!
//! For endpoints that take a parameter, e.g. '/transactions/{transaction_id}',
//! use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The single-page dashboard: balance, analysis bars, add form and the
/// transaction list.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The route for signing in with a display name.
pub const LOG_IN: &str = "/log_in";
/// The route for signing in anonymously as a guest.
pub const LOG_IN_GUEST: &str = "/log_in/guest";
/// The route for signing out the current identity.
pub const LOG_OUT: &str = "/log_out";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to create a transaction.
pub const TRANSACTIONS: &str = "/transactions";
/// The route to update or delete a single transaction.
pub const TRANSACTION: &str = "/transactions/{transaction_id}";
/// The route that accepts the list's new display order after a drag.
pub const REORDER_TRANSACTIONS: &str = "/transactions/order";
/// The server-sent event stream of transaction list snapshots.
pub const LIVE_TRANSACTIONS: &str = "/live/transactions";

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/coffee";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/transactions/{transaction_id}',
/// '{transaction_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter. If no parameter is found in `endpoint_path`, the
/// function returns the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
