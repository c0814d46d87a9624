//! Defines the endpoint for creating a new transaction.

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{Html, IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::Identity,
    dashboard::views::dashboard_content,
    store::TransactionStore,
    timezone::get_local_offset,
    transaction::form::TransactionForm,
};

/// The state needed to create a transaction.
#[derive(Clone)]
pub struct CreateTransactionState {
    /// The store for persisting transactions.
    pub store: TransactionStore,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for creating a new transaction.
///
/// On success, responds with the re-rendered dashboard content so the list
/// updates and the form resets; a failed validation responds with an alert
/// and persists nothing.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(identity): Extension<Identity>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let draft = match form.into_draft() {
        Ok(draft) => draft,
        Err(error) => return error.into_alert_response(),
    };

    let local_timezone = match get_local_offset(&state.local_timezone) {
        Ok(offset) => offset,
        Err(error) => {
            tracing::error!("Invalid timezone {}", state.local_timezone);
            return error.into_alert_response();
        }
    };
    let today = OffsetDateTime::now_utc().to_offset(local_timezone).date();

    if let Err(error) = state
        .store
        .create(&identity.uid, &draft, &identity.label, today)
    {
        tracing::error!("could not create transaction: {error}");
        return error.into_alert_response();
    }

    render_dashboard_content(&state.store, &identity)
}

/// Re-render `#dashboard-content` from the authoritative snapshot.
pub fn render_dashboard_content(store: &TransactionStore, identity: &Identity) -> Response {
    match store.get_all(&identity.uid) {
        Ok(transactions) => Html(dashboard_content(&transactions).into_string()).into_response(),
        Err(error) => {
            tracing::error!("could not load transactions: {error}");
            error.into_alert_response()
        }
    }
}
