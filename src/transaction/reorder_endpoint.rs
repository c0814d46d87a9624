//! Defines the endpoint for persisting a drag-and-drop reorder.

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
// Must use axum_extra's Form since it supports repeated fields, which is how
// the full ID sequence is submitted.
use axum_extra::extract::Form;
use maud::html;
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::Alert,
    auth::Identity,
    dashboard::views::dashboard_content,
    database_id::TransactionId,
    store::TransactionStore,
    transaction::{
        create_endpoint::render_dashboard_content,
        ordering::{is_noop_reorder, recompute_order},
    },
};

/// The state needed to reorder transactions.
#[derive(Clone)]
pub struct ReorderTransactionsState {
    /// The store for persisting transactions.
    pub store: TransactionStore,
}

impl FromRef<AppState> for ReorderTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// The form data for a reorder: the full ID sequence in the new display
/// order, top first.
#[derive(Debug, Deserialize)]
pub struct ReorderForm {
    /// The transaction IDs in their new order.
    #[serde(default)]
    pub id: Vec<TransactionId>,
}

/// A route handler for persisting a drag-and-drop reorder.
///
/// The submitted sequence is compared against the current one first; a drop
/// back onto the original position writes nothing. A sequence that names a
/// transaction no longer in the collection is rolled back wholesale and the
/// response carries the authoritative list so the client's optimistic order
/// is discarded.
pub async fn reorder_transactions_endpoint(
    State(state): State<ReorderTransactionsState>,
    Extension(identity): Extension<Identity>,
    Form(form): Form<ReorderForm>,
) -> Response {
    let current: Vec<TransactionId> = match state.store.get_all(&identity.uid) {
        Ok(transactions) => transactions.iter().map(|transaction| transaction.id).collect(),
        Err(error) => {
            tracing::error!("could not load transactions: {error}");
            return error.into_alert_response();
        }
    };

    if is_noop_reorder(&current, &form.id) {
        return StatusCode::NO_CONTENT.into_response();
    }

    let keyed_updates = recompute_order(&form.id);

    if let Err(error) = state.store.reorder_batch(&identity.uid, &keyed_updates) {
        tracing::error!("could not reorder transactions: {error}");

        if error != Error::ReorderMissingTransaction {
            return error.into_alert_response();
        }

        // The batch rolled back, so the client's optimistic order is now
        // wrong. Answer with the authoritative content plus an out-of-band
        // alert. The status has to be 200 OK or HTMX will not swap the list
        // back.
        let transactions = match state.store.get_all(&identity.uid) {
            Ok(transactions) => transactions,
            Err(error) => return error.into_alert_response(),
        };
        let markup = html! {
            (dashboard_content(&transactions))
            div id="alert-container" hx-swap-oob="innerHTML"
            {
                (Alert::error(
                    "Gagal mengubah urutan",
                    "Salah satu transaksi tidak ditemukan, urutan dikembalikan seperti semula.",
                ))
            }
        };

        return Html(markup.into_string()).into_response();
    }

    render_dashboard_content(&state.store, &identity)
}

#[cfg(test)]
mod reorder_transactions_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::State,
        http::StatusCode,
        response::IntoResponse,
    };
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        auth::Identity,
        db::initialize,
        store::TransactionStore,
        transaction::{PaymentMethod, TransactionDraft, TransactionType},
    };

    use super::{ReorderForm, ReorderTransactionsState, reorder_transactions_endpoint};

    fn get_test_state() -> ReorderTransactionsState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        ReorderTransactionsState {
            store: TransactionStore::new(Arc::new(Mutex::new(connection))),
        }
    }

    fn create_transactions(state: &ReorderTransactionsState, identity: &Identity, count: usize) {
        for index in 0..count {
            state
                .store
                .create(
                    &identity.uid,
                    &TransactionDraft {
                        description: format!("Transaksi {index}"),
                        amount: 10_000.0,
                        type_: TransactionType::Expense,
                        method: PaymentMethod::Cash,
                    },
                    &identity.label,
                    date!(2026 - 08 - 01),
                )
                .unwrap();
        }
    }

    #[tokio::test]
    async fn reordering_persists_the_new_sequence() {
        let state = get_test_state();
        let identity = Identity::named("Budi");
        create_transactions(&state, &identity, 3);
        let mut ids: Vec<_> = state
            .store
            .get_all(&identity.uid)
            .unwrap()
            .iter()
            .map(|transaction| transaction.id)
            .collect();
        ids.reverse();

        let response = reorder_transactions_endpoint(
            State(state.clone()),
            Extension(identity.clone()),
            Form(ReorderForm { id: ids.clone() }),
        )
        .await
        .into_response();

        assert!(response.status().is_success());
        let stored_ids: Vec<_> = state
            .store
            .get_all(&identity.uid)
            .unwrap()
            .iter()
            .map(|transaction| transaction.id)
            .collect();
        assert_eq!(stored_ids, ids);
    }

    #[tokio::test]
    async fn noop_reorder_writes_nothing() {
        let state = get_test_state();
        let identity = Identity::named("Budi");
        create_transactions(&state, &identity, 2);
        let before = state.store.get_all(&identity.uid).unwrap();
        let ids = before.iter().map(|transaction| transaction.id).collect();

        let response = reorder_transactions_endpoint(
            State(state.clone()),
            Extension(identity.clone()),
            Form(ReorderForm { id: ids }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let after = state.store.get_all(&identity.uid).unwrap();
        assert_eq!(before, after, "expected the order keys to be untouched");
    }

    #[tokio::test]
    async fn reorder_with_a_missing_id_rolls_back() {
        let state = get_test_state();
        let identity = Identity::named("Budi");
        create_transactions(&state, &identity, 2);
        let before = state.store.get_all(&identity.uid).unwrap();
        let mut ids: Vec<_> = before.iter().map(|transaction| transaction.id).collect();
        ids.reverse();
        ids.push(999);

        let response = reorder_transactions_endpoint(
            State(state.clone()),
            Extension(identity.clone()),
            Form(ReorderForm { id: ids }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("Gagal mengubah urutan"));

        let after = state.store.get_all(&identity.uid).unwrap();
        assert_eq!(before, after, "expected the whole batch to roll back");
    }

    #[tokio::test]
    async fn reorder_cannot_touch_another_owners_rows() {
        let state = get_test_state();
        let owner = Identity::named("Budi");
        let stranger = Identity::named("Siti");
        create_transactions(&state, &owner, 2);
        let owner_rows = state.store.get_all(&owner.uid).unwrap();
        let ids = owner_rows.iter().map(|transaction| transaction.id).collect();

        let response = reorder_transactions_endpoint(
            State(state.clone()),
            Extension(stranger),
            Form(ReorderForm { id: ids }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("Gagal mengubah urutan"));

        let after = state.store.get_all(&owner.uid).unwrap();
        assert_eq!(owner_rows, after);
    }
}
