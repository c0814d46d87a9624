//! Defines the endpoint for deleting a transaction.

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    auth::Identity,
    database_id::TransactionId,
    store::TransactionStore,
    transaction::create_endpoint::render_dashboard_content,
};

/// The state needed to delete a transaction.
#[derive(Clone)]
pub struct DeleteTransactionState {
    /// The store for persisting transactions.
    pub store: TransactionStore,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// A route handler for deleting a transaction.
///
/// The client has already asked the user for confirmation; there is no undo.
/// On success, responds with the re-rendered dashboard content.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Extension(identity): Extension<Identity>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    if let Err(error) = state.store.delete(&identity.uid, transaction_id) {
        tracing::error!("Could not delete transaction {transaction_id}: {error}");
        return error.into_alert_response();
    }

    render_dashboard_content(&state.store, &identity)
}

#[cfg(test)]
mod delete_transaction_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        auth::Identity,
        db::initialize,
        store::TransactionStore,
        transaction::{PaymentMethod, TransactionDraft, TransactionType},
    };

    use super::{DeleteTransactionState, delete_transaction_endpoint};

    fn get_test_state() -> DeleteTransactionState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        DeleteTransactionState {
            store: TransactionStore::new(Arc::new(Mutex::new(connection))),
        }
    }

    #[tokio::test]
    async fn deleting_a_transaction_removes_it() {
        let state = get_test_state();
        let identity = Identity::named("Budi");
        let transaction = state
            .store
            .create(
                &identity.uid,
                &TransactionDraft {
                    description: "Kopi".to_owned(),
                    amount: 20_000.0,
                    type_: TransactionType::Expense,
                    method: PaymentMethod::Cash,
                },
                &identity.label,
                date!(2026 - 08 - 01),
            )
            .unwrap();

        let response = delete_transaction_endpoint(
            State(state.clone()),
            Extension(identity.clone()),
            Path(transaction.id),
        )
        .await
        .into_response();

        assert!(response.status().is_success());
        assert_eq!(
            state.store.get(&identity.uid, transaction.id),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn deleting_a_missing_transaction_responds_not_found() {
        let state = get_test_state();

        let response = delete_transaction_endpoint(
            State(state),
            Extension(Identity::guest()),
            Path(999),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn another_owners_transaction_cannot_be_deleted() {
        let state = get_test_state();
        let owner = Identity::named("Budi");
        let stranger = Identity::named("Siti");
        let transaction = state
            .store
            .create(
                &owner.uid,
                &TransactionDraft {
                    description: "Kopi".to_owned(),
                    amount: 20_000.0,
                    type_: TransactionType::Expense,
                    method: PaymentMethod::Cash,
                },
                &owner.label,
                date!(2026 - 08 - 01),
            )
            .unwrap();

        let response = delete_transaction_endpoint(
            State(state.clone()),
            Extension(stranger),
            Path(transaction.id),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(state.store.get(&owner.uid, transaction.id).is_ok());
    }
}
