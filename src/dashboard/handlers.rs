//! Dashboard HTTP handlers.

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{Html, IntoResponse, Response},
};

use crate::{
    AppState, Error, auth::Identity, dashboard::views::dashboard_page, store::TransactionStore,
};

/// The state needed for displaying the dashboard page.
#[derive(Clone)]
pub struct DashboardState {
    /// The store for reading the transaction snapshot.
    pub store: TransactionStore,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// Display a page with an overview of the identity's transactions.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response, Error> {
    let transactions = state.store.get_all(&identity.uid)?;

    Ok(Html(dashboard_page(&identity.label, &transactions).into_string()).into_response())
}

#[cfg(test)]
mod dashboard_route_tests {
    use axum::{Extension, extract::State};
    use axum::response::IntoResponse;
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use std::sync::{Arc, Mutex};
    use time::macros::date;

    use crate::{
        auth::Identity,
        db::initialize,
        store::TransactionStore,
        transaction::{PaymentMethod, TransactionDraft, TransactionType},
    };

    use super::{DashboardState, get_dashboard_page};

    fn get_test_store() -> TransactionStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        TransactionStore::new(Arc::new(Mutex::new(connection)))
    }

    async fn render_for(store: TransactionStore, identity: Identity) -> Html {
        let response = get_dashboard_page(
            State(DashboardState { store }),
            Extension(identity),
        )
        .await
        .unwrap()
        .into_response();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        Html::parse_document(&String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn dashboard_shows_only_the_owners_transactions() {
        let store = get_test_store();
        let owner = Identity::named("Budi");
        let stranger = Identity::named("Siti");
        store
            .create(
                &owner.uid,
                &TransactionDraft {
                    description: "Gaji".to_owned(),
                    amount: 50_000.0,
                    type_: TransactionType::Income,
                    method: PaymentMethod::Cash,
                },
                &owner.label,
                date!(2026 - 08 - 01),
            )
            .unwrap();
        store
            .create(
                &stranger.uid,
                &TransactionDraft {
                    description: "Kopi".to_owned(),
                    amount: 20_000.0,
                    type_: TransactionType::Expense,
                    method: PaymentMethod::Cashless,
                },
                &stranger.label,
                date!(2026 - 08 - 02),
            )
            .unwrap();

        let document = render_for(store, owner).await;

        let text = document.html();
        assert!(text.contains("Gaji"));
        assert!(!text.contains("Kopi"));
    }

    #[tokio::test]
    async fn empty_dashboard_renders_placeholder_instead_of_list() {
        let store = get_test_store();

        let document = render_for(store, Identity::guest()).await;

        assert!(document.html().contains("Belum ada transaksi tersimpan."));
        let list_selector = Selector::parse("#transaction-list").unwrap();
        assert_eq!(document.select(&list_selector).count(), 0);
    }
}
