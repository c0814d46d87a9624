//! The server-sent event stream that keeps open dashboards current.
//!
//! Each connected dashboard holds one stream. Whenever the owner's
//! collection changes, the full dashboard content is re-rendered from the
//! database and pushed as an `update` event; the client swaps it in
//! wholesale, so a lagged or skipped notice only ever costs an intermediate
//! frame, never correctness.

use std::convert::Infallible;

use axum::{
    Extension,
    extract::{FromRef, State},
    response::sse::{Event, KeepAlive, Sse},
};
use tokio::sync::mpsc;
use tokio_stream::{Stream, wrappers::ReceiverStream};

use crate::{
    AppState, auth::Identity, dashboard::views::dashboard_content, store::TransactionStore,
};

/// How many rendered snapshots may queue for a slow client before the
/// renderer waits.
const EVENT_BUFFER_SIZE: usize = 8;

/// The state needed for the live transaction stream.
#[derive(Clone)]
pub struct LiveState {
    /// The store for snapshots and change notices.
    pub store: TransactionStore,
}

impl FromRef<AppState> for LiveState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// A route handler that streams dashboard updates as server-sent events.
///
/// The stream ends when the client disconnects or the subscription fails;
/// the server does not re-establish it. A dashboard that wants live updates
/// again gets them by reloading the page.
pub async fn get_live_transactions(
    State(state): State<LiveState>,
    Extension(identity): Extension<Identity>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut subscription = state.store.subscribe(&identity.uid);
    let (sender, receiver) = mpsc::channel(EVENT_BUFFER_SIZE);

    tokio::spawn(async move {
        while subscription.changed().await {
            let markup = match state.store.get_all(&identity.uid) {
                Ok(transactions) => dashboard_content(&transactions).into_string(),
                Err(error) => {
                    tracing::error!("could not render live update: {error}");
                    break;
                }
            };

            let event = Event::default().event("update").data(markup);

            if sender.send(Ok(event)).await.is_err() {
                // The client went away.
                break;
            }
        }
    });

    Sse::new(ReceiverStream::new(receiver)).keep_alive(KeepAlive::default())
}
