//! The page and endpoint for editing an existing transaction.

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    AppState, Error,
    auth::Identity,
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, base,
    },
    store::TransactionStore,
    transaction::{PaymentMethod, Transaction, TransactionType, form::TransactionForm},
};

/// The state needed to edit a transaction.
#[derive(Clone)]
pub struct EditTransactionState {
    /// The store for persisting transactions.
    pub store: TransactionStore,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// Renders the page for editing a transaction.
///
/// The page shows only the edit form; the list and its reorder controls are
/// not present, so an edit can never race a drag.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionState>,
    Extension(identity): Extension<Identity>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let transaction = state.store.get(&identity.uid, transaction_id)?;

    Ok(Html(edit_transaction_page(&transaction).into_string()).into_response())
}

fn edit_transaction_page(transaction: &Transaction) -> Markup {
    let update_endpoint = format_endpoint(endpoints::TRANSACTION, transaction.id);

    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            header class="w-full flex justify-between items-center"
            {
                h1 class="text-xl font-bold" { "Ubah Transaksi" }

                a href=(endpoints::DASHBOARD_VIEW) class=(LINK_STYLE) { "Kembali" }
            }

            section class=(CARD_STYLE)
            {
                form
                    hx-put=(update_endpoint)
                    hx-target-error="#alert-container"
                    class="space-y-3"
                {
                    div
                    {
                        label for="description" class=(FORM_LABEL_STYLE) { "Catatan" }

                        input
                            type="text"
                            name="description"
                            id="description"
                            value=(transaction.description)
                            class=(FORM_TEXT_INPUT_STYLE)
                            required;
                    }

                    div
                    {
                        label for="amount" class=(FORM_LABEL_STYLE) { "Jumlah (Rp)" }

                        input
                            type="number"
                            name="amount"
                            id="amount"
                            value=(transaction.amount)
                            min="1"
                            step="any"
                            class=(FORM_TEXT_INPUT_STYLE)
                            required;
                    }

                    div class="grid grid-cols-2 gap-3"
                    {
                        div
                        {
                            label for="type" class=(FORM_LABEL_STYLE) { "Jenis" }

                            select name="type" id="type" class=(FORM_TEXT_INPUT_STYLE)
                            {
                                option
                                    value=(TransactionType::Income.as_str())
                                    selected[transaction.type_ == TransactionType::Income]
                                {
                                    "Pemasukan (+)"
                                }
                                option
                                    value=(TransactionType::Expense.as_str())
                                    selected[transaction.type_ == TransactionType::Expense]
                                {
                                    "Pengeluaran (-)"
                                }
                            }
                        }

                        div
                        {
                            label for="method" class=(FORM_LABEL_STYLE) { "Metode" }

                            select name="method" id="method" class=(FORM_TEXT_INPUT_STYLE)
                            {
                                option
                                    value=(PaymentMethod::Cash.as_str())
                                    selected[transaction.method == PaymentMethod::Cash]
                                {
                                    "Cash"
                                }
                                option
                                    value=(PaymentMethod::Cashless.as_str())
                                    selected[transaction.method == PaymentMethod::Cashless]
                                {
                                    "Cashless"
                                }
                            }
                        }
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Simpan Perubahan" }
                }
            }
        }
    };

    base("Ubah Transaksi", &content)
}

/// A route handler for updating a transaction, redirects to the dashboard on
/// success.
///
/// The calendar date and manual order key of the transaction are preserved;
/// only the submitted fields change, and the editor's name supersedes the
/// creator's in the attribution line.
pub async fn update_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Extension(identity): Extension<Identity>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let draft = match form.into_draft() {
        Ok(draft) => draft,
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = state
        .store
        .update(&identity.uid, transaction_id, &draft, &identity.label)
    {
        tracing::error!("Could not update transaction {transaction_id}: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
