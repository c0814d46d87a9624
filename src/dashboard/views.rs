//! HTML view functions for rendering the dashboard UI.
//!
//! The page is a single column: balance header, analysis bars, the add form
//! and the transaction history. Everything below the page header lives inside
//! `#dashboard-content`, which is re-rendered wholesale by mutation responses
//! and by server-sent events so stale client state can never survive a swap.

use maud::{Markup, html};
use time::{Date, macros::format_description};

use crate::{
    dashboard::aggregation::{Totals, aggregate, percentage},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        base, format_rupiah,
    },
    transaction::{PaymentMethod, Transaction, TransactionType},
};

const SECTION_HEADING_STYLE: &str = "text-sm font-semibold text-gray-600 dark:text-gray-300 mb-3";

const SELECT_STYLE: &str = "w-full p-2.5 rounded text-sm text-gray-900 dark:text-white \
    bg-gray-50 dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    focus:ring-blue-600 focus:border-blue-600";

/// The full dashboard page, including the SSE wiring.
pub fn dashboard_page(display_name: &str, transactions: &[Transaction]) -> Markup {
    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            header class="w-full flex justify-between items-center"
            {
                h1 class="text-xl font-bold" { "DompetKu" }

                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    (display_name)
                    " · "
                    a href=(endpoints::LOG_OUT) class=(LINK_STYLE) { "Keluar" }
                }
            }

            div
                class="w-full flex flex-col gap-4"
                hx-ext="sse"
                sse-connect=(endpoints::LIVE_TRANSACTIONS)
            {
                div
                    id="dashboard-content"
                    class="flex flex-col gap-4"
                    sse-swap="update"
                    hx-swap="innerHTML"
                {
                    (dashboard_content(transactions))
                }
            }
        }
    };

    base("Dasbor", &content)
}

/// The contents of `#dashboard-content`: everything derived from the
/// transaction snapshot, plus a pristine add form.
///
/// Mutation endpoints and the live event stream both respond with this
/// fragment, so a swap always resets the form to its defaults.
pub fn dashboard_content(transactions: &[Transaction]) -> Markup {
    let totals = aggregate(transactions);

    html! {
        (balance_header(&totals))
        (analysis_section(&totals))
        (add_transaction_form())
        (transaction_history(transactions))
    }
}

fn balance_header(totals: &Totals) -> Markup {
    html! {
        section class="w-full bg-blue-600 dark:bg-blue-700 rounded-lg shadow p-6 text-white"
        {
            div class="text-center"
            {
                p class="text-blue-200 text-sm" { "Total Saldo" }
                h2 class="text-3xl font-bold mt-1" { (format_rupiah(totals.balance)) }
            }

            div class="grid grid-cols-2 gap-4 mt-6"
            {
                div class="bg-blue-500/30 p-3 rounded border border-blue-400/30"
                {
                    p class="text-xs text-blue-100" { "Pemasukan" }
                    p class="font-semibold text-sm" { (format_rupiah(totals.income)) }
                }

                div class="bg-blue-500/30 p-3 rounded border border-blue-400/30"
                {
                    p class="text-xs text-blue-100" { "Pengeluaran" }
                    p class="font-semibold text-sm" { (format_rupiah(totals.expense)) }
                }
            }
        }
    }
}

fn analysis_section(totals: &Totals) -> Markup {
    let income_share = percentage(totals.income, totals.income + totals.expense);
    let expense_share = percentage(totals.expense, totals.income + totals.expense);
    let cash_share = percentage(totals.cash, totals.flow);
    let cashless_share = percentage(totals.cashless, totals.flow);

    html! {
        section class=(CARD_STYLE)
        {
            h3 class=(SECTION_HEADING_STYLE) { "Analisis" }

            div class="mb-4"
            {
                div class="flex justify-between text-xs mb-1 text-gray-500 dark:text-gray-400"
                {
                    span { "Masuk (" (income_share) "%)" }
                    span { "Keluar (" (expense_share) "%)" }
                }

                div class="h-3 w-full bg-gray-200 dark:bg-gray-700 rounded-full overflow-hidden flex"
                {
                    div class="bg-green-500 h-full" style=(format!("width: {income_share}%")) {}
                    div class="bg-red-500 h-full" style=(format!("width: {expense_share}%")) {}
                }
            }

            div
            {
                div class="flex justify-between text-xs mb-1 text-gray-500 dark:text-gray-400"
                {
                    span { "Cash (" (cash_share) "%)" }
                    span { "Cashless (" (cashless_share) "%)" }
                }

                div class="h-3 w-full bg-gray-200 dark:bg-gray-700 rounded-full overflow-hidden flex"
                {
                    div class="bg-blue-500 h-full" style=(format!("width: {cash_share}%")) {}
                    div class="bg-purple-500 h-full" style=(format!("width: {cashless_share}%")) {}
                }
            }
        }
    }
}

fn add_transaction_form() -> Markup {
    html! {
        section class=(CARD_STYLE)
        {
            h3 class=(SECTION_HEADING_STYLE) { "Tambah Transaksi" }

            form
                hx-post=(endpoints::TRANSACTIONS)
                hx-target="#dashboard-content"
                hx-swap="innerHTML"
                hx-target-error="#alert-container"
                class="space-y-3"
            {
                div class="grid grid-cols-2 gap-3"
                {
                    select name="type" class=(SELECT_STYLE)
                    {
                        option value=(TransactionType::Income.as_str()) { "Pemasukan (+)" }
                        option value=(TransactionType::Expense.as_str()) selected { "Pengeluaran (-)" }
                    }

                    select name="method" class=(SELECT_STYLE)
                    {
                        option value=(PaymentMethod::Cash.as_str()) selected { "Cash" }
                        option value=(PaymentMethod::Cashless.as_str()) { "Cashless" }
                    }
                }

                input
                    type="text"
                    name="description"
                    placeholder="Catatan"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;

                div class="flex gap-2"
                {
                    input
                        type="number"
                        name="amount"
                        placeholder="Jumlah (Rp)"
                        min="1"
                        step="any"
                        class=(FORM_TEXT_INPUT_STYLE)
                        required;

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Simpan" }
                }
            }
        }
    }
}

fn transaction_history(transactions: &[Transaction]) -> Markup {
    html! {
        section class=(CARD_STYLE)
        {
            h3 class=(SECTION_HEADING_STYLE) { "Riwayat Transaksi" }

            @if transactions.is_empty()
            {
                div class="text-center py-6 text-gray-400 text-sm"
                {
                    "Belum ada transaksi tersimpan."
                }
            }
            @else
            {
                ul
                    id="transaction-list"
                    class="space-y-3"
                    data-reorder-url=(endpoints::REORDER_TRANSACTIONS)
                {
                    @for transaction in transactions
                    {
                        (transaction_row(transaction))
                    }
                }
            }
        }
    }
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let amount_style = match transaction.type_ {
        TransactionType::Income => "font-bold text-sm text-green-600",
        TransactionType::Expense => "font-bold text-sm text-red-600",
    };
    let sign = match transaction.type_ {
        TransactionType::Income => "+",
        TransactionType::Expense => "-",
    };
    let method_style = match transaction.method {
        PaymentMethod::Cash => {
            "px-1.5 py-0.5 rounded text-[10px] uppercase font-bold bg-blue-100 text-blue-700"
        }
        PaymentMethod::Cashless => {
            "px-1.5 py-0.5 rounded text-[10px] uppercase font-bold bg-purple-100 text-purple-700"
        }
    };

    html! {
        li
            class="flex justify-between items-center bg-white dark:bg-gray-700 p-3 rounded \
                border border-gray-100 dark:border-gray-600 shadow-sm"
            data-id=(transaction.id)
            draggable="true"
        {
            div class="flex items-center gap-3"
            {
                span
                    class="drag-handle cursor-grab text-gray-400 select-none"
                    title="Seret untuk mengubah urutan"
                {
                    "\u{2630}"
                }

                div
                {
                    p class="font-semibold text-sm" { (transaction.description) }

                    div class="flex items-center gap-2 text-xs text-gray-500 dark:text-gray-400"
                    {
                        span class=(method_style) { (transaction.method.as_str()) }
                        span { (format_date(transaction.date)) }
                        span { "oleh " (transaction.attribution()) }
                    }
                }
            }

            div class="text-right"
            {
                p class=(amount_style) { (sign) " " (format_rupiah(transaction.amount)) }

                div class="flex gap-2 justify-end text-xs mt-1"
                {
                    a
                        href=(endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id))
                        class=(LINK_STYLE)
                    {
                        "Ubah"
                    }

                    button
                        class="text-gray-400 hover:text-red-500 cursor-pointer"
                        hx-delete=(endpoints::format_endpoint(endpoints::TRANSACTION, transaction.id))
                        hx-confirm="Hapus transaksi ini?"
                        hx-target="#dashboard-content"
                        hx-swap="innerHTML"
                        hx-target-error="#alert-container"
                    {
                        "Hapus"
                    }
                }
            }
        }
    }
}

fn format_date(date: Date) -> String {
    let format = format_description!("[day]/[month]/[year]");

    // The format description is static and contains no components a Date
    // cannot supply.
    date.format(&format).unwrap_or_default()
}

#[cfg(test)]
mod dashboard_view_tests {
    use time::macros::date;

    use crate::transaction::{PaymentMethod, Transaction, TransactionType};

    use super::{dashboard_content, dashboard_page};

    fn sample_transaction() -> Transaction {
        Transaction {
            id: 1,
            description: "Gaji".to_owned(),
            amount: 50_000.0,
            type_: TransactionType::Income,
            method: PaymentMethod::Cash,
            date: date!(2026 - 08 - 01),
            order_key: Some(1_000),
            created_by: "Budi".to_owned(),
            updated_by: None,
            created_at: 1_000,
            updated_at: None,
        }
    }

    #[test]
    fn empty_dashboard_shows_placeholder() {
        let markup = dashboard_content(&[]).into_string();

        assert!(markup.contains("Belum ada transaksi tersimpan."));
        assert!(!markup.contains("transaction-list"));
    }

    #[test]
    fn dashboard_shows_balance_and_transaction() {
        let markup = dashboard_content(&[sample_transaction()]).into_string();

        assert!(markup.contains("Total Saldo"));
        assert!(markup.contains("Rp50.000"));
        assert!(markup.contains("Gaji"));
        assert!(markup.contains("oleh Budi"));
        assert!(markup.contains("01/08/2026"));
    }

    #[test]
    fn attribution_shows_last_editor() {
        let mut transaction = sample_transaction();
        transaction.updated_by = Some("Siti".to_owned());

        let markup = dashboard_content(&[transaction]).into_string();

        assert!(markup.contains("oleh Siti"));
        assert!(!markup.contains("oleh Budi"));
    }

    #[test]
    fn page_wires_up_the_event_stream() {
        let markup = dashboard_page("Budi", &[]).into_string();

        assert!(markup.contains("sse-connect=\"/live/transactions\""));
        assert!(markup.contains("id=\"dashboard-content\""));
        assert!(markup.contains("Budi"));
    }

    #[test]
    fn form_defaults_to_cash_expense() {
        let markup = dashboard_content(&[]).into_string();

        assert!(markup.contains("value=\"expense\" selected"));
        assert!(markup.contains("value=\"cash\" selected"));
    }
}
