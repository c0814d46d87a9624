//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and its database functions
//! - The manual ordering engine for drag-and-drop reordering
//! - The endpoints for creating, editing, deleting and reordering

pub mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
pub mod form;
pub mod ordering;
mod reorder_endpoint;

pub use self::core::{
    PaymentMethod, Transaction, TransactionDraft, TransactionType, create_transaction_table,
    map_transaction_row,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::{get_edit_transaction_page, update_transaction_endpoint};
pub use reorder_endpoint::reorder_transactions_endpoint;
