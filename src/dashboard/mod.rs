//! Dashboard module
//!
//! Provides the single-page overview: balance header, analysis bars, the add
//! transaction form and the transaction history.

pub mod aggregation;
mod handlers;
pub mod views;

pub use handlers::get_dashboard_page;
