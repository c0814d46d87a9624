//! The transaction form shared by the create and edit endpoints.

use serde::Deserialize;

use crate::{
    Error,
    transaction::{PaymentMethod, TransactionDraft, TransactionType},
};

/// The raw form data submitted for creating or editing a transaction.
///
/// The amount arrives as a string so that a malformed value can be rejected
/// with an alert naming the input, rather than failing form extraction with
/// an opaque 422.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// Text detailing the transaction.
    pub description: String,
    /// The value of the transaction in rupiah.
    pub amount: String,
    /// Whether this is income or an expense.
    #[serde(rename = "type")]
    pub type_: TransactionType,
    /// How the transaction was paid.
    pub method: PaymentMethod,
}

impl TransactionForm {
    /// Validate the form into a draft.
    ///
    /// Nothing is persisted when validation fails; the submission is simply
    /// rejected.
    ///
    /// # Errors
    /// Returns [Error::EmptyDescription] for a blank description and
    /// [Error::InvalidAmount] when the amount is not a positive number.
    pub fn into_draft(self) -> Result<TransactionDraft, Error> {
        let description = self.description.trim().to_owned();

        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        let amount: f64 = self
            .amount
            .trim()
            .parse()
            .map_err(|_| Error::InvalidAmount(self.amount.clone()))?;

        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidAmount(self.amount));
        }

        Ok(TransactionDraft {
            description,
            amount,
            type_: self.type_,
            method: self.method,
        })
    }
}
