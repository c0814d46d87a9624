//! Type aliases for database row identifiers.

/// The integer type used for row IDs in the SQLite database.
pub type DatabaseId = i64;

/// The ID of a row in the transaction table.
pub type TransactionId = DatabaseId;
