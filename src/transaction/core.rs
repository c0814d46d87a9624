//! Defines the core data model and database queries for transactions.

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// Whether a transaction brought money in or took money out.
///
/// The amount of a transaction is always stored positive, the direction is
/// encoded here and only here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

impl TransactionType {
    /// The text form stored in the database and used in form values.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(FromSqlError::Other(
                format!("invalid transaction type {other:?}").into(),
            )),
        }
    }
}

/// How a transaction was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical money.
    Cash,
    /// Card, transfer or e-wallet.
    Cashless,
}

impl PaymentMethod {
    /// The text form stored in the database and used in form values.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Cashless => "cashless",
        }
    }
}

impl ToSql for PaymentMethod {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for PaymentMethod {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "cash" => Ok(PaymentMethod::Cash),
            "cashless" => Ok(PaymentMethod::Cashless),
            other => Err(FromSqlError::Other(
                format!("invalid payment method {other:?}").into(),
            )),
        }
    }
}

/// A single recorded income or expense event.
///
/// Rows are scoped to one identity's collection by the `owner_id` column,
/// which every query filters on; the owner is not part of the model itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction, assigned by the database on creation.
    pub id: TransactionId,
    /// A text description of what the transaction was for. Never empty.
    pub description: String,
    /// The magnitude of the transaction. Always positive, the direction is
    /// derived from `type_`.
    pub amount: f64,
    /// Whether this is income or an expense.
    pub type_: TransactionType,
    /// How the transaction was paid.
    pub method: PaymentMethod,
    /// The calendar date the transaction was recorded. Not updated on edit.
    pub date: Date,
    /// The manual sort key. Higher sorts first. Absent for rows created
    /// before ordering existed, in which case `created_at` stands in.
    pub order_key: Option<i64>,
    /// Display name of the identity that created the transaction.
    pub created_by: String,
    /// Display name of the identity that last edited the transaction, if any.
    pub updated_by: Option<String>,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Last edit time in milliseconds since the Unix epoch, if ever edited.
    pub updated_at: Option<i64>,
}

impl Transaction {
    /// The display name shown in the attribution line.
    ///
    /// Once a transaction has been edited, the last editor supersedes the
    /// original creator forever; the creator is retained in the row but no
    /// longer displayed.
    pub fn attribution(&self) -> &str {
        self.updated_by.as_deref().unwrap_or(&self.created_by)
    }
}

/// The validated fields of a create or edit submission.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    /// A non-empty description.
    pub description: String,
    /// A positive amount.
    pub amount: f64,
    /// Whether this is income or an expense.
    pub type_: TransactionType,
    /// How the transaction was paid.
    pub method: PaymentMethod,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_id TEXT NOT NULL,
                description TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount > 0),
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                method TEXT NOT NULL CHECK (method IN ('cash', 'cashless')),
                date TEXT NOT NULL,
                order_key INTEGER,
                created_by TEXT NOT NULL,
                updated_by TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Every query filters on the owner.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_owner ON \"transaction\"(owner_id);",
        (),
    )?;

    Ok(())
}

const TRANSACTION_COLUMNS: &str = "id, description, amount, type, method, date, order_key, \
     created_by, updated_by, created_at, updated_at";

/// Insert a new transaction into `owner_id`'s collection.
///
/// The caller supplies the creation timestamp (which doubles as the initial
/// order key), the calendar date and the actor's display name.
///
/// # Errors
/// Returns an [Error::SqlError] if the row is rejected by the database.
pub fn insert_transaction(
    connection: &Connection,
    owner_id: &str,
    draft: &TransactionDraft,
    actor_label: &str,
    date: Date,
    timestamp_ms: i64,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" \
             (owner_id, description, amount, type, method, date, order_key, created_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                owner_id,
                &draft.description,
                draft.amount,
                draft.type_,
                draft.method,
                date,
                timestamp_ms,
                actor_label,
                timestamp_ms,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from `owner_id`'s collection by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by
///   `owner_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(
    connection: &Connection,
    owner_id: &str,
    id: TransactionId,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" \
             WHERE id = :id AND owner_id = :owner_id"
        ))?
        .query_one(
            &[(":id", &id as &dyn ToSql), (":owner_id", &owner_id)],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve every transaction in `owner_id`'s collection in display order.
///
/// The order is total: order key descending, rows without an order key fall
/// back to their creation timestamp, ties broken by creation timestamp and
/// then row ID descending (so two rows created within the same millisecond
/// still order newest first).
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_all_transactions(
    connection: &Connection,
    owner_id: &str,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" \
             WHERE owner_id = :owner_id \
             ORDER BY COALESCE(order_key, created_at) DESC, created_at DESC, id DESC"
        ))?
        .query_map(&[(":owner_id", &owner_id)], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Overwrite the editable fields of a transaction and stamp the editor.
///
/// The order key and the calendar date are left untouched.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a
///   transaction owned by `owner_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    connection: &Connection,
    owner_id: &str,
    id: TransactionId,
    draft: &TransactionDraft,
    actor_label: &str,
    timestamp_ms: i64,
) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "UPDATE \"transaction\" \
             SET description = ?1, amount = ?2, type = ?3, method = ?4, \
                 updated_by = ?5, updated_at = ?6
             WHERE id = ?7 AND owner_id = ?8
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                &draft.description,
                draft.amount,
                draft.type_,
                draft.method,
                actor_label,
                timestamp_ms,
                id,
                owner_id,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
            error => error.into(),
        })
}

/// The number of rows affected by a delete.
pub type RowsAffected = usize;

/// Delete a transaction from `owner_id`'s collection.
///
/// Returns the number of rows deleted; zero means the transaction did not
/// exist (the caller decides whether that is an error).
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn delete_transaction(
    connection: &Connection,
    owner_id: &str,
    id: TransactionId,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE id = :id AND owner_id = :owner_id",
            &[(":id", &id as &dyn ToSql), (":owner_id", &owner_id)],
        )
        .map_err(|error| error.into())
}

/// Get the number of transactions in `owner_id`'s collection.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection, owner_id: &str) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM \"transaction\" WHERE owner_id = :owner_id",
            &[(":owner_id", &owner_id)],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Map a database row to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: row.get(2)?,
        type_: row.get(3)?,
        method: row.get(4)?,
        date: row.get(5)?,
        order_key: row.get(6)?,
        created_by: row.get(7)?,
        updated_by: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
