//! Database schema initialization.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Error, transaction::core::create_transaction_table};

/// Create the application's tables if they do not exist.
///
/// Runs inside a single exclusive transaction so the schema is either fully
/// initialized or untouched.
///
/// # Errors
/// Returns an [Error::SqlError] if the schema cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod db_tests {
    use rusqlite::Connection;

    use crate::db::initialize;

    #[test]
    fn initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).unwrap();
        initialize(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'transaction'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
