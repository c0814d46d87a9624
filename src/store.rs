//! The transaction store adapter.
//!
//! Wraps the SQLite connection behind owner-scoped operations and publishes
//! a change notice after every committed write. Live consumers subscribe to
//! the notices and re-materialize the owner's full list per notice: snapshots
//! replace the previous state, they are never merged into it, so the most
//! recent snapshot always wins.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use time::Date;
use tokio::sync::broadcast;

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{
        core::{
            Transaction, TransactionDraft, delete_transaction, get_all_transactions,
            get_transaction, insert_transaction, update_transaction,
        },
        ordering::{initial_order_key, now_ms},
    },
};

/// How many change notices may queue up before a slow consumer starts
/// lagging. A lagged consumer just skips to the latest snapshot, so the
/// capacity only bounds memory.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// A notice that some owner's collection changed.
///
/// Carries no row data on purpose: consumers re-read the whole collection,
/// so a notice only needs to say whose list went stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNotice {
    /// The uid whose collection changed.
    pub owner_id: String,
}

/// An owner-scoped store for transactions backed by SQLite.
///
/// Cloning is cheap; clones share the connection and the change channel.
#[derive(Debug, Clone)]
pub struct TransactionStore {
    connection: Arc<Mutex<Connection>>,
    changes: broadcast::Sender<ChangeNotice>,
}

impl TransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);

        Self { connection, changes }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }

    /// Tell live subscribers that `owner_id`'s collection changed.
    ///
    /// A send error only means nobody is subscribed right now.
    fn publish_change(&self, owner_id: &str) {
        let _ = self.changes.send(ChangeNotice {
            owner_id: owner_id.to_owned(),
        });
    }

    /// Create a new transaction in `owner_id`'s collection.
    ///
    /// The store assigns the creation timestamp, the initial order key (the
    /// same timestamp, so the new entry sorts first) and the creator stamp.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the write is rejected; nothing is
    /// queued for retry.
    pub fn create(
        &self,
        owner_id: &str,
        draft: &TransactionDraft,
        actor_label: &str,
        date: Date,
    ) -> Result<Transaction, Error> {
        let transaction = {
            let connection = self.lock()?;
            insert_transaction(
                &connection,
                owner_id,
                draft,
                actor_label,
                date,
                initial_order_key(),
            )?
        };

        self.publish_change(owner_id);

        Ok(transaction)
    }

    /// Overwrite the editable fields of a transaction and stamp the editor.
    ///
    /// The order key and calendar date are untouched.
    ///
    /// # Errors
    /// Returns an [Error::UpdateMissingTransaction] if the transaction does
    /// not exist in `owner_id`'s collection.
    pub fn update(
        &self,
        owner_id: &str,
        id: TransactionId,
        draft: &TransactionDraft,
        actor_label: &str,
    ) -> Result<Transaction, Error> {
        let transaction = {
            let connection = self.lock()?;
            update_transaction(&connection, owner_id, id, draft, actor_label, now_ms())?
        };

        self.publish_change(owner_id);

        Ok(transaction)
    }

    /// Delete a transaction. The caller has already obtained confirmation;
    /// there is no undo.
    ///
    /// # Errors
    /// Returns an [Error::DeleteMissingTransaction] if the transaction does
    /// not exist in `owner_id`'s collection.
    pub fn delete(&self, owner_id: &str, id: TransactionId) -> Result<(), Error> {
        {
            let connection = self.lock()?;
            if delete_transaction(&connection, owner_id, id)? == 0 {
                return Err(Error::DeleteMissingTransaction);
            }
        }

        self.publish_change(owner_id);

        Ok(())
    }

    /// Apply a batch of new order keys atomically.
    ///
    /// Every key in the batch is written inside one SQL transaction; if any
    /// ID does not belong to `owner_id`'s collection, the whole batch rolls
    /// back and nothing is applied.
    ///
    /// # Errors
    /// Returns an [Error::ReorderMissingTransaction] if an ID in the batch
    /// does not refer to an owned transaction.
    pub fn reorder_batch(
        &self,
        owner_id: &str,
        keyed_updates: &[(TransactionId, i64)],
    ) -> Result<(), Error> {
        {
            let connection = self.lock()?;
            let tx = connection.unchecked_transaction()?;

            {
                let mut statement = tx.prepare(
                    "UPDATE \"transaction\" SET order_key = ?1 \
                     WHERE id = ?2 AND owner_id = ?3",
                )?;

                for &(id, key) in keyed_updates {
                    let rows_affected = statement.execute((key, id, owner_id))?;
                    if rows_affected == 0 {
                        // Dropping the uncommitted tx rolls the batch back.
                        return Err(Error::ReorderMissingTransaction);
                    }
                }
            }

            tx.commit()?;
        }

        self.publish_change(owner_id);

        Ok(())
    }

    /// Retrieve a single transaction from `owner_id`'s collection.
    pub fn get(&self, owner_id: &str, id: TransactionId) -> Result<Transaction, Error> {
        let connection = self.lock()?;
        get_transaction(&connection, owner_id, id)
    }

    /// Materialize `owner_id`'s full collection in display order.
    pub fn get_all(&self, owner_id: &str) -> Result<Vec<Transaction>, Error> {
        let connection = self.lock()?;
        get_all_transactions(&connection, owner_id)
    }

    /// Subscribe to change notices for `owner_id`'s collection.
    ///
    /// Dropping the returned [Subscription] is the teardown; there is no
    /// separate unsubscribe call.
    pub fn subscribe(&self, owner_id: &str) -> Subscription {
        Subscription {
            owner_id: owner_id.to_owned(),
            receiver: self.changes.subscribe(),
        }
    }
}

/// A live subscription to one owner's change notices.
///
/// Held for as long as the consumer wants updates; dropping it tears the
/// subscription down exactly once.
#[derive(Debug)]
pub struct Subscription {
    owner_id: String,
    receiver: broadcast::Receiver<ChangeNotice>,
}

impl Subscription {
    /// Wait until the owner's collection changes.
    ///
    /// Returns `false` when the store has shut down and no further changes
    /// will arrive. A lagged receiver counts as changed: skipped notices
    /// only mean intermediate states were missed, and the consumer is about
    /// to re-materialize the latest state anyway.
    pub async fn changed(&mut self) -> bool {
        loop {
            match self.receiver.recv().await {
                Ok(notice) if notice.owner_id == self.owner_id => return true,
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!("subscription lagged, skipped {skipped} change notices");
                    return true;
                }
                Err(broadcast::error::RecvError::Closed) => return false,
            }
        }
    }
}
