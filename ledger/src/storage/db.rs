//! # WalletDb — Persistent Wallet Store
//!
//! A single sled tree maps wallet identifiers to balances:
//!
//! | Tree (default `wallets`) | Key              | Value                  |
//! |--------------------------|------------------|------------------------|
//! |                          | UUID (16 raw B)  | `bincode(WalletRecord)`|
//!
//! ## Atomicity
//!
//! [`WalletDb::update_wallet`] runs the caller's plan inside a sled
//! transaction. If another transaction commits a write to the same key in
//! between our read and our write, sled discards our attempt and runs the
//! closure again against the fresh value. The plan therefore must be a pure
//! function of the balance it is handed.

use serde::{Deserialize, Serialize};
use sled::transaction::{
    ConflictableTransactionError, ConflictableTransactionResult, TransactionError,
};
use sled::{Db, Tree};
use std::path::Path;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Error Type
// ---------------------------------------------------------------------------

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Failure of a transactional update: either the plan refused the change
/// or the store itself failed.
#[derive(Debug)]
pub enum UpdateError<E> {
    Aborted(E),
    Db(DbError),
}

impl<E> From<DbError> for UpdateError<E> {
    fn from(err: DbError) -> Self {
        UpdateError::Db(err)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// On-disk representation of one wallet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalletRecord {
    pub balance: f64,
}

impl WalletRecord {
    fn encode(&self) -> DbResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| DbError::Serialization(e.to_string()))
    }

    fn decode(bytes: &[u8]) -> DbResult<Self> {
        bincode::deserialize(bytes).map_err(|e| DbError::Serialization(e.to_string()))
    }
}

/// What a committed update changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceChange {
    /// Balance before the update, `None` if the record was just created.
    pub previous: Option<f64>,
    /// Balance now stored.
    pub current: f64,
}

type TxResult<E> = ConflictableTransactionResult<BalanceChange, UpdateError<E>>;

fn abort_db<E>(err: DbError) -> ConflictableTransactionError<UpdateError<E>> {
    ConflictableTransactionError::Abort(UpdateError::Db(err))
}

// ---------------------------------------------------------------------------
// WalletDb
// ---------------------------------------------------------------------------

/// Persistent storage engine for wallet balances.
///
/// # Thread Safety
///
/// sled handles are reference counted and thread-safe. Cloning a `WalletDb`
/// is cheap and every clone sees the same data, so one instance can be
/// shared by every request handler.
#[derive(Debug, Clone)]
pub struct WalletDb {
    /// The underlying sled database handle.
    db: Db,
    /// Wallet balances keyed by raw UUID bytes.
    wallets: Tree,
}

impl WalletDb {
    /// Open or create a database at the given filesystem path.
    ///
    /// `tree` names the keyspace holding the balances, so several ledgers
    /// can coexist in one directory.
    pub fn open<P: AsRef<Path>>(path: P, tree: &str) -> DbResult<Self> {
        let db = sled::open(path)?;
        Self::from_db(db, tree)
    }

    /// Create a temporary in-memory database, removed when dropped.
    pub fn open_temporary(tree: &str) -> DbResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db, tree)
    }

    /// Open a database from an explicit sled configuration.
    ///
    /// Lets callers tune sled itself, e.g. disable the background flusher
    /// with `flush_every_ms(None)` so a closed database releases its
    /// directory lock as soon as the last handle is dropped.
    pub fn open_with_config(config: sled::Config, tree: &str) -> DbResult<Self> {
        let db = config.open()?;
        Self::from_db(db, tree)
    }

    fn from_db(db: Db, tree: &str) -> DbResult<Self> {
        let wallets = db.open_tree(tree)?;
        Ok(Self { db, wallets })
    }

    /// Retrieve a wallet record.
    ///
    /// Returns `None` if the wallet has never been funded.
    pub fn get_wallet(&self, id: &Uuid) -> DbResult<Option<WalletRecord>> {
        match self.wallets.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(WalletRecord::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Atomically read, decide and write one wallet's balance.
    ///
    /// `plan` receives the current balance (`None` when the wallet does not
    /// exist) and returns either the balance to store or a reason to abort.
    /// On abort nothing is written. On success the new balance is committed
    /// and flushed to disk before returning. A failed flush after the commit
    /// is logged, not returned: the write has already taken effect.
    pub fn update_wallet<F, E>(&self, id: &Uuid, plan: F) -> Result<BalanceChange, UpdateError<E>>
    where
        F: Fn(Option<f64>) -> Result<f64, E>,
    {
        let key = id.as_bytes().to_vec();

        let result = self.wallets.transaction(|tx| -> TxResult<E> {
            let previous = match tx.get(&key)? {
                Some(bytes) => Some(WalletRecord::decode(&bytes).map_err(abort_db)?.balance),
                None => None,
            };

            let current = plan(previous)
                .map_err(|e| ConflictableTransactionError::Abort(UpdateError::Aborted(e)))?;

            let bytes = WalletRecord { balance: current }.encode().map_err(abort_db)?;
            tx.insert(key.as_slice(), bytes)?;

            Ok(BalanceChange { previous, current })
        });

        let change = match result {
            Ok(change) => change,
            Err(TransactionError::Abort(err)) => return Err(err),
            Err(TransactionError::Storage(err)) => return Err(DbError::Sled(err).into()),
        };

        if let Err(err) = self.db.flush() {
            tracing::error!(wallet_id = %id, "flush after commit failed: {}", err);
        }
        Ok(change)
    }

    /// Return the number of wallets stored.
    pub fn wallet_count(&self) -> usize {
        self.wallets.len()
    }

    /// Force a flush of all pending writes to disk.
    pub fn flush(&self) -> DbResult<()> {
        self.db.flush()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
