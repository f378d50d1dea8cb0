//! # Storage Module
//!
//! Durable wallet balances on top of sled's embedded key-value store.
//!
//! ```text
//! db.rs  — WalletDb: open/read/transactional update of wallet records
//! ```
//!
//! sled gives us serializable multi-key transactions for free. We only ever
//! touch one key per transaction, but that is exactly what closes the
//! read-then-write race on a single wallet: two transactions that read and
//! rewrite the same key cannot both commit against the same snapshot.

pub mod db;

pub use db::{BalanceChange, DbError, DbResult, UpdateError, WalletDb, WalletRecord};
