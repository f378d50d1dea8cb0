//! # Balance Operation Handler
//!
//! [`Ledger`] owns the wallet store and enforces the balance rules:
//!
//! | Wallet exists | Operation | Result                                       |
//! |---------------|-----------|----------------------------------------------|
//! | no            | DEPOSIT   | wallet created with `balance = amount`       |
//! | no            | WITHDRAW  | `WalletNotFound`, nothing written            |
//! | yes           | DEPOSIT   | `balance + amount`                           |
//! | yes           | WITHDRAW  | `balance - amount`, or `InsufficientFunds`   |
//!
//! The decision runs inside the store's transaction, so the balance it
//! looks at is the balance it overwrites.

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::error::{WalletError, WalletResult};
use super::types::{OperationKind, OperationOutcome, OperationRequest, Wallet};
use crate::storage::{UpdateError, WalletDb};

/// Applies balance operations against a [`WalletDb`].
///
/// Cheap to clone; clones share the same store.
#[derive(Debug, Clone)]
pub struct Ledger {
    db: WalletDb,
}

impl Ledger {
    pub fn new(db: WalletDb) -> Self {
        Self { db }
    }

    /// The underlying store.
    pub fn db(&self) -> &WalletDb {
        &self.db
    }

    /// Apply a deposit or withdrawal in one atomic transaction.
    ///
    /// On any error the store is left untouched.
    pub fn apply(&self, request: &OperationRequest) -> WalletResult<OperationOutcome> {
        let OperationRequest {
            wallet_id,
            kind,
            amount,
        } = *request;

        let result = self
            .db
            .update_wallet(&wallet_id, |current| next_balance(wallet_id, kind, amount, current));

        match result {
            Ok(change) => {
                let outcome = OperationOutcome {
                    wallet_id,
                    previous_balance: change.previous,
                    balance: change.current,
                };
                if outcome.created() {
                    info!(wallet_id = %wallet_id, balance = outcome.balance, "wallet created");
                } else {
                    info!(
                        wallet_id = %wallet_id,
                        operation = %kind,
                        amount,
                        balance = outcome.balance,
                        "balance updated"
                    );
                }
                Ok(outcome)
            }
            Err(UpdateError::Aborted(err)) => {
                warn!(wallet_id = %wallet_id, operation = %kind, amount, "operation rejected: {}", err);
                Err(err)
            }
            Err(UpdateError::Db(err)) => {
                error!(wallet_id = %wallet_id, operation = %kind, "storage failure: {}", err);
                Err(err.into())
            }
        }
    }

    /// Read a wallet's current balance. Never writes.
    pub fn balance(&self, wallet_id: &Uuid) -> WalletResult<Wallet> {
        match self.db.get_wallet(wallet_id) {
            Ok(Some(record)) => {
                debug!(wallet_id = %wallet_id, balance = record.balance, "balance read");
                Ok(Wallet {
                    wallet_id: *wallet_id,
                    balance: record.balance,
                })
            }
            Ok(None) => Err(WalletError::WalletNotFound(*wallet_id)),
            Err(err) => {
                error!(wallet_id = %wallet_id, "storage failure: {}", err);
                Err(err.into())
            }
        }
    }
}

/// Decide the balance to store, given the one currently stored.
///
/// Pure: the store may call it more than once when transactions conflict.
fn next_balance(
    wallet_id: Uuid,
    kind: OperationKind,
    amount: f64,
    current: Option<f64>,
) -> WalletResult<f64> {
    match (kind, current) {
        (OperationKind::Deposit, None) => Ok(amount),
        (OperationKind::Withdraw, None) => Err(WalletError::WalletNotFound(wallet_id)),
        (OperationKind::Deposit, Some(balance)) => {
            let total = balance + amount;
            if total.is_finite() {
                Ok(total)
            } else {
                Err(WalletError::InvalidRequest(
                    "amount overflows balance".to_string(),
                ))
            }
        }
        (OperationKind::Withdraw, Some(balance)) if balance < amount => {
            Err(WalletError::InsufficientFunds {
                balance,
                requested: amount,
            })
        }
        (OperationKind::Withdraw, Some(balance)) => Ok(balance - amount),
    }
}
