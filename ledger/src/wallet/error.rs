//! Error taxonomy for wallet operations.
//!
//! Every failure a caller can observe maps to exactly one variant. The
//! first three are caused by the request itself; only [`WalletError::Storage`]
//! indicates a fault on our side.

use thiserror::Error;
use uuid::Uuid;

use crate::storage::DbError;

/// Errors returned by the balance operation handler and reader.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WalletError {
    /// Malformed body, unknown operation type, bad identifier or amount.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Withdraw against, or lookup of, a wallet that does not exist.
    #[error("wallet not found: {0}")]
    WalletNotFound(Uuid),

    /// A withdrawal asked for more than the wallet holds.
    #[error("insufficient funds: balance {balance:.2}, requested {requested:.2}")]
    InsufficientFunds {
        /// Balance at the time of the attempt.
        balance: f64,
        /// Amount the caller tried to withdraw.
        requested: f64,
    },

    /// Transaction begin/commit failure, I/O failure, corrupt record.
    #[error("storage error: {0}")]
    Storage(String),
}

impl WalletError {
    /// True when the caller, not the service, is at fault.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, WalletError::Storage(_))
    }

    /// Short stable label, used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            WalletError::InvalidRequest(_) => "invalid_request",
            WalletError::WalletNotFound(_) => "wallet_not_found",
            WalletError::InsufficientFunds { .. } => "insufficient_funds",
            WalletError::Storage(_) => "storage_error",
        }
    }
}

impl From<DbError> for WalletError {
    fn from(err: DbError) -> Self {
        WalletError::Storage(err.to_string())
    }
}

pub type WalletResult<T> = Result<T, WalletError>;
