//! # Wallets
//!
//! The wallet data model and the two operations the service exposes:
//! applying a deposit/withdrawal ([`Ledger::apply`]) and reading a balance
//! ([`Ledger::balance`]).

pub mod error;
pub mod ledger;
pub mod types;

pub use error::{WalletError, WalletResult};
pub use ledger::Ledger;
pub use types::{
    parse_wallet_id, OperationKind, OperationOutcome, OperationPayload, OperationRequest, Wallet,
};
