// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Wallet Ledger — Core Library
//!
//! Everything the wallet service knows about money lives here: the wallet
//! data model, request validation, the sled-backed wallet store, and the
//! balance operation handler that ties them together.
//!
//! ## Architecture
//!
//! - **config** — Constants and defaults shared by the library and the node.
//! - **storage** — `WalletDb`, a durable UUID → balance relation with
//!   transactional read-modify-write.
//! - **wallet** — Wallet types, the error taxonomy, and the [`Ledger`]
//!   handler that applies deposits and withdrawals.
//!
//! ## Invariants
//!
//! 1. A committed balance is never negative.
//! 2. Two concurrent operations on the same wallet never both observe the
//!    same starting balance. The store serializes them.
//! 3. A failed operation leaves the store exactly as it found it.

pub mod config;
pub mod storage;
pub mod wallet;

pub use storage::WalletDb;
pub use wallet::{Ledger, OperationKind, OperationOutcome, OperationRequest, Wallet, WalletError};
