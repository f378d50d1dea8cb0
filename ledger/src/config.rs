//! # Service Configuration & Constants
//!
//! Defaults shared by the ledger library and the node binary. Runtime
//! overrides come from the node's CLI flags and environment variables;
//! these are the values used when nothing is overridden.

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Default name of the sled tree holding wallet balances.
///
/// A single database directory can host several independent ledgers by
/// giving each its own tree name.
pub const DEFAULT_WALLET_TREE: &str = "wallets";

/// Default on-disk location of the wallet database.
pub const DEFAULT_DATA_DIR: &str = "./data";

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// Port the HTTP API listens on unless told otherwise.
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Port the Prometheus metrics endpoint listens on unless told otherwise.
pub const DEFAULT_METRICS_PORT: u16 = 9090;

/// Path prefix shared by all versioned API routes.
pub const API_PREFIX: &str = "/api/v1";

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Wire name of the deposit operation.
pub const OP_DEPOSIT: &str = "DEPOSIT";

/// Wire name of the withdraw operation.
pub const OP_WITHDRAW: &str = "WITHDRAW";
