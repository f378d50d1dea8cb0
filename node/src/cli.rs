//! # CLI Interface
//!
//! Defines the command-line argument structure for `wallet-node` using
//! `clap` derive. Every `run` flag can also be supplied through an
//! environment variable, which is how container deployments configure it.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use wallet_ledger::config::{
    DEFAULT_DATA_DIR, DEFAULT_HTTP_PORT, DEFAULT_METRICS_PORT, DEFAULT_WALLET_TREE,
};

use crate::logging::LogFormat;

/// Wallet balance service.
///
/// Serves deposits, withdrawals and balance lookups over HTTP, backed by
/// an embedded transactional store.
#[derive(Parser, Debug)]
#[command(
    name = "wallet-node",
    about = "Wallet balance service",
    version,
    propagate_version = true
)]
pub struct WalletNodeCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the wallet node binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP service.
    Run(RunArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Directory holding the wallet database. Created if missing.
    #[arg(long, short = 'd', env = "WALLET_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Name of the keyspace holding wallet balances inside the database.
    #[arg(long, env = "WALLET_DB_NAME", default_value = DEFAULT_WALLET_TREE)]
    pub database: String,

    /// Port for the REST API.
    #[arg(long, short = 'p', env = "WALLET_HTTP_PORT", default_value_t = DEFAULT_HTTP_PORT)]
    pub port: u16,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "WALLET_METRICS_PORT", default_value_t = DEFAULT_METRICS_PORT)]
    pub metrics_port: u16,

    /// Log output format.
    #[arg(long, env = "WALLET_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        WalletNodeCli::command().debug_assert();
    }

    #[test]
    fn run_flags_override_defaults() {
        let cli = WalletNodeCli::try_parse_from([
            "wallet-node",
            "run",
            "--data-dir",
            "/var/lib/wallets",
            "--database",
            "staging",
            "--port",
            "9000",
            "--log-format",
            "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.data_dir, PathBuf::from("/var/lib/wallets"));
                assert_eq!(args.database, "staging");
                assert_eq!(args.port, 9000);
                assert_eq!(args.log_format, LogFormat::Json);
            }
            other => panic!("expected run, got {other:?}"),
        }
    }
}
