//! # Logging Setup
//!
//! One `tracing` subscriber for the whole process. Wallet operations are
//! logged by `wallet_ledger` with `wallet_id`, `operation`, `amount` and
//! `balance` fields; HTTP requests are logged by `tower_http`'s trace layer.
//! Everything goes to stderr.

use clap::ValueEnum;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter applied when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "wallet_node=info,wallet_ledger=info,tower_http=debug";

/// Shape of each log line, selected with `--log-format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Colored text with source locations.
    Pretty,
    /// One JSON object per line, for log shippers.
    Json,
}

/// Install the global subscriber. Panics if called twice.
///
/// `RUST_LOG` wins over `default_filter`, so a single wallet's traffic can
/// be followed with e.g. `RUST_LOG=wallet_ledger=debug`.
pub fn init_logging(default_filter: &str, format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(false),
            )
            .init(),
    }

    tracing::debug!(?format, "subscriber installed");
}
