//! # CLI Interface
//!
//! Defines the command-line argument structure for `prism-node` using
//! `clap` derive. Supports four subcommands: `run`, `chains`, `status`,
//! and `version`.

use clap::{Parser, Subcommand};

use crate::logging::LogFormat;

/// PRISM multi-chain transaction query service.
///
/// Serves normalized, deduplicated, direction-annotated transaction pages
/// for addresses, accounts, and extended public keys, aggregated from
/// per-chain upstream providers.
#[derive(Parser, Debug)]
#[command(
    name = "prism-node",
    about = "PRISM multi-chain transaction query service",
    version,
    propagate_version = true
)]
pub struct PrismNodeCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the PRISM node binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the query service.
    Run(RunArgs),
    /// List the registered chain integrations and their capabilities.
    Chains,
    /// Query the status of a running service via its HTTP endpoint.
    Status(StatusArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Port for the HTTP query API.
    #[arg(long, env = "PRISM_RPC_PORT", default_value_t = prism_core::config::DEFAULT_RPC_PORT)]
    pub rpc_port: u16,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "PRISM_METRICS_PORT", default_value_t = prism_core::config::DEFAULT_METRICS_PORT)]
    pub metrics_port: u16,

    /// Log output format.
    #[arg(long, env = "PRISM_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

/// Arguments for the `status` subcommand.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// HTTP endpoint of the running service.
    #[arg(long, default_value = "http://127.0.0.1:9750")]
    pub rpc_url: String,
}
