//! # Structured Logging
//!
//! Sets up the `tracing` subscriber once at startup. Filtering follows the
//! usual `RUST_LOG` directives, with a CLI-provided default for when the
//! variable is unset; output goes to stderr so stdout stays clean for the
//! `chains` listing and friends.
//!
//! ```text
//! RUST_LOG=prism_node=debug,prism_core=info,tower_http=debug
//! ```

use clap::ValueEnum;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format, selected with `--log-format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable output for local development.
    Pretty,
    /// JSON lines for production log aggregation.
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Initialize the global tracing subscriber. Call exactly once, early in
/// `main()`; a second call panics by design.
pub fn init_logging(default_level: &str, format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
        LogFormat::Json => registry.with(fmt::layer().json().with_target(true)).init(),
    }

    tracing::debug!(?format, "logging initialized");
}
