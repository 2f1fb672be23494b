// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # PRISM Query Service Node
//!
//! Entry point for the `prism-node` binary. Parses CLI arguments,
//! initializes logging and metrics, builds the chain registry, and serves
//! the HTTP query API.
//!
//! The binary supports four subcommands:
//!
//! - `run`     — start the query service
//! - `chains`  — list registered chain integrations and their capabilities
//! - `status`  — query a running instance's status endpoint
//! - `version` — print build version information

mod api;
mod chains;
mod cli;
mod logging;
mod metrics;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::signal;

use cli::{Commands, PrismNodeCli};
use metrics::QueryMetrics;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = PrismNodeCli::parse();

    match cli.command {
        Commands::Run(args) => run_node(args).await,
        Commands::Chains => {
            list_chains();
            Ok(())
        }
        Commands::Status(args) => query_status(args).await,
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Starts the query service: API server plus metrics endpoint.
async fn run_node(args: cli::RunArgs) -> Result<()> {
    logging::init_logging(
        "prism_node=info,prism_core=info,tower_http=debug",
        args.log_format,
    );

    tracing::info!(
        rpc_port = args.rpc_port,
        metrics_port = args.metrics_port,
        "starting prism-node"
    );

    // --- Chain integrations ---
    let registry = Arc::new(chains::default_registry());
    for handle in registry.chains() {
        let integration = registry.get(handle).expect("listed chain is registered");
        tracing::info!(
            chain = handle,
            capabilities = ?integration.capabilities().names(),
            "chain integration ready"
        );
    }

    // --- Metrics ---
    let query_metrics = Arc::new(QueryMetrics::new());
    query_metrics.chains_registered.set(registry.len() as i64);

    // --- Application state ---
    let app_state = api::AppState {
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at: chrono::Utc::now(),
        registry: Arc::clone(&registry),
        metrics: Arc::clone(&query_metrics),
    };

    // --- API server ---
    let api_router = api::create_router(app_state);
    let api_addr = format!("0.0.0.0:{}", args.rpc_port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind API listener on {}", api_addr))?;
    tracing::info!("query API listening on {}", api_addr);

    // --- Metrics server ---
    let metrics_router = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics::metrics_handler))
        .with_state(Arc::clone(&query_metrics));
    let metrics_addr = format!("0.0.0.0:{}", args.metrics_port);
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {}", metrics_addr))?;
    tracing::info!("metrics server listening on {}", metrics_addr);

    // --- Serve ---
    tokio::select! {
        res = axum::serve(api_listener, api_router) => {
            if let Err(e) = res {
                tracing::error!("API server error: {}", e);
            }
        }
        res = axum::serve(metrics_listener, metrics_router) => {
            if let Err(e) = res {
                tracing::error!("metrics server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received, draining connections");
        }
    }

    tracing::info!("prism-node stopped");
    Ok(())
}

/// Prints the registered chain integrations and their capabilities.
fn list_chains() {
    let registry = chains::default_registry();
    println!("{} chain integration(s) registered:", registry.len());
    for handle in registry.chains() {
        if let Some(integration) = registry.get(handle) {
            println!(
                "  {:<12} {}",
                integration.chain(),
                integration.capabilities().names().join(", ")
            );
        }
    }
}

/// Queries a running instance's status endpoint and prints the body.
async fn query_status(args: cli::StatusArgs) -> Result<()> {
    let body = http_get_text(&args.rpc_url, "/status").await?;
    println!("{}", body);
    Ok(())
}

/// Minimal HTTP/1.1 GET over a plain TCP stream.
///
/// The status subcommand makes exactly one local request; a full HTTP
/// client dependency is not worth it for that.
async fn http_get_text(base: &str, path: &str) -> Result<String> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let authority = base
        .trim_end_matches('/')
        .strip_prefix("http://")
        .ok_or_else(|| anyhow::anyhow!("only http:// endpoints are supported: {}", base))?;

    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) => (
            host,
            port.parse::<u16>()
                .with_context(|| format!("bad port in {}", base))?,
        ),
        None => (authority, 80),
    };

    let mut stream = tokio::net::TcpStream::connect((host, port))
        .await
        .with_context(|| format!("failed to connect to {}:{}", host, port))?;

    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        path, host,
    );
    stream.write_all(request.as_bytes()).await?;
    stream.shutdown().await?;

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await?;
    let response = String::from_utf8_lossy(&buf);

    // Everything after the first blank line is the body.
    Ok(response
        .split_once("\r\n\r\n")
        .map(|(_, body)| body.to_string())
        .unwrap_or_else(|| response.into_owned()))
}

/// Prints version information to stdout.
fn print_version() {
    println!("prism-node {}", env!("CARGO_PKG_VERSION"));
    println!("rustc      {}", option_env!("RUSTC_VERSION").unwrap_or("unknown"));
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
