//! Vanity Server - serves vanity import paths.
//!
//! This binary loads the mount configuration and starts the HTTP server.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vanity_server::{
    config::{CheckConfig, CheckOutputFormat, Cli, Command, ServeConfig},
    mount::{load_file, MountTable, MountTarget},
    server::{create_router, RouterConfig},
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Serve(config) => run_serve(config).await,
        Command::Check(config) => run_check(config),
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let table = match load_file(&config.config) {
        Ok(table) => table,
        Err(e) => {
            error!(config = %config.config.display(), "Invalid mount configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config.config.display(),
        mounts = table.paths().len(),
        rules = table.rules().len(),
        "Mount table loaded"
    );
    match table.host() {
        Some(host) => info!(host, "Using configured host"),
        None => warn!("No host configured; import paths use the request Host header"),
    }

    let router = create_router(table, RouterConfig::new().with_tracing(!config.no_tracing));

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };
    info!(address = %addr, "Server listening");

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Shutdown complete");
    ExitCode::SUCCESS
}

/// Resolve when the process receives Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "vanity_server=debug,tower_http=debug"
    } else {
        "vanity_server=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

// =============================================================================
// Check Command
// =============================================================================

fn run_check(config: CheckConfig) -> ExitCode {
    if config.verbose {
        init_logging(true);
    }

    let table = match load_file(&config.config) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("✗ {}: {}", config.config.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match config.format {
        CheckOutputFormat::Text => print_text_report(&config, &table),
        CheckOutputFormat::Json => {
            let report = serde_json::json!({
                "config": config.config.display().to_string(),
                "host": table.host(),
                "docs_url": table.docs_url(),
                "mounts": table.paths().iter().collect::<Vec<_>>(),
                "rules": table.rules().iter().collect::<Vec<_>>(),
            });
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    ExitCode::SUCCESS
}

fn print_text_report(config: &CheckConfig, table: &MountTable) {
    println!("Vanity Server Configuration Check");
    println!("═════════════════════════════════");
    println!();
    println!("✓ Config: {}", config.config.display());
    match table.host() {
        Some(host) => println!("✓ Host: {}", host),
        None => println!("✓ Host: (from request Host header)"),
    }
    println!("✓ Docs: {}", table.docs_url());
    println!();

    println!("Mounts:");
    println!("───────");
    if table.paths().is_empty() {
        println!("  (none)");
    }
    for mount in table.paths().iter() {
        let path = if mount.path.is_empty() { "/" } else { mount.path.as_str() };
        match &mount.target {
            MountTarget::Content(c) => {
                println!("  {}  {} {}  max-age={}", path, c.vcs, c.repo, mount.cache_max_age)
            }
            MountTarget::RedirectOnly(r) => println!("  {}  → {}", path, r.target),
            MountTarget::Both { content, redirect } => {
                println!(
                    "  {}  {} {}  max-age={}",
                    path, content.vcs, content.repo, mount.cache_max_age
                );
                println!("      → {} on {:?}", redirect.target, redirect.markers);
            }
        }
    }

    if !table.rules().is_empty() {
        println!();
        println!("Wildcard rules:");
        println!("───────────────");
        for rule in table.rules().iter() {
            println!("  {}  {} {}", rule.pattern(), rule.vcs, rule.repo_template);
        }
    }

    println!();
    println!("═════════════════════════════════");
    println!(
        "✓ {} mount(s), {} wildcard rule(s)",
        table.paths().len(),
        table.rules().len()
    );
}
