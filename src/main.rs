//! Failover gateway - use-case aware AI provider routing
//!
//! Serves the routing and admin HTTP surface described by the configuration file.

#![allow(missing_docs)]

use clap::Parser;
use failover_gateway::config::DEFAULT_CONFIG_PATH;
use failover_gateway::utils::logging::init_tracing;
use failover_gateway::{Config, Gateway, build_info};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "gateway", version, about = "AI provider routing and failover gateway")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "GATEWAY_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: failed to load .env file: {}", e);
        }
    }

    let args = Args::parse();

    let config = match Config::load_or_default(&args.config).await {
        Ok(config) => config,
        Err(e) => {
            // Print error using Display (not Debug) to preserve newlines
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let config = match config.with_env_overrides() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(&config.gateway.logging) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let build = build_info();
    info!(
        "Starting {} {} ({}, built {})",
        failover_gateway::NAME,
        build.version,
        build.git_hash,
        build.build_time
    );
    if !args.config.exists() {
        warn!(
            "Configuration file {:?} not found, running with defaults",
            args.config
        );
    }

    let result = match Gateway::new(config).await {
        Ok(gateway) => gateway.run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Gateway stopped: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
