// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pulse delete server binary.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use pulse_server::{create_app_state, create_router};
use pulse_server_delete::DryRunDeleteService;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pulse server - HTTP front end for bulk deletes.
#[derive(Parser, Debug)]
#[command(name = "pulse-server", about = "Pulse bulk delete server", version)]
struct Args {
	/// Path to the TOML config file (defaults to /etc/pulse/server.toml)
	#[arg(long, env = "PULSE_SERVER_CONFIG")]
	config: Option<PathBuf>,

	/// Subcommands for pulse-server (e.g., `version`)
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("pulse-server {}", env!("CARGO_PKG_VERSION"));
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = match args.config {
		Some(path) => pulse_server_config::load_config_with_file(path)?,
		None => pulse_server_config::load_config()?,
	};

	let (plain, json) = if config.logging.json {
		(None, Some(tracing_subscriber::fmt::layer().json()))
	} else {
		(Some(tracing_subscriber::fmt::layer()), None)
	};
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(plain)
		.with(json)
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		"starting pulse-server"
	);

	// No storage engine is attached; deletes are logged only.
	let storage = Arc::new(DryRunDeleteService);
	let state = create_app_state(&config, storage);

	let app = create_router(state).layer(TraceLayer::new_for_http());

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);
	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
