// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for Pulse server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`PULSE_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use pulse_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub logging: LoggingConfig,
	pub delete: DeleteConfig,
	pub auth: AuthConfig,
	pub tenants: TenantsConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`PULSE_SERVER_*`)
/// 2. Config file (`/etc/pulse/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();
	let delete = layer.delete.unwrap_or_default().finalize();
	let auth = layer.auth.unwrap_or_default().finalize();
	let tenants = layer.tenants.unwrap_or_default().finalize();

	let config = ServerConfig {
		http,
		logging,
		delete,
		auth,
		tenants,
	};
	validate_config(&config)?;

	info!(
		host = %config.http.host,
		port = config.http.port,
		request_timeout_secs = config.delete.request_timeout.as_secs(),
		max_body_bytes = config.delete.max_body_bytes,
		tokens = config.auth.tokens.len(),
		orgs = config.tenants.orgs.len(),
		"Server configuration loaded"
	);

	Ok(config)
}

/// Validate cross-field configuration rules.
fn validate_config(config: &ServerConfig) -> Result<(), ConfigError> {
	if config.http.port == 0 {
		return Err(ConfigError::Validation("http.port must be non-zero".to_string()));
	}
	if config.delete.request_timeout.is_zero() {
		return Err(ConfigError::Validation(
			"delete.request_timeout_secs must be non-zero".to_string(),
		));
	}
	if config.delete.max_body_bytes == 0 {
		return Err(ConfigError::Validation(
			"delete.max_body_bytes must be non-zero".to_string(),
		));
	}
	if let Some(token) = config
		.auth
		.tokens
		.iter()
		.find(|t| !t.digest_is_well_formed())
	{
		return Err(ConfigError::Validation(format!(
			"auth token for user {} must be a 64 character hex SHA-256 digest",
			token.user_id
		)));
	}

	Ok(())
}
