// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Delete endpoint limits.

use std::time::Duration;

use serde::Deserialize;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfig {
	/// Upper bound on each external call made while serving a delete.
	pub request_timeout: Duration,
	pub max_body_bytes: usize,
}

impl Default for DeleteConfig {
	fn default() -> Self {
		Self {
			request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
			max_body_bytes: DEFAULT_MAX_BODY_BYTES,
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteConfigLayer {
	#[serde(default)]
	pub request_timeout_secs: Option<u64>,
	#[serde(default)]
	pub max_body_bytes: Option<usize>,
}

impl DeleteConfigLayer {
	pub fn merge(&mut self, other: DeleteConfigLayer) {
		if other.request_timeout_secs.is_some() {
			self.request_timeout_secs = other.request_timeout_secs;
		}
		if other.max_body_bytes.is_some() {
			self.max_body_bytes = other.max_body_bytes;
		}
	}

	pub fn finalize(self) -> DeleteConfig {
		DeleteConfig {
			request_timeout: Duration::from_secs(
				self
					.request_timeout_secs
					.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
			),
			max_body_bytes: self.max_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = DeleteConfigLayer::default().finalize();
		assert_eq!(config, DeleteConfig::default());
		assert_eq!(config.request_timeout, Duration::from_secs(30));
		assert_eq!(config.max_body_bytes, 1024 * 1024);
	}

	#[test]
	fn test_overrides() {
		let layer: DeleteConfigLayer =
			toml::from_str("request_timeout_secs = 5\nmax_body_bytes = 512").unwrap();
		let config = layer.finalize();
		assert_eq!(config.request_timeout, Duration::from_secs(5));
		assert_eq!(config.max_body_bytes, 512);
	}
}
