// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration layer for merging from multiple sources.

use serde::Deserialize;

use crate::sections::{
	AuthConfigLayer, DeleteConfigLayer, HttpConfigLayer, LoggingConfigLayer, TenantsConfigLayer,
};

/// Server configuration layer - all fields are Option for merging.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
	#[serde(default)]
	pub delete: Option<DeleteConfigLayer>,
	#[serde(default)]
	pub auth: Option<AuthConfigLayer>,
	#[serde(default)]
	pub tenants: Option<TenantsConfigLayer>,
}

impl ServerConfigLayer {
	/// Merge another layer into this one. Other layer takes precedence.
	pub fn merge(&mut self, other: ServerConfigLayer) {
		merge_option(&mut self.http, other.http, HttpConfigLayer::merge);
		merge_option(&mut self.logging, other.logging, LoggingConfigLayer::merge);
		merge_option(&mut self.delete, other.delete, DeleteConfigLayer::merge);
		merge_option(&mut self.auth, other.auth, AuthConfigLayer::merge);
		merge_option(&mut self.tenants, other.tenants, TenantsConfigLayer::merge);
	}
}

fn merge_option<T>(target: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	match (target.as_mut(), other) {
		(Some(existing), Some(incoming)) => merge(existing, incoming),
		(None, Some(incoming)) => *target = Some(incoming),
		(_, None) => {}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_merge_keeps_fields_missing_from_overlay() {
		let mut base: ServerConfigLayer = toml::from_str(
			r#"
[http]
host = "127.0.0.1"
port = 9000

[delete]
request_timeout_secs = 10
"#,
		)
		.unwrap();
		let overlay: ServerConfigLayer = toml::from_str("[http]\nport = 9999").unwrap();
		base.merge(overlay);

		let http = base.http.unwrap();
		assert_eq!(http.host.as_deref(), Some("127.0.0.1"));
		assert_eq!(http.port, Some(9999));
		assert_eq!(base.delete.unwrap().request_timeout_secs, Some(10));
	}

	#[test]
	fn test_merge_into_empty() {
		let mut base = ServerConfigLayer::default();
		base.merge(toml::from_str("[logging]\njson = true").unwrap());
		assert_eq!(base.logging.unwrap().json, Some(true));
	}
}
