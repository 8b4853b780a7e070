// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Static API tokens.
//!
//! Tokens are configured by SHA-256 digest so the config file never holds
//! a usable credential.

use pulse_server_auth::{Permission, UserId};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenConfig {
	/// Hex-encoded SHA-256 of the raw token.
	pub token_sha256: String,
	pub user_id: UserId,
	#[serde(default)]
	pub permissions: Vec<Permission>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthConfig {
	pub tokens: Vec<TokenConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub tokens: Option<Vec<TokenConfig>>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.tokens.is_some() {
			self.tokens = other.tokens;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		AuthConfig {
			tokens: self.tokens.unwrap_or_default(),
		}
	}
}

impl TokenConfig {
	pub fn digest_is_well_formed(&self) -> bool {
		self.token_sha256.len() == 64 && self.token_sha256.chars().all(|c| c.is_ascii_hexdigit())
	}
}
