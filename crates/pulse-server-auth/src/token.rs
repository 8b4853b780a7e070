// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Static API token authentication.
//!
//! Tokens are looked up by their SHA-256 digest; raw token values are never
//! stored or logged.

use std::collections::HashMap;
use std::sync::Arc;

use http::header::AUTHORIZATION;
use http::HeaderMap;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use crate::{AuthContext, Authorization, Authorizer};

/// Hash a token for storage or lookup (hex-encoded SHA-256).
pub fn hash_token(token: &str) -> String {
	let mut hasher = Sha256::new();
	hasher.update(token.as_bytes());
	hex::encode(hasher.finalize())
}

/// Extract a token from `Authorization: Token <t>` or `Authorization: Bearer <t>`.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
	let auth_header = headers.get(AUTHORIZATION)?;
	let auth_str = auth_header.to_str().ok()?;
	auth_str
		.strip_prefix("Token ")
		.or_else(|| auth_str.strip_prefix("Bearer "))
		.map(str::trim)
		.filter(|t| !t.is_empty())
		.map(|token| token.to_string())
}

/// In-memory token registry keyed by token digest.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
	by_digest: HashMap<String, Arc<Authorization>>,
}

impl TokenStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register an authorization under a precomputed token digest.
	pub fn insert_digest(&mut self, digest: impl Into<String>, authorization: Authorization) {
		self
			.by_digest
			.insert(digest.into().to_ascii_lowercase(), Arc::new(authorization));
	}

	/// Register an authorization under a raw token.
	pub fn insert_token(&mut self, token: &str, authorization: Authorization) {
		self.insert_digest(hash_token(token), authorization);
	}

	pub fn len(&self) -> usize {
		self.by_digest.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_digest.is_empty()
	}

	pub fn lookup(&self, token: &str) -> Option<Arc<Authorization>> {
		self.by_digest.get(&hash_token(token)).cloned()
	}

	/// Build the auth context for a request from its headers.
	///
	/// Missing or unknown tokens yield an unauthenticated context; rejecting
	/// the request is left to the handler.
	#[instrument(skip_all, fields(user_id = tracing::field::Empty))]
	pub fn authenticate(&self, headers: &HeaderMap) -> AuthContext {
		let Some(token) = extract_token(headers) else {
			debug!("no token presented");
			return AuthContext::unauthenticated();
		};
		match self.lookup(&token) {
			Some(authorization) => {
				tracing::Span::current()
					.record("user_id", tracing::field::display(&authorization.user_id));
				AuthContext::authenticated(authorization as Arc<dyn Authorizer>)
			}
			None => {
				debug!("unknown token presented");
				AuthContext::unauthenticated()
			}
		}
	}
}
