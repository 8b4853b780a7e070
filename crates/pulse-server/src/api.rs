// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router construction.

use std::sync::Arc;

use axum::{
	extract::DefaultBodyLimit,
	middleware::from_fn_with_state,
	routing::{get, post},
	Router,
};
use pulse_server_auth::{Authorization, TokenStore};
use pulse_server_config::ServerConfig;
use pulse_server_delete::{
	Bucket, DeleteHandler, DeleteService, InMemoryBucketService, InMemoryOrganizationService,
	Organization,
};
use tracing::info;

use crate::{auth_middleware::auth_layer, routes};

/// Shared state for all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
	pub delete_handler: DeleteHandler,
	pub tokens: Arc<TokenStore>,
	pub max_body_bytes: usize,
}

impl AppState {
	pub fn new(delete_handler: DeleteHandler, tokens: TokenStore, max_body_bytes: usize) -> Self {
		Self {
			delete_handler,
			tokens: Arc::new(tokens),
			max_body_bytes,
		}
	}
}

/// Builds state from configuration: configured tenants back the lookup
/// services and configured tokens become the caller registry.
pub fn create_app_state(config: &ServerConfig, storage: Arc<dyn DeleteService>) -> AppState {
	let mut orgs = Vec::with_capacity(config.tenants.orgs.len());
	let mut buckets = Vec::new();
	for org in &config.tenants.orgs {
		orgs.push(Organization {
			id: org.id,
			name: org.name.clone(),
		});
		buckets.extend(org.buckets.iter().map(|bucket| Bucket {
			id: bucket.id,
			org_id: org.id,
			name: bucket.name.clone(),
		}));
	}

	let mut tokens = TokenStore::new();
	for token in &config.auth.tokens {
		tokens.insert_digest(
			token.token_sha256.clone(),
			Authorization::new(token.user_id, token.permissions.clone()),
		);
	}

	info!(
		orgs = orgs.len(),
		buckets = buckets.len(),
		tokens = tokens.len(),
		"tenant registry loaded"
	);

	let delete_handler = DeleteHandler::new(
		Arc::new(InMemoryOrganizationService::new(orgs)),
		Arc::new(InMemoryBucketService::new(buckets)),
		storage,
	)
	.with_timeout(config.delete.request_timeout);

	AppState::new(delete_handler, tokens, config.delete.max_body_bytes)
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health_check))
		.route(
			"/api/v2/delete",
			post(routes::delete::delete).fallback(routes::method_not_allowed),
		)
		.fallback(routes::not_found)
		.layer(DefaultBodyLimit::max(state.max_body_bytes))
		.layer(from_fn_with_state(state.clone(), auth_layer))
		.with_state(state)
}
