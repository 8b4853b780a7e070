// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication middleware for Axum.
//!
//! Resolves the `Authorization: Token <t>` (or `Bearer <t>`) header against
//! the configured token registry and stores the resulting
//! [`AuthContext`](pulse_server_auth::AuthContext) as a request extension.
//! Requests without a known token continue unauthenticated; handlers decide
//! whether that is acceptable.
//!
//! Tokens are hashed with SHA-256 before lookup and are never logged.

use axum::{
	body::Body,
	extract::State,
	http::Request,
	middleware::Next,
	response::Response,
};
use tracing::instrument;

use crate::api::AppState;

#[instrument(name = "auth_layer", skip_all)]
pub async fn auth_layer(
	State(state): State<AppState>,
	mut request: Request<Body>,
	next: Next,
) -> Response {
	let auth_ctx = state.tokens.authenticate(request.headers());
	request.extensions_mut().insert(auth_ctx);
	next.run(request).await
}
