// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bulk delete HTTP handler.

use axum::{
	body::Bytes,
	extract::{
		rejection::{BytesRejection, QueryRejection},
		Query, State,
	},
	http::StatusCode,
	Extension,
};
use pulse_server_auth::AuthContext;
use pulse_server_delete::{ApiError, DeleteSelector, ErrorCode};
use tracing::instrument;

use crate::{api::AppState, api_response::HttpError};

/// POST /api/v2/delete - Delete points in a time range matching a predicate.
///
/// The target is selected with `orgID` or `org` and `bucketID` or `bucket`
/// query parameters. The body is `{"start", "stop", "predicate"}`. Returns
/// 204 on success.
#[instrument(skip_all)]
pub async fn delete(
	State(state): State<AppState>,
	auth: Option<Extension<AuthContext>>,
	selector: Result<Query<DeleteSelector>, QueryRejection>,
	body: Result<Bytes, BytesRejection>,
) -> Result<StatusCode, HttpError> {
	let auth = auth.map(|Extension(ctx)| ctx).unwrap_or_default();
	let Query(selector) = selector
		.map_err(|e| ApiError::invalid(e.body_text()).with_op("http/Delete"))?;
	let body = body.map_err(body_error)?;

	state.delete_handler.delete(&auth, &selector, &body).await?;
	Ok(StatusCode::NO_CONTENT)
}

fn body_error(rejection: BytesRejection) -> ApiError {
	let code = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
		ErrorCode::RequestTooLarge
	} else {
		ErrorCode::Invalid
	};
	ApiError::new(code, rejection.body_text()).with_op("http/Delete")
}
