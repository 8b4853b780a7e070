// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Rendering of pipeline errors as HTTP responses.

use axum::{
	response::{IntoResponse, Response},
	Json,
};
use pulse_server_delete::{ApiError, ErrorCode};

/// Response wrapper for [`ApiError`].
///
/// Renders `{"code", "message", "op"}` with the status mapped from the code.
/// Internal errors are logged with their cause since the body carries only
/// the message.
#[derive(Debug)]
pub struct HttpError(pub ApiError);

impl From<ApiError> for HttpError {
	fn from(e: ApiError) -> Self {
		Self(e)
	}
}

impl IntoResponse for HttpError {
	fn into_response(self) -> Response {
		let err = self.0;
		if err.code == ErrorCode::Internal {
			tracing::error!(
				op = err.op,
				error = %err,
				cause = ?err.source,
				"internal error"
			);
		}
		(err.status(), Json(err.body())).into_response()
	}
}
