// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

pub mod delete;
pub mod health;

use pulse_server_delete::{ApiError, ErrorCode};

use crate::api_response::HttpError;

pub async fn not_found() -> HttpError {
	HttpError(ApiError::not_found("path not found"))
}

pub async fn method_not_allowed() -> HttpError {
	HttpError(ApiError::new(ErrorCode::MethodNotAllowed, "method not allowed"))
}
