// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Uniform error type for the delete pipeline.
//!
//! Every stage reports failures as an [`ApiError`]: a stable [`ErrorCode`], a
//! human-readable message, the operation that produced it and, where there is
//! one, the underlying cause.

use std::error::Error as StdError;
use std::fmt;

use http::StatusCode;
use pulse_predicate_core::{CompileError, ParseError, PredicateError};
use pulse_server_auth::AuthError;
use serde::Serialize;

/// Stable classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
	#[serde(rename = "internal error")]
	Internal,
	#[serde(rename = "not found")]
	NotFound,
	#[serde(rename = "conflict")]
	Conflict,
	#[serde(rename = "invalid")]
	Invalid,
	#[serde(rename = "unprocessable entity")]
	UnprocessableEntity,
	#[serde(rename = "empty value")]
	EmptyValue,
	#[serde(rename = "unavailable")]
	Unavailable,
	#[serde(rename = "forbidden")]
	Forbidden,
	#[serde(rename = "too many requests")]
	TooManyRequests,
	#[serde(rename = "unauthorized")]
	Unauthorized,
	#[serde(rename = "method not allowed")]
	MethodNotAllowed,
	#[serde(rename = "request too large")]
	RequestTooLarge,
}

impl ErrorCode {
	pub fn as_str(&self) -> &'static str {
		match self {
			ErrorCode::Internal => "internal error",
			ErrorCode::NotFound => "not found",
			ErrorCode::Conflict => "conflict",
			ErrorCode::Invalid => "invalid",
			ErrorCode::UnprocessableEntity => "unprocessable entity",
			ErrorCode::EmptyValue => "empty value",
			ErrorCode::Unavailable => "unavailable",
			ErrorCode::Forbidden => "forbidden",
			ErrorCode::TooManyRequests => "too many requests",
			ErrorCode::Unauthorized => "unauthorized",
			ErrorCode::MethodNotAllowed => "method not allowed",
			ErrorCode::RequestTooLarge => "request too large",
		}
	}

	/// The HTTP status a response carrying this code should use.
	pub fn status(&self) -> StatusCode {
		match self {
			ErrorCode::Invalid | ErrorCode::EmptyValue => StatusCode::BAD_REQUEST,
			ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
			ErrorCode::Forbidden => StatusCode::FORBIDDEN,
			ErrorCode::NotFound => StatusCode::NOT_FOUND,
			ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
			ErrorCode::Conflict => StatusCode::CONFLICT,
			ErrorCode::RequestTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
			ErrorCode::UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
			ErrorCode::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
			ErrorCode::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
			ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// An error surfaced to API callers.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
	pub code: ErrorCode,
	pub message: String,
	/// The operation that produced the error, e.g. `http/Delete`.
	pub op: Option<&'static str>,
	#[source]
	pub source: Option<BoxError>,
}

impl ApiError {
	pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
		Self {
			code,
			message: message.into(),
			op: None,
			source: None,
		}
	}

	pub fn invalid(message: impl Into<String>) -> Self {
		Self::new(ErrorCode::Invalid, message)
	}

	pub fn not_found(message: impl Into<String>) -> Self {
		Self::new(ErrorCode::NotFound, message)
	}

	pub fn unauthorized(message: impl Into<String>) -> Self {
		Self::new(ErrorCode::Unauthorized, message)
	}

	pub fn forbidden(message: impl Into<String>) -> Self {
		Self::new(ErrorCode::Forbidden, message)
	}

	pub fn internal(message: impl Into<String>) -> Self {
		Self::new(ErrorCode::Internal, message)
	}

	pub fn unavailable(message: impl Into<String>) -> Self {
		Self::new(ErrorCode::Unavailable, message)
	}

	pub fn with_op(mut self, op: &'static str) -> Self {
		self.op = Some(op);
		self
	}

	/// Tags the error with `op` unless an inner layer already did.
	pub fn or_op(mut self, op: &'static str) -> Self {
		self.op.get_or_insert(op);
		self
	}

	pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
		self.source = Some(source.into());
		self
	}

	pub fn status(&self) -> StatusCode {
		self.code.status()
	}

	/// The JSON body rendered for this error.
	pub fn body(&self) -> ErrorBody {
		ErrorBody {
			code: self.code,
			message: self.message.clone(),
			op: self.op,
		}
	}
}

/// Wire shape of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
	pub code: ErrorCode,
	pub message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub op: Option<&'static str>,
}

impl From<AuthError> for ApiError {
	fn from(e: AuthError) -> Self {
		ApiError::unauthorized(e.to_string()).with_source(e)
	}
}

impl From<ParseError> for ApiError {
	fn from(e: ParseError) -> Self {
		ApiError::invalid(e.to_string()).with_source(e)
	}
}

impl From<CompileError> for ApiError {
	fn from(e: CompileError) -> Self {
		ApiError::invalid(e.to_string()).with_source(e)
	}
}

impl From<PredicateError> for ApiError {
	fn from(e: PredicateError) -> Self {
		match e {
			PredicateError::Parse(e) => e.into(),
			PredicateError::Compile(e) => e.into(),
		}
	}
}
