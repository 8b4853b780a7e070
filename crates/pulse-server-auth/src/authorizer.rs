// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorizers and the per-request authentication context.
//!
//! An [`Authorizer`] answers one question: is the caller allowed a given
//! [`Permission`]? Handlers obtain it from the request's [`AuthContext`],
//! which the authentication middleware inserts as a request extension.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Permission, UserId};

/// Decides whether a caller holds a permission.
///
/// Implementations are shared across concurrent requests.
pub trait Authorizer: Send + Sync + fmt::Debug {
	fn allowed(&self, permission: &Permission) -> bool;

	/// The user this authorizer acts for, if any. Used for logging only.
	fn user_id(&self) -> Option<UserId> {
		None
	}
}

/// A concrete set of granted permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
	pub user_id: UserId,
	pub permissions: Vec<Permission>,
}

impl Authorization {
	pub fn new(user_id: UserId, permissions: Vec<Permission>) -> Self {
		Self {
			user_id,
			permissions,
		}
	}
}

impl Authorizer for Authorization {
	fn allowed(&self, permission: &Permission) -> bool {
		self.permissions.iter().any(|p| p.matches(permission))
	}

	fn user_id(&self) -> Option<UserId> {
		Some(self.user_id)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
	#[error("authorizer not found on context")]
	NotAuthenticated,
}

/// Authentication state for a single request.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
	authorizer: Option<Arc<dyn Authorizer>>,
}

impl AuthContext {
	/// Create a new unauthenticated context.
	pub fn unauthenticated() -> Self {
		Self::default()
	}

	/// Create a context for a caller that presented valid credentials.
	pub fn authenticated(authorizer: Arc<dyn Authorizer>) -> Self {
		Self {
			authorizer: Some(authorizer),
		}
	}

	pub fn is_authenticated(&self) -> bool {
		self.authorizer.is_some()
	}

	/// Returns the caller's authorizer, or an error if none was established.
	pub fn authorizer(&self) -> Result<&dyn Authorizer, AuthError> {
		self.authorizer.as_deref().ok_or(AuthError::NotAuthenticated)
	}
}
