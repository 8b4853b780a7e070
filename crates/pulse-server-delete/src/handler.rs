// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization and dispatch of delete requests.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use pulse_predicate_core::Predicate;
use pulse_server_auth::{Action, AuthContext, Authorizer, Permission, ResourceType};
use tracing::{debug, instrument, warn};

use crate::error::ApiError;
use crate::request::{decode, DeleteRequest, DeleteSelector};
use crate::service::{BucketService, DeleteService, OrganizationService};

const OP_HANDLE_DELETE: &str = "http/handleDelete";

/// Default bound on each collaborator call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs `fut`, failing with `unavailable` if it does not finish within
/// `timeout`. The future is dropped on expiry.
pub(crate) async fn bounded<T, F>(timeout: Duration, fut: F) -> Result<T, ApiError>
where
	F: Future<Output = Result<T, ApiError>>,
{
	match tokio::time::timeout(timeout, fut).await {
		Ok(result) => result,
		Err(_) => {
			warn!(timeout_ms = timeout.as_millis() as u64, "collaborator call timed out");
			Err(ApiError::unavailable("request timed out"))
		}
	}
}

/// Decodes, authorizes and forwards delete requests to storage.
#[derive(Clone)]
pub struct DeleteHandler {
	orgs: Arc<dyn OrganizationService>,
	buckets: Arc<dyn BucketService>,
	storage: Arc<dyn DeleteService>,
	timeout: Duration,
}

impl DeleteHandler {
	pub fn new(
		orgs: Arc<dyn OrganizationService>,
		buckets: Arc<dyn BucketService>,
		storage: Arc<dyn DeleteService>,
	) -> Self {
		Self {
			orgs,
			buckets,
			storage,
			timeout: DEFAULT_REQUEST_TIMEOUT,
		}
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	/// Full request lifecycle: authenticate, decode, then dispatch.
	///
	/// The caller's authorizer is required before anything is looked up, so
	/// unauthenticated requests never reach the lookup services.
	#[instrument(skip_all)]
	pub async fn delete(
		&self,
		auth: &AuthContext,
		selector: &DeleteSelector,
		body: &[u8],
	) -> Result<(), ApiError> {
		let authorizer = auth
			.authorizer()
			.map_err(|e| ApiError::from(e).with_op(OP_HANDLE_DELETE))?;
		let request = decode(
			body,
			selector,
			self.orgs.as_ref(),
			self.buckets.as_ref(),
			self.timeout,
		)
		.await?;
		self.dispatch(authorizer, request).await
	}

	/// Checks write access to the target bucket and forwards the request to
	/// storage. Storage errors are returned unchanged.
	#[instrument(skip_all, fields(org_id = %request.org.id, bucket_id = %request.bucket.id))]
	pub async fn dispatch(
		&self,
		authorizer: &dyn Authorizer,
		request: DeleteRequest,
	) -> Result<(), ApiError> {
		let permission = Permission::at_id(
			request.bucket.id,
			Action::Write,
			ResourceType::Buckets,
			request.org.id,
		)
		.map_err(|e| {
			ApiError::internal(format!("unable to create permission for bucket: {e}"))
				.with_op(OP_HANDLE_DELETE)
				.with_source(e)
		})?;

		if !authorizer.allowed(&permission) {
			debug!(user_id = ?authorizer.user_id(), %permission, "delete denied");
			return Err(ApiError::forbidden("insufficient permissions to delete").with_op(OP_HANDLE_DELETE));
		}

		bounded(
			self.timeout,
			self.storage.delete_bucket_range_predicate(
				request.org.id,
				request.bucket.id,
				request.start,
				request.stop,
				request.predicate.as_ref().map(Predicate::node),
			),
		)
		.await?;

		debug!(org_id = %request.org.id, bucket_id = %request.bucket.id, "deleted");
		Ok(())
	}
}

impl std::fmt::Debug for DeleteHandler {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DeleteHandler")
			.field("timeout", &self.timeout)
			.finish_non_exhaustive()
	}
}
