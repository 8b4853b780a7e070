// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory collaborators.
//!
//! The lookup services serve a fixed tenant list. [`DryRunDeleteService`]
//! logs each delete and keeps nothing; [`RecordingDeleteService`] keeps every
//! call for inspection in tests.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use pulse_predicate_core::Node;
use pulse_server_auth::{BucketId, OrgId};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::service::{
	Bucket, BucketFilter, BucketService, DeleteService, Organization, OrganizationFilter,
	OrganizationService,
};

const OP_FIND_ORGANIZATION: &str = "organization/FindOrganization";
const OP_FIND_BUCKET: &str = "bucket/FindBucket";

#[derive(Debug, Clone, Default)]
pub struct InMemoryOrganizationService {
	orgs: Vec<Organization>,
}

impl InMemoryOrganizationService {
	pub fn new(orgs: Vec<Organization>) -> Self {
		Self { orgs }
	}
}

#[async_trait]
impl OrganizationService for InMemoryOrganizationService {
	#[instrument(skip(self))]
	async fn find_organization(&self, filter: &OrganizationFilter) -> Result<Organization, ApiError> {
		self
			.orgs
			.iter()
			.find(|org| match (&filter.id, &filter.name) {
				(Some(id), _) => org.id == *id,
				(None, Some(name)) => org.name == *name,
				(None, None) => false,
			})
			.cloned()
			.ok_or_else(|| ApiError::not_found("organization not found").with_op(OP_FIND_ORGANIZATION))
	}
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryBucketService {
	buckets: Vec<Bucket>,
}

impl InMemoryBucketService {
	pub fn new(buckets: Vec<Bucket>) -> Self {
		Self { buckets }
	}
}

#[async_trait]
impl BucketService for InMemoryBucketService {
	#[instrument(skip(self))]
	async fn find_bucket(&self, filter: &BucketFilter) -> Result<Bucket, ApiError> {
		self
			.buckets
			.iter()
			.filter(|bucket| filter.org_id.map_or(true, |org_id| bucket.org_id == org_id))
			.find(|bucket| match (&filter.id, &filter.name) {
				(Some(id), _) => bucket.id == *id,
				(None, Some(name)) => bucket.name == *name,
				(None, None) => false,
			})
			.cloned()
			.ok_or_else(|| ApiError::not_found("bucket not found").with_op(OP_FIND_BUCKET))
	}
}

fn log_delete(start: i64, stop: i64, predicate: Option<&Node>) {
	match predicate {
		Some(node) => info!(start, stop, predicate = %node, "dry-run delete"),
		None => info!(start, stop, "dry-run delete, matching all series"),
	}
}

/// Storage backend that logs each delete and retains nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunDeleteService;

#[async_trait]
impl DeleteService for DryRunDeleteService {
	#[instrument(skip_all, fields(%org_id, %bucket_id))]
	async fn delete_bucket_range_predicate(
		&self,
		org_id: OrgId,
		bucket_id: BucketId,
		start: i64,
		stop: i64,
		predicate: Option<&Node>,
	) -> Result<(), ApiError> {
		log_delete(start, stop, predicate);
		Ok(())
	}
}

/// One recorded call to [`RecordingDeleteService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCall {
	pub org_id: OrgId,
	pub bucket_id: BucketId,
	pub start: i64,
	pub stop: i64,
	pub predicate: Option<Node>,
}

#[derive(Debug, Default)]
pub struct RecordingDeleteService {
	calls: Mutex<Vec<DeleteCall>>,
}

impl RecordingDeleteService {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn calls(&self) -> Vec<DeleteCall> {
		self.calls
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	pub fn call_count(&self) -> usize {
		self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
	}
}

#[async_trait]
impl DeleteService for RecordingDeleteService {
	#[instrument(skip_all, fields(%org_id, %bucket_id))]
	async fn delete_bucket_range_predicate(
		&self,
		org_id: OrgId,
		bucket_id: BucketId,
		start: i64,
		stop: i64,
		predicate: Option<&Node>,
	) -> Result<(), ApiError> {
		log_delete(start, stop, predicate);
		self.calls
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.push(DeleteCall {
				org_id,
				bucket_id,
				start,
				stop,
				predicate: predicate.cloned(),
			});
		Ok(())
	}
}
