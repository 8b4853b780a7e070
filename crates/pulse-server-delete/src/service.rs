// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Collaborators the delete pipeline depends on.
//!
//! Implementations are shared by every in-flight request and must be safe to
//! call concurrently.

use async_trait::async_trait;
use pulse_predicate_core::Node;
use pulse_server_auth::{BucketId, OrgId};
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Organization {
	pub id: OrgId,
	pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
	pub id: BucketId,
	pub org_id: OrgId,
	pub name: String,
}

/// Lookup criteria for a single organization. ID wins over name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationFilter {
	pub id: Option<OrgId>,
	pub name: Option<String>,
}

/// Lookup criteria for a single bucket. ID wins over name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketFilter {
	pub id: Option<BucketId>,
	pub name: Option<String>,
	pub org_id: Option<OrgId>,
}

#[async_trait]
pub trait OrganizationService: Send + Sync {
	async fn find_organization(&self, filter: &OrganizationFilter) -> Result<Organization, ApiError>;
}

#[async_trait]
pub trait BucketService: Send + Sync {
	async fn find_bucket(&self, filter: &BucketFilter) -> Result<Bucket, ApiError>;
}

/// The storage engine's bulk-delete entry point.
#[async_trait]
pub trait DeleteService: Send + Sync {
	/// Deletes points in `[start, stop]` (Unix nanoseconds) that match
	/// `predicate`. `None` matches every point in the range.
	async fn delete_bucket_range_predicate(
		&self,
		org_id: OrgId,
		bucket_id: BucketId,
		start: i64,
		stop: i64,
		predicate: Option<&Node>,
	) -> Result<(), ApiError>;
}
