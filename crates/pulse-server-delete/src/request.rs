// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Decoding of inbound delete requests.
//!
//! Decoding runs in a fixed order and stops at the first failure: body JSON,
//! organization, bucket, `start`, `stop`, predicate.

use std::time::Duration;

use chrono::DateTime;
use pulse_predicate_core::{parse_predicate, Predicate};
use pulse_server_auth::{BucketId, OrgId};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::ApiError;
use crate::handler::bounded;
use crate::service::{
	Bucket, BucketFilter, BucketService, Organization, OrganizationFilter, OrganizationService,
};

const OP_DELETE: &str = "http/Delete";

/// Organization and bucket selection carried in the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeleteSelector {
	#[serde(default)]
	pub org: Option<String>,
	#[serde(default, rename = "orgID")]
	pub org_id: Option<String>,
	#[serde(default)]
	pub bucket: Option<String>,
	#[serde(default, rename = "bucketID")]
	pub bucket_id: Option<String>,
}

impl DeleteSelector {
	pub fn by_ids(org_id: OrgId, bucket_id: BucketId) -> Self {
		Self {
			org_id: Some(org_id.to_string()),
			bucket_id: Some(bucket_id.to_string()),
			..Self::default()
		}
	}

	pub fn by_names(org: impl Into<String>, bucket: impl Into<String>) -> Self {
		Self {
			org: Some(org.into()),
			bucket: Some(bucket.into()),
			..Self::default()
		}
	}

	pub fn organization_filter(&self) -> Result<OrganizationFilter, ApiError> {
		if let Some(raw) = non_empty(&self.org_id) {
			let id = raw
				.parse::<OrgId>()
				.map_err(|e| ApiError::invalid(format!("invalid orgID {raw:?}")).with_source(e))?;
			return Ok(OrganizationFilter {
				id: Some(id),
				name: None,
			});
		}
		if let Some(name) = non_empty(&self.org) {
			return Ok(OrganizationFilter {
				id: None,
				name: Some(name.to_string()),
			});
		}
		Err(ApiError::invalid("Please provide either orgID or org"))
	}

	/// Bucket lookups are always scoped to the resolved organization.
	pub fn bucket_filter(&self, org_id: OrgId) -> Result<BucketFilter, ApiError> {
		if let Some(raw) = non_empty(&self.bucket_id) {
			let id = raw
				.parse::<BucketId>()
				.map_err(|e| ApiError::invalid(format!("invalid bucketID {raw:?}")).with_source(e))?;
			return Ok(BucketFilter {
				id: Some(id),
				name: None,
				org_id: Some(org_id),
			});
		}
		if let Some(name) = non_empty(&self.bucket) {
			return Ok(BucketFilter {
				id: None,
				name: Some(name.to_string()),
				org_id: Some(org_id),
			});
		}
		Err(ApiError::invalid("Please provide either bucketID or bucket"))
	}
}

fn non_empty(value: &Option<String>) -> Option<&str> {
	value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Raw JSON body. Absent fields decode as empty strings.
#[derive(Debug, Default, Deserialize)]
struct DeleteBody {
	#[serde(default)]
	start: String,
	#[serde(default)]
	stop: String,
	#[serde(default)]
	predicate: String,
}

/// A decoded delete request, ready for authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
	pub org: Organization,
	pub bucket: Bucket,
	/// Unix nanoseconds.
	pub start: i64,
	/// Unix nanoseconds.
	pub stop: i64,
	/// `None` matches every series in the range.
	pub predicate: Option<Predicate>,
}

/// Decodes `body` and resolves the selector against the lookup services.
///
/// Each lookup is bounded by `timeout`.
#[instrument(skip_all)]
pub async fn decode(
	body: &[u8],
	selector: &DeleteSelector,
	orgs: &dyn OrganizationService,
	buckets: &dyn BucketService,
	timeout: Duration,
) -> Result<DeleteRequest, ApiError> {
	let raw: DeleteBody = serde_json::from_slice(body).map_err(|e| {
		ApiError::invalid("invalid request; error parsing request json")
			.with_op(OP_DELETE)
			.with_source(e)
	})?;

	let org_filter = selector.organization_filter().map_err(|e| e.with_op(OP_DELETE))?;
	let org = bounded(timeout, orgs.find_organization(&org_filter))
		.await
		.map_err(|e| e.or_op(OP_DELETE))?;

	let bucket_filter = selector.bucket_filter(org.id).map_err(|e| e.with_op(OP_DELETE))?;
	let bucket = bounded(timeout, buckets.find_bucket(&bucket_filter))
		.await
		.map_err(|e| e.or_op(OP_DELETE))?;
	debug!(org_id = %org.id, bucket_id = %bucket.id, "resolved delete target");

	let start = parse_time("start", &raw.start)?;
	let stop = parse_time("stop", &raw.stop)?;
	let predicate = parse_predicate(&raw.predicate)
		.map_err(|e| ApiError::from(e).with_op(OP_DELETE))?;

	Ok(DeleteRequest {
		org,
		bucket,
		start,
		stop,
		predicate,
	})
}

/// Parses an RFC3339Nano timestamp into Unix nanoseconds.
///
/// The layout is strict: an upper-case `T` separator, two-digit fields and a
/// zone of `Z` or `+hh:mm`/`-hh:mm`.
pub fn parse_time(field: &'static str, value: &str) -> Result<i64, ApiError> {
	Some(value)
		.filter(|v| is_rfc3339_nano(v.as_bytes()))
		.and_then(|v| DateTime::parse_from_rfc3339(v).ok())
		.and_then(|t| t.timestamp_nanos_opt())
		.ok_or_else(|| {
			ApiError::invalid(format!(
				"invalid RFC3339Nano for field {field}, please format your time with RFC3339Nano format, example: {}",
				example_time(field)
			))
			.with_op(OP_DELETE)
		})
}

fn is_rfc3339_nano(value: &[u8]) -> bool {
	const LAYOUT: &[u8] = b"dddd-dd-ddTdd:dd:dd";
	if value.len() < LAYOUT.len() || !matches_layout(&value[..LAYOUT.len()], LAYOUT) {
		return false;
	}

	let mut rest = &value[LAYOUT.len()..];
	if let Some(fraction) = rest.strip_prefix(b".") {
		let digits = fraction.iter().take_while(|b| b.is_ascii_digit()).count();
		if digits == 0 {
			return false;
		}
		rest = &fraction[digits..];
	}

	match rest {
		b"Z" => true,
		[b'+' | b'-', zone @ ..] => matches_layout(zone, b"dd:dd"),
		_ => false,
	}
}

fn matches_layout(value: &[u8], layout: &[u8]) -> bool {
	value.len() == layout.len()
		&& value.iter().zip(layout).all(|(v, l)| match l {
			b'd' => v.is_ascii_digit(),
			_ => v == l,
		})
}

fn example_time(field: &str) -> &'static str {
	match field {
		"stop" => "2009-01-01T23:00:00Z",
		_ => "2009-01-02T23:00:00Z",
	}
}
