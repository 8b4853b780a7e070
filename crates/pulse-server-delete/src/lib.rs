// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bulk delete pipeline for Pulse.
//!
//! A delete request moves through four stages, any of which may reject it:
//!
//! 1. authentication: the caller must carry an [`Authorizer`](pulse_server_auth::Authorizer)
//! 2. [`decode`]: body, organization and bucket lookup, time range, predicate
//! 3. authorization: write access to the bucket
//! 4. dispatch: the compiled predicate is handed to the [`DeleteService`]
//!
//! [`DeleteHandler`] drives the whole sequence. Failures at every stage are
//! reported as an [`ApiError`].

pub mod error;
pub mod handler;
pub mod memory;
pub mod request;
pub mod service;

pub use error::{ApiError, ErrorBody, ErrorCode};
pub use handler::{DeleteHandler, DEFAULT_REQUEST_TIMEOUT};
pub use memory::{
	DeleteCall, DryRunDeleteService, InMemoryBucketService, InMemoryOrganizationService,
	RecordingDeleteService,
};
pub use request::{decode, parse_time, DeleteRequest, DeleteSelector};
pub use service::{
	Bucket, BucketFilter, BucketService, DeleteService, Organization, OrganizationFilter,
	OrganizationService,
};
