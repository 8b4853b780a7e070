// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication and authorization for Pulse.
//!
//! - [`types`]: ID newtypes ([`OrgId`], [`BucketId`], [`UserId`])
//! - [`permission`]: [`Permission`] built from an [`Action`] and a [`Resource`]
//! - [`authorizer`]: the [`Authorizer`] trait and per-request [`AuthContext`]
//! - [`token`]: static API tokens resolved by digest

pub mod authorizer;
pub mod permission;
pub mod token;
pub mod types;

pub use authorizer::{AuthContext, AuthError, Authorization, Authorizer};
pub use permission::{Action, Permission, PermissionError, Resource, ResourceType};
pub use token::{extract_token, hash_token, TokenStore};
pub use types::{BucketId, OrgId, UserId};
