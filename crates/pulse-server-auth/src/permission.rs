// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Permission model.
//!
//! A [`Permission`] pairs an [`Action`] with a [`Resource`]. Granted
//! permissions may leave the resource ID or organization unset to act as a
//! wildcard; requested permissions built with [`Permission::at_id`] always
//! name both.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::OrgId;

/// Actions that can be performed on resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
	Read,
	Write,
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Action::Read => write!(f, "read"),
			Action::Write => write!(f, "write"),
		}
	}
}

/// Types of resources that permissions apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
	Buckets,
	Orgs,
}

impl fmt::Display for ResourceType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ResourceType::Buckets => write!(f, "buckets"),
			ResourceType::Orgs => write!(f, "orgs"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
	#[error("invalid {field} id: nil")]
	InvalidId { field: &'static str },
}

/// The resource a permission applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resource {
	#[serde(rename = "type")]
	pub kind: ResourceType,
	/// `None` means every resource of this kind.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<Uuid>,
	/// `None` means every organization.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub org_id: Option<OrgId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
	pub action: Action,
	pub resource: Resource,
}

impl Permission {
	/// Permission for `action` on the single resource `id` inside `org_id`.
	pub fn at_id(
		id: impl Into<Uuid>,
		action: Action,
		kind: ResourceType,
		org_id: OrgId,
	) -> Result<Self, PermissionError> {
		let id = id.into();
		if id.is_nil() {
			return Err(PermissionError::InvalidId { field: "resource" });
		}
		if !org_id.is_valid() {
			return Err(PermissionError::InvalidId { field: "org" });
		}
		Ok(Self {
			action,
			resource: Resource {
				kind,
				id: Some(id),
				org_id: Some(org_id),
			},
		})
	}

	/// Permission for `action` on every resource of `kind` inside `org_id`.
	pub fn in_org(action: Action, kind: ResourceType, org_id: OrgId) -> Self {
		Self {
			action,
			resource: Resource {
				kind,
				id: None,
				org_id: Some(org_id),
			},
		}
	}

	/// Returns true if this (granted) permission covers `requested`.
	pub fn matches(&self, requested: &Permission) -> bool {
		if self.action != requested.action || self.resource.kind != requested.resource.kind {
			return false;
		}
		if let Some(org_id) = self.resource.org_id {
			if requested.resource.org_id != Some(org_id) {
				return false;
			}
		}
		match self.resource.id {
			Some(id) => requested.resource.id == Some(id),
			None => true,
		}
	}
}

impl fmt::Display for Permission {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:", self.action)?;
		if let Some(org_id) = self.resource.org_id {
			write!(f, "orgs/{org_id}/")?;
		}
		write!(f, "{}", self.resource.kind)?;
		if let Some(id) = self.resource.id {
			write!(f, "/{id}")?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::BucketId;
	use proptest::prelude::*;

	#[test]
	fn at_id_rejects_nil_ids() {
		let org = OrgId::generate();
		assert_eq!(
			Permission::at_id(Uuid::nil(), Action::Write, ResourceType::Buckets, org),
			Err(PermissionError::InvalidId { field: "resource" })
		);
		assert_eq!(
			Permission::at_id(
				BucketId::generate(),
				Action::Write,
				ResourceType::Buckets,
				OrgId::new(Uuid::nil())
			),
			Err(PermissionError::InvalidId { field: "org" })
		);
	}

	#[test]
	fn exact_permission_matches_itself_only() {
		let org = OrgId::generate();
		let bucket = BucketId::generate();
		let granted = Permission::at_id(bucket, Action::Write, ResourceType::Buckets, org).unwrap();

		assert!(granted.matches(&granted));

		let other_bucket =
			Permission::at_id(BucketId::generate(), Action::Write, ResourceType::Buckets, org)
				.unwrap();
		assert!(!granted.matches(&other_bucket));

		let read = Permission::at_id(bucket, Action::Read, ResourceType::Buckets, org).unwrap();
		assert!(!granted.matches(&read));
	}

	#[test]
	fn org_wide_permission_covers_every_bucket_in_org() {
		let org = OrgId::generate();
		let granted = Permission::in_org(Action::Write, ResourceType::Buckets, org);

		let inside =
			Permission::at_id(BucketId::generate(), Action::Write, ResourceType::Buckets, org)
				.unwrap();
		assert!(granted.matches(&inside));

		let outside = Permission::at_id(
			BucketId::generate(),
			Action::Write,
			ResourceType::Buckets,
			OrgId::generate(),
		)
		.unwrap();
		assert!(!granted.matches(&outside));
	}

	#[test]
	fn resource_kind_must_match() {
		let org = OrgId::generate();
		let granted = Permission::in_org(Action::Write, ResourceType::Orgs, org);
		let requested =
			Permission::at_id(BucketId::generate(), Action::Write, ResourceType::Buckets, org)
				.unwrap();
		assert!(!granted.matches(&requested));
	}

	#[test]
	fn display_is_readable() {
		let org = OrgId::generate();
		let perm = Permission::in_org(Action::Write, ResourceType::Buckets, org);
		assert_eq!(perm.to_string(), format!("write:orgs/{org}/buckets"));
	}

	fn arb_action() -> impl Strategy<Value = Action> {
		prop::sample::select(vec![Action::Read, Action::Write])
	}

	fn arb_kind() -> impl Strategy<Value = ResourceType> {
		prop::sample::select(vec![ResourceType::Buckets, ResourceType::Orgs])
	}

	fn arb_uuid() -> impl Strategy<Value = Uuid> {
		any::<u128>()
			.prop_filter("nil", |n| *n != 0)
			.prop_map(Uuid::from_u128)
	}

	proptest! {
		#[test]
		fn wildcards_widen_but_never_cross_action_or_kind(
			action in arb_action(),
			kind in arb_kind(),
			other_action in arb_action(),
			other_kind in arb_kind(),
			id in arb_uuid(),
			org in arb_uuid(),
		) {
			let org_id = OrgId::new(org);
			let requested = Permission::at_id(id, other_action, other_kind, org_id).unwrap();
			let same = action == other_action && kind == other_kind;

			let exact = Permission::at_id(id, action, kind, org_id).unwrap();
			let org_wide = Permission::in_org(action, kind, org_id);
			let global = Permission {
				action,
				resource: Resource { kind, id: None, org_id: None },
			};

			prop_assert_eq!(exact.matches(&requested), same);
			prop_assert_eq!(org_wide.matches(&requested), same);
			prop_assert_eq!(global.matches(&requested), same);
		}

		#[test]
		fn org_scoped_grant_never_covers_another_org(
			id in arb_uuid(),
			org in arb_uuid(),
			other_org in arb_uuid(),
		) {
			prop_assume!(org != other_org);
			let granted = Permission::in_org(Action::Write, ResourceType::Buckets, OrgId::new(org));
			let requested =
				Permission::at_id(id, Action::Write, ResourceType::Buckets, OrgId::new(other_org))
					.unwrap();
			prop_assert!(!granted.matches(&requested));
		}
	}
}
