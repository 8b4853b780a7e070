// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Organizations and buckets served by the in-memory resolvers.

use pulse_server_auth::{BucketId, OrgId};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BucketConfig {
	pub id: BucketId,
	pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrgConfig {
	pub id: OrgId,
	pub name: String,
	#[serde(default)]
	pub buckets: Vec<BucketConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantsConfig {
	pub orgs: Vec<OrgConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TenantsConfigLayer {
	#[serde(default)]
	pub orgs: Option<Vec<OrgConfig>>,
}

impl TenantsConfigLayer {
	pub fn merge(&mut self, other: TenantsConfigLayer) {
		if other.orgs.is_some() {
			self.orgs = other.orgs;
		}
	}

	pub fn finalize(self) -> TenantsConfig {
		TenantsConfig {
			orgs: self.orgs.unwrap_or_default(),
		}
	}
}
