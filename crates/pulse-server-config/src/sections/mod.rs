// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod auth;
mod delete;
mod http;
mod logging;
mod tenants;

pub use auth::{AuthConfig, AuthConfigLayer, TokenConfig};
pub use delete::{DeleteConfig, DeleteConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use tenants::{BucketConfig, OrgConfig, TenantsConfig, TenantsConfigLayer};
