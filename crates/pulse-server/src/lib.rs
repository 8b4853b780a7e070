// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pulse delete server.
//!
//! This crate exposes the bulk delete pipeline over HTTP:
//!
//! - `POST /api/v2/delete?orgID=..&bucketID=..` (or `org` / `bucket` names)
//! - `GET /health`

pub mod api;
pub mod api_response;
pub mod auth_middleware;
pub mod routes;

pub use api::{create_app_state, create_router, AppState};
pub use api_response::HttpError;
pub use pulse_server_config::ServerConfig;
