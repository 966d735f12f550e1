//! # API Module
//!
//! HTTP route handlers of the proxy. Every handler answers with the JSON
//! envelope `{status, error, data}`: `SUCCESS` with HTTP 200 on success,
//! `FAIL` with 400 (or 401 for credential problems) otherwise.
//!
//! ## Endpoints
//!
//! All routes below are mounted under `/api/v1` by [`crate::server`].
//!
//! ### Authentication
//!
//! - [`auth::login`] - authorization URL plus the CSRF state to check later
//! - [`auth::callback`] - authorization code exchange
//! - [`auth::refresh`] - refresh token exchange
//!
//! ### Browse
//!
//! Anonymous catalogue reads, made with an application token fetched per
//! request. Featured playlists and categories are cached for an hour.
//!
//! - [`browse::featured_playlists`]
//! - [`browse::categories`]
//! - [`browse::category_playlists`]
//! - [`browse::playlist_tracks`]
//! - [`browse::search`]
//!
//! ### User
//!
//! Library reads and edits. Every route requires the caller's token in the
//! `X-Access-Token` header and rejects the request with 401 before any
//! upstream call when it is missing.
//!
//! ### Monitoring
//!
//! - [`health::root`] - plain text greeting
//! - [`health::health`] - status and version
//!
//! ## Extractors
//!
//! [`extract`] holds the token extractors ([`extract::ClientToken`],
//! [`extract::UserToken`], [`extract::MaybeUserToken`]) and the JSON/query
//! wrappers that turn malformed input into the `FAIL` envelope instead of
//! axum's plain text rejections.

use axum::Json;
use serde::Serialize;

use crate::{error::ApiError, types::Envelope};

pub mod auth;
pub mod browse;
pub mod extract;
pub mod health;
pub mod user;

/// What every envelope-returning handler produces.
pub type ApiResult = Result<Json<Envelope>, ApiError>;

/// Wraps `data` in a `SUCCESS` envelope.
pub fn success<T: Serialize>(data: T) -> ApiResult {
    let data = serde_json::to_value(data)
        .map_err(|e| ApiError::Aggregation(format!("failed to encode response: {e}")))?;
    Ok(Json(Envelope::success(data)))
}
