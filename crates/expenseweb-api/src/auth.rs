//! Owner resolution for request handlers
//!
//! Token verification and session mechanics belong to the fronting
//! authentication middleware; by the time a request reaches the core
//! handlers the owner identity is expected to be resolved into the
//! `x-user-id` header. The extractor rejects requests without it
//! before any core logic runs.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use expenseweb_core::OwnerId;

use crate::error::ApiError;

/// Header carrying the resolved owner identity
pub const OWNER_HEADER: &str = "x-user-id";

/// Resolved request owner
#[derive(Debug, Clone)]
pub struct Owner(pub OwnerId);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Owner
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(OWNER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        match value {
            Some(id) => Ok(Owner(OwnerId::new(id))),
            None => Err(ApiError::unauthorized()),
        }
    }
}
