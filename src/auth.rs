//! Actor identity extraction.
//!
//! Authentication itself lives in the fronting identity proxy; this service
//! only records the identity the proxy forwards in the `x-actor-id` header.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

/// Header carrying the authenticated actor identity.
pub const ACTOR_ID_HEADER: &str = "x-actor-id";

/// Authenticated actor extracted from the forwarded identity header.
///
/// Use as an extractor in every handler that mutates game state so the
/// mutation can be attributed in `updated_by`/`created_by`.
#[derive(Debug, Clone)]
pub struct ActorId(pub String);

impl ActorId {
    /// The raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for ActorId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = parts
            .headers
            .get(ACTOR_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                AppError::Unauthorized(format!("missing `{ACTOR_ID_HEADER}` header"))
            })?;

        Ok(ActorId(actor.to_string()))
    }
}
