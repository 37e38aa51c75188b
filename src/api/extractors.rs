//! Actor extraction.
//!
//! Authentication happens upstream; whatever sits in front of this service
//! passes the caller's role and display name in `X-Actor-Role` and
//! `X-Actor-Name`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::error::ApiError;
use crate::models::{Actor, Role};

pub const ROLE_HEADER: &str = "x-actor-role";
pub const NAME_HEADER: &str = "x-actor-name";

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let role = header(parts, ROLE_HEADER)
            .ok_or_else(|| ApiError::Unauthorized("missing X-Actor-Role header".to_string()))?;
        let role = Role::from_str(role.trim())
            .ok_or_else(|| ApiError::Unauthorized(format!("unknown role: {}", role)))?;

        let name = header(parts, NAME_HEADER)
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("missing X-Actor-Name header".to_string()))?;

        Ok(Actor::new(role, name))
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|h| std::str::from_utf8(h.as_bytes()).ok())
}
