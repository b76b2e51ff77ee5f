//! Axum extractor for the authenticated request context.

use authn_sdk::RequestContext;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;

use crate::problem::Problem;

/// Extractor for the [`RequestContext`] attached by [`AuthLayer`](crate::AuthLayer).
///
/// Rejects with `500` when the layer is not installed on the route.
#[derive(Debug, Clone)]
pub struct Authenticated(pub RequestContext);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .map(Authenticated)
            .ok_or_else(|| {
                Problem::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "request context not found, authentication layer not configured",
                )
            })
    }
}
