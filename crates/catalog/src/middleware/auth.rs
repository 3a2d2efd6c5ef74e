//! Bearer-token trust filter and admin authorization extractor.
//!
//! Identity extraction and access decisions are two separate layers. The
//! filter verifies the bearer token and attaches a principal when it can; it
//! never rejects a request on its own, so an invalid token is
//! indistinguishable from no token further down. [`RequireAdmin`] is the
//! policy layer for the `/api/admin` surface.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use clementine_core::{ApiMessage, Principal, TokenType};

use crate::state::AppState;

/// Token trust filter.
///
/// Extracts `Authorization: Bearer <token>`, verifies it as an access token,
/// and attaches a [`Principal`] to the request extensions on success. Must be
/// layered outside any route that reads the principal.
pub async fn token_trust(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    if let Some(token) = bearer_token(req.headers()) {
        match state.tokens().verify(token, TokenType::Access) {
            Ok(claims) => match Principal::try_from(claims) {
                Ok(principal) => {
                    req.extensions_mut().insert(principal);
                }
                Err(err) => tracing::debug!(error = %err, "bearer token subject rejected"),
            },
            Err(err) => tracing::debug!(error = %err, "bearer token rejected"),
        }
    }

    next.run(req).await
}

/// Pull the bearer token out of the Authorization header, if any.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Rejection from the admin policy.
pub enum AdminRejection {
    /// No principal was attached: anonymous caller.
    Unauthorized,
    /// An authenticated caller without the admin role.
    Forbidden,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(ApiMessage::error("Authentication required")),
            )
                .into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(ApiMessage::error("Admin role required")),
            )
                .into_response(),
        }
    }
}

/// Extractor that requires an authenticated principal with the admin role.
pub struct RequireAdmin(pub Principal);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(AdminRejection::Unauthorized)?;

        if !principal.is_admin() {
            return Err(AdminRejection::Forbidden);
        }

        Ok(Self(principal))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert(header::AUTHORIZATION, "token abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_rejection_statuses() {
        assert_eq!(
            AdminRejection::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AdminRejection::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
