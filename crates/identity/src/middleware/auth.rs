//! Bearer-token trust filter and authentication extractor.
//!
//! The filter only establishes identity; it never rejects. A missing,
//! malformed, expired, or tampered token all leave the request anonymous and
//! the request proceeds. Access decisions are made separately by the
//! [`RequireAuth`] extractor on the routes that need them, so an endpoint's
//! policy - not the filter - decides whether anonymous is acceptable.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use clementine_core::{Principal, TokenType};

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
            // Invalid tokens are indistinguishable from no token downstream
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

/// Extractor that requires an authenticated principal.
///
/// Rejects with 401 when the trust filter attached no principal.
pub struct RequireAuth(pub Principal);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(Self)
            .ok_or_else(|| StatusCode::UNAUTHORIZED.into_response())
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

        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwdw==".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }
}
