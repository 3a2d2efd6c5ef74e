//! Bearer-token trust filter and authentication extractor.
//!
//! The filter only establishes identity. It verifies the bearer token when
//! one is present and attaches a [`Principal`]; whether the request is
//! missing a token, carries a malformed header, or presents an expired or
//! tampered token, the outcome is the same - the request proceeds
//! anonymously. The access decision happens later, in [`RequireAuth`], on
//! the routes that demand a caller.

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
/// Must be layered outside any route that reads the principal.
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

/// Extractor that requires an authenticated principal.
///
/// Rejects with 401 when the trust filter attached no principal. Every order
/// endpoint requires a caller: the order owner comes from the principal's
/// subject, never from the request body.
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
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ApiMessage::error("Authentication required")),
                )
                    .into_response()
            })
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

        headers.insert(header::AUTHORIZATION, "Bearer x.y.z".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("x.y.z"));

        headers.insert(header::AUTHORIZATION, "bearer x.y.z".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }
}
