//! The authenticated identity derived from a verified token.

use crate::token::{Claims, TokenError};
use crate::types::{Email, Role};

/// Identity of an authenticated caller for the duration of one request.
///
/// A `Principal` only ever comes from a verified access token; it is never
/// persisted and is passed explicitly through the call chain rather than
/// stashed in ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// The user's email address, from the token subject.
    pub subject: Email,
    /// The role granted at token issue time.
    pub role: Role,
}

impl Principal {
    /// Whether this principal holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

impl TryFrom<Claims> for Principal {
    type Error = TokenError;

    /// Fails with [`TokenError::Invalid`] when the subject is not a
    /// well-formed email; such a token is treated like any other bad token.
    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let subject = Email::parse(&claims.sub).map_err(|_| TokenError::Invalid)?;
        Ok(Self {
            subject,
            role: claims.role,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    fn claims(sub: &str) -> Claims {
        Claims {
            sub: sub.to_owned(),
            role: Role::Admin,
            token_type: TokenType::Access,
            iat: 0,
            exp: 60,
        }
    }

    #[test]
    fn test_principal_from_claims() {
        let principal = Principal::try_from(claims("admin@test.com")).unwrap();
        assert_eq!(principal.subject.as_str(), "admin@test.com");
        assert!(principal.is_admin());
    }

    #[test]
    fn test_bad_subject_rejected() {
        assert!(matches!(
            Principal::try_from(claims("not-an-email")),
            Err(TokenError::Invalid)
        ));
    }
}
