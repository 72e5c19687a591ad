//! Bearer-token authentication for the audit API.
//!
//! Token verification sits in front of every handler: the claims carry
//! the organization the caller may audit, so no datastore read happens
//! for an unverified request.

use axum::http::{header, HeaderMap};
use uuid::Uuid;

use crate::error::{AuditError, AuditResult};

/// Verified identity of an API caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Stable caller identifier, recorded as `initiated_by` on runs.
    pub subject: String,
    /// The single organization the token is scoped to.
    pub organization_id: Uuid,
}

/// Verifies bearer tokens into [`Claims`].
///
/// Production deployments verify signed tokens against the identity
/// provider; tests plug in [`StaticTokenVerifier`].
pub trait ClaimsVerifier: Send + Sync {
    /// Verifies a raw bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Unauthorized`] for any token that does not
    /// verify.
    fn verify(&self, token: &str) -> AuditResult<Claims>;
}

/// Extracts the bearer token from the `Authorization` header.
///
/// # Errors
///
/// Returns [`AuditError::Unauthorized`] when the header is missing,
/// unreadable, or not a `Bearer` credential.
pub fn bearer_token(headers: &HeaderMap) -> AuditResult<&str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AuditError::Unauthorized {
            message: "missing Authorization header".to_string(),
        })?
        .to_str()
        .map_err(|_| AuditError::Unauthorized {
            message: "Authorization header is not valid UTF-8".to_string(),
        })?;
    value
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuditError::Unauthorized {
            message: "Authorization header is not a bearer credential".to_string(),
        })
}

/// A verifier backed by a fixed token table.
#[derive(Default)]
pub struct StaticTokenVerifier {
    tokens: Vec<(String, Claims)>,
}

impl StaticTokenVerifier {
    /// Creates an empty verifier that rejects every token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token for a caller scoped to one organization.
    pub fn with_token(mut self, token: &str, subject: &str, organization_id: Uuid) -> Self {
        self.tokens.push((
            token.to_string(),
            Claims {
                subject: subject.to_string(),
                organization_id,
            },
        ));
        self
    }
}

impl ClaimsVerifier for StaticTokenVerifier {
    fn verify(&self, token: &str) -> AuditResult<Claims> {
        self.tokens
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, claims)| claims.clone())
            .ok_or_else(|| AuditError::Unauthorized {
                message: "unknown bearer token".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extracts_bearer_token() {
        let headers = headers_with("Bearer tok_123");
        assert_eq!(bearer_token(&headers).unwrap(), "tok_123");
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        let headers = HeaderMap::new();
        let result = bearer_token(&headers);
        assert!(matches!(result, Err(AuditError::Unauthorized { .. })));
    }

    #[test]
    fn test_non_bearer_scheme_is_unauthorized() {
        let headers = headers_with("Basic dXNlcjpwYXNz");
        assert!(bearer_token(&headers).is_err());
    }

    #[test]
    fn test_empty_bearer_token_is_unauthorized() {
        let headers = headers_with("Bearer ");
        assert!(bearer_token(&headers).is_err());
    }

    #[test]
    fn test_static_verifier_resolves_claims() {
        let org = Uuid::new_v4();
        let verifier = StaticTokenVerifier::new().with_token("tok_123", "auditor_1", org);

        let claims = verifier.verify("tok_123").unwrap();
        assert_eq!(claims.subject, "auditor_1");
        assert_eq!(claims.organization_id, org);
        assert!(verifier.verify("tok_999").is_err());
    }
}
