/// Request authentication for Axum
///
/// This module provides the pieces the API's authorizer layer is built from:
/// bearer-token extraction from the `Authorization` header, token validation,
/// and the `AuthContext` attached to request extensions on success.
///
/// The authorizer is the single mandatory gate in front of every task,
/// profile, and team operation. Handlers downstream extract `AuthContext`
/// and never re-validate the token.
///
/// # Failure mapping
///
/// - Missing header or non-Bearer scheme: unauthenticated (401)
/// - Expired token: unauthenticated, distinct message (401)
/// - Malformed or tampered token: forbidden (403)
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use taskmaster_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {}", auth.user_id)
/// }
/// ```

use axum::{
    http::{header::HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_token, Claims, JwtError};
use crate::models::user::UserRole;

/// Authentication context added to request extensions
///
/// Carries the identity decoded from the bearer token. This is the sole
/// evidence of identity for every protected operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated account ID
    pub user_id: Uuid,

    /// Username at token issue time
    pub username: String,

    /// Role at token issue time
    pub role: UserRole,
}

impl AuthContext {
    /// Creates auth context from validated token claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username.clone(),
            role: claims.role,
        }
    }
}

/// Error type for the authorizer
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header or non-Bearer scheme
    MissingCredentials,

    /// Token past its expiry; the client should re-authenticate
    ExpiredToken,

    /// Malformed or tampered token
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::ExpiredToken => {
                (StatusCode::UNAUTHORIZED, "Token expired").into_response()
            }
            AuthError::InvalidToken(msg) => (StatusCode::FORBIDDEN, msg).into_response(),
        }
    }
}

/// Extracts the bearer token from request headers
///
/// # Errors
///
/// Returns `AuthError::MissingCredentials` if the Authorization header is
/// absent, unreadable, or does not use the Bearer scheme
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingCredentials)
}

/// Validates a bearer token and produces the request's auth context
///
/// # Errors
///
/// - `AuthError::ExpiredToken` for a token past its expiry
/// - `AuthError::InvalidToken` for a malformed or tampered token
pub fn authenticate(token: &str, secret: &str) -> Result<AuthContext, AuthError> {
    let claims = validate_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken("Invalid token".to_string()),
    })?;

    Ok(AuthContext::from_claims(&claims))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::create_token;
    use axum::http::header::AUTHORIZATION;
    use chrono::Duration;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_auth_context_from_claims() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "alice".to_string(), UserRole::Admin);

        let context = AuthContext::from_claims(&claims);

        assert_eq!(context.user_id, user_id);
        assert_eq!(context.username, "alice");
        assert_eq!(context.role, UserRole::Admin);
    }

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());

        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let headers = HeaderMap::new();
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());

        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_authenticate_valid_token() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "alice".to_string(), UserRole::User);
        let token = create_token(&claims, SECRET).unwrap();

        let context = authenticate(&token, SECRET).unwrap();
        assert_eq!(context.user_id, user_id);
    }

    #[test]
    fn test_authenticate_expired_token() {
        let claims = Claims::with_expiration(
            Uuid::new_v4(),
            "alice".to_string(),
            UserRole::User,
            Duration::seconds(-3600),
        );
        let token = create_token(&claims, SECRET).unwrap();

        assert!(matches!(
            authenticate(&token, SECRET),
            Err(AuthError::ExpiredToken)
        ));
    }

    #[test]
    fn test_authenticate_wrong_secret() {
        let claims = Claims::new(Uuid::new_v4(), "alice".to_string(), UserRole::User);
        let token = create_token(&claims, "another-secret-that-is-32-bytes!!").unwrap();

        assert!(matches!(
            authenticate(&token, SECRET),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_auth_error_into_response() {
        let response = AuthError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::ExpiredToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidToken("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
