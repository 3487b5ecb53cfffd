/// Bearer token generation and validation
///
/// This module provides the JWT functionality for session tokens. Tokens are
/// signed using HS256 (HMAC-SHA256) and carry the owning account's identity.
/// Tokens are stateless: there is no server-side revocation, and a token
/// remains valid until its fixed 24-hour expiry.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: Fixed 24 hours from issuance
/// - **Validation**: Signature, expiration, and issuer checks
/// - **Secret Management**: Secrets should be at least 32 bytes (256 bits)
///
/// Validation distinguishes an expired token from a malformed or tampered one
/// so callers can answer "re-authenticate" and "forbidden" differently.
///
/// # Example
///
/// ```
/// use taskmaster_shared::auth::jwt::{create_token, validate_token, Claims};
/// use taskmaster_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
///
/// let claims = Claims::new(user_id, "alice".to_string(), UserRole::User);
/// let token = create_token(&claims, "your-secret-key-at-least-32-bytes")?;
///
/// let validated = validate_token(&token, "your-secret-key-at-least-32-bytes")?;
/// assert_eq!(validated.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserRole;

/// Fixed lifetime of an issued token
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

const ISSUER: &str = "taskmaster";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Signature mismatch, tampered payload, or malformed token
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Token claims
///
/// # Standard Claims
///
/// - `sub`: Subject (account ID)
/// - `iss`: Issuer (always "taskmaster")
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
///
/// # Custom Claims
///
/// - `username`: Account username at issue time
/// - `role`: Account role at issue time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - Account ID
    pub sub: Uuid,

    /// Issuer - Always "taskmaster"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Username (custom claim)
    pub username: String,

    /// Role (custom claim)
    pub role: UserRole,
}

impl Claims {
    /// Creates claims with the fixed 24-hour expiry
    pub fn new(user_id: Uuid, username: String, role: UserRole) -> Self {
        Self::with_expiration(user_id, username, role, Duration::hours(TOKEN_LIFETIME_HOURS))
    }

    /// Creates claims with a custom expiration
    ///
    /// Production tokens always use [`Claims::new`]; this exists so tests can
    /// mint already-expired tokens.
    pub fn with_expiration(
        user_id: Uuid,
        username: String,
        role: UserRole,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            username,
            role,
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a signed token from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and extracts its claims
///
/// Verifies the signature, the expiration, and the issuer. An expired token
/// is reported as `JwtError::Expired`; every other failure (bad signature,
/// tampered payload, garbage input) is `JwtError::Invalid`.
///
/// # Example
///
/// ```
/// use taskmaster_shared::auth::jwt::{create_token, validate_token, Claims, JwtError};
/// use taskmaster_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(Uuid::new_v4(), "alice".to_string(), UserRole::User);
/// let token = create_token(&claims, "secret-one")?;
///
/// // A different secret fails as Invalid, not Expired
/// let err = validate_token(&token, "secret-two").unwrap_err();
/// assert!(matches!(err, JwtError::Invalid(_)));
/// # Ok(())
/// # }
/// ```
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::Invalid(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();

        let claims = Claims::new(user_id, "alice".to_string(), UserRole::User);

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.iss, "taskmaster");
        assert_eq!(claims.role, UserRole::User);
        assert!(!claims.is_expired());
        assert_eq!(claims.exp - claims.iat, TOKEN_LIFETIME_HOURS * 3600);
    }

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();

        let claims = Claims::new(user_id, "bob".to_string(), UserRole::Admin);
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.username, "bob");
        assert_eq!(validated.role, UserRole::Admin);
        assert_eq!(validated.iss, "taskmaster");
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(Uuid::new_v4(), "alice".to_string(), UserRole::User);
        let token = create_token(&claims, "secret1").expect("Should create token");

        let result = validate_token(&token, "wrong-secret");
        assert!(matches!(result.unwrap_err(), JwtError::Invalid(_)));
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = Claims::with_expiration(
            Uuid::new_v4(),
            "alice".to_string(),
            UserRole::User,
            Duration::seconds(-3600), // expired an hour ago
        );

        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = validate_token(&token, SECRET);

        assert!(matches!(result.unwrap_err(), JwtError::Expired));
    }

    #[test]
    fn test_validate_tampered_token() {
        let claims = Claims::new(Uuid::new_v4(), "alice".to_string(), UserRole::User);
        let token = create_token(&claims, SECRET).expect("Should create token");

        // Flip a character in the payload segment
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        parts[1].replace_range(0..1, if &parts[1][0..1] == "a" { "b" } else { "a" });
        let tampered = parts.join(".");

        let result = validate_token(&tampered, SECRET);
        assert!(matches!(result.unwrap_err(), JwtError::Invalid(_)));
    }

    #[test]
    fn test_validate_garbage_token() {
        let result = validate_token("not-a-token", SECRET);
        assert!(matches!(result.unwrap_err(), JwtError::Invalid(_)));
    }
}
