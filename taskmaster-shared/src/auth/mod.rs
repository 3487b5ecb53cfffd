/// Authentication and authorization utilities
///
/// This module provides the authentication primitives for TaskMaster:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Bearer token generation and validation
/// - [`middleware`]: Request authentication context and bearer extraction
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with a fixed work factor
/// - **Bearer Tokens**: HS256 signing with a fixed 24-hour expiry
/// - **Constant-time Comparison**: Verification uses constant-time operations
///
/// # Example
///
/// ```no_run
/// use taskmaster_shared::auth::password::{hash_password, verify_password};
/// use taskmaster_shared::auth::jwt::{create_token, Claims};
/// use taskmaster_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Password authentication
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// // Bearer token generation
/// let claims = Claims::new(Uuid::new_v4(), "alice".to_string(), UserRole::User);
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
/// # Ok(())
/// # }
/// ```

pub mod password;
pub mod jwt;
pub mod middleware;
