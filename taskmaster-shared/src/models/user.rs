/// Account model and database operations
///
/// This module provides the User model and CRUD operations for accounts.
/// Passwords are stored as Argon2id hashes, never in plaintext. API responses
/// use the [`PublicUser`] view, which cannot carry the hash at the type level.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('user', 'admin');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(50) NOT NULL UNIQUE,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL DEFAULT 'user',
///     phone VARCHAR(32),
///     bio TEXT,
///     avatar_url VARCHAR(512) NOT NULL DEFAULT 'avatars/default.png',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Username and email are globally unique and stored normalized (trimmed,
/// lowercased). Accounts are never hard-deleted through the API surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular account (default)
    User,

    /// Administrative account
    Admin,
}

impl UserRole {
    /// Converts role to its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Account model
///
/// Deliberately does not implement `Serialize`: the password hash must never
/// reach a response body. Serialize through [`PublicUser`] instead.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique account ID (UUID v4)
    pub id: Uuid,

    /// Username, unique, stored trimmed and lowercased
    pub username: String,

    /// Email address, unique, stored trimmed and lowercased
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Account role
    pub role: UserRole,

    /// Optional phone number
    pub phone: Option<String>,

    /// Optional free-text bio
    pub bio: Option<String>,

    /// Avatar reference, defaults to a placeholder
    pub avatar_url: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Sanitized account view returned by the API
///
/// Excludes the credential hash by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            phone: user.phone,
            bio: user.bio,
            avatar_url: user.avatar_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Input for creating a new account
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Username (normalized by the caller via [`normalize_identity`])
    pub username: String,

    /// Email address (normalized by the caller)
    pub email: String,

    /// Argon2id password hash (NOT a plaintext password)
    pub password_hash: String,

    /// Account role
    pub role: UserRole,
}

/// Input for updating profile attributes
///
/// Only the allow-listed fields appear here; email and role are not
/// updatable through the profile path regardless of what a client sends.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    /// New username (normalized, uniqueness re-checked by the caller)
    pub username: Option<String>,

    /// New phone number (Some(None) clears)
    pub phone: Option<Option<String>>,

    /// New bio (Some(None) clears)
    pub bio: Option<Option<String>>,

    /// New avatar reference
    pub avatar_url: Option<String>,
}

/// Normalizes an identity field (username or email): trim plus lowercase
pub fn normalize_identity(value: &str) -> String {
    value.trim().to_lowercase()
}

impl User {
    /// Creates a new account
    ///
    /// The unique constraints on username and email are the last line of
    /// defense; callers look up duplicates first, and a constraint violation
    /// that still slips through maps to the same duplicate error upstream.
    ///
    /// # Errors
    ///
    /// Returns an error if a unique constraint is violated or the database
    /// connection fails
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, role, phone, bio, avatar_url,
                      created_at, updated_at
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds an account by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, phone, bio, avatar_url,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds an account by normalized email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, phone, bio, avatar_url,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds an account by normalized username
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, phone, bio, avatar_url,
                   created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Checks whether a username is taken by an account other than `id`
    ///
    /// Used by profile update: the account keeping its own username is not a
    /// collision.
    pub async fn username_taken_by_other(
        pool: &PgPool,
        username: &str,
        id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 AND id <> $2)",
        )
        .bind(username)
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Updates profile attributes
    ///
    /// Only non-None fields are written; `updated_at` always advances.
    ///
    /// # Returns
    ///
    /// The updated account if found, None if the account doesn't exist
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProfile,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the update statement from whichever fields are present
        let mut query = String::from("UPDATE users SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.username.is_some() {
            bind_count += 1;
            query.push_str(&format!(", username = ${}", bind_count));
        }
        if data.phone.is_some() {
            bind_count += 1;
            query.push_str(&format!(", phone = ${}", bind_count));
        }
        if data.bio.is_some() {
            bind_count += 1;
            query.push_str(&format!(", bio = ${}", bind_count));
        }
        if data.avatar_url.is_some() {
            bind_count += 1;
            query.push_str(&format!(", avatar_url = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, username, email, password_hash, role, phone, bio, \
             avatar_url, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(username) = data.username {
            q = q.bind(username);
        }
        if let Some(phone) = data.phone {
            q = q.bind(phone);
        }
        if let Some(bio) = data.bio {
            q = q.bind(bio);
        }
        if let Some(avatar_url) = data.avatar_url {
            q = q.bind(avatar_url);
        }

        let user = q.fetch_optional(pool).await?;

        Ok(user)
    }

    /// Replaces the stored password hash
    ///
    /// # Returns
    ///
    /// True if the account was found and updated, false otherwise
    pub async fn update_password_hash(
        pool: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists every account, sorted by username
    ///
    /// This is the team-directory read path; callers serialize through
    /// [`PublicUser`].
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, phone, bio, avatar_url,
                   created_at, updated_at
            FROM users
            ORDER BY username ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_identity() {
        assert_eq!(normalize_identity("  Alice "), "alice");
        assert_eq!(normalize_identity("Bob@Example.COM"), "bob@example.com");
        assert_eq!(normalize_identity("carol"), "carol");
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("user".parse::<UserRole>().unwrap(), UserRole::User);
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_is_admin() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::User.is_admin());
    }

    #[test]
    fn test_public_user_excludes_hash() {
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: UserRole::User,
            phone: None,
            bio: None,
            avatar_url: "avatars/default.png".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let public: PublicUser = user.into();
        let json = serde_json::to_string(&public).unwrap();

        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password"));
        assert!(json.contains("alice@example.com"));
    }

    #[test]
    fn test_update_profile_default_is_empty() {
        let update = UpdateProfile::default();
        assert!(update.username.is_none());
        assert!(update.phone.is_none());
        assert!(update.bio.is_none());
        assert!(update.avatar_url.is_none());
    }

    // Integration tests for database operations live in taskmaster-api/tests/
}
