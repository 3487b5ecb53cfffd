/// Database models for TaskMaster
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: Accounts, credentials, and profile attributes
/// - `task`: Owner-scoped tasks
///
/// # Example
///
/// ```no_run
/// use taskmaster_shared::models::user::{User, CreateUser, UserRole};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let new_user = CreateUser {
///     username: "alice".to_string(),
///     email: "alice@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: UserRole::User,
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;
