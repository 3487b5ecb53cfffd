/// Team directory endpoints
///
/// - `GET /api/team/members` - List every account, sorted by username
/// - `POST /api/team/members` - Administratively create an account
///
/// Whether any authenticated caller may use these operations, or only
/// admins, is the `team.open_access` policy decision in configuration. The
/// default is open, matching the flat-team behavior this system shipped with.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use taskmaster_shared::{
    auth::{middleware::AuthContext, password},
    models::user::{normalize_identity, CreateUser, PublicUser, User, UserRole},
};
use validator::Validate;

/// Add-member request
#[derive(Debug, Deserialize, Validate)]
pub struct AddMemberRequest {
    #[serde(default)]
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,

    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    /// "user" | "admin" (default user)
    pub role: Option<String>,
}

/// Add-member response
#[derive(Debug, Serialize)]
pub struct AddMemberResponse {
    pub message: String,
    pub user: PublicUser,
}

/// Checks the team-directory policy for the calling identity
fn ensure_team_access(state: &AppState, auth: &AuthContext) -> Result<(), ApiError> {
    if !state.config.team.open_access && !auth.role.is_admin() {
        return Err(ApiError::Forbidden("Admin role required".to_string()));
    }
    Ok(())
}

/// List every account in the directory
///
/// # Endpoint
///
/// ```text
/// GET /api/team/members
/// Authorization: Bearer <token>
/// ```
///
/// Accounts are sorted by username and serialized through the sanitized
/// view; the credential hash never leaves the model layer.
pub async fn list_members(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<PublicUser>>> {
    ensure_team_access(&state, &auth)?;

    let members = User::list_all(&state.db)
        .await?
        .into_iter()
        .map(PublicUser::from)
        .collect();

    Ok(Json(members))
}

/// Administratively create an account
///
/// # Endpoint
///
/// ```text
/// POST /api/team/members
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "username": "bob",
///   "email": "bob@example.com",
///   "password": "secret1",
///   "role": "admin"
/// }
/// ```
///
/// Same schema and duplicate handling as registration; unlike registration,
/// the caller supplies the role.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, unknown role, or duplicate
///   username/email
/// - `403 Forbidden`: Policy requires admin and the caller isn't one
pub async fn add_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(mut req): Json<AddMemberRequest>,
) -> ApiResult<(StatusCode, Json<AddMemberResponse>)> {
    ensure_team_access(&state, &auth)?;

    req.username = normalize_identity(&req.username);
    req.email = normalize_identity(&req.email);
    req.validate()?;

    let role = match req.role.as_deref() {
        Some(raw) => raw.parse::<UserRole>().map_err(ApiError::BadRequest)?,
        None => UserRole::User,
    };

    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Duplicate("Email already registered".to_string()));
    }
    if User::find_by_username(&state.db, &req.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Duplicate("Username already taken".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
            role,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(AddMemberResponse {
            message: "Team member added".to_string(),
            user: user.into(),
        }),
    ))
}
