/// Profile and password self-service endpoints
///
/// - `PATCH /api/user/password` - Change the caller's password
/// - `PATCH /api/user/profile` - Update allow-listed profile fields
///
/// The profile path updates username, phone, bio, and avatar only. Email and
/// role sent in the body are ignored, not errors: the deserializer simply has
/// no slot for them, so the role cannot be self-elevated here.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use taskmaster_shared::{
    auth::{middleware::AuthContext, password},
    models::user::{normalize_identity, PublicUser, UpdateProfile, User},
};
use validator::Validate;

/// Password-change request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    #[serde(default)]
    pub current_password: String,

    #[serde(default)]
    pub new_password: String,
}

/// Password-change response
#[derive(Debug, Serialize)]
pub struct UpdatePasswordResponse {
    pub message: String,
}

/// Profile-update request
///
/// Only the allow-listed fields exist here; anything else in the body
/// (email, role) is dropped by deserialization.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: Option<String>,

    pub phone: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// Profile-update response
#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub message: String,
    pub user: PublicUser,
}

/// Change the caller's password
///
/// # Endpoint
///
/// ```text
/// PATCH /api/user/password
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "currentPassword": "secret1",
///   "newPassword": "secret2"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing fields, new password too short, or new
///   password equal to the current one
/// - `401 Unauthorized`: Current password doesn't verify
/// - `404 Not Found`: Account no longer exists
pub async fn update_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdatePasswordRequest>,
) -> ApiResult<Json<UpdatePasswordResponse>> {
    if req.current_password.is_empty() || req.new_password.is_empty() {
        return Err(ApiError::BadRequest(
            "Current and new password are required".to_string(),
        ));
    }

    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    let valid = password::verify_password(&req.current_password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::InvalidCredentials(
            "Invalid credentials".to_string(),
        ));
    }

    if req.new_password.len() < 6 {
        return Err(ApiError::BadRequest(
            "New password must be at least 6 characters".to_string(),
        ));
    }

    // A no-op change is a user error, not a silent success
    if req.new_password == req.current_password {
        return Err(ApiError::BadRequest(
            "New password must differ from the current password".to_string(),
        ));
    }

    let password_hash = password::hash_password(&req.new_password)?;
    let updated = User::update_password_hash(&state.db, user.id, &password_hash).await?;
    if !updated {
        return Err(ApiError::NotFound("Account not found".to_string()));
    }

    Ok(Json(UpdatePasswordResponse {
        message: "Password updated".to_string(),
    }))
}

/// Update the caller's profile
///
/// # Endpoint
///
/// ```text
/// PATCH /api/user/profile
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "username": "alice2",
///   "bio": "Plans everything"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Username too short or already taken by another
///   account
/// - `404 Not Found`: Account no longer exists
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(mut req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UpdateProfileResponse>> {
    req.username = req.username.as_deref().map(normalize_identity);
    req.validate()?;

    if let Some(ref username) = req.username {
        // The caller keeping their own username is not a collision
        if User::username_taken_by_other(&state.db, username, auth.user_id).await? {
            return Err(ApiError::Duplicate("Username already taken".to_string()));
        }
    }

    let update = UpdateProfile {
        username: req.username,
        phone: req.phone.map(Some),
        bio: req.bio.map(Some),
        avatar_url: req.avatar_url,
    };

    let user = User::update_profile(&state.db, auth.user_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    Ok(Json(UpdateProfileResponse {
        message: "Profile updated".to_string(),
        user: user.into(),
    }))
}
