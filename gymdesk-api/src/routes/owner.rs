/// Owner profile and settings
///
/// - `GET /v1/profile` - The signed-in owner
/// - `PUT /v1/profile` - Display name and photo
/// - `PUT /v1/settings` - Gym name and email together, password change, photo

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use gymdesk_shared::{
    auth::{middleware::AuthContext, password},
    models::owner::{GymOwner, UpdateOwner},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Owner as shown to the client, with blank names filled in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub gym_name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&GymOwner> for ProfileResponse {
    fn from(owner: &GymOwner) -> Self {
        Self {
            id: owner.id,
            name: owner.display_name().to_string(),
            gym_name: owner.display_gym_name().to_string(),
            email: owner.email.clone(),
            photo_url: owner.photo_url.clone(),
            created_at: owner.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,

    pub photo_url: Option<String>,
}

/// Settings form
///
/// Gym name and email only change when both are given; the password only
/// changes when both the current and the new password are given.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateSettingsRequest {
    #[validate(length(max = 255, message = "Gym name must be at most 255 characters"))]
    pub gym_name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub photo_url: Option<String>,
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

async fn load_owner(state: &AppState, auth: AuthContext) -> ApiResult<GymOwner> {
    state
        .store
        .find_owner(auth.owner_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Account no longer exists".to_string()))
}

async fn save(state: &AppState, owner: GymOwner, update: UpdateOwner) -> ApiResult<GymOwner> {
    if update.is_empty() {
        return Ok(owner);
    }

    state
        .store
        .update_owner(owner.id, update)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Account no longer exists".to_string()))
}

pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<ProfileResponse>> {
    let owner = load_owner(&state, auth).await?;
    Ok(Json(ProfileResponse::from(&owner)))
}

pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    req.validate()?;
    let owner = load_owner(&state, auth).await?;

    let update = UpdateOwner {
        name: present(&req.name),
        photo_url: present(&req.photo_url),
        ..Default::default()
    };

    let owner = save(&state, owner, update).await?;
    Ok(Json(ProfileResponse::from(&owner)))
}

/// # Errors
///
/// - `401 Unauthorized`: "Current password is incorrect"
/// - `409 Conflict`: Email used by another owner
/// - `422 Unprocessable Entity`: New password too short
pub async fn update_settings(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<UpdateSettingsRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    req.validate()?;
    let owner = load_owner(&state, auth).await?;
    let mut update = UpdateOwner {
        photo_url: present(&req.photo_url),
        ..Default::default()
    };

    if let (Some(gym_name), Some(email)) = (present(&req.gym_name), present(&req.email)) {
        if let Some(other) = state.store.find_owner_by_email(&email).await? {
            if other.id != owner.id {
                return Err(ApiError::Conflict("Email already in use".to_string()));
            }
        }
        update.gym_name = Some(gym_name);
        update.email = Some(email);
    }

    if let (Some(current), Some(new)) = (req.current_password.as_deref(), req.new_password.as_deref()) {
        if !password::verify_password(current, &owner.password_hash)? {
            return Err(ApiError::Unauthorized("Current password is incorrect".to_string()));
        }
        password::check_password_length(new)?;
        update.password_hash = Some(password::hash_password(new)?);
        info!(owner_id = %owner.id, "Owner password changed");
    }

    let owner = save(&state, owner, update).await?;
    Ok(Json(ProfileResponse::from(&owner)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_fills_blank_names() {
        let owner = GymOwner {
            id: Uuid::new_v4(),
            name: " ".to_string(),
            gym_name: String::new(),
            email: "dana@example.com".to_string(),
            password_hash: "hash".to_string(),
            photo_url: None,
            created_at: Utc::now(),
        };

        let profile = ProfileResponse::from(&owner);
        assert_eq!(profile.gym_name, "My Gym");
        assert_eq!(profile.name, "My Gym");
    }

    #[test]
    fn test_present_trims_blank() {
        assert_eq!(present(&Some("  ".to_string())), None);
        assert_eq!(present(&Some(" Iron ".to_string())), Some("Iron".to_string()));
        assert_eq!(present(&None), None);
    }
}
