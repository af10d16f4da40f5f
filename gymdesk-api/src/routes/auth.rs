/// Authentication endpoints
///
/// - `POST /v1/auth/signup` - Create a gym owner account
/// - `POST /v1/auth/login` - Exchange email and password for tokens
/// - `POST /v1/auth/refresh` - Exchange a refresh token for an access token
///
/// Signup and login both answer with an access and refresh token pair whose
/// subject is the owner id.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::owner::ProfileResponse,
};
use axum::{extract::State, http::StatusCode, Json};
use gymdesk_shared::{
    auth::{jwt, password},
    models::owner::CreateOwner,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

const EMAIL_TAKEN: &str = "Email already registered";
const BAD_CREDENTIALS: &str = "Invalid email or password";

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 255, message = "Gym name is required"))]
    pub gym_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Checked against `MIN_PASSWORD_LENGTH`
    pub password: String,

    /// Defaults to the gym name
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,

    pub photo_url: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// Signup and login response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub owner: ProfileResponse,

    #[serde(flatten)]
    pub tokens: jwt::TokenPair,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Creates an owner account
///
/// ```text
/// POST /v1/auth/signup
///
/// { "gym_name": "Iron Works", "email": "dana@ironworks.example", "password": "..." }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Email already registered
/// - `422 Unprocessable Entity`: Missing gym name, bad email, or short password
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;
    password::check_password_length(&req.password)?;

    let email = req.email.trim().to_string();
    let gym_name = req.gym_name.trim().to_string();
    if gym_name.is_empty() {
        return Err(ApiError::invalid_field("gym_name", "Gym name is required"));
    }

    if state.store.find_owner_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict(EMAIL_TAKEN.to_string()));
    }

    let name = req
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(gym_name.as_str())
        .to_string();

    let owner = state
        .store
        .insert_owner(CreateOwner {
            name,
            gym_name,
            email,
            password_hash: password::hash_password(&req.password)?,
            photo_url: req.photo_url,
        })
        .await
        .map_err(|e| {
            if e.is_conflict() {
                ApiError::Conflict(EMAIL_TAKEN.to_string())
            } else {
                e.into()
            }
        })?;

    info!(owner_id = %owner.id, "Gym owner signed up");

    let tokens = jwt::issue_token_pair(owner.id, state.jwt_secret())?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            owner: ProfileResponse::from(&owner),
            tokens,
        }),
    ))
}

/// Logs an owner in
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email or wrong password, with the same message
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let owner = state
        .store
        .find_owner_by_email(req.email.trim())
        .await?
        .ok_or_else(|| ApiError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

    if !password::verify_password(&req.password, &owner.password_hash)? {
        warn!(owner_id = %owner.id, "Failed login attempt");
        return Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()));
    }

    info!(owner_id = %owner.id, "Gym owner logged in");

    let tokens = jwt::issue_token_pair(owner.id, state.jwt_secret())?;
    Ok(Json(AuthResponse {
        owner: ProfileResponse::from(&owner),
        tokens,
    }))
}

/// Exchanges a refresh token for a new access token
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid, expired, or non-refresh token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;
    Ok(Json(RefreshResponse { access_token }))
}
