/// Member endpoints
///
/// - `GET  /v1/members` - Alphabetical listing with the binary status
/// - `POST /v1/members` - Enroll a member
/// - `GET  /v1/members/:id` - Detail with the three-tier status and trainer
/// - `PUT  /v1/members/:id` - Edit and renew with the submitted duration
/// - `POST /v1/members/:id/renew` - Renew only
///
/// Validation failures answer 422 with the failing field, a duplicate email 409,
/// and an id outside the owner's members 404.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use gymdesk_shared::{
    auth::middleware::AuthContext,
    roster::{MemberListing, MemberView},
    validation::{member::parse_duration, FieldValue, MemberForm},
};
use serde::Deserialize;
use uuid::Uuid;

/// Renewal request; a missing duration renews for one month
#[derive(Debug, Default, Deserialize)]
pub struct RenewRequest {
    #[serde(default, alias = "membership_duration")]
    pub duration: Option<FieldValue>,
}

pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<MemberListing>>> {
    let members = state.roster.list_members(auth.owner_id, Utc::now()).await?;
    Ok(Json(members))
}

pub async fn create_member(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(form): Json<MemberForm>,
) -> ApiResult<(StatusCode, Json<MemberListing>)> {
    let now = Utc::now();
    let member = state.roster.enroll(auth.owner_id, &form, now).await?;
    Ok((StatusCode::CREATED, Json(MemberListing::new(member, now))))
}

pub async fn get_member(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MemberView>> {
    let view = state.roster.view_member(auth.owner_id, id, Utc::now()).await?;
    Ok(Json(view))
}

pub async fn update_member(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(form): Json<MemberForm>,
) -> ApiResult<Json<MemberListing>> {
    let now = Utc::now();
    let member = state.roster.update_member(auth.owner_id, id, &form, now).await?;
    Ok(Json(MemberListing::new(member, now)))
}

pub async fn renew_member(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<RenewRequest>,
) -> ApiResult<Json<MemberListing>> {
    let duration = parse_duration(req.duration.as_ref())?;
    let now = Utc::now();
    let member = state.roster.renew_member(auth.owner_id, id, duration, now).await?;
    Ok(Json(MemberListing::new(member, now)))
}
