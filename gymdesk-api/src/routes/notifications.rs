/// Notification endpoints
///
/// - `GET  /v1/notifications` - Newest first
/// - `POST /v1/notifications/:id/read` - `{ "success": bool }`
/// - `GET  /v1/notifications/unread/count` - `{ "count": n }`
///
/// Marking an id that belongs to another owner, or no notification at all,
/// answers `{ "success": false }` rather than an error.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    Json,
};
use gymdesk_shared::{auth::middleware::AuthContext, models::notification::Notification};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkReadResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    pub count: i64,
}

pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<Notification>>> {
    Ok(Json(state.roster.notifications(auth.owner_id).await?))
}

pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MarkReadResponse>> {
    let success = state.roster.mark_notification_read(auth.owner_id, id).await?;
    Ok(Json(MarkReadResponse { success }))
}

pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<UnreadCountResponse>> {
    let count = state.roster.unread_count(auth.owner_id).await?;
    Ok(Json(UnreadCountResponse { count }))
}
