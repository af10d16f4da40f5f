/// `GET /v1/dashboard`
///
/// ```json
/// {
///   "counts": { "active": 42, "expired": 3, "expiring_soon": 5 },
///   "recent_members": [ ... ],
///   "notifications": [ ... ]
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use chrono::Utc;
use gymdesk_shared::{auth::middleware::AuthContext, roster::Dashboard};

pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Dashboard>> {
    Ok(Json(state.roster.dashboard(auth.owner_id, Utc::now()).await?))
}
