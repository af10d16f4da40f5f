/// Lifecycle preview endpoints
///
/// - `POST /v1/lifecycle/status` - `{ "membership_end": ... }`
/// - `POST /v1/lifecycle/renewal` - `{ "membership_end": ..., "duration": 3 }`
///
/// `membership_end` may be an RFC 3339 timestamp, a naive date-time, or a bare
/// `YYYY-MM-DD` date. Anything else is treated as "now" and the response
/// carries `"fell_back": true`.

use crate::error::ApiResult;
use axum::Json;
use chrono::Utc;
use gymdesk_shared::{
    auth::middleware::AuthContext,
    lifecycle::{
        preview::{preview_renewal, preview_status, RenewalPreview, StatusPreview},
        timestamp::RawTimestamp,
    },
    validation::{member::parse_duration, FieldValue},
};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub membership_end: RawTimestamp,
}

#[derive(Debug, Deserialize)]
pub struct RenewalRequest {
    pub membership_end: RawTimestamp,

    #[serde(default, alias = "membership_duration")]
    pub duration: Option<FieldValue>,
}

pub async fn status(auth: AuthContext, Json(req): Json<StatusRequest>) -> ApiResult<Json<StatusPreview>> {
    let preview = preview_status(&req.membership_end, Utc::now());
    debug!(owner_id = %auth.owner_id, fell_back = preview.fell_back, "Status preview");
    Ok(Json(preview))
}

pub async fn renewal(
    auth: AuthContext,
    Json(req): Json<RenewalRequest>,
) -> ApiResult<Json<RenewalPreview>> {
    let duration = parse_duration(req.duration.as_ref())?;
    let preview = preview_renewal(&req.membership_end, duration, Utc::now());
    debug!(owner_id = %auth.owner_id, fell_back = preview.fell_back, "Renewal preview");
    Ok(Json(preview))
}
