/// `GET /v1/search?query=...`
///
/// Up to five members and five trainers whose fields contain the query,
/// case-insensitively, merged and sorted by name. A missing or blank query
/// returns an empty list.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use gymdesk_shared::{auth::middleware::AuthContext, roster::SearchHit};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

pub async fn search(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<SearchHit>>> {
    let hits = state
        .roster
        .search(auth.owner_id, &params.query, Utc::now())
        .await?;
    Ok(Json(hits))
}
