/// Trainer endpoints
///
/// - `GET  /v1/trainers` - Alphabetical
/// - `POST /v1/trainers`
/// - `GET  /v1/trainers/:id`
/// - `PUT  /v1/trainers/:id` - Full replacement of the trainer's fields

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use gymdesk_shared::{
    auth::middleware::AuthContext, models::trainer::Trainer, validation::TrainerForm,
};
use uuid::Uuid;

pub async fn list_trainers(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<Trainer>>> {
    Ok(Json(state.roster.list_trainers(auth.owner_id).await?))
}

pub async fn create_trainer(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(form): Json<TrainerForm>,
) -> ApiResult<(StatusCode, Json<Trainer>)> {
    let trainer = state.roster.create_trainer(auth.owner_id, &form).await?;
    Ok((StatusCode::CREATED, Json(trainer)))
}

pub async fn get_trainer(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Trainer>> {
    Ok(Json(state.roster.trainer(auth.owner_id, id).await?))
}

pub async fn update_trainer(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(form): Json<TrainerForm>,
) -> ApiResult<Json<Trainer>> {
    Ok(Json(state.roster.update_trainer(auth.owner_id, id, &form).await?))
}
