// src/handlers/comments.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState, models::VehicleComment};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCommentPayload {
    pub comment: String,
}

// GET /api/vehicles/{id}/comments
#[utoipa::path(
    get,
    path = "/api/vehicles/{id}/comments",
    tag = "Comentarios",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses((status = 200, description = "Comentários em ordem de criação", body = Vec<VehicleComment>))
)]
pub async fn list_comments(
    State(app_state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let comments = app_state.comment_service.list(vehicle_id).await?;
    Ok(Json(comments))
}

// POST /api/vehicles/{id}/comments
#[utoipa::path(
    post,
    path = "/api/vehicles/{id}/comments",
    tag = "Comentarios",
    request_body = CreateCommentPayload,
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 201, description = "Comentário criado", body = VehicleComment),
        (status = 400, description = "Comentário vazio"),
        (status = 404, description = "Veículo não encontrado")
    )
)]
pub async fn create_comment(
    State(app_state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
    Json(payload): Json<CreateCommentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let comment = app_state.comment_service.create(vehicle_id, &payload.comment).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
