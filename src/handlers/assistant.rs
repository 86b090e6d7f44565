// src/handlers/assistant.rs

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{common::error::AppError, config::AppState, services::ai_service::ServiceDescription};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptionPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Hace ruido al frenar")]
    pub complaint: String,
}

// POST /api/assistant/service-description
#[utoipa::path(
    post,
    path = "/api/assistant/service-description",
    tag = "Asistente",
    request_body = ServiceDescriptionPayload,
    responses(
        (status = 200, description = "Descrição sugerida (ou aviso, se a IA estiver indisponível)", body = ServiceDescription),
        (status = 400, description = "Queixa vazia")
    )
)]
pub async fn service_description(
    State(app_state): State<AppState>,
    Json(mut payload): Json<ServiceDescriptionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.complaint = payload.complaint.trim().to_string();
    payload.validate()?;

    let description = app_state.ai_service.generate_service_description(&payload.complaint).await;
    Ok(Json(ServiceDescription { description }))
}
