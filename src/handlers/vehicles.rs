// src/handlers/vehicles.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::{dates::local_now, error::AppError},
    config::AppState,
    handlers::appointments::ConfirmQuery,
    models::{vehicle::VehicleForm, VehicleInShop, VehicleInShopTag},
    services::{
        confirmation::Confirmation,
        shop_board::{InlineEdit, ShopView},
    },
};

#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    pub view: Option<ShopView>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleTagPayload {
    pub tag: VehicleInShopTag,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub report: Option<String>,
}

// GET /api/vehicles?view=inShop|delivered
#[utoipa::path(
    get,
    path = "/api/vehicles",
    tag = "Taller",
    params(("view" = Option<String>, Query, description = "inShop ou delivered")),
    responses((status = 200, description = "Veículos da aba atual", body = Vec<VehicleInShop>))
)]
pub async fn list_vehicles(
    State(app_state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<impl IntoResponse, AppError> {
    // Sem `view` devolve o quadro atual; só a troca de aba busca de novo
    let vehicles = match query.view {
        Some(view) => app_state.shop_board.switch_view(view).await?,
        None => app_state.shop_board.snapshot().await,
    };
    Ok(Json(vehicles))
}

// POST /api/vehicles
#[utoipa::path(
    post,
    path = "/api/vehicles",
    tag = "Taller",
    request_body = VehicleForm,
    responses(
        (status = 201, description = "Veículo registrado", body = VehicleInShop),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_vehicle(
    State(app_state): State<AppState>,
    Json(payload): Json<VehicleForm>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = app_state.shop_board.save(payload, None).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

// PUT /api/vehicles/{id}
#[utoipa::path(
    put,
    path = "/api/vehicles/{id}",
    tag = "Taller",
    request_body = VehicleForm,
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, description = "Veículo atualizado", body = VehicleInShop),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Veículo não encontrado")
    )
)]
pub async fn update_vehicle(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VehicleForm>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = app_state.shop_board.save(payload, Some(id)).await?;
    Ok(Json(vehicle))
}

// DELETE /api/vehicles/{id}?confirm=true
#[utoipa::path(
    delete,
    path = "/api/vehicles/{id}",
    tag = "Taller",
    params(
        ("id" = Uuid, Path, description = "ID do veículo"),
        ("confirm" = Option<bool>, Query, description = "Sem confirmação nada é apagado")
    ),
    responses(
        (status = 200, description = "applied ou declined"),
        (status = 404, description = "Veículo não encontrado")
    )
)]
pub async fn delete_vehicle(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ConfirmQuery>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = app_state.shop_board.delete(id, Confirmation::from(query.confirm)).await?;
    Ok(Json(serde_json::json!({ "outcome": outcome })))
}

// POST /api/vehicles/{id}/deliver?confirm=true
#[utoipa::path(
    post,
    path = "/api/vehicles/{id}/deliver",
    tag = "Taller",
    params(
        ("id" = Uuid, Path, description = "ID do veículo"),
        ("confirm" = Option<bool>, Query, description = "Sem confirmação nada muda")
    ),
    responses(
        (status = 200, description = "applied ou declined"),
        (status = 404, description = "Veículo não encontrado")
    )
)]
pub async fn mark_delivered(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ConfirmQuery>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = app_state
        .shop_board
        .mark_delivered(id, Confirmation::from(query.confirm))
        .await?;
    Ok(Json(serde_json::json!({ "outcome": outcome })))
}

// POST /api/vehicles/{id}/tags
#[utoipa::path(
    post,
    path = "/api/vehicles/{id}/tags",
    tag = "Taller",
    request_body = ToggleTagPayload,
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, description = "Veículo com a tag ligada/desligada", body = VehicleInShop),
        (status = 404, description = "Veículo não encontrado")
    )
)]
pub async fn toggle_tag(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ToggleTagPayload>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = app_state.shop_board.toggle_tag(id, payload.tag).await?;
    Ok(Json(vehicle))
}

// PATCH /api/vehicles/{id}/inline
// 202: a gravação acontece depois do período de silêncio
#[utoipa::path(
    patch,
    path = "/api/vehicles/{id}/inline",
    tag = "Taller",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    request_body = InlineEdit,
    responses(
        (status = 202, description = "Aplicado no quadro; gravação agendada", body = VehicleInShop),
        (status = 400, description = "Valor inválido"),
        (status = 404, description = "Veículo não encontrado")
    )
)]
pub async fn edit_inline(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InlineEdit>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = app_state.shop_board.edit_inline(id, payload).await?;
    Ok((StatusCode::ACCEPTED, Json(vehicle)))
}

// GET /api/vehicles/table
#[utoipa::path(
    get,
    path = "/api/vehicles/table",
    tag = "Taller",
    responses((status = 200, description = "Linhas com dias na oficina, atraso e urgência"))
)]
pub async fn table(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.shop_board.table(local_now()).await)
}

// GET /api/vehicles/report
#[utoipa::path(
    get,
    path = "/api/vehicles/report",
    tag = "Taller",
    responses((status = 200, description = "Relatório em texto (null com a oficina vazia)"))
)]
pub async fn report(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let report = app_state.shop_board.report(local_now()).await?;
    Ok(Json(ReportResponse { report }))
}

// GET /api/vehicles/{id}/whatsapp
#[utoipa::path(
    get,
    path = "/api/vehicles/{id}/whatsapp",
    tag = "Taller",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, description = "Mensagem e link wa.me"),
        (status = 404, description = "Veículo não encontrado")
    )
)]
pub async fn whatsapp(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let message = app_state.shop_board.whatsapp(id).await?;
    Ok(Json(message))
}
