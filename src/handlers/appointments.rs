// src/handlers/appointments.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::{
        dates::{local_now, DateParseError},
        error::AppError,
    },
    config::AppState,
    models::{appointment::AppointmentForm, Appointment, AppointmentTag, VehicleInShop},
    services::confirmation::Confirmation,
    views::{calendar::CalendarMonth, filter::AppointmentFilter},
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    // Vazio = sem filtro de dia
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectTagPayload {
    pub tag: AppointmentTag,
}

#[derive(Debug, Serialize)]
pub struct DigestResponse {
    pub digest: Option<String>,
}

/// "YYYY-MM-DD" de um `<input type="date">`; string vazia conta como ausente.
pub(crate) fn parse_day(raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::InvalidDate(DateParseError::Invalid(value.to_string()))),
        None => Ok(None),
    }
}

// GET /api/appointments?search=&date=
#[utoipa::path(
    get,
    path = "/api/appointments",
    tag = "Citas",
    params(
        ("search" = Option<String>, Query, description = "Texto buscado em cliente, veículo ou serviço"),
        ("date" = Option<String>, Query, description = "Dia local (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Citas separadas em agendadas e completadas"),
        (status = 400, description = "Data inválida")
    )
)]
pub async fn list_appointments(
    State(app_state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = AppointmentFilter {
        search_term: query.search.unwrap_or_default(),
        date: parse_day(query.date.as_deref())?,
    };

    app_state.appointment_board.load().await?;
    let columns = app_state.appointment_board.set_filter(filter).await;
    Ok(Json(columns))
}

// POST /api/appointments
#[utoipa::path(
    post,
    path = "/api/appointments",
    tag = "Citas",
    request_body = AppointmentForm,
    responses(
        (status = 201, description = "Cita criada", body = Appointment),
        (status = 400, description = "Campos obrigatórios faltando")
    )
)]
pub async fn create_appointment(
    State(app_state): State<AppState>,
    Json(payload): Json<AppointmentForm>,
) -> Result<impl IntoResponse, AppError> {
    let appointment = app_state.appointment_board.save(payload, None).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

// GET /api/appointments/{id}
#[utoipa::path(
    get,
    path = "/api/appointments/{id}",
    tag = "Citas",
    params(("id" = Uuid, Path, description = "ID da cita")),
    responses(
        (status = 200, description = "Valores para o formulário de edição"),
        (status = 404, description = "Cita não encontrada")
    )
)]
pub async fn get_appointment_form(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let values = app_state.appointment_board.form_for(id).await?;
    Ok(Json(values))
}

// PUT /api/appointments/{id}
#[utoipa::path(
    put,
    path = "/api/appointments/{id}",
    tag = "Citas",
    request_body = AppointmentForm,
    params(("id" = Uuid, Path, description = "ID da cita")),
    responses(
        (status = 200, description = "Cita atualizada", body = Appointment),
        (status = 400, description = "Campos obrigatórios faltando"),
        (status = 404, description = "Cita não encontrada")
    )
)]
pub async fn update_appointment(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AppointmentForm>,
) -> Result<impl IntoResponse, AppError> {
    let appointment = app_state.appointment_board.save(payload, Some(id)).await?;
    Ok(Json(appointment))
}

// DELETE /api/appointments/{id}?confirm=true
#[utoipa::path(
    delete,
    path = "/api/appointments/{id}",
    tag = "Citas",
    params(
        ("id" = Uuid, Path, description = "ID da cita"),
        ("confirm" = Option<bool>, Query, description = "Sem confirmação nada é apagado")
    ),
    responses(
        (status = 200, description = "applied ou declined"),
        (status = 404, description = "Cita não encontrada")
    )
)]
pub async fn delete_appointment(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ConfirmQuery>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = app_state
        .appointment_board
        .delete(id, Confirmation::from(query.confirm))
        .await?;
    Ok(Json(serde_json::json!({ "outcome": outcome })))
}

// POST /api/appointments/{id}/toggle
#[utoipa::path(
    post,
    path = "/api/appointments/{id}/toggle",
    tag = "Citas",
    params(("id" = Uuid, Path, description = "ID da cita")),
    responses(
        (status = 200, description = "Revertida, ou aguardando a tag de conclusão"),
        (status = 404, description = "Cita não encontrada")
    )
)]
pub async fn toggle_complete(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = app_state.appointment_board.toggle_complete(id).await?;
    Ok(Json(outcome))
}

// POST /api/appointments/completion/tag
#[utoipa::path(
    post,
    path = "/api/appointments/completion/tag",
    tag = "Citas",
    request_body = SelectTagPayload,
    responses(
        (status = 200, description = "Tag marcada no passo de conclusão"),
        (status = 404, description = "Nenhuma conclusão pendente")
    )
)]
pub async fn select_completion_tag(
    State(app_state): State<AppState>,
    Json(payload): Json<SelectTagPayload>,
) -> Result<impl IntoResponse, AppError> {
    let pending = app_state.appointment_board.select_completion_tag(payload.tag).await?;
    Ok(Json(pending))
}

// POST /api/appointments/completion/confirm
#[utoipa::path(
    post,
    path = "/api/appointments/completion/confirm",
    tag = "Citas",
    responses(
        (status = 200, description = "Resultado da conclusão e do registro na oficina")
    )
)]
pub async fn confirm_completion(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let outcome = app_state.appointment_board.confirm_completion().await?;
    refresh_shop(&app_state).await;
    Ok(Json(outcome))
}

// POST /api/appointments/completion/cancel
#[utoipa::path(
    post,
    path = "/api/appointments/completion/cancel",
    tag = "Citas",
    responses((status = 204, description = "Passo de conclusão fechado"))
)]
pub async fn cancel_completion(State(app_state): State<AppState>) -> impl IntoResponse {
    app_state.appointment_board.cancel_completion().await;
    StatusCode::NO_CONTENT
}

// POST /api/appointments/{id}/move-to-shop
#[utoipa::path(
    post,
    path = "/api/appointments/{id}/move-to-shop",
    tag = "Citas",
    params(("id" = Uuid, Path, description = "ID da cita")),
    responses(
        (status = 201, description = "Veículo registrado na oficina", body = VehicleInShop),
        (status = 404, description = "Cita não encontrada")
    )
)]
pub async fn move_to_shop(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = app_state.appointment_board.move_to_shop(id).await?;
    refresh_shop(&app_state).await;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

// A lista da oficina é outro snapshot; se a recarga falhar ela se corrige na próxima.
async fn refresh_shop(app_state: &AppState) {
    if let Err(e) = app_state.shop_board.refresh().await {
        tracing::warn!("Falha ao recarregar a oficina: {:?}", e);
    }
}

// GET /api/appointments/calendar?year=&month=
#[utoipa::path(
    get,
    path = "/api/appointments/calendar",
    tag = "Citas",
    params(
        ("year" = Option<i32>, Query, description = "Ano; padrão é o mês atual"),
        ("month" = Option<u32>, Query, description = "Mês (1-12)")
    ),
    responses(
        (status = 200, description = "Grade do mês em semanas de domingo a sábado"),
        (status = 400, description = "Mês inválido")
    )
)]
pub async fn calendar(
    State(app_state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<impl IntoResponse, AppError> {
    let today = local_now().date();
    let month = match (query.year, query.month) {
        (Some(year), Some(month)) => CalendarMonth::new(year, month)
            .ok_or_else(|| AppError::field("month", "range", "Mes inválido"))?,
        _ => CalendarMonth::containing(today),
    };

    let grid = app_state.appointment_board.calendar(month, today).await;
    Ok(Json(grid))
}

// GET /api/appointments/day?date=YYYY-MM-DD
#[utoipa::path(
    get,
    path = "/api/appointments/day",
    tag = "Citas",
    params(("date" = Option<String>, Query, description = "Dia local (YYYY-MM-DD); padrão é hoje")),
    responses(
        (status = 200, description = "Agenda do dia em faixas de uma hora"),
        (status = 400, description = "Data inválida")
    )
)]
pub async fn day(
    State(app_state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> Result<impl IntoResponse, AppError> {
    let today = local_now().date();
    let date = parse_day(query.date.as_deref())?.unwrap_or(today);
    let agenda = app_state.appointment_board.day(date, today).await;
    Ok(Json(agenda))
}

// GET /api/appointments/digest
#[utoipa::path(
    get,
    path = "/api/appointments/digest",
    tag = "Citas",
    responses((status = 200, description = "Resumo das citas de hoje (null se não houver)"))
)]
pub async fn daily_digest(State(app_state): State<AppState>) -> impl IntoResponse {
    let digest = app_state.appointment_board.daily_digest(local_now().date()).await;
    Json(DigestResponse { digest })
}
