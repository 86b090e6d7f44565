// src/docs.rs

use axum::Json;
use utoipa::OpenApi;

use crate::{handlers, models, services};

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Citas ---
        handlers::appointments::list_appointments,
        handlers::appointments::create_appointment,
        handlers::appointments::get_appointment_form,
        handlers::appointments::update_appointment,
        handlers::appointments::delete_appointment,
        handlers::appointments::toggle_complete,
        handlers::appointments::select_completion_tag,
        handlers::appointments::confirm_completion,
        handlers::appointments::cancel_completion,
        handlers::appointments::move_to_shop,
        handlers::appointments::calendar,
        handlers::appointments::day,
        handlers::appointments::daily_digest,

        // --- Taller ---
        handlers::vehicles::list_vehicles,
        handlers::vehicles::create_vehicle,
        handlers::vehicles::update_vehicle,
        handlers::vehicles::delete_vehicle,
        handlers::vehicles::mark_delivered,
        handlers::vehicles::toggle_tag,
        handlers::vehicles::edit_inline,
        handlers::vehicles::table,
        handlers::vehicles::report,
        handlers::vehicles::whatsapp,

        // --- Comentarios ---
        handlers::comments::list_comments,
        handlers::comments::create_comment,

        // --- Asistente ---
        handlers::assistant::service_description,
    ),
    components(
        schemas(
            // --- Citas ---
            models::AppointmentStatus,
            models::AppointmentTag,
            models::Appointment,
            models::appointment::AppointmentForm,
            handlers::appointments::SelectTagPayload,

            // --- Taller ---
            models::VehicleInShopTag,
            models::VehicleInShop,
            models::vehicle::VehicleForm,
            handlers::vehicles::ToggleTagPayload,
            services::shop_board::InlineEdit,

            // --- Comentarios ---
            models::VehicleComment,
            handlers::comments::CreateCommentPayload,

            // --- Asistente ---
            handlers::assistant::ServiceDescriptionPayload,
            services::ai_service::ServiceDescription,
        )
    ),
    tags(
        (name = "Citas", description = "Agenda de citas, conclusão e visões de calendário"),
        (name = "Taller", description = "Veículos na oficina e entregas"),
        (name = "Comentarios", description = "Histórico de comentários por veículo"),
        (name = "Asistente", description = "Sugestão de descrição de serviço com IA")
    )
)]
pub struct ApiDoc;

// GET /api-docs/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
