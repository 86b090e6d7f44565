// src/routes.rs

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::{config::AppState, docs, handlers};

pub fn app(app_state: AppState) -> Router {
    let appointment_routes = Router::new()
        .route(
            "/",
            get(handlers::appointments::list_appointments).post(handlers::appointments::create_appointment),
        )
        .route("/calendar", get(handlers::appointments::calendar))
        .route("/day", get(handlers::appointments::day))
        .route("/digest", get(handlers::appointments::daily_digest))
        .route("/completion/tag", post(handlers::appointments::select_completion_tag))
        .route("/completion/confirm", post(handlers::appointments::confirm_completion))
        .route("/completion/cancel", post(handlers::appointments::cancel_completion))
        .route(
            "/{id}",
            get(handlers::appointments::get_appointment_form)
                .put(handlers::appointments::update_appointment)
                .delete(handlers::appointments::delete_appointment),
        )
        .route("/{id}/toggle", post(handlers::appointments::toggle_complete))
        .route("/{id}/move-to-shop", post(handlers::appointments::move_to_shop));

    let vehicle_routes = Router::new()
        .route(
            "/",
            get(handlers::vehicles::list_vehicles).post(handlers::vehicles::create_vehicle),
        )
        .route("/table", get(handlers::vehicles::table))
        .route("/report", get(handlers::vehicles::report))
        .route(
            "/{id}",
            put(handlers::vehicles::update_vehicle).delete(handlers::vehicles::delete_vehicle),
        )
        .route("/{id}/deliver", post(handlers::vehicles::mark_delivered))
        .route("/{id}/tags", post(handlers::vehicles::toggle_tag))
        .route("/{id}/inline", patch(handlers::vehicles::edit_inline))
        .route("/{id}/whatsapp", get(handlers::vehicles::whatsapp))
        .route(
            "/{id}/comments",
            get(handlers::comments::list_comments).post(handlers::comments::create_comment),
        );

    let assistant_routes = Router::new().route(
        "/service-description",
        post(handlers::assistant::service_description),
    );

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .nest("/api/appointments", appointment_routes)
        .nest("/api/vehicles", vehicle_routes)
        .nest("/api/assistant", assistant_routes)
        .with_state(app_state)
}
