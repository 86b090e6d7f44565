use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::common::dates::DateParseError;

/// Falhas da camada de acesso a dados. Nenhuma é re-tentada: todas sobem para
/// quem chamou, que decide o aviso ao usuário.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{entity} {id} no encontrado")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Erro de banco de dados: {0}")]
    Database(#[from] sqlx::Error),

    // Linha que voltou do banco mas não cabe no modelo (tag desconhecida, etc.)
    #[error("Registro inválido vindo do banco: {0}")]
    Decode(String),
}

impl BackendError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        BackendError::NotFound { entity, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound { .. })
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error(transparent)]
    InvalidDate(#[from] DateParseError),

    // Registro ausente do snapshot em memória (nenhuma chamada ao banco foi feita)
    #[error("{0} no encontrado")]
    NotFound(&'static str),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    /// Erro de validação de um único campo, com código em vez de frase.
    pub fn field(field: &'static str, code: &'static str, message: &str) -> Self {
        let mut errors = validator::ValidationErrors::new();
        let mut error = validator::ValidationError::new(code);
        error.message = Some(message.to_string().into());
        errors.add(field, error);
        AppError::ValidationError(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Por favor, completa todos los campos obligatorios.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidDate(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::NotFound(entity) => (StatusCode::NOT_FOUND, format!("{} no encontrado.", entity)),
            AppError::Backend(ref e @ BackendError::NotFound { .. }) => {
                tracing::warn!("Registro inexistente no banco: {}", e);
                (StatusCode::NOT_FOUND, e.to_string())
            }

            // O resto vira 500. O detalhe fica no log, o usuário recebe um aviso curto.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "No se pudo completar la operación. Por favor, inténtelo de nuevo.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
