// src/models/comment.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Somente inserção: não há edição nem remoção de comentários
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleComment {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
