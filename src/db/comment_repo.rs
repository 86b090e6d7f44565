// src/db/comment_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::BackendError, db::store::CommentStore, models::VehicleComment};

#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentStore for CommentRepository {
    async fn list(&self, vehicle_id: Uuid) -> Result<Vec<VehicleComment>, BackendError> {
        let comments = sqlx::query_as::<_, VehicleComment>("SELECT * FROM rpc_get_vehicle_comments($1)")
            .bind(vehicle_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(comments)
    }

    async fn create(&self, vehicle_id: Uuid, comment: &str) -> Result<VehicleComment, BackendError> {
        let created = sqlx::query_as::<_, VehicleComment>("SELECT * FROM rpc_create_vehicle_comment($1, $2)")
            .bind(vehicle_id)
            .bind(comment)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                // Comentário para veículo inexistente viola a FK
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation() {
                        return BackendError::not_found("Vehículo", vehicle_id);
                    }
                }
                BackendError::Database(e)
            })?;

        Ok(created)
    }
}
