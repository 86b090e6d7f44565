// src/services/comment_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{common::error::AppError, db::CommentStore, models::VehicleComment};

#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn CommentStore>,
}

impl CommentService {
    pub fn new(store: Arc<dyn CommentStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, vehicle_id: Uuid) -> Result<Vec<VehicleComment>, AppError> {
        Ok(self.store.list(vehicle_id).await?)
    }

    pub async fn create(&self, vehicle_id: Uuid, text: &str) -> Result<VehicleComment, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::field("comment", "required", "El comentario no puede estar vacío"));
        }

        let comment = self.store.create(vehicle_id, text).await?;
        tracing::info!("💬 Comentario agregado al vehículo {}", vehicle_id);
        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::dates::parse_local_date,
        db::{MemoryStore, VehicleStore},
        models::NewVehicleInShop,
    };
    use rust_decimal::Decimal;

    async fn vehicle_id(store: &MemoryStore) -> Uuid {
        let new = NewVehicleInShop {
            customer_name: "Luis".into(),
            vehicle: "Versa".into(),
            service: "Clutch".into(),
            contact: "555".into(),
            check_in_date: parse_local_date("2024-06-01T09:00").unwrap(),
            estimated_completion: None,
            notes: String::new(),
            tags: Vec::new(),
            technician: None,
            labor_hours: Decimal::ZERO,
            folio: None,
        };
        VehicleStore::create(store, &new).await.unwrap().id
    }

    #[tokio::test]
    async fn text_is_trimmed_before_storing() {
        let store = MemoryStore::new();
        let id = vehicle_id(&store).await;
        let service = CommentService::new(Arc::new(store));

        let created = service.create(id, "  Llegó la refacción \n").await.unwrap();
        assert_eq!(created.comment, "Llegó la refacción");
        assert_eq!(service.list(id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn blank_text_never_reaches_the_store() {
        let store = MemoryStore::new();
        let id = vehicle_id(&store).await;
        let service = CommentService::new(Arc::new(store));

        let err = service.create(id, "   ").await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(service.list(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_vehicle_is_not_found() {
        let service = CommentService::new(Arc::new(MemoryStore::new()));
        let err = service.create(Uuid::new_v4(), "hola").await.unwrap_err();
        assert!(matches!(err, AppError::Backend(ref e) if e.is_not_found()));
    }
}
