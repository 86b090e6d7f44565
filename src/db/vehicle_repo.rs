// src/db/vehicle_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::{
    common::error::BackendError,
    db::store::VehicleStore,
    models::{NewVehicleInShop, VehicleInShop, VehicleInShopTag},
};

#[derive(Debug, FromRow)]
struct VehicleRow {
    id: Uuid,
    customer_name: String,
    vehicle: String,
    service: String,
    contact: String,
    check_in_date: NaiveDateTime,
    estimated_completion: Option<NaiveDateTime>,
    notes: String,
    tags: Vec<String>,
    delivered_at: Option<DateTime<Utc>>,
    technician: Option<String>,
    labor_hours: Decimal,
    folio: Option<String>,
}

impl TryFrom<VehicleRow> for VehicleInShop {
    type Error = BackendError;

    fn try_from(row: VehicleRow) -> Result<Self, Self::Error> {
        let tags = row
            .tags
            .iter()
            .map(|tag| tag.parse::<VehicleInShopTag>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(BackendError::Decode)?;

        Ok(VehicleInShop {
            id: row.id,
            customer_name: row.customer_name,
            vehicle: row.vehicle,
            service: row.service,
            contact: row.contact,
            check_in_date: row.check_in_date,
            estimated_completion: row.estimated_completion,
            notes: row.notes,
            tags,
            delivered_at: row.delivered_at,
            technician: row.technician,
            labor_hours: row.labor_hours,
            folio: row.folio,
        })
    }
}

fn tag_labels(tags: &[VehicleInShopTag]) -> Vec<String> {
    tags.iter().map(|tag| tag.as_str().to_string()).collect()
}

#[derive(Clone)]
pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_list(&self, procedure: &str) -> Result<Vec<VehicleInShop>, BackendError> {
        let rows = sqlx::query_as::<_, VehicleRow>(&format!("SELECT * FROM {}()", procedure))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(VehicleInShop::try_from).collect()
    }
}

#[async_trait]
impl VehicleStore for VehicleRepository {
    async fn list_in_shop(&self) -> Result<Vec<VehicleInShop>, BackendError> {
        self.fetch_list("rpc_get_vehicles_in_shop").await
    }

    async fn list_delivered(&self) -> Result<Vec<VehicleInShop>, BackendError> {
        self.fetch_list("rpc_get_delivered_vehicles").await
    }

    async fn create(&self, new: &NewVehicleInShop) -> Result<VehicleInShop, BackendError> {
        let row = sqlx::query_as::<_, VehicleRow>(
            "SELECT * FROM rpc_create_vehicle_in_shop($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(&new.customer_name)
        .bind(&new.vehicle)
        .bind(&new.service)
        .bind(&new.contact)
        .bind(new.check_in_date)
        .bind(new.estimated_completion)
        .bind(&new.notes)
        .bind(tag_labels(&new.tags))
        .bind(new.technician.as_deref())
        .bind(new.labor_hours)
        .bind(new.folio.as_deref())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn update(&self, vehicle: &VehicleInShop) -> Result<VehicleInShop, BackendError> {
        let row = sqlx::query_as::<_, VehicleRow>(
            "SELECT * FROM rpc_update_vehicle_in_shop($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(vehicle.id)
        .bind(&vehicle.customer_name)
        .bind(&vehicle.vehicle)
        .bind(&vehicle.service)
        .bind(&vehicle.contact)
        .bind(vehicle.check_in_date)
        .bind(vehicle.estimated_completion)
        .bind(&vehicle.notes)
        .bind(tag_labels(&vehicle.tags))
        .bind(vehicle.technician.as_deref())
        .bind(vehicle.labor_hours)
        .bind(vehicle.folio.as_deref())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| BackendError::not_found("Vehículo", vehicle.id))?;

        row.try_into()
    }

    async fn delete(&self, id: Uuid) -> Result<(), BackendError> {
        let result = sqlx::query("DELETE FROM vehicles_in_shop WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(BackendError::not_found("Vehículo", id));
        }
        Ok(())
    }

    async fn mark_delivered(&self, id: Uuid) -> Result<(), BackendError> {
        let result = sqlx::query("UPDATE vehicles_in_shop SET delivered_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(BackendError::not_found("Vehículo", id));
        }
        Ok(())
    }
}
