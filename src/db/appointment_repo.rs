// src/db/appointment_repo.rs

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::{
    common::error::BackendError,
    db::store::AppointmentStore,
    models::{Appointment, AppointmentStatus, AppointmentTag, NewAppointment},
};

// Linha crua da tabela; status e tags chegam como texto
#[derive(Debug, FromRow)]
struct AppointmentRow {
    id: Uuid,
    customer_name: String,
    vehicle: String,
    service: String,
    date: NaiveDateTime,
    contact: String,
    status: String,
    tags: Vec<String>,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = BackendError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<AppointmentStatus>().map_err(BackendError::Decode)?;
        let tags = row
            .tags
            .iter()
            .map(|tag| tag.parse::<AppointmentTag>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(BackendError::Decode)?;

        Ok(Appointment {
            id: row.id,
            customer_name: row.customer_name,
            vehicle: row.vehicle,
            service: row.service,
            date: row.date,
            contact: row.contact,
            status,
            tags,
        })
    }
}

fn tag_labels(tags: &[AppointmentTag]) -> Vec<String> {
    tags.iter().map(|tag| tag.as_str().to_string()).collect()
}

/// Citas no Postgres, sempre através das procedures `rpc_*`.
#[derive(Clone)]
pub struct AppointmentRepository {
    pool: PgPool,
}

impl AppointmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentStore for AppointmentRepository {
    async fn list(&self) -> Result<Vec<Appointment>, BackendError> {
        let rows = sqlx::query_as::<_, AppointmentRow>("SELECT * FROM rpc_get_appointments()")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Appointment::try_from).collect()
    }

    async fn create(&self, new: &NewAppointment) -> Result<Appointment, BackendError> {
        let row = sqlx::query_as::<_, AppointmentRow>(
            "SELECT * FROM rpc_create_appointment($1, $2, $3, $4, $5, $6)",
        )
        .bind(&new.customer_name)
        .bind(&new.vehicle)
        .bind(&new.service)
        .bind(new.date)
        .bind(&new.contact)
        .bind(tag_labels(&new.tags))
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn update(&self, appointment: &Appointment) -> Result<Appointment, BackendError> {
        let row = sqlx::query_as::<_, AppointmentRow>(
            "SELECT * FROM rpc_update_appointment($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(appointment.id)
        .bind(&appointment.customer_name)
        .bind(&appointment.vehicle)
        .bind(&appointment.service)
        .bind(appointment.date)
        .bind(&appointment.contact)
        .bind(appointment.status.as_str())
        .bind(tag_labels(&appointment.tags))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| BackendError::not_found("Cita", appointment.id))?;

        row.try_into()
    }

    async fn delete(&self, id: Uuid) -> Result<(), BackendError> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(BackendError::not_found("Cita", id));
        }
        Ok(())
    }
}
