//! Armazenamento em memória.
//!
//! Implementa os três contratos de acesso a dados sobre vetores protegidos por
//! um `RwLock`. Serve para desenvolvimento local sem Postgres (`DATABASE_URL`
//! ausente) e para os testes, com a mesma semântica de erros das procedures:
//! update/delete/entrega de um id inexistente devolvem `NotFound`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::BackendError,
    db::store::{AppointmentStore, CommentStore, VehicleStore},
    models::{
        Appointment, AppointmentStatus, NewAppointment, NewVehicleInShop, VehicleComment, VehicleInShop,
    },
};

#[derive(Default)]
struct MemoryData {
    appointments: Vec<Appointment>,
    vehicles: Vec<VehicleInShop>,
    comments: Vec<VehicleComment>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<MemoryData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Appointment>, BackendError> {
        let data = self.data.read().await;
        let mut appointments = data.appointments.clone();
        appointments.sort_by_key(|a| a.date);
        Ok(appointments)
    }

    async fn create(&self, new: &NewAppointment) -> Result<Appointment, BackendError> {
        let appointment = Appointment {
            id: Uuid::new_v4(),
            customer_name: new.customer_name.clone(),
            vehicle: new.vehicle.clone(),
            service: new.service.clone(),
            date: new.date,
            contact: new.contact.clone(),
            status: AppointmentStatus::Scheduled,
            tags: new.tags.clone(),
        };
        self.data.write().await.appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn update(&self, appointment: &Appointment) -> Result<Appointment, BackendError> {
        let mut data = self.data.write().await;
        let slot = data
            .appointments
            .iter_mut()
            .find(|a| a.id == appointment.id)
            .ok_or_else(|| BackendError::not_found("Cita", appointment.id))?;
        *slot = appointment.clone();
        Ok(appointment.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), BackendError> {
        let mut data = self.data.write().await;
        let before = data.appointments.len();
        data.appointments.retain(|a| a.id != id);
        if data.appointments.len() == before {
            return Err(BackendError::not_found("Cita", id));
        }
        Ok(())
    }
}

#[async_trait]
impl VehicleStore for MemoryStore {
    async fn list_in_shop(&self) -> Result<Vec<VehicleInShop>, BackendError> {
        let data = self.data.read().await;
        let mut vehicles: Vec<_> = data.vehicles.iter().filter(|v| !v.is_delivered()).cloned().collect();
        vehicles.sort_by_key(|v| v.check_in_date);
        Ok(vehicles)
    }

    async fn list_delivered(&self) -> Result<Vec<VehicleInShop>, BackendError> {
        let data = self.data.read().await;
        let mut vehicles: Vec<_> = data.vehicles.iter().filter(|v| v.is_delivered()).cloned().collect();
        vehicles.sort_by(|a, b| b.delivered_at.cmp(&a.delivered_at));
        Ok(vehicles)
    }

    async fn create(&self, new: &NewVehicleInShop) -> Result<VehicleInShop, BackendError> {
        let vehicle = VehicleInShop {
            id: Uuid::new_v4(),
            customer_name: new.customer_name.clone(),
            vehicle: new.vehicle.clone(),
            service: new.service.clone(),
            contact: new.contact.clone(),
            check_in_date: new.check_in_date,
            estimated_completion: new.estimated_completion,
            notes: new.notes.clone(),
            tags: new.tags.clone(),
            delivered_at: None,
            technician: new.technician.clone(),
            labor_hours: new.labor_hours,
            folio: new.folio.clone(),
        };
        self.data.write().await.vehicles.push(vehicle.clone());
        Ok(vehicle)
    }

    async fn update(&self, vehicle: &VehicleInShop) -> Result<VehicleInShop, BackendError> {
        let mut data = self.data.write().await;
        let slot = data
            .vehicles
            .iter_mut()
            .find(|v| v.id == vehicle.id)
            .ok_or_else(|| BackendError::not_found("Vehículo", vehicle.id))?;
        // delivered_at é do banco; o update de registro completo não o altera
        let delivered_at = slot.delivered_at;
        *slot = VehicleInShop { delivered_at, ..vehicle.clone() };
        Ok(slot.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), BackendError> {
        let mut data = self.data.write().await;
        let before = data.vehicles.len();
        data.vehicles.retain(|v| v.id != id);
        if data.vehicles.len() == before {
            return Err(BackendError::not_found("Vehículo", id));
        }
        data.comments.retain(|c| c.vehicle_id != id);
        Ok(())
    }

    async fn mark_delivered(&self, id: Uuid) -> Result<(), BackendError> {
        let mut data = self.data.write().await;
        let vehicle = data
            .vehicles
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| BackendError::not_found("Vehículo", id))?;
        vehicle.delivered_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn list(&self, vehicle_id: Uuid) -> Result<Vec<VehicleComment>, BackendError> {
        let data = self.data.read().await;
        let mut comments: Vec<_> = data.comments.iter().filter(|c| c.vehicle_id == vehicle_id).cloned().collect();
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }

    async fn create(&self, vehicle_id: Uuid, comment: &str) -> Result<VehicleComment, BackendError> {
        let mut data = self.data.write().await;
        if !data.vehicles.iter().any(|v| v.id == vehicle_id) {
            return Err(BackendError::not_found("Vehículo", vehicle_id));
        }
        let created = VehicleComment {
            id: Uuid::new_v4(),
            vehicle_id,
            comment: comment.to_string(),
            created_at: Utc::now(),
        };
        data.comments.push(created.clone());
        Ok(created)
    }
}
