// src/db/store.rs

//! Contrato da camada de acesso a dados.
//!
//! Toda operação é remota e falha rápido: não há retry aqui, o erro sobe para
//! quem chamou. Os `list*` nunca alteram estado. Os registros devolvidos já vêm
//! completos (id, status padrão e timestamps são gerados pelo banco).

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::BackendError,
    models::{Appointment, NewAppointment, NewVehicleInShop, VehicleComment, VehicleInShop},
};

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Todas as citas, por data crescente.
    async fn list(&self) -> Result<Vec<Appointment>, BackendError>;

    /// Cria com status `Scheduled`; o banco atribui o id.
    async fn create(&self, new: &NewAppointment) -> Result<Appointment, BackendError>;

    /// Substitui o registro inteiro. Edições parciais devem ser mescladas antes.
    async fn update(&self, appointment: &Appointment) -> Result<Appointment, BackendError>;

    async fn delete(&self, id: Uuid) -> Result<(), BackendError>;
}

#[async_trait]
pub trait VehicleStore: Send + Sync {
    /// Veículos sem `delivered_at`.
    async fn list_in_shop(&self) -> Result<Vec<VehicleInShop>, BackendError>;

    /// Veículos com `delivered_at`.
    async fn list_delivered(&self) -> Result<Vec<VehicleInShop>, BackendError>;

    async fn create(&self, new: &NewVehicleInShop) -> Result<VehicleInShop, BackendError>;

    async fn update(&self, vehicle: &VehicleInShop) -> Result<VehicleInShop, BackendError>;

    async fn delete(&self, id: Uuid) -> Result<(), BackendError>;

    /// Marca `delivered_at` com o "agora" do banco. Chamar duas vezes apenas
    /// regrava o horário.
    async fn mark_delivered(&self, id: Uuid) -> Result<(), BackendError>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Comentários do veículo, do mais antigo ao mais novo.
    async fn list(&self, vehicle_id: Uuid) -> Result<Vec<VehicleComment>, BackendError>;

    async fn create(&self, vehicle_id: Uuid, comment: &str) -> Result<VehicleComment, BackendError>;
}
