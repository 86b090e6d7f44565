// src/services/appointment_board.rs

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        dates::{format_date_for_input, local_now},
        error::AppError,
    },
    db::{AppointmentStore, VehicleStore},
    models::{
        appointment::{AppointmentForm, AppointmentFormValues},
        Appointment, AppointmentTag, NewVehicleInShop, VehicleInShop,
    },
    services::confirmation::{ActionOutcome, Confirmation},
    views::{
        calendar::{month_grid, CalendarGrid, CalendarMonth},
        day::{day_agenda, DayAgenda},
        filter::{split_by_status, AppointmentColumns, AppointmentFilter},
        reports,
    },
};

/// Passo de conclusão aberto: a cita escolhida e a tag marcada até agora.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCompletion {
    pub appointment_id: Uuid,
    pub selected_tag: Option<AppointmentTag>,
    pub options: Vec<AppointmentTag>,
}

impl PendingCompletion {
    fn new(appointment_id: Uuid) -> Self {
        Self {
            appointment_id,
            selected_tag: None,
            options: AppointmentTag::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", content = "data", rename_all = "camelCase")]
pub enum ToggleOutcome {
    /// Estava completada: voltou para Scheduled, sem tags.
    Reverted(Appointment),
    /// Estava agendada: nada mudou ainda, falta escolher a tag.
    AwaitingTag(PendingCompletion),
}

/// O que aconteceu com o registro da oficina depois de completar a cita.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", content = "vehicle", rename_all = "camelCase")]
pub enum ShopRecordOutcome {
    NotApplicable,
    Created(VehicleInShop),
    Failed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum CompletionOutcome {
    NothingPending,
    NoTagSelected,
    #[serde(rename_all = "camelCase")]
    Completed {
        appointment: Appointment,
        shop_record: ShopRecordOutcome,
    },
}

#[derive(Default)]
struct BoardState {
    appointments: Vec<Appointment>,
    filter: AppointmentFilter,
    pending: Option<PendingCompletion>,
}

impl BoardState {
    fn find(&self, id: Uuid) -> Result<&Appointment, AppError> {
        self.appointments
            .iter()
            .find(|a| a.id == id)
            .ok_or(AppError::NotFound("Cita"))
    }
}

/// Estado da tela de citas. Cada operação segura o lock do início ao fim,
/// incluindo as chamadas ao banco.
#[derive(Clone)]
pub struct AppointmentBoard {
    appointments: Arc<dyn AppointmentStore>,
    vehicles: Arc<dyn VehicleStore>,
    state: Arc<Mutex<BoardState>>,
}

impl AppointmentBoard {
    pub fn new(appointments: Arc<dyn AppointmentStore>, vehicles: Arc<dyn VehicleStore>) -> Self {
        Self {
            appointments,
            vehicles,
            state: Arc::new(Mutex::new(BoardState::default())),
        }
    }

    // =========================================================================
    //  1. SNAPSHOT
    // =========================================================================

    pub async fn load(&self) -> Result<Vec<Appointment>, AppError> {
        let mut state = self.state.lock().await;
        state.appointments = self.appointments.list().await?;
        Ok(state.appointments.clone())
    }

    pub async fn snapshot(&self) -> Vec<Appointment> {
        self.state.lock().await.appointments.clone()
    }

    // A mutação já foi aceita; se a recarga falhar o snapshot fica velho até a próxima.
    async fn reload(&self, state: &mut BoardState) {
        match self.appointments.list().await {
            Ok(appointments) => state.appointments = appointments,
            Err(e) => tracing::warn!("Falha ao recarregar citas após mutação: {}", e),
        }
    }

    // =========================================================================
    //  2. CRIAÇÃO / EDIÇÃO / REMOÇÃO
    // =========================================================================

    pub async fn save(&self, form: AppointmentForm, id: Option<Uuid>) -> Result<Appointment, AppError> {
        form.validate()?;
        let date = form.scheduled_at()?;

        let mut state = self.state.lock().await;
        let saved = match id {
            Some(id) => {
                let merged = form.merge_into(state.find(id)?, date);
                self.appointments.update(&merged).await?
            }
            None => self.appointments.create(&form.into_new(date)).await?,
        };

        tracing::info!("📅 Cita {} guardada para {}", saved.id, saved.date);
        self.reload(&mut state).await;
        Ok(saved)
    }

    pub async fn form_for(&self, id: Uuid) -> Result<AppointmentFormValues, AppError> {
        let state = self.state.lock().await;
        let appointment = state.find(id)?;
        Ok(AppointmentFormValues {
            id: appointment.id,
            customer_name: appointment.customer_name.clone(),
            vehicle: appointment.vehicle.clone(),
            service: appointment.service.clone(),
            date: format_date_for_input(&appointment.date),
            contact: appointment.contact.clone(),
            tags: appointment.tags.clone(),
        })
    }

    /// Cancelar uma cita é apagá-la.
    pub async fn delete(&self, id: Uuid, confirmation: Confirmation) -> Result<ActionOutcome, AppError> {
        if !confirmation.is_confirmed() {
            return Ok(ActionOutcome::Declined);
        }

        let mut state = self.state.lock().await;
        self.appointments.delete(id).await?;
        if state.pending.as_ref().is_some_and(|p| p.appointment_id == id) {
            state.pending = None;
        }
        tracing::info!("🗑️ Cita {} eliminada", id);
        self.reload(&mut state).await;
        Ok(ActionOutcome::Applied)
    }

    // =========================================================================
    //  3. CONCLUSÃO
    // =========================================================================

    pub async fn toggle_complete(&self, id: Uuid) -> Result<ToggleOutcome, AppError> {
        let mut state = self.state.lock().await;
        let appointment = state.find(id)?.clone();

        if appointment.is_completed() {
            let updated = self.appointments.update(&appointment.reverted()).await?;
            self.reload(&mut state).await;
            return Ok(ToggleOutcome::Reverted(updated));
        }

        let pending = PendingCompletion::new(id);
        state.pending = Some(pending.clone());
        Ok(ToggleOutcome::AwaitingTag(pending))
    }

    pub async fn pending_completion(&self) -> Option<PendingCompletion> {
        self.state.lock().await.pending.clone()
    }

    pub async fn select_completion_tag(&self, tag: AppointmentTag) -> Result<PendingCompletion, AppError> {
        let mut state = self.state.lock().await;
        let pending = state.pending.as_mut().ok_or(AppError::NotFound("Cierre de cita pendiente"))?;
        pending.selected_tag = Some(tag);
        Ok(pending.clone())
    }

    pub async fn cancel_completion(&self) {
        self.state.lock().await.pending = None;
    }

    /// Sem tag escolhida não faz nada. Com tag: grava Completed + [tag] e, se a
    /// tag indica que o carro chegou, abre o registro na oficina. Essa segunda
    /// chamada é independente: se falhar, a cita continua completada.
    pub async fn confirm_completion(&self) -> Result<CompletionOutcome, AppError> {
        let mut state = self.state.lock().await;
        let Some(pending) = state.pending.clone() else {
            return Ok(CompletionOutcome::NothingPending);
        };
        let Some(tag) = pending.selected_tag else {
            return Ok(CompletionOutcome::NoTagSelected);
        };

        let appointment = state.find(pending.appointment_id)?.completed_with(tag);
        // Se o update falhar o passo continua aberto para nova tentativa
        let completed = self.appointments.update(&appointment).await?;
        state.pending = None;
        tracing::info!("✅ Cita {} completada ({})", completed.id, tag);

        let shop_record = if tag.is_attendance() {
            let new = NewVehicleInShop::from_appointment(&completed, local_now());
            match self.vehicles.create(&new).await {
                Ok(vehicle) => {
                    tracing::info!("🚗 Vehículo {} registrado en taller desde la cita {}", vehicle.id, completed.id);
                    ShopRecordOutcome::Created(vehicle)
                }
                Err(e) => {
                    tracing::warn!("Cita {} completada, mas o registro na oficina falhou: {}", completed.id, e);
                    ShopRecordOutcome::Failed
                }
            }
        } else {
            ShopRecordOutcome::NotApplicable
        };

        self.reload(&mut state).await;
        Ok(CompletionOutcome::Completed {
            appointment: completed,
            shop_record,
        })
    }

    /// Registro na oficina a pedido, sem tocar na cita.
    pub async fn move_to_shop(&self, id: Uuid) -> Result<VehicleInShop, AppError> {
        let state = self.state.lock().await;
        let appointment = state.find(id)?;
        let vehicle = self
            .vehicles
            .create(&NewVehicleInShop::from_appointment(appointment, local_now()))
            .await?;
        tracing::info!("🚗 Cita {} enviada al taller como {}", id, vehicle.id);
        Ok(vehicle)
    }

    // =========================================================================
    //  4. VISÕES DERIVADAS
    // =========================================================================

    pub async fn set_filter(&self, filter: AppointmentFilter) -> AppointmentColumns {
        let mut state = self.state.lock().await;
        state.filter = filter;
        split_by_status(&state.appointments, &state.filter)
    }

    pub async fn columns(&self) -> AppointmentColumns {
        let state = self.state.lock().await;
        split_by_status(&state.appointments, &state.filter)
    }

    pub async fn calendar(&self, month: CalendarMonth, today: NaiveDate) -> CalendarGrid {
        let state = self.state.lock().await;
        month_grid(month, &state.appointments, today)
    }

    pub async fn day(&self, date: NaiveDate, today: NaiveDate) -> DayAgenda {
        let state = self.state.lock().await;
        day_agenda(date, &state.appointments, today)
    }

    pub async fn daily_digest(&self, today: NaiveDate) -> Option<String> {
        let state = self.state.lock().await;
        reports::daily_digest(&state.appointments, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::{
        common::error::BackendError,
        db::MemoryStore,
        models::{AppointmentStatus, NewVehicleInShop},
    };

    fn form(name: &str, vehicle: &str, date: &str, time: &str) -> AppointmentForm {
        AppointmentForm {
            customer_name: name.into(),
            vehicle: vehicle.into(),
            service: "Ruido en frenos".into(),
            date_value: date.into(),
            time_value: time.into(),
            contact: "5551234567".into(),
        }
    }

    fn board(store: &MemoryStore) -> AppointmentBoard {
        AppointmentBoard::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    /// Oficina que recusa qualquer escrita.
    struct BrokenShop;

    #[async_trait]
    impl VehicleStore for BrokenShop {
        async fn list_in_shop(&self) -> Result<Vec<VehicleInShop>, BackendError> {
            Ok(Vec::new())
        }
        async fn list_delivered(&self) -> Result<Vec<VehicleInShop>, BackendError> {
            Ok(Vec::new())
        }
        async fn create(&self, _new: &NewVehicleInShop) -> Result<VehicleInShop, BackendError> {
            Err(BackendError::Decode("sin conexión".into()))
        }
        async fn update(&self, vehicle: &VehicleInShop) -> Result<VehicleInShop, BackendError> {
            Err(BackendError::not_found("Vehículo", vehicle.id))
        }
        async fn delete(&self, id: Uuid) -> Result<(), BackendError> {
            Err(BackendError::not_found("Vehículo", id))
        }
        async fn mark_delivered(&self, id: Uuid) -> Result<(), BackendError> {
            Err(BackendError::not_found("Vehículo", id))
        }
    }

    #[tokio::test]
    async fn completing_with_attendance_opens_exactly_one_shop_record() {
        let store = MemoryStore::new();
        let board = board(&store);
        let created = board.save(form("Ana", "Toyota 2019", "2024-06-01", "09:00"), None).await.unwrap();

        let outcome = board.toggle_complete(created.id).await.unwrap();
        assert!(matches!(outcome, ToggleOutcome::AwaitingTag(_)));

        board.select_completion_tag(AppointmentTag::Asistio).await.unwrap();
        let outcome = board.confirm_completion().await.unwrap();
        match outcome {
            CompletionOutcome::Completed { appointment, shop_record } => {
                assert_eq!(appointment.status, AppointmentStatus::Completed);
                assert_eq!(appointment.tags, vec![AppointmentTag::Asistio]);
                assert!(matches!(shop_record, ShopRecordOutcome::Created(_)));
            }
            other => panic!("esperava Completed, veio {:?}", other),
        }

        let in_shop = store.list_in_shop().await.unwrap();
        assert_eq!(in_shop.len(), 1);
        assert_eq!(in_shop[0].customer_name, "Ana");
        assert_eq!(in_shop[0].vehicle, "Toyota 2019");
        assert!(in_shop[0].tags.is_empty());
        assert!(board.pending_completion().await.is_none());
        assert_eq!(board.columns().await.completed.len(), 1);
    }

    #[tokio::test]
    async fn confirm_without_tag_changes_nothing() {
        let store = MemoryStore::new();
        let board = board(&store);
        let created = board.save(form("Ana", "Toyota", "2024-06-01", "09:00"), None).await.unwrap();

        assert!(matches!(board.confirm_completion().await.unwrap(), CompletionOutcome::NothingPending));

        board.toggle_complete(created.id).await.unwrap();
        assert!(matches!(board.confirm_completion().await.unwrap(), CompletionOutcome::NoTagSelected));

        let stored = AppointmentStore::list(&store).await.unwrap();
        assert_eq!(stored[0].status, AppointmentStatus::Scheduled);
        assert!(board.pending_completion().await.is_some());

        board.cancel_completion().await;
        assert!(board.pending_completion().await.is_none());
    }

    #[tokio::test]
    async fn non_attendance_tag_does_not_touch_the_shop() {
        let store = MemoryStore::new();
        let board = board(&store);
        let created = board.save(form("Ana", "Toyota", "2024-06-01", "09:00"), None).await.unwrap();

        board.toggle_complete(created.id).await.unwrap();
        board.select_completion_tag(AppointmentTag::NoAsistio).await.unwrap();
        let outcome = board.confirm_completion().await.unwrap();
        assert!(matches!(
            outcome,
            CompletionOutcome::Completed { shop_record: ShopRecordOutcome::NotApplicable, .. }
        ));
        assert!(store.list_in_shop().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn shop_failure_keeps_the_completion() {
        let store = MemoryStore::new();
        let board = AppointmentBoard::new(Arc::new(store.clone()), Arc::new(BrokenShop));
        let created = board.save(form("Ana", "Toyota", "2024-06-01", "09:00"), None).await.unwrap();

        board.toggle_complete(created.id).await.unwrap();
        board.select_completion_tag(AppointmentTag::LlegoTarde).await.unwrap();
        let outcome = board.confirm_completion().await.unwrap();
        assert!(matches!(outcome, CompletionOutcome::Completed { shop_record: ShopRecordOutcome::Failed, .. }));

        let stored = AppointmentStore::list(&store).await.unwrap();
        assert_eq!(stored[0].status, AppointmentStatus::Completed);
    }

    #[tokio::test]
    async fn toggling_a_completed_appointment_reverts_it() {
        let store = MemoryStore::new();
        let board = board(&store);
        let created = board.save(form("Ana", "Toyota", "2024-06-01", "09:00"), None).await.unwrap();
        board.toggle_complete(created.id).await.unwrap();
        board.select_completion_tag(AppointmentTag::Reprogramo).await.unwrap();
        board.confirm_completion().await.unwrap();

        match board.toggle_complete(created.id).await.unwrap() {
            ToggleOutcome::Reverted(appointment) => {
                assert_eq!(appointment.status, AppointmentStatus::Scheduled);
                assert!(appointment.tags.is_empty());
            }
            other => panic!("esperava Reverted, veio {:?}", other),
        }
    }

    #[tokio::test]
    async fn declined_delete_makes_no_call() {
        let store = MemoryStore::new();
        let board = board(&store);
        let created = board.save(form("Ana", "Toyota", "2024-06-01", "09:00"), None).await.unwrap();

        let outcome = board.delete(created.id, Confirmation::Declined).await.unwrap();
        assert_eq!(outcome, ActionOutcome::Declined);
        assert_eq!(AppointmentStore::list(&store).await.unwrap().len(), 1);

        let outcome = board.delete(created.id, Confirmation::Confirmed).await.unwrap();
        assert_eq!(outcome, ActionOutcome::Applied);
        assert!(board.snapshot().await.is_empty());

        let again = board.delete(created.id, Confirmation::Confirmed).await.unwrap_err();
        assert!(matches!(again, AppError::Backend(ref e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn invalid_form_is_rejected_before_any_call() {
        let store = MemoryStore::new();
        let board = board(&store);
        let err = board.save(form("", "Toyota", "2024-06-01", "09:00"), None).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(AppointmentStore::list(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn edit_keeps_status_and_prefills_the_form() {
        let store = MemoryStore::new();
        let board = board(&store);
        let created = board.save(form("Ana", "Toyota", "2024-06-01", "09:00"), None).await.unwrap();

        let values = board.form_for(created.id).await.unwrap();
        assert_eq!(values.date.date_value, "2024-06-01");
        assert_eq!(values.date.time_value, "09:00");

        let updated = board
            .save(form("Ana María", "Toyota", "2024-06-02", "10:30"), Some(created.id))
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.status, AppointmentStatus::Scheduled);
        assert_eq!(updated.date.format("%Y-%m-%d %H:%M").to_string(), "2024-06-02 10:30");

        let missing = board.save(form("X", "Y", "2024-06-02", "10:30"), Some(Uuid::new_v4())).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn move_to_shop_leaves_the_appointment_alone() {
        let store = MemoryStore::new();
        let board = board(&store);
        let created = board.save(form("Ana", "Toyota", "2024-06-01", "09:00"), None).await.unwrap();

        let vehicle = board.move_to_shop(created.id).await.unwrap();
        assert_eq!(vehicle.customer_name, "Ana");
        assert_eq!(board.snapshot().await[0].status, AppointmentStatus::Scheduled);
    }

    #[tokio::test]
    async fn filter_is_kept_between_requests() {
        let store = MemoryStore::new();
        let board = board(&store);
        board.save(form("Juan Pérez", "Jetta", "2024-06-01", "09:00"), None).await.unwrap();
        board.save(form("María", "Civic", "2024-06-01", "10:00"), None).await.unwrap();

        let columns = board
            .set_filter(AppointmentFilter { search_term: "juan".into(), date: None })
            .await;
        assert_eq!(columns.scheduled.len(), 1);
        assert_eq!(board.columns().await.scheduled[0].customer_name, "Juan Pérez");
    }
}
