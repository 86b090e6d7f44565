// src/services/shop_board.rs

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::{
    sync::Mutex,
    task::{AbortHandle, JoinHandle},
    time::MissedTickBehavior,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{dates::local_now, error::AppError},
    db::VehicleStore,
    models::{
        vehicle::{toggle_tag, VehicleForm},
        VehicleInShop, VehicleInShopTag,
    },
    services::confirmation::{ActionOutcome, Confirmation},
    views::{
        messaging::{vehicle_whatsapp, OutboundMessage},
        reports,
        table::{vehicle_table, VehicleTable},
    },
};

pub const DEFAULT_INLINE_QUIET_PERIOD: Duration = Duration::from_secs(3);
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShopView {
    #[default]
    InShop,
    Delivered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InlineField {
    Technician,
    Folio,
    LaborHours,
}

/// Edição direta numa célula da tabela.
#[derive(Debug, Clone, PartialEq, Deserialize, utoipa::ToSchema)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum InlineEdit {
    Technician(String),
    Folio(String),
    LaborHours(Decimal),
}

impl InlineEdit {
    pub fn field(&self) -> InlineField {
        match self {
            InlineEdit::Technician(_) => InlineField::Technician,
            InlineEdit::Folio(_) => InlineField::Folio,
            InlineEdit::LaborHours(_) => InlineField::LaborHours,
        }
    }

    fn validate(&self) -> Result<(), AppError> {
        match self {
            InlineEdit::LaborHours(hours) if hours.is_sign_negative() && !hours.is_zero() => Err(AppError::field(
                "laborHours",
                "non_negative",
                "Las horas de mano de obra no pueden ser negativas",
            )),
            _ => Ok(()),
        }
    }

    fn apply(self, vehicle: &mut VehicleInShop) {
        match self {
            InlineEdit::Technician(value) => vehicle.technician = Some(value).filter(|v| !v.is_empty()),
            InlineEdit::Folio(value) => vehicle.folio = Some(value).filter(|v| !v.is_empty()),
            InlineEdit::LaborHours(value) => vehicle.labor_hours = value,
        }
    }
}

struct ShopState {
    view: ShopView,
    vehicles: Vec<VehicleInShop>,
    last_refresh: Option<NaiveDateTime>,
}

impl ShopState {
    fn find(&self, id: Uuid) -> Result<&VehicleInShop, AppError> {
        self.vehicles
            .iter()
            .find(|v| v.id == id)
            .ok_or(AppError::NotFound("Vehículo"))
    }

    fn find_mut(&mut self, id: Uuid) -> Result<&mut VehicleInShop, AppError> {
        self.vehicles
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(AppError::NotFound("Vehículo"))
    }
}

// =========================================================================
//  DEBOUNCE DE EDIÇÕES INLINE
// =========================================================================

struct PendingWrite {
    generation: u64,
    edit: InlineEdit,
    handle: AbortHandle,
}

/// Um timer por (registro, campo). Reagendar aborta o timer anterior. O timer
/// que dispara só se remove do mapa com o estado do quadro travado, então uma
/// escrita já iniciada nunca é cancelada e nenhuma recarga a perde no meio.
#[derive(Clone)]
struct InlineEditDebouncer {
    quiet_period: Duration,
    pending: Arc<std::sync::Mutex<HashMap<(Uuid, InlineField), PendingWrite>>>,
    generations: Arc<AtomicU64>,
}

impl InlineEditDebouncer {
    fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: Arc::new(std::sync::Mutex::new(HashMap::new())),
            generations: Arc::new(AtomicU64::new(0)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(Uuid, InlineField), PendingWrite>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // Chamado com o estado do quadro travado.
    fn schedule(&self, board: ShopBoard, id: Uuid, edit: InlineEdit) {
        let field = edit.field();
        let generation = self.generations.fetch_add(1, Ordering::Relaxed);
        let quiet_period = self.quiet_period;

        // O mapa fica travado até o registro do novo timer: a tarefa não consegue
        // se desregistrar antes de existir no mapa.
        let mut pending = self.lock();
        let task = tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            board.persist_pending(id, field, generation).await;
        });

        let previous = pending.insert(
            (id, field),
            PendingWrite {
                generation,
                edit,
                handle: task.abort_handle(),
            },
        );
        if let Some(previous) = previous {
            previous.handle.abort();
        }
    }

    /// Tira a entrada do mapa se ela ainda for desta geração.
    fn take(&self, id: Uuid, field: InlineField, generation: u64) -> bool {
        let mut pending = self.lock();
        match pending.get(&(id, field)) {
            Some(entry) if entry.generation == generation => {
                pending.remove(&(id, field));
                true
            }
            _ => false,
        }
    }

    /// Reaplica sobre uma lista recém-carregada os valores ainda não gravados.
    fn reapply(&self, vehicles: &mut [VehicleInShop]) {
        let pending = self.lock();
        for ((id, _), entry) in pending.iter() {
            if let Some(vehicle) = vehicles.iter_mut().find(|v| v.id == *id) {
                entry.edit.clone().apply(vehicle);
            }
        }
    }

    fn is_pending(&self, id: Uuid, field: InlineField) -> bool {
        self.lock().contains_key(&(id, field))
    }
}

// =========================================================================
//  QUADRO DA OFICINA
// =========================================================================

/// Estado da tela da oficina. Compartilhado entre handlers, a recarga
/// periódica e os timers de edição inline.
#[derive(Clone)]
pub struct ShopBoard {
    store: Arc<dyn VehicleStore>,
    state: Arc<Mutex<ShopState>>,
    debouncer: InlineEditDebouncer,
}

impl ShopBoard {
    pub fn new(store: Arc<dyn VehicleStore>, inline_quiet_period: Duration) -> Self {
        Self {
            store,
            state: Arc::new(Mutex::new(ShopState {
                view: ShopView::InShop,
                vehicles: Vec::new(),
                last_refresh: None,
            })),
            debouncer: InlineEditDebouncer::new(inline_quiet_period),
        }
    }

    // --- SNAPSHOT ---

    async fn fetch(&self, view: ShopView) -> Result<Vec<VehicleInShop>, AppError> {
        let vehicles = match view {
            ShopView::InShop => self.store.list_in_shop().await?,
            ShopView::Delivered => self.store.list_delivered().await?,
        };
        Ok(vehicles)
    }

    async fn reload(&self, state: &mut ShopState) -> Result<(), AppError> {
        let mut vehicles = self.fetch(state.view).await?;
        self.debouncer.reapply(&mut vehicles);
        state.vehicles = vehicles;
        state.last_refresh = Some(local_now());
        Ok(())
    }

    async fn reload_after_mutation(&self, state: &mut ShopState) {
        if let Err(e) = self.reload(state).await {
            tracing::warn!("Falha ao recarregar veículos após mutação: {:?}", e);
        }
    }

    pub async fn refresh(&self) -> Result<Vec<VehicleInShop>, AppError> {
        let mut state = self.state.lock().await;
        self.reload(&mut state).await?;
        Ok(state.vehicles.clone())
    }

    /// Cada troca de aba busca de novo, nunca reaproveita a lista anterior.
    pub async fn switch_view(&self, view: ShopView) -> Result<Vec<VehicleInShop>, AppError> {
        let mut state = self.state.lock().await;
        state.view = view;
        self.reload(&mut state).await?;
        Ok(state.vehicles.clone())
    }

    pub async fn snapshot(&self) -> Vec<VehicleInShop> {
        self.state.lock().await.vehicles.clone()
    }

    pub fn spawn_periodic_refresh(&self, every: Duration) -> JoinHandle<()> {
        let board = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // O primeiro tick é imediato; a carga inicial já foi feita
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match board.refresh().await {
                    Ok(vehicles) => tracing::debug!("🔄 Oficina recarregada: {} veículos", vehicles.len()),
                    Err(e) => tracing::warn!("Recarga periódica da oficina falhou: {:?}", e),
                }
            }
        })
    }

    // --- MUTAÇÕES ---

    pub async fn save(&self, form: VehicleForm, id: Option<Uuid>) -> Result<VehicleInShop, AppError> {
        form.validate()?;

        let mut state = self.state.lock().await;
        let saved = match id {
            Some(id) => {
                let merged = form.merge_into(state.find(id)?)?;
                self.store.update(&merged).await?
            }
            None => self.store.create(&form.into_new()?).await?,
        };

        tracing::info!("🚗 Vehículo {} guardado ({})", saved.id, saved.vehicle);
        self.reload_after_mutation(&mut state).await;
        Ok(saved)
    }

    pub async fn delete(&self, id: Uuid, confirmation: Confirmation) -> Result<ActionOutcome, AppError> {
        if !confirmation.is_confirmed() {
            return Ok(ActionOutcome::Declined);
        }
        let mut state = self.state.lock().await;
        self.store.delete(id).await?;
        tracing::info!("🗑️ Vehículo {} eliminado", id);
        self.reload_after_mutation(&mut state).await;
        Ok(ActionOutcome::Applied)
    }

    pub async fn mark_delivered(&self, id: Uuid, confirmation: Confirmation) -> Result<ActionOutcome, AppError> {
        if !confirmation.is_confirmed() {
            return Ok(ActionOutcome::Declined);
        }
        let mut state = self.state.lock().await;
        self.store.mark_delivered(id).await?;
        tracing::info!("📦 Vehículo {} entregado", id);
        self.reload_after_mutation(&mut state).await;
        Ok(ActionOutcome::Applied)
    }

    pub async fn toggle_tag(&self, id: Uuid, tag: VehicleInShopTag) -> Result<VehicleInShop, AppError> {
        let mut state = self.state.lock().await;
        let mut vehicle = state.find(id)?.clone();
        toggle_tag(&mut vehicle.tags, tag);

        let updated = self.store.update(&vehicle).await?;
        self.reload_after_mutation(&mut state).await;
        Ok(updated)
    }

    /// Aplica no snapshot na hora e agenda a gravação após o período de silêncio.
    pub async fn edit_inline(&self, id: Uuid, edit: InlineEdit) -> Result<VehicleInShop, AppError> {
        edit.validate()?;

        let mut state = self.state.lock().await;
        let vehicle = state.find_mut(id)?;
        edit.clone().apply(vehicle);
        let edited = vehicle.clone();

        self.debouncer.schedule(self.clone(), id, edit);
        Ok(edited)
    }

    pub fn has_pending_edit(&self, id: Uuid, field: InlineField) -> bool {
        self.debouncer.is_pending(id, field)
    }

    // Sobrescrita cega com o registro atual do snapshot; falha só vai para o log
    // e o valor otimista continua no snapshot.
    async fn persist_pending(&self, id: Uuid, field: InlineField, generation: u64) {
        let mut state = self.state.lock().await;
        if !self.debouncer.take(id, field, generation) {
            return;
        }
        let Some(current) = state.vehicles.iter().find(|v| v.id == id).cloned() else {
            tracing::warn!("Edição inline de {:?} descartada: veículo {} saiu da lista", field, id);
            return;
        };

        match self.store.update(&current).await {
            Ok(saved) => {
                if let Some(slot) = state.vehicles.iter_mut().find(|v| v.id == id) {
                    *slot = saved;
                }
                tracing::debug!("✏️ Edição inline de {:?} gravada para {}", field, id);
            }
            Err(e) => tracing::error!("Falha ao gravar edição inline de {:?} em {}: {}", field, id, e),
        }
    }

    // --- VISÕES DERIVADAS ---

    pub async fn table(&self, now: NaiveDateTime) -> VehicleTable {
        let state = self.state.lock().await;
        vehicle_table(&state.vehicles, now, state.last_refresh)
    }

    /// O relatório é sempre dos veículos na oficina, mesmo com a aba de entregues aberta.
    pub async fn report(&self, now: NaiveDateTime) -> Result<Option<String>, AppError> {
        let state = self.state.lock().await;
        let report = match state.view {
            ShopView::InShop => reports::shop_report(&state.vehicles, now),
            ShopView::Delivered => reports::shop_report(&self.fetch(ShopView::InShop).await?, now),
        };
        Ok(report)
    }

    pub async fn whatsapp(&self, id: Uuid) -> Result<OutboundMessage, AppError> {
        let state = self.state.lock().await;
        Ok(vehicle_whatsapp(state.find(id)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize};

    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;

    use crate::{
        common::{dates::parse_local_date, error::BackendError},
        db::MemoryStore,
        models::NewVehicleInShop,
    };

    /// Conta os updates antes de repassar para a memória; pode passar a recusá-los.
    #[derive(Clone)]
    struct CountingStore {
        inner: MemoryStore,
        updates: Arc<AtomicUsize>,
        fail_updates: Arc<AtomicBool>,
    }

    impl CountingStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                updates: Arc::new(AtomicUsize::new(0)),
                fail_updates: Arc::new(AtomicBool::new(false)),
            }
        }

        fn update_count(&self) -> usize {
            self.updates.load(Ordering::SeqCst)
        }

        fn break_updates(&self) {
            self.fail_updates.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl VehicleStore for CountingStore {
        async fn list_in_shop(&self) -> Result<Vec<VehicleInShop>, BackendError> {
            self.inner.list_in_shop().await
        }
        async fn list_delivered(&self) -> Result<Vec<VehicleInShop>, BackendError> {
            self.inner.list_delivered().await
        }
        async fn create(&self, new: &NewVehicleInShop) -> Result<VehicleInShop, BackendError> {
            VehicleStore::create(&self.inner, new).await
        }
        async fn update(&self, vehicle: &VehicleInShop) -> Result<VehicleInShop, BackendError> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            if self.fail_updates.load(Ordering::SeqCst) {
                return Err(BackendError::Database(sqlx::Error::PoolTimedOut));
            }
            VehicleStore::update(&self.inner, vehicle).await
        }
        async fn delete(&self, id: Uuid) -> Result<(), BackendError> {
            VehicleStore::delete(&self.inner, id).await
        }
        async fn mark_delivered(&self, id: Uuid) -> Result<(), BackendError> {
            self.inner.mark_delivered(id).await
        }
    }

    fn form(customer: &str, vehicle: &str) -> VehicleForm {
        VehicleForm {
            customer_name: customer.into(),
            vehicle: vehicle.into(),
            service: "Frenos".into(),
            contact: "(55) 1234-5678".into(),
            check_in_date: "2024-06-01".into(),
            check_in_time: "09:00".into(),
            estimated_date: String::new(),
            estimated_time: String::new(),
            notes: String::new(),
            tags: Vec::new(),
            technician: None,
            labor_hours: Decimal::ZERO,
            folio: None,
        }
    }

    async fn board_with_one_vehicle() -> (ShopBoard, CountingStore, VehicleInShop) {
        let store = CountingStore::new();
        let board = ShopBoard::new(Arc::new(store.clone()), DEFAULT_INLINE_QUIET_PERIOD);
        let vehicle = board.save(form("Luis", "Versa"), None).await.unwrap();
        (board, store, vehicle)
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_inline_edits_collapse_into_one_write() {
        let (board, store, vehicle) = board_with_one_vehicle().await;

        board.edit_inline(vehicle.id, InlineEdit::Technician("Pe".into())).await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        let edited = board.edit_inline(vehicle.id, InlineEdit::Technician("Pepe".into())).await.unwrap();
        assert_eq!(edited.technician.as_deref(), Some("Pepe"));
        assert!(board.has_pending_edit(vehicle.id, InlineField::Technician));
        assert_eq!(store.update_count(), 0);

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(store.update_count(), 1);
        assert!(!board.has_pending_edit(vehicle.id, InlineField::Technician));

        let stored = store.list_in_shop().await.unwrap();
        assert_eq!(stored[0].technician.as_deref(), Some("Pepe"));
    }

    #[tokio::test(start_paused = true)]
    async fn different_fields_are_debounced_independently() {
        let (board, store, vehicle) = board_with_one_vehicle().await;

        board.edit_inline(vehicle.id, InlineEdit::Technician("Pepe".into())).await.unwrap();
        board.edit_inline(vehicle.id, InlineEdit::Folio("F-100".into())).await.unwrap();
        tokio::time::sleep(Duration::from_secs(4)).await;

        assert_eq!(store.update_count(), 2);
        let stored = store.list_in_shop().await.unwrap();
        assert_eq!(stored[0].technician.as_deref(), Some("Pepe"));
        assert_eq!(stored[0].folio.as_deref(), Some("F-100"));
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_write_uses_the_current_record() {
        let (board, store, vehicle) = board_with_one_vehicle().await;

        board.edit_inline(vehicle.id, InlineEdit::LaborHours(Decimal::new(25, 1))).await.unwrap();
        // Uma mudança de tag no meio do período de silêncio não pode se perder
        board.toggle_tag(vehicle.id, VehicleInShopTag::EnReparacion).await.unwrap();
        tokio::time::sleep(Duration::from_secs(4)).await;

        let stored = store.list_in_shop().await.unwrap();
        assert_eq!(stored[0].labor_hours, Decimal::new(25, 1));
        assert_eq!(stored[0].tags, vec![VehicleInShopTag::EnReparacion]);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_during_quiet_period_keeps_the_pending_edit() {
        let (board, store, vehicle) = board_with_one_vehicle().await;

        board.edit_inline(vehicle.id, InlineEdit::Technician("Pepe".into())).await.unwrap();
        let listed = board.refresh().await.unwrap();
        assert_eq!(listed[0].technician.as_deref(), Some("Pepe"));

        tokio::time::sleep(Duration::from_secs(4)).await;
        let stored = store.list_in_shop().await.unwrap();
        assert_eq!(stored[0].technician.as_deref(), Some("Pepe"));
    }

    #[tokio::test(start_paused = true)]
    async fn mutation_on_another_vehicle_keeps_the_pending_edit() {
        let (board, store, vehicle) = board_with_one_vehicle().await;
        let other = board.save(form("Ana", "Aveo"), None).await.unwrap();

        board.edit_inline(vehicle.id, InlineEdit::Folio("F-7".into())).await.unwrap();
        board.toggle_tag(other.id, VehicleInShopTag::Garantia).await.unwrap();
        tokio::time::sleep(Duration::from_secs(4)).await;

        let stored = store.list_in_shop().await.unwrap();
        let edited = stored.iter().find(|v| v.id == vehicle.id).unwrap();
        assert_eq!(edited.folio.as_deref(), Some("F-7"));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_inline_write_keeps_the_edited_value() {
        let (board, store, vehicle) = board_with_one_vehicle().await;
        store.break_updates();

        board.edit_inline(vehicle.id, InlineEdit::Technician("Pepe".into())).await.unwrap();
        tokio::time::sleep(Duration::from_secs(4)).await;

        assert_eq!(store.update_count(), 1);
        assert!(!board.has_pending_edit(vehicle.id, InlineField::Technician));
        let snapshot = board.snapshot().await;
        assert_eq!(snapshot[0].technician.as_deref(), Some("Pepe"));
        assert_eq!(store.list_in_shop().await.unwrap()[0].technician, None);
    }

    #[tokio::test]
    async fn negative_labor_hours_are_rejected() {
        let (board, _store, vehicle) = board_with_one_vehicle().await;
        let err = board
            .edit_inline(vehicle.id, InlineEdit::LaborHours(Decimal::new(-1, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(!board.has_pending_edit(vehicle.id, InlineField::LaborHours));
    }

    #[tokio::test]
    async fn toggle_tag_is_symmetric() {
        let (board, _store, vehicle) = board_with_one_vehicle().await;
        let on = board.toggle_tag(vehicle.id, VehicleInShopTag::Garantia).await.unwrap();
        assert_eq!(on.tags, vec![VehicleInShopTag::Garantia]);
        let off = board.toggle_tag(vehicle.id, VehicleInShopTag::Garantia).await.unwrap();
        assert!(off.tags.is_empty());
    }

    #[tokio::test]
    async fn delivery_needs_confirmation_and_moves_the_vehicle() {
        let (board, store, vehicle) = board_with_one_vehicle().await;

        let declined = board.mark_delivered(vehicle.id, Confirmation::Declined).await.unwrap();
        assert_eq!(declined, ActionOutcome::Declined);
        assert_eq!(board.snapshot().await.len(), 1);

        board.mark_delivered(vehicle.id, Confirmation::Confirmed).await.unwrap();
        assert!(board.snapshot().await.is_empty());

        let delivered = board.switch_view(ShopView::Delivered).await.unwrap();
        assert_eq!(delivered.len(), 1);
        assert!(delivered[0].is_delivered());
        assert_eq!(store.list_delivered().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delivering_a_missing_vehicle_is_not_found() {
        let (board, _store, _vehicle) = board_with_one_vehicle().await;
        let err = board.mark_delivered(Uuid::new_v4(), Confirmation::Confirmed).await.unwrap_err();
        assert!(matches!(err, AppError::Backend(ref e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn report_covers_the_shop_even_from_the_delivered_tab() {
        let (board, _store, _vehicle) = board_with_one_vehicle().await;
        let now = parse_local_date("2024-06-03T09:00").unwrap();

        board.switch_view(ShopView::Delivered).await.unwrap();
        let report = board.report(now).await.unwrap().unwrap();
        assert!(report.contains("1. 🚗 *Versa*"));
        assert!(report.contains("Días en taller: *2*"));
    }

    #[tokio::test]
    async fn table_and_whatsapp_derive_from_the_snapshot() {
        let (board, _store, vehicle) = board_with_one_vehicle().await;
        let now = vehicle.check_in_date + ChronoDuration::days(5);

        let table = board.table(now).await;
        assert_eq!(table.rows[0].days_in_shop, 5);
        assert!(table.last_update.is_some());

        let message = board.whatsapp(vehicle.id).await.unwrap();
        assert_eq!(message.phone, "5512345678");
        assert_eq!(message.message, "Hola Luis, su vehículo Versa está en el taller.");
    }

    #[tokio::test(start_paused = true)]
    async fn periodic_refresh_picks_up_outside_changes() {
        let store = MemoryStore::new();
        let board = ShopBoard::new(Arc::new(store.clone()), DEFAULT_INLINE_QUIET_PERIOD);
        board.refresh().await.unwrap();
        let handle = board.spawn_periodic_refresh(DEFAULT_REFRESH_INTERVAL);

        let outside = form("Ana", "Toyota").into_new().unwrap();
        VehicleStore::create(&store, &outside).await.unwrap();
        assert!(board.snapshot().await.is_empty());

        tokio::time::sleep(DEFAULT_REFRESH_INTERVAL + Duration::from_secs(1)).await;
        assert_eq!(board.snapshot().await.len(), 1);
        handle.abort();
    }
}
