// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{AppointmentRepository, AppointmentStore, CommentRepository, CommentStore, MemoryStore, VehicleRepository, VehicleStore},
    services::{
        ai_service::AiService,
        appointment_board::AppointmentBoard,
        comment_service::CommentService,
        shop_board::{ShopBoard, DEFAULT_INLINE_QUIET_PERIOD, DEFAULT_REFRESH_INTERVAL},
    },
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Settings {
    // Sem DATABASE_URL os dados ficam em memória
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub gemini_api_key: Option<String>,
    pub inline_edit_debounce: Duration,
    pub shop_refresh_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: None,
            bind_addr: "0.0.0.0:3000".to_string(),
            gemini_api_key: None,
            inline_edit_debounce: DEFAULT_INLINE_QUIET_PERIOD,
            shop_refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: FromStr>(name: &str) -> anyhow::Result<Option<T>> {
    match non_empty_var(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{} inválida: '{}'", name, raw)),
        None => Ok(None),
    }
}

/// Intervalos vêm em unidades inteiras e positivas: zero travaria o timer.
fn positive_duration(name: &str, value: u64, unit_secs: u64) -> anyhow::Result<Duration> {
    if value == 0 {
        anyhow::bail!("{} deve ser maior que zero", name);
    }
    value
        .checked_mul(unit_secs)
        .map(Duration::from_secs)
        .ok_or_else(|| anyhow::anyhow!("{} grande demais: {}", name, value))
}

fn duration_var(name: &str, unit_secs: u64) -> anyhow::Result<Option<Duration>> {
    parsed_var::<u64>(name)?
        .map(|value| positive_duration(name, value, unit_secs))
        .transpose()
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Settings::default();

        Ok(Self {
            database_url: non_empty_var("DATABASE_URL"),
            bind_addr: non_empty_var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            inline_edit_debounce: duration_var("INLINE_EDIT_DEBOUNCE_SECS", 1)?
                .unwrap_or(defaults.inline_edit_debounce),
            shop_refresh_interval: duration_var("SHOP_REFRESH_MINUTES", 60)?
                .unwrap_or(defaults.shop_refresh_interval),
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: Option<PgPool>,
    pub appointment_board: AppointmentBoard,
    pub shop_board: ShopBoard,
    pub comment_service: CommentService,
    pub ai_service: AiService,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        let Some(database_url) = &settings.database_url else {
            tracing::warn!("⚠️ DATABASE_URL não definida: usando armazenamento em memória.");
            return Ok(Self::in_memory(settings));
        };

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        Ok(Self::from_stores(
            Arc::new(AppointmentRepository::new(db_pool.clone())),
            Arc::new(VehicleRepository::new(db_pool.clone())),
            Arc::new(CommentRepository::new(db_pool.clone())),
            Some(db_pool),
            settings,
        ))
    }

    pub fn from_stores(
        appointments: Arc<dyn AppointmentStore>,
        vehicles: Arc<dyn VehicleStore>,
        comments: Arc<dyn CommentStore>,
        db_pool: Option<PgPool>,
        settings: &Settings,
    ) -> Self {
        let ai_service = AiService::new(settings.gemini_api_key.clone());
        if !ai_service.is_enabled() {
            tracing::warn!("GEMINI_API_KEY não configurada: funções de IA desabilitadas.");
        }

        Self {
            db_pool,
            appointment_board: AppointmentBoard::new(appointments, vehicles.clone()),
            shop_board: ShopBoard::new(vehicles, settings.inline_edit_debounce),
            comment_service: CommentService::new(comments),
            ai_service,
        }
    }

    /// Estado em memória, usado em desenvolvimento e nos testes.
    pub fn in_memory(settings: &Settings) -> Self {
        let store = MemoryStore::new();
        Self::from_stores(Arc::new(store.clone()), Arc::new(store.clone()), Arc::new(store), None, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_interval_is_rejected() {
        let err = positive_duration("SHOP_REFRESH_MINUTES", 0, 60).unwrap_err();
        assert!(err.to_string().contains("SHOP_REFRESH_MINUTES"));
        assert!(positive_duration("INLINE_EDIT_DEBOUNCE_SECS", 0, 1).is_err());
    }

    #[test]
    fn minutes_are_converted_without_overflow() {
        assert_eq!(positive_duration("SHOP_REFRESH_MINUTES", 5, 60).unwrap(), Duration::from_secs(300));
        assert_eq!(positive_duration("INLINE_EDIT_DEBOUNCE_SECS", 3, 1).unwrap(), Duration::from_secs(3));
        assert!(positive_duration("SHOP_REFRESH_MINUTES", u64::MAX, 60).is_err());
    }

    #[test]
    fn defaults_match_the_board_constants() {
        let settings = Settings::default();
        assert_eq!(settings.inline_edit_debounce, DEFAULT_INLINE_QUIET_PERIOD);
        assert_eq!(settings.shop_refresh_interval, DEFAULT_REFRESH_INTERVAL);
        assert!(settings.database_url.is_none());
    }
}
