// src/views/table.rs

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::VehicleInShop;

/// Faixa de permanência usada para colorir a coluna de dias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Normal,
    Medium,
    High,
}

impl Urgency {
    pub fn for_days(days: i64) -> Self {
        if days > 7 {
            Urgency::High
        } else if days > 3 {
            Urgency::Medium
        } else {
            Urgency::Normal
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleTableRow {
    #[serde(flatten)]
    pub vehicle: VehicleInShop,
    pub days_in_shop: i64,
    pub is_overdue: bool,
    pub urgency: Urgency,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleTable {
    pub rows: Vec<VehicleTableRow>,
    /// Hora da última recarga do snapshot ("HH:MM:SS"), se já houve uma.
    pub last_update: Option<String>,
}

pub fn vehicle_table(vehicles: &[VehicleInShop], now: NaiveDateTime, last_update: Option<NaiveDateTime>) -> VehicleTable {
    let rows = vehicles
        .iter()
        .map(|vehicle| {
            let days = vehicle.days_in_shop(now);
            VehicleTableRow {
                vehicle: vehicle.clone(),
                days_in_shop: days,
                is_overdue: vehicle.is_overdue(now),
                urgency: Urgency::for_days(days),
            }
        })
        .collect();

    VehicleTable {
        rows,
        last_update: last_update.map(|at| at.format("%H:%M:%S").to_string()),
    }
}
