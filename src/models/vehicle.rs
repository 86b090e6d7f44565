// src/models/vehicle.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::dates::{local_datetime, DateInputValue, DateParseError},
    models::appointment::Appointment,
};

// --- ENUMS ---

/// Estado do veículo no chão da oficina.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum VehicleInShopTag {
    #[serde(rename = "esperando refacciones")]
    EsperandoRefacciones,
    #[serde(rename = "refacciones en recepción")]
    RefaccionesEnRecepcion,
    #[serde(rename = "esperando técnico")]
    EsperandoTecnico,
    #[serde(rename = "en diagnóstico")]
    EnDiagnostico,
    #[serde(rename = "en reparación")]
    EnReparacion,
    #[serde(rename = "listo para entrega")]
    ListoParaEntrega,
    #[serde(rename = "esperando aprobación")]
    EsperandoAprobacion,
    #[serde(rename = "garantía")]
    Garantia,
}

impl VehicleInShopTag {
    pub const ALL: [VehicleInShopTag; 8] = [
        VehicleInShopTag::EsperandoRefacciones,
        VehicleInShopTag::RefaccionesEnRecepcion,
        VehicleInShopTag::EsperandoTecnico,
        VehicleInShopTag::EnDiagnostico,
        VehicleInShopTag::EnReparacion,
        VehicleInShopTag::ListoParaEntrega,
        VehicleInShopTag::EsperandoAprobacion,
        VehicleInShopTag::Garantia,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleInShopTag::EsperandoRefacciones => "esperando refacciones",
            VehicleInShopTag::RefaccionesEnRecepcion => "refacciones en recepción",
            VehicleInShopTag::EsperandoTecnico => "esperando técnico",
            VehicleInShopTag::EnDiagnostico => "en diagnóstico",
            VehicleInShopTag::EnReparacion => "en reparación",
            VehicleInShopTag::ListoParaEntrega => "listo para entrega",
            VehicleInShopTag::EsperandoAprobacion => "esperando aprobación",
            VehicleInShopTag::Garantia => "garantía",
        }
    }
}

impl fmt::Display for VehicleInShopTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleInShopTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VehicleInShopTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| format!("etiqueta de vehículo desconocida: {}", s))
    }
}

/// Liga/desliga uma tag: diferença simétrica com o conjunto `{tag}`.
/// Retorna `true` se a tag ficou presente.
pub fn toggle_tag<T: PartialEq>(tags: &mut Vec<T>, tag: T) -> bool {
    if let Some(position) = tags.iter().position(|t| *t == tag) {
        tags.remove(position);
        false
    } else {
        tags.push(tag);
        true
    }
}

// --- VEÍCULO NA OFICINA ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInShop {
    pub id: Uuid,
    pub customer_name: String,
    pub vehicle: String,
    pub service: String,
    pub contact: String,
    #[serde(with = "local_datetime")]
    pub check_in_date: NaiveDateTime,
    #[serde(default, with = "local_datetime::option")]
    pub estimated_completion: Option<NaiveDateTime>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<VehicleInShopTag>,
    // Presente = entregue (estado terminal)
    pub delivered_at: Option<DateTime<Utc>>,
    pub technician: Option<String>,
    #[serde(default)]
    pub labor_hours: Decimal,
    pub folio: Option<String>,
}

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

impl VehicleInShop {
    pub fn is_delivered(&self) -> bool {
        self.delivered_at.is_some()
    }

    pub fn days_in_shop(&self, now: NaiveDateTime) -> i64 {
        days_in_shop(self.check_in_date, now)
    }

    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        self.estimated_completion.is_some_and(|estimated| estimated < now)
    }
}

/// Dias corridos desde a entrada, arredondados para cima.
/// Usa a diferença absoluta: uma entrada levemente no futuro (relógio
/// adiantado) ainda dá um número não negativo.
pub fn days_in_shop(check_in: NaiveDateTime, now: NaiveDateTime) -> i64 {
    let elapsed = now.signed_duration_since(check_in).num_milliseconds().abs();
    (elapsed + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

/// Campos de criação (tudo menos o id).
#[derive(Debug, Clone, PartialEq)]
pub struct NewVehicleInShop {
    pub customer_name: String,
    pub vehicle: String,
    pub service: String,
    pub contact: String,
    pub check_in_date: NaiveDateTime,
    pub estimated_completion: Option<NaiveDateTime>,
    pub notes: String,
    pub tags: Vec<VehicleInShopTag>,
    pub technician: Option<String>,
    pub labor_hours: Decimal,
    pub folio: Option<String>,
}

impl NewVehicleInShop {
    /// Registro de oficina semeado a partir de uma cita, com entrada "agora".
    pub fn from_appointment(appointment: &Appointment, check_in_date: NaiveDateTime) -> Self {
        Self {
            customer_name: appointment.customer_name.clone(),
            vehicle: appointment.vehicle.clone(),
            service: appointment.service.clone(),
            contact: appointment.contact.clone(),
            check_in_date,
            estimated_completion: None,
            notes: String::new(),
            tags: Vec::new(),
            technician: None,
            labor_hours: Decimal::ZERO,
            folio: None,
        }
    }
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = ValidationError::new("non_negative");
        error.message = Some("Las horas de mano de obra no pueden ser negativas".into());
        return Err(error);
    }
    Ok(())
}

/// O formulário de veículo: entrada obrigatória, entrega estimada opcional.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleForm {
    #[validate(length(min = 1, message = "required"))]
    pub customer_name: String,

    #[validate(length(min = 1, message = "required"))]
    pub vehicle: String,

    #[validate(length(min = 1, message = "required"))]
    pub service: String,

    #[validate(length(min = 1, message = "required"))]
    pub contact: String,

    #[validate(length(min = 1, message = "required"))]
    pub check_in_date: String,

    #[validate(length(min = 1, message = "required"))]
    pub check_in_time: String,

    #[serde(default)]
    pub estimated_date: String,

    #[serde(default)]
    pub estimated_time: String,

    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub tags: Vec<VehicleInShopTag>,

    pub technician: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "non_negative"))]
    pub labor_hours: Decimal,

    pub folio: Option<String>,
}

impl VehicleForm {
    pub fn check_in(&self) -> Result<NaiveDateTime, DateParseError> {
        DateInputValue::new(self.check_in_date.as_str(), self.check_in_time.as_str()).to_local_datetime()
    }

    /// Só existe quando data E hora foram preenchidas.
    pub fn estimated(&self) -> Result<Option<NaiveDateTime>, DateParseError> {
        if self.estimated_date.is_empty() || self.estimated_time.is_empty() {
            return Ok(None);
        }
        DateInputValue::new(self.estimated_date.as_str(), self.estimated_time.as_str())
            .to_local_datetime()
            .map(Some)
    }

    pub fn into_new(self) -> Result<NewVehicleInShop, DateParseError> {
        let check_in_date = self.check_in()?;
        let estimated_completion = self.estimated()?;
        Ok(NewVehicleInShop {
            customer_name: self.customer_name,
            vehicle: self.vehicle,
            service: self.service,
            contact: self.contact,
            check_in_date,
            estimated_completion,
            notes: self.notes,
            tags: self.tags,
            technician: self.technician.filter(|t| !t.is_empty()),
            labor_hours: self.labor_hours,
            folio: self.folio.filter(|f| !f.is_empty()),
        })
    }

    /// Registro completo para o update (entrega e id preservados).
    pub fn merge_into(self, existing: &VehicleInShop) -> Result<VehicleInShop, DateParseError> {
        let new = self.into_new()?;
        Ok(VehicleInShop {
            id: existing.id,
            customer_name: new.customer_name,
            vehicle: new.vehicle,
            service: new.service,
            contact: new.contact,
            check_in_date: new.check_in_date,
            estimated_completion: new.estimated_completion,
            notes: new.notes,
            tags: new.tags,
            delivered_at: existing.delivered_at,
            technician: new.technician,
            labor_hours: new.labor_hours,
            folio: new.folio,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::common::dates::parse_local_date;

    fn vehicle_checked_in_at(check_in: NaiveDateTime) -> VehicleInShop {
        VehicleInShop {
            id: Uuid::new_v4(),
            customer_name: "Luis".into(),
            vehicle: "Nissan Versa".into(),
            service: "Cambio de clutch".into(),
            contact: "(55) 1234-5678".into(),
            check_in_date: check_in,
            estimated_completion: None,
            notes: String::new(),
            tags: Vec::new(),
            delivered_at: None,
            technician: None,
            labor_hours: Decimal::ZERO,
            folio: None,
        }
    }

    #[test]
    fn days_in_shop_rounds_up() {
        let now = parse_local_date("2024-06-10T12:00").unwrap();
        assert_eq!(days_in_shop(now - Duration::hours(36), now), 2);
        assert_eq!(days_in_shop(now - Duration::hours(24), now), 1);
        assert_eq!(days_in_shop(now - Duration::minutes(1), now), 1);
        assert_eq!(days_in_shop(now, now), 0);
    }

    #[test]
    fn future_check_in_is_not_negative() {
        let now = parse_local_date("2024-06-10T12:00").unwrap();
        assert_eq!(days_in_shop(now + Duration::hours(2), now), 1);
    }

    #[test]
    fn overdue_only_when_estimate_is_in_the_past() {
        let now = parse_local_date("2024-06-10T12:00").unwrap();
        let mut vehicle = vehicle_checked_in_at(now - Duration::days(3));
        assert!(!vehicle.is_overdue(now));

        vehicle.estimated_completion = Some(now - Duration::days(1));
        assert!(vehicle.is_overdue(now));

        vehicle.estimated_completion = Some(now + Duration::days(1));
        assert!(!vehicle.is_overdue(now));
    }

    #[test]
    fn toggling_is_a_symmetric_difference() {
        let mut tags = vec![VehicleInShopTag::EnDiagnostico];
        assert!(toggle_tag(&mut tags, VehicleInShopTag::EsperandoRefacciones));
        assert_eq!(tags, vec![VehicleInShopTag::EnDiagnostico, VehicleInShopTag::EsperandoRefacciones]);
        assert!(!toggle_tag(&mut tags, VehicleInShopTag::EnDiagnostico));
        assert_eq!(tags, vec![VehicleInShopTag::EsperandoRefacciones]);
    }

    #[test]
    fn form_without_full_estimate_has_no_estimate() {
        let form: VehicleForm = serde_json::from_value(serde_json::json!({
            "customerName": "Luis",
            "vehicle": "Versa",
            "service": "Frenos",
            "contact": "555",
            "checkInDate": "2024-06-10",
            "checkInTime": "08:15",
            "estimatedDate": "2024-06-12",
            "laborHours": 2.5
        }))
        .unwrap();
        assert!(form.validate().is_ok());

        let new = form.into_new().unwrap();
        assert_eq!(new.check_in_date, parse_local_date("2024-06-10T08:15").unwrap());
        assert_eq!(new.estimated_completion, None);
        assert_eq!(new.labor_hours, Decimal::new(25, 1));
    }

    #[test]
    fn negative_labor_hours_are_rejected() {
        let form: VehicleForm = serde_json::from_value(serde_json::json!({
            "customerName": "Luis",
            "vehicle": "Versa",
            "service": "Frenos",
            "contact": "555",
            "checkInDate": "2024-06-10",
            "checkInTime": "08:15",
            "laborHours": -1
        }))
        .unwrap();
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("labor_hours"));
    }

    #[test]
    fn tag_labels_parse_back() {
        for tag in VehicleInShopTag::ALL {
            assert_eq!(tag.to_string().parse::<VehicleInShopTag>().unwrap(), tag);
        }
    }
}
