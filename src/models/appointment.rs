// src/models/appointment.rs

use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::dates::{local_datetime, DateInputValue, DateParseError};

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    // Existe no banco mas nenhum fluxo o produz: cancelar = apagar
    Canceled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Canceled => "Canceled",
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Scheduled" => Ok(AppointmentStatus::Scheduled),
            "Completed" => Ok(AppointmentStatus::Completed),
            "Canceled" => Ok(AppointmentStatus::Canceled),
            other => Err(format!("status de cita desconocido: {}", other)),
        }
    }
}

/// Resultado de uma cita, escolhido ao completá-la.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum AppointmentTag {
    #[serde(rename = "asistió")]
    Asistio,
    #[serde(rename = "canceló")]
    Cancelo,
    #[serde(rename = "no asistió")]
    NoAsistio,
    #[serde(rename = "reprogramó")]
    Reprogramo,
    #[serde(rename = "no dejó la unidad")]
    NoDejoLaUnidad,
    #[serde(rename = "llegó sin cita")]
    LlegoSinCita,
    #[serde(rename = "llegó tarde")]
    LlegoTarde,
}

impl AppointmentTag {
    /// Ordem de exibição.
    pub const ALL: [AppointmentTag; 7] = [
        AppointmentTag::Asistio,
        AppointmentTag::Cancelo,
        AppointmentTag::NoAsistio,
        AppointmentTag::Reprogramo,
        AppointmentTag::NoDejoLaUnidad,
        AppointmentTag::LlegoSinCita,
        AppointmentTag::LlegoTarde,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentTag::Asistio => "asistió",
            AppointmentTag::Cancelo => "canceló",
            AppointmentTag::NoAsistio => "no asistió",
            AppointmentTag::Reprogramo => "reprogramó",
            AppointmentTag::NoDejoLaUnidad => "no dejó la unidad",
            AppointmentTag::LlegoSinCita => "llegó sin cita",
            AppointmentTag::LlegoTarde => "llegó tarde",
        }
    }

    /// O cliente apareceu com o carro: a conclusão abre um registro na oficina.
    pub fn is_attendance(&self) -> bool {
        matches!(
            self,
            AppointmentTag::Asistio | AppointmentTag::LlegoSinCita | AppointmentTag::LlegoTarde
        )
    }
}

impl fmt::Display for AppointmentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppointmentTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| format!("etiqueta de cita desconocida: {}", s))
    }
}

// --- CITA ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub customer_name: String,
    pub vehicle: String,
    pub service: String,
    #[serde(with = "local_datetime")]
    pub date: NaiveDateTime,
    pub contact: String,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub tags: Vec<AppointmentTag>,
}

impl Appointment {
    pub fn is_completed(&self) -> bool {
        self.status == AppointmentStatus::Completed
    }

    /// Cópia completa pronta para o update: Completed com exatamente uma tag.
    pub fn completed_with(&self, tag: AppointmentTag) -> Appointment {
        Appointment {
            status: AppointmentStatus::Completed,
            tags: vec![tag],
            ..self.clone()
        }
    }

    /// Volta para Scheduled; as tags só existem em citas completadas.
    pub fn reverted(&self) -> Appointment {
        Appointment {
            status: AppointmentStatus::Scheduled,
            tags: Vec::new(),
            ..self.clone()
        }
    }
}

/// Campos de criação: id e status vêm do banco.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub customer_name: String,
    pub vehicle: String,
    pub service: String,
    pub date: NaiveDateTime,
    pub contact: String,
    pub tags: Vec<AppointmentTag>,
}

/// O formulário de cita, como a tela envia: data e hora separadas.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentForm {
    #[validate(length(min = 1, message = "required"))]
    pub customer_name: String,

    #[validate(length(min = 1, message = "required"))]
    pub vehicle: String,

    #[validate(length(min = 1, message = "required"))]
    pub service: String,

    #[validate(length(min = 1, message = "required"))]
    pub date_value: String,

    #[validate(length(min = 1, message = "required"))]
    pub time_value: String,

    #[validate(length(min = 1, message = "required"))]
    pub contact: String,
}

impl AppointmentForm {
    pub fn scheduled_at(&self) -> Result<NaiveDateTime, DateParseError> {
        DateInputValue::new(self.date_value.as_str(), self.time_value.as_str()).to_local_datetime()
    }

    pub fn into_new(self, date: NaiveDateTime) -> NewAppointment {
        NewAppointment {
            customer_name: self.customer_name,
            vehicle: self.vehicle,
            service: self.service,
            date,
            contact: self.contact,
            tags: Vec::new(),
        }
    }

    /// Mescla o formulário no registro existente (o update é de registro completo).
    pub fn merge_into(self, existing: &Appointment, date: NaiveDateTime) -> Appointment {
        Appointment {
            customer_name: self.customer_name,
            vehicle: self.vehicle,
            service: self.service,
            date,
            contact: self.contact,
            ..existing.clone()
        }
    }
}

/// Valores para pré-preencher o formulário de edição.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentFormValues {
    pub id: Uuid,
    pub customer_name: String,
    pub vehicle: String,
    pub service: String,
    #[serde(flatten)]
    pub date: DateInputValue,
    pub contact: String,
    pub tags: Vec<AppointmentTag>,
}
