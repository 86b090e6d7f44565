// src/views/reports.rs

use std::fmt::Write;

use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    common::dates::{long_date_es, short_datetime_es},
    models::{Appointment, AppointmentStatus, VehicleInShop},
};

const FOOTER: &str = "---\n_Generado desde el Sistema de Gestión del Taller_";

/// Lista numerada das citas agendadas para hoje, pronta para colar no WhatsApp.
/// `None` quando não há nenhuma.
pub fn daily_digest(appointments: &[Appointment], today: NaiveDate) -> Option<String> {
    let mut todays: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Scheduled && a.date.date() == today)
        .collect();

    if todays.is_empty() {
        return None;
    }
    todays.sort_by_key(|a| a.date);

    let mut message = format!("📋 *Citas del día - {}*\n\n", long_date_es(today));
    let _ = write!(message, "Total de citas: *{}*\n\n", todays.len());

    for (index, appointment) in todays.iter().enumerate() {
        let _ = writeln!(
            message,
            "{}. ⏰ {} - *{}*",
            index + 1,
            appointment.date.format("%H:%M"),
            appointment.customer_name
        );
        let _ = writeln!(message, "   🚗 {}", appointment.vehicle);
        let _ = writeln!(message, "   📞 {}", appointment.contact);
        let _ = writeln!(message, "   🔧 {}", appointment.service);
        message.push('\n');
    }

    message.push_str(FOOTER);
    Some(message)
}

/// Resumo dos veículos na oficina. `None` com a oficina vazia.
pub fn shop_report(vehicles: &[VehicleInShop], now: NaiveDateTime) -> Option<String> {
    if vehicles.is_empty() {
        return None;
    }

    let mut message = format!("🔧 *Vehículos en Taller - {}*\n\n", long_date_es(now.date()));
    let _ = write!(message, "Total de vehículos: *{}*\n\n", vehicles.len());

    for (index, vehicle) in vehicles.iter().enumerate() {
        let _ = writeln!(message, "{}. 🚗 *{}*", index + 1, vehicle.vehicle);
        let _ = writeln!(message, "   👤 {}", vehicle.customer_name);
        let _ = writeln!(message, "   📞 {}", vehicle.contact);
        let _ = writeln!(message, "   🔧 {}", vehicle.service);
        let _ = writeln!(message, "   📅 Días en taller: *{}*", vehicle.days_in_shop(now));

        if !vehicle.tags.is_empty() {
            let tags: Vec<&str> = vehicle.tags.iter().map(|t| t.as_str()).collect();
            let _ = writeln!(message, "   🏷️ Estado: {}", tags.join(", "));
        }
        if let Some(estimated) = &vehicle.estimated_completion {
            let _ = writeln!(message, "   ⏰ Entrega estimada: {}", short_datetime_es(estimated));
        }
        if !vehicle.notes.is_empty() {
            let _ = writeln!(message, "   📝 {}", vehicle.notes);
        }
        message.push('\n');
    }

    message.push_str(FOOTER);
    Some(message)
}
