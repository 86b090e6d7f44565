// src/views/day.rs

use chrono::{Duration, NaiveDate, Timelike};
use serde::Serialize;

use crate::{common::dates::long_date_es, models::Appointment};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourSlot {
    pub hour: u32,
    /// "09:00"
    pub label: String,
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAgenda {
    pub date: NaiveDate,
    pub label: String,
    pub is_today: bool,
    pub previous: NaiveDate,
    pub next: NaiveDate,
    pub hours: Vec<HourSlot>,
}

impl DayAgenda {
    pub fn total(&self) -> usize {
        self.hours.iter().map(|slot| slot.appointments.len()).sum()
    }
}

/// Agenda de um dia: 24 faixas de hora local, cada uma com as citas daquela hora.
pub fn day_agenda(date: NaiveDate, appointments: &[Appointment], today: NaiveDate) -> DayAgenda {
    let of_the_day: Vec<&Appointment> = appointments.iter().filter(|a| a.date.date() == date).collect();

    let hours = (0..24)
        .map(|hour| HourSlot {
            hour,
            label: format!("{:02}:00", hour),
            appointments: of_the_day
                .iter()
                .filter(|a| a.date.hour() == hour)
                .map(|a| (*a).clone())
                .collect(),
        })
        .collect();

    DayAgenda {
        date,
        label: long_date_es(date),
        is_today: date == today,
        previous: date - Duration::days(1),
        next: date + Duration::days(1),
        hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{common::dates::parse_local_date, models::AppointmentStatus};
    use uuid::Uuid;

    fn appointment_at(name: &str, date: &str) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            customer_name: name.into(),
            vehicle: "Toyota".into(),
            service: "Frenos".into(),
            date: parse_local_date(date).unwrap(),
            contact: "555".into(),
            status: AppointmentStatus::Scheduled,
            tags: Vec::new(),
        }
    }

    #[test]
    fn buckets_by_local_hour() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let appointments = vec![
            appointment_at("Ana", "2024-06-01T09:00"),
            appointment_at("Beto", "2024-06-01T09:45"),
            appointment_at("Carla", "2024-06-01T00:30"),
            appointment_at("Otro día", "2024-06-02T09:00"),
        ];

        let agenda = day_agenda(day, &appointments, day);
        assert_eq!(agenda.hours.len(), 24);
        assert_eq!(agenda.total(), 3);
        assert_eq!(agenda.hours[9].appointments.len(), 2);
        assert_eq!(agenda.hours[9].label, "09:00");
        assert_eq!(agenda.hours[0].appointments[0].customer_name, "Carla");
        assert!(agenda.is_today);
    }

    #[test]
    fn navigation_crosses_month_boundaries() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let agenda = day_agenda(day, &[], NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(agenda.previous, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(agenda.next, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
        assert!(!agenda.is_today);
        assert_eq!(agenda.label, "viernes, 1 de marzo de 2024");
    }
}
