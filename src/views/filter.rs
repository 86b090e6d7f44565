// src/views/filter.rs

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Appointment, AppointmentStatus};

/// Filtro da lista de citas: texto livre + dia opcional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub search_term: String,
    pub date: Option<NaiveDate>,
}

impl AppointmentFilter {
    pub fn matches(&self, appointment: &Appointment) -> bool {
        let term = self.search_term.to_lowercase();
        let matches_search = appointment.customer_name.to_lowercase().contains(&term)
            || appointment.vehicle.to_lowercase().contains(&term)
            || appointment.service.to_lowercase().contains(&term);

        if !matches_search {
            return false;
        }

        match self.date {
            Some(day) => appointment.date.date() == day,
            None => true,
        }
    }
}

/// As duas colunas da lista, lado a lado.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentColumns {
    pub scheduled: Vec<Appointment>,
    pub completed: Vec<Appointment>,
}

/// Aplica o filtro mantendo a ordem do snapshot e separa por status.
/// `Canceled` não entra em nenhuma das colunas.
pub fn split_by_status(appointments: &[Appointment], filter: &AppointmentFilter) -> AppointmentColumns {
    let mut columns = AppointmentColumns::default();
    for appointment in appointments.iter().filter(|a| filter.matches(a)) {
        match appointment.status {
            AppointmentStatus::Scheduled => columns.scheduled.push(appointment.clone()),
            AppointmentStatus::Completed => columns.completed.push(appointment.clone()),
            AppointmentStatus::Canceled => {}
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{common::dates::parse_local_date, models::AppointmentTag};
    use uuid::Uuid;

    fn appointment(name: &str, vehicle: &str, date: &str) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            customer_name: name.into(),
            vehicle: vehicle.into(),
            service: "Servicio mayor".into(),
            date: parse_local_date(date).unwrap(),
            contact: "555".into(),
            status: AppointmentStatus::Scheduled,
            tags: Vec::new(),
        }
    }

    #[test]
    fn search_is_case_insensitive_over_name_vehicle_and_service() {
        let a = appointment("Juan Pérez", "Jetta", "2024-06-01T09:00");
        let b = appointment("María", "Civic", "2024-06-01T10:00");
        let all = vec![a.clone(), b.clone()];

        for term in ["juan", "JUAN", "Juan"] {
            let filter = AppointmentFilter { search_term: term.into(), date: None };
            let found: Vec<_> = all.iter().filter(|x| filter.matches(x)).map(|x| x.id).collect();
            assert_eq!(found, vec![a.id]);
        }

        let by_vehicle = AppointmentFilter { search_term: "civic".into(), date: None };
        assert!(by_vehicle.matches(&b) && !by_vehicle.matches(&a));

        let by_service = AppointmentFilter { search_term: "mayor".into(), date: None };
        assert!(by_service.matches(&a) && by_service.matches(&b));
    }

    #[test]
    fn date_filter_keeps_only_the_same_local_day() {
        let a = appointment("Juan Pérez", "Jetta", "2024-06-01T23:30");
        let other_day = appointment("Juan Pérez", "Jetta", "2024-06-02T00:10");

        let filter = AppointmentFilter {
            search_term: "juan".into(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1),
        };
        assert!(filter.matches(&a));
        assert!(!filter.matches(&other_day));
    }

    #[test]
    fn empty_search_matches_everything() {
        let filter = AppointmentFilter::default();
        assert!(filter.matches(&appointment("X", "Y", "2024-06-01T09:00")));
    }

    #[test]
    fn columns_split_by_status_in_snapshot_order() {
        let first = appointment("Ana", "Toyota", "2024-06-01T09:00");
        let second = appointment("Beto", "Mazda", "2024-06-01T10:00").completed_with(AppointmentTag::Asistio);
        let third = appointment("Carla", "Ford", "2024-06-01T11:00");

        let columns = split_by_status(&[first.clone(), second.clone(), third.clone()], &AppointmentFilter::default());
        let scheduled: Vec<_> = columns.scheduled.iter().map(|a| a.id).collect();
        assert_eq!(scheduled, vec![first.id, third.id]);
        assert_eq!(columns.completed.len(), 1);
        assert_eq!(columns.completed[0].id, second.id);
    }
}
