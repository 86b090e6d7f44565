// src/views/calendar.rs

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::{common::dates::month_name_es, models::Appointment};

pub const WEEKDAY_LABELS: [&str; 7] = ["Dom", "Lun", "Mar", "Mié", "Jue", "Vie", "Sáb"];

/// Mês exibido no calendário; a navegação só troca este valor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
}

impl CalendarMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month() }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next().first_day().pred_opt().unwrap_or(NaiveDate::MAX)
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    /// Ex: "Marzo de 2024"
    pub fn label(&self) -> String {
        let name = month_name_es(self.month);
        let mut chars = name.chars();
        let capitalized = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        };
        format!("{} de {}", capitalized, self.year)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_today: bool,
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarGrid {
    pub month: CalendarMonth,
    pub label: String,
    pub weekdays: [&'static str; 7],
    pub weeks: Vec<Vec<CalendarDay>>,
}

impl CalendarGrid {
    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.weeks.iter().flatten()
    }
}

/// Monta a grade do mês: semanas completas de domingo a sábado, do primeiro
/// domingo em/antes do dia 1 até o último sábado em/depois do fim do mês.
pub fn month_grid(month: CalendarMonth, appointments: &[Appointment], today: NaiveDate) -> CalendarGrid {
    let first = month.first_day();
    let last = month.last_day();
    let start = first - Duration::days(i64::from(first.weekday().num_days_from_sunday()));
    let end = last + Duration::days(i64::from(6 - last.weekday().num_days_from_sunday()));

    let days: Vec<CalendarDay> = start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|day| CalendarDay {
            date: day,
            is_current_month: day.month() == month.month && day.year() == month.year,
            is_today: day == today,
            appointments: appointments
                .iter()
                .filter(|a| a.date.date() == day)
                .cloned()
                .collect(),
        })
        .collect();

    let weeks = days.chunks(7).map(|week| week.to_vec()).collect();

    CalendarGrid {
        month,
        label: month.label(),
        weekdays: WEEKDAY_LABELS,
        weeks,
    }
}
