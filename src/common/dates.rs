// src/common/dates.rs

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use thiserror::Error;

/// Formato canônico de saída de um horário local ("parede"), sem fuso.
pub const LOCAL_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateParseError {
    #[error("fecha inválida: '{0}'")]
    Invalid(String),
}

/// Par de valores prontos para os inputs `date` e `time` de um formulário.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateInputValue {
    pub date_value: String,
    pub time_value: String,
}

impl DateInputValue {
    pub fn new(date_value: impl Into<String>, time_value: impl Into<String>) -> Self {
        Self {
            date_value: date_value.into(),
            time_value: time_value.into(),
        }
    }

    /// Junta o par `YYYY-MM-DD` + `HH:MM` num horário local.
    pub fn to_local_datetime(&self) -> Result<NaiveDateTime, DateParseError> {
        parse_local_date(&format!("{}T{}:00", self.date_value, self.time_value))
    }
}

/// Interpreta `YYYY-MM-DDTHH:MM[:SS]` como hora local de parede.
///
/// Os componentes são lidos como inteiros simples e nenhum fuso é aplicado,
/// então uma string sem offset nunca é tratada como UTC (o que deslocaria o dia
/// perto da meia-noite). Strings com `Z` ou `±hh:mm` são instantes absolutos e
/// são convertidas para a hora local. Sem `T`, cai no parsing genérico.
pub fn parse_local_date(value: &str) -> Result<NaiveDateTime, DateParseError> {
    let value = value.trim();
    let invalid = || DateParseError::Invalid(value.to_string());

    if let Some((date_part, time_part)) = value.split_once('T') {
        if has_zone_suffix(time_part) {
            return DateTime::parse_from_rfc3339(value)
                .map(|dt| dt.with_timezone(&Local).naive_local())
                .map_err(|_| invalid());
        }

        let date = parse_date_part(date_part).ok_or_else(invalid)?;
        let time = parse_time_part(time_part).ok_or_else(invalid)?;
        return Ok(date.and_time(time));
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Local).naive_local());
    }

    parse_date_part(value)
        .map(|date| date.and_time(NaiveTime::MIN))
        .ok_or_else(invalid)
}

fn has_zone_suffix(time_part: &str) -> bool {
    time_part.ends_with('Z') || time_part.ends_with('z') || time_part.contains('+') || time_part.contains('-')
}

fn parse_date_part(date_part: &str) -> Option<NaiveDate> {
    let mut parts = date_part.split('-');
    let year = parts.next()?.parse::<i32>().ok()?;
    let month = parts.next()?.parse::<u32>().ok()?;
    let day = parts.next()?.parse::<u32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_time_part(time_part: &str) -> Option<NaiveTime> {
    let mut parts = time_part.split(':');
    let hour = parts.next()?.parse::<u32>().ok()?;
    let minute = parts.next()?.parse::<u32>().ok()?;
    // Segundos são opcionais; frações ("05.123") são truncadas
    let second = match parts.next() {
        Some(raw) => raw.split('.').next()?.parse::<u32>().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    NaiveTime::from_hms_opt(hour, minute, second)
}

pub fn format_date_for_input(date: &NaiveDateTime) -> DateInputValue {
    DateInputValue {
        date_value: date.format("%Y-%m-%d").to_string(),
        time_value: date.format("%H:%M").to_string(),
    }
}

/// Mesmo dia do calendário local (ignora a hora).
pub fn is_same_day(d1: &NaiveDateTime, d2: &NaiveDateTime) -> bool {
    d1.year() == d2.year() && d1.month() == d2.month() && d1.day() == d2.day()
}

/// "Agora" em hora local de parede.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

// --- Nomes em espanhol para os relatórios ---

const MONTHS_ES: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio",
    "julio", "agosto", "septiembre", "octubre", "noviembre", "diciembre",
];

const MONTHS_SHORT_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

const WEEKDAYS_ES: [&str; 7] = [
    "domingo", "lunes", "martes", "miércoles", "jueves", "viernes", "sábado",
];

pub fn month_name_es(month: u32) -> &'static str {
    MONTHS_ES[(month.clamp(1, 12) - 1) as usize]
}

/// Ex: "domingo, 10 de marzo de 2024"
pub fn long_date_es(date: NaiveDate) -> String {
    format!(
        "{}, {} de {} de {}",
        WEEKDAYS_ES[date.weekday().num_days_from_sunday() as usize],
        date.day(),
        month_name_es(date.month()),
        date.year()
    )
}

/// Ex: "10 mar, 14:30"
pub fn short_datetime_es(date: &NaiveDateTime) -> String {
    format!(
        "{} {}, {}",
        date.day(),
        MONTHS_SHORT_ES[(date.month() - 1) as usize],
        date.format("%H:%M")
    )
}

/// Serde para `NaiveDateTime` que sempre passa por [`parse_local_date`].
pub mod local_datetime {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::{parse_local_date, LOCAL_DATETIME_FORMAT};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(LOCAL_DATETIME_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_local_date(&raw).map_err(de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveDateTime;
        use serde::{de, Deserialize, Deserializer, Serializer};

        use crate::common::dates::{parse_local_date, LOCAL_DATETIME_FORMAT};

        pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(date) => serializer.collect_str(&date.format(LOCAL_DATETIME_FORMAT)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
        where
            D: Deserializer<'de>,
        {
            // String vazia vale como "sem data", igual ao input vazio do formulário
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if !raw.trim().is_empty() => {
                    parse_local_date(&raw).map(Some).map_err(de::Error::custom)
                }
                _ => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_wall_clock_without_shifting() {
        let date = parse_local_date("2024-03-10T14:30").unwrap();
        assert_eq!(
            (date.year(), date.month(), date.day(), date.hour(), date.minute()),
            (2024, 3, 10, 14, 30)
        );
        assert_eq!(date.second(), 0);
    }

    #[test]
    fn parses_seconds_and_truncates_fractions() {
        let date = parse_local_date("2024-12-31T23:59:58.750").unwrap();
        assert_eq!((date.day(), date.hour(), date.minute(), date.second()), (31, 23, 59, 58));
    }

    #[test]
    fn midnight_stays_on_the_same_day() {
        let date = parse_local_date("2024-01-01T00:05:00").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 1, 1));
    }

    #[test]
    fn bare_date_falls_back_to_midnight() {
        let date = parse_local_date("2024-06-01").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_time(NaiveTime::MIN));
    }

    #[test]
    fn zoned_strings_are_converted_to_local_time() {
        let expected = DateTime::parse_from_rfc3339("2024-06-01T15:00:00Z")
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(parse_local_date("2024-06-01T15:00:00Z").unwrap(), expected);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_local_date("mañana").is_err());
        assert!(parse_local_date("2024-02-30T10:00").is_err());
        assert!(parse_local_date("2024-03-10T25:00").is_err());
    }

    #[test]
    fn input_values_are_zero_padded_and_round_trip() {
        let date = parse_local_date("2024-03-05T07:04").unwrap();
        let input = format_date_for_input(&date);
        assert_eq!(input, DateInputValue::new("2024-03-05", "07:04"));
        assert_eq!(input.to_local_datetime().unwrap(), date);
    }

    #[test]
    fn same_day_ignores_time_of_day() {
        let morning = parse_local_date("2024-03-10T00:00").unwrap();
        let night = parse_local_date("2024-03-10T23:59").unwrap();
        let next = parse_local_date("2024-03-11T00:00").unwrap();
        assert!(is_same_day(&morning, &night));
        assert!(!is_same_day(&night, &next));
    }

    #[test]
    fn spanish_display_names() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(long_date_es(date), "domingo, 10 de marzo de 2024");
        assert_eq!(short_datetime_es(&parse_local_date("2024-09-05T08:15").unwrap()), "5 sept, 08:15");
        assert_eq!(month_name_es(12), "diciembre");
    }
}
