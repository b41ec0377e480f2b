//! Calendar model - scheduled visits and closed slots per location

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::{list_under, Record};

/// Kind of calendar entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CalendarKind {
    #[default]
    #[serde(rename = "Visita")]
    Visit,
    #[serde(rename = "Horario fechado")]
    ClosedSlot,
}

impl CalendarKind {
    pub fn parse(s: &str) -> Self {
        match s {
            "Horario fechado" => CalendarKind::ClosedSlot,
            _ => CalendarKind::Visit,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CalendarKind::Visit => "Visit",
            CalendarKind::ClosedSlot => "Closed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub id: i64,
    pub kind: CalendarKind,
    pub date: String,
    pub time: Option<String>,
    pub all_day: bool,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub headquarter_id: i64,
    pub headquarter_name: Option<String>,
    pub observation: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl CalendarEntry {
    pub fn from_value(value: &Value) -> Self {
        let record = Record::new(value);
        let time = record.string(&["time", "hora"]);
        Self {
            id: record.integer(&["id"]).unwrap_or(0),
            kind: record
                .string(&["type", "tipo"])
                .map(|k| CalendarKind::parse(&k))
                .unwrap_or_default(),
            date: record.string(&["date", "data"]).unwrap_or_default(),
            all_day: record
                .boolean(&["allDay", "fecharDiaTodo"])
                .unwrap_or(time.is_none()),
            time,
            name: record.string(&["name", "nome"]),
            phone: record.string(&["phone", "celular"]),
            headquarter_id: record
                .integer(&["headquarterId", "headquarter_id"])
                .unwrap_or(0),
            headquarter_name: record.string(&["headquarterName", "headquarter_name"]),
            observation: record.string(&["observation", "observacao"]),
            created_at: record.timestamp(&["createdAt", "created_at"]),
        }
    }
}

/// Free scheduling window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub date: String,
    pub time: String,
}

/// Normalize a calendar listing: bare array or `{ "items": [...] }`
pub fn parse_entries(body: &Value) -> Vec<CalendarEntry> {
    list_under(body, "items")
        .iter()
        .map(CalendarEntry::from_value)
        .collect()
}

/// Normalize an availability listing: bare array or `{ "slots": [...] }`
pub fn parse_availability(body: &Value) -> Vec<AvailabilitySlot> {
    list_under(body, "slots")
        .iter()
        .filter_map(|item| {
            let record = Record::new(item);
            Some(AvailabilitySlot {
                date: record.string(&["date"])?,
                time: record.string(&["time"])?,
            })
        })
        .collect()
}
