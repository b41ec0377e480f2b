//! Patient listing

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::{list_under, Record};

/// A resident as shown on the patient list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub birthday: Option<String>,
    pub sex: Option<String>,
    /// Relative or guardian to call first
    pub closer_contact: Option<String>,
    pub plan_name: Option<String>,
    pub diseases: Vec<String>,
    pub headquarter_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Patient {
    pub fn from_value(value: &Value) -> Self {
        let record = Record::new(value);
        let diseases = record
            .value(&["diseases"])
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(name) => Some(name.clone()),
                        other => Record::new(other).string(&["name", "nome"]),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: record.integer(&["id"]).unwrap_or(0),
            name: record.string(&["name", "nome"]).unwrap_or_default(),
            birthday: record.string(&["birthday"]),
            sex: record.string(&["sex"]),
            closer_contact: record.string(&["closer_contact", "closerContact"]),
            plan_name: record.string(&["plan_name", "planName"]),
            diseases,
            headquarter_id: record.integer(&["headquarterId", "headquarter_id"]),
            created_at: record.timestamp(&["created_at", "createdAt"]),
        }
    }
}

/// Normalize a patient listing: bare array or `{ "patients": [...] }`
pub fn parse_patients(body: &Value) -> Vec<Patient> {
    list_under(body, "patients")
        .iter()
        .map(Patient::from_value)
        .collect()
}
