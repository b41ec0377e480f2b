//! Headquarter model - a physical clinic location and the tenancy unit

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::{list_under, Record};
use crate::error::{Error, Result};

/// A physical location ("sede")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headquarter {
    pub id: i64,
    pub name: String,
    /// Monthly rent amount
    pub rent: Option<f64>,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// Free-text note
    pub observation: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Headquarter {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            rent: None,
            address: None,
            phone: None,
            observation: None,
            created_at: None,
        }
    }

    /// Normalize a backend record into the canonical shape.
    ///
    /// Accepts English and Portuguese field names, snake_case or camelCase
    /// timestamps, and rent given as a number or a decimal string.
    pub fn from_value(value: &Value) -> Self {
        let record = Record::new(value);
        Self {
            id: record.integer(&["id"]).unwrap_or(0),
            name: record.string(&["name", "nome"]).unwrap_or_default(),
            rent: record.number(&["rent", "aluguel"]),
            address: record.string(&["address", "endereco"]),
            phone: record.string(&["phone", "telefone"]),
            observation: record.string(&["observation", "observacao"]),
            created_at: record.timestamp(&["created_at", "createdAt"]),
        }
    }
}

/// Normalize a directory response.
///
/// The backend returns either a bare array or `{ "headquarters": [...] }`;
/// anything else is treated as an empty directory.
pub fn parse_directory(body: &Value) -> Vec<Headquarter> {
    list_under(body, "headquarters")
        .iter()
        .map(Headquarter::from_value)
        .collect()
}

/// Payload for creating a new headquarter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadquarterCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
}

impl HeadquarterCreate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_rent(mut self, rent: f64) -> Self {
        self.rent = Some(rent);
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_observation(mut self, observation: impl Into<String>) -> Self {
        self.observation = Some(observation.into());
        self
    }

    /// Reject payloads the backend would refuse
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("headquarter name is required".into()));
        }
        if let Some(rent) = self.rent {
            if !rent.is_finite() || rent < 0.0 {
                return Err(Error::Validation(format!("invalid rent amount: {rent}")));
            }
        }
        Ok(())
    }
}
