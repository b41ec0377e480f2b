//! Patient contracts

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::{list_under, Record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: i64,
    pub patient_id: i64,
    pub patient_name: String,
    /// Signing date as sent by the backend (`YYYY-MM-DD`)
    pub contract_date: String,
    pub file_url: Option<String>,
}

impl Contract {
    pub fn from_value(value: &Value) -> Self {
        let root = Record::new(value);
        let record = root.record(&["contract"]).unwrap_or(root);
        Self {
            id: record.integer(&["id"]).unwrap_or(0),
            patient_id: record.integer(&["patient_id", "patientId"]).unwrap_or(0),
            patient_name: record
                .string(&["patient_name", "patientName"])
                .unwrap_or_default(),
            contract_date: record
                .string(&["contract_date", "contractDate"])
                .unwrap_or_default(),
            file_url: record.string(&["file_url", "fileUrl"]),
        }
    }
}

/// Normalize a contract listing: bare array or `{ "contracts": [...] }`
pub fn parse_contracts(body: &Value) -> Vec<Contract> {
    list_under(body, "contracts")
        .iter()
        .map(Contract::from_value)
        .collect()
}
