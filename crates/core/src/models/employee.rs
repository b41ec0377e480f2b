//! Employee model

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::{list_under, Record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    /// Job title as the backend names it (nurse, cleaner, security, cook)
    pub kind: String,
    pub name: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub entry_date: Option<String>,
    /// `HH:00`
    pub weekly_hours: String,
    pub salary: f64,
    pub salary_with_taxes: f64,
}

impl Employee {
    pub fn from_value(value: &Value) -> Self {
        let root = Record::new(value);
        let record = root.record(&["employee"]).unwrap_or(root);

        // Hours arrive either as a bare number or already formatted
        let weekly_hours = match record.value(&["weekly_hours", "weeklyHours"]) {
            Some(Value::Number(n)) => format!("{:02}:00", n.as_i64().unwrap_or(0)),
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        };

        Self {
            id: record.integer(&["id"]).unwrap_or(0),
            kind: record
                .string(&["type", "employee_type", "employeeType"])
                .unwrap_or_default(),
            name: record.string(&["name"]).unwrap_or_default(),
            full_name: record.string(&["full_name", "fullName"]).unwrap_or_default(),
            phone: record.string(&["phone"]),
            entry_date: record.string(&["entry_date", "entryDate"]),
            weekly_hours,
            salary: record.number(&["salary"]).unwrap_or(0.0),
            salary_with_taxes: record
                .number(&["salary_with_taxes", "salaryWithTaxes"])
                .unwrap_or(0.0),
        }
    }
}

/// Normalize an employee listing: bare array or `{ "employees": [...] }`
pub fn parse_employees(body: &Value) -> Vec<Employee> {
    list_under(body, "employees")
        .iter()
        .map(Employee::from_value)
        .collect()
}
