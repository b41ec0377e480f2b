//! Financial figures shown on the overview screens

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rent configured for a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rent {
    pub id: i64,
    pub value: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Single-number response (`{ "value": 123.4 }`) used by overview endpoints
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct MetricValue {
    #[serde(default)]
    pub value: f64,
}

/// Figures on the financial overview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinancialMetric {
    GeneralBalance,
    MonthlyExpenses,
    MonthlyMarket,
    Employees,
    Rent,
}

impl FinancialMetric {
    pub const ALL: [FinancialMetric; 5] = [
        FinancialMetric::GeneralBalance,
        FinancialMetric::MonthlyExpenses,
        FinancialMetric::MonthlyMarket,
        FinancialMetric::Employees,
        FinancialMetric::Rent,
    ];

    /// Path segment under the financial overview endpoint
    pub fn path(&self) -> &'static str {
        match self {
            FinancialMetric::GeneralBalance => "general-balance",
            FinancialMetric::MonthlyExpenses => "monthly-expenses",
            FinancialMetric::MonthlyMarket => "monthly-market",
            FinancialMetric::Employees => "employees",
            FinancialMetric::Rent => "rent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FinancialMetric::GeneralBalance => "General balance",
            FinancialMetric::MonthlyExpenses => "Monthly expenses",
            FinancialMetric::MonthlyMarket => "Monthly market",
            FinancialMetric::Employees => "Employees",
            FinancialMetric::Rent => "Rent",
        }
    }
}

/// Monthly market spending categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarketCategory {
    Food,
    Cleaning,
}

impl MarketCategory {
    pub fn path(&self) -> &'static str {
        match self {
            MarketCategory::Food => "food",
            MarketCategory::Cleaning => "cleaning",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MarketCategory::Food => "Food",
            MarketCategory::Cleaning => "Cleaning",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rent_deserializes_camel_case() {
        let rent: Rent =
            serde_json::from_str(r#"{"id":1,"value":1500.5,"createdAt":"2024-01-01T00:00:00Z"}"#)
                .unwrap();
        assert_eq!(rent.value, 1500.5);
        assert!(rent.created_at.is_some());
    }

    #[test]
    fn test_metric_paths() {
        assert_eq!(FinancialMetric::GeneralBalance.path(), "general-balance");
        assert_eq!(MarketCategory::Cleaning.path(), "cleaning");
    }
}
