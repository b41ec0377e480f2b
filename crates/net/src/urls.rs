//! Backend endpoint table

use sede_core::{FinancialMetric, MarketCategory};

/// Endpoint URLs derived from the configured base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiUrls {
    base: String,
}

impl ApiUrls {
    /// Trailing slashes on `base_url` are ignored
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn login(&self) -> String {
        format!("{}/api/auth/login", self.base)
    }

    pub fn headquarters(&self) -> String {
        format!("{}/api/headquarters", self.base)
    }

    pub fn calendar_entries(&self) -> String {
        format!("{}/api/calendar", self.base)
    }

    pub fn calendar_availability(&self) -> String {
        format!("{}/api/calendar/availability", self.base)
    }

    pub fn patients(&self) -> String {
        format!("{}/api/patients", self.base)
    }

    pub fn contracts(&self) -> String {
        format!("{}/api/contracts", self.base)
    }

    pub fn employees(&self) -> String {
        format!("{}/api/employees", self.base)
    }

    pub fn rent(&self) -> String {
        format!("{}/api/rent", self.base)
    }

    pub fn financial_overview(&self, metric: FinancialMetric) -> String {
        format!("{}/api/financial-overview/{}", self.base, metric.path())
    }

    pub fn market_overview(&self, category: MarketCategory) -> String {
        format!("{}/api/market/overview/{}", self.base, category.path())
    }
}
