//! Rent and overview figures

use sede_core::{FinancialMetric, MarketCategory, MetricValue, QueryParams, Rent};
use serde_json::Value;
use tracing::instrument;

use crate::client::ApiClient;
use crate::error::Result;

#[derive(Clone)]
pub struct FinanceClient {
    api: ApiClient,
}

impl FinanceClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Current rent, `None` when nothing is configured
    #[instrument(skip(self))]
    pub async fn rent(&self, params: Option<&QueryParams>) -> Result<Option<Rent>> {
        let body = self.api.get_json(&self.api.urls().rent(), params).await?;
        if body.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(body)?))
    }

    #[instrument(skip(self))]
    pub async fn metric(
        &self,
        metric: FinancialMetric,
        params: Option<&QueryParams>,
    ) -> Result<MetricValue> {
        let body = self
            .api
            .get_json(&self.api.urls().financial_overview(metric), params)
            .await?;
        Self::metric_value(body)
    }

    #[instrument(skip(self))]
    pub async fn market_total(
        &self,
        category: MarketCategory,
        params: Option<&QueryParams>,
    ) -> Result<MetricValue> {
        let body = self
            .api
            .get_json(&self.api.urls().market_overview(category), params)
            .await?;
        Self::metric_value(body)
    }

    fn metric_value(body: Value) -> Result<MetricValue> {
        if body.is_null() {
            return Ok(MetricValue::default());
        }
        Ok(serde_json::from_value(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::DEFAULT_TIMEOUT;
    use crate::test_support::serve;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    async fn finance_for(app: Router) -> FinanceClient {
        let base = serve(app).await;
        FinanceClient::new(ApiClient::new(&base, DEFAULT_TIMEOUT).unwrap())
    }

    #[tokio::test]
    async fn test_rent_absent_and_present() {
        let app = Router::new().route("/api/rent", get(|| async { "" }));
        assert_eq!(finance_for(app).await.rent(None).await.unwrap(), None);

        let app = Router::new().route(
            "/api/rent",
            get(|| async { Json(json!({ "id": 1, "value": 4500.0 })) }),
        );
        let rent = finance_for(app).await.rent(None).await.unwrap().unwrap();
        assert_eq!(rent.value, 4500.0);
    }

    #[tokio::test]
    async fn test_metric_and_market_totals() {
        let app = Router::new()
            .route(
                "/api/financial-overview/general-balance",
                get(|| async { Json(json!({ "value": 10.5 })) }),
            )
            .route(
                "/api/market/overview/cleaning",
                get(|| async { Json(json!({ "value": 3 })) }),
            );
        let finance = finance_for(app).await;

        let balance = finance
            .metric(FinancialMetric::GeneralBalance, None)
            .await
            .unwrap();
        assert_eq!(balance.value, 10.5);
        let cleaning = finance
            .market_total(MarketCategory::Cleaning, None)
            .await
            .unwrap();
        assert_eq!(cleaning.value, 3.0);
    }
}
