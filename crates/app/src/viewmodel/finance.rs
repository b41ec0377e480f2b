//! Rent and overview screens

use futures::future::try_join_all;
use futures::FutureExt;
use sede_core::{FinancialMetric, MarketCategory, Rent};

use super::ScopedScreen;
use crate::state::AppState;

/// Every figure on the financial overview, in display order
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub figures: Vec<(FinancialMetric, f64)>,
}

impl Overview {
    pub fn get(&self, metric: FinancialMetric) -> Option<f64> {
        self.figures
            .iter()
            .find(|(m, _)| *m == metric)
            .map(|(_, value)| *value)
    }
}

/// Monthly market spending split by category
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MarketTotals {
    pub food: f64,
    pub cleaning: f64,
}

impl MarketTotals {
    pub fn total(&self) -> f64 {
        self.food + self.cleaning
    }
}

pub fn rent_screen(state: &AppState) -> ScopedScreen<Option<Rent>> {
    let client = state.finance.clone();
    ScopedScreen::new(
        "rent",
        "Could not load the rent.",
        state.selection.clone(),
        state.notifier.clone(),
        move |params| {
            let client = client.clone();
            async move { client.rent(params.as_ref()).await }.boxed()
        },
    )
}

pub fn overview_screen(state: &AppState) -> ScopedScreen<Overview> {
    let client = state.finance.clone();
    ScopedScreen::new(
        "overview",
        "Could not load the financial overview.",
        state.selection.clone(),
        state.notifier.clone(),
        move |params| {
            let client = client.clone();
            async move {
                let requests = FinancialMetric::ALL.into_iter().map(|metric| {
                    let client = &client;
                    let params = params.as_ref();
                    async move {
                        let figure = client.metric(metric, params).await?;
                        Ok::<_, sede_net::Error>((metric, figure.value))
                    }
                });
                let figures = try_join_all(requests).await?;
                Ok(Overview { figures })
            }
            .boxed()
        },
    )
}

pub fn market_screen(state: &AppState) -> ScopedScreen<MarketTotals> {
    let client = state.finance.clone();
    ScopedScreen::new(
        "market",
        "Could not load market spending.",
        state.selection.clone(),
        state.notifier.clone(),
        move |params| {
            let client = client.clone();
            async move {
                let (food, cleaning) = futures::try_join!(
                    client.market_total(MarketCategory::Food, params.as_ref()),
                    client.market_total(MarketCategory::Cleaning, params.as_ref()),
                )?;
                Ok(MarketTotals {
                    food: food.value,
                    cleaning: cleaning.value,
                })
            }
            .boxed()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::test_support::serve;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use sede_core::Database;
    use sede_net::{ApiClient, DEFAULT_TIMEOUT};
    use serde_json::json;
    use std::collections::HashMap;

    /// Backend with two locations whose figures are `id * 100`, or `1000`
    /// for all locations
    fn backend() -> Router {
        fn scale(q: &HashMap<String, String>) -> f64 {
            q.get("headquarterId")
                .and_then(|v| v.parse::<f64>().ok())
                .map(|id| id * 100.0)
                .unwrap_or(1000.0)
        }

        Router::new()
            .route(
                "/api/headquarters",
                get(|| async { Json(json!([{ "id": 1, "name": "A1" }, { "id": 2, "name": "B2" }])) }),
            )
            .route(
                "/api/financial-overview/:metric",
                get(|Path(_): Path<String>, Query(q): Query<HashMap<String, String>>| async move {
                    Json(json!({ "value": scale(&q) }))
                }),
            )
            .route(
                "/api/market/overview/:category",
                get(|Path(category): Path<String>, Query(q): Query<HashMap<String, String>>| async move {
                    let half = if category == "food" { 0.75 } else { 0.25 };
                    Json(json!({ "value": scale(&q) * half }))
                }),
            )
            .route("/api/rent", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
    }

    async fn state() -> AppState {
        let base = serve(backend()).await;
        let api = ApiClient::new(&base, DEFAULT_TIMEOUT).unwrap();
        AppState::assemble(Config::default(), Database::open_in_memory().unwrap(), api)
    }

    #[tokio::test]
    async fn test_overview_follows_selection() {
        let state = state().await;
        let screen = overview_screen(&state);

        let overview = screen.init().await.unwrap();
        assert_eq!(overview.figures.len(), FinancialMetric::ALL.len());
        assert_eq!(overview.get(FinancialMetric::Employees), Some(100.0));

        state.selection.set_selected_headquarter(None).unwrap();
        let overview = screen.refresh().await.unwrap();
        assert_eq!(overview.get(FinancialMetric::GeneralBalance), Some(1000.0));
    }

    #[tokio::test]
    async fn test_market_totals_split_by_category() {
        let state = state().await;
        state.selection.ensure_loaded().await.unwrap();
        state.selection.set_selected_headquarter(Some(2)).unwrap();

        let totals = market_screen(&state).refresh().await.unwrap();
        assert_eq!(totals.food, 150.0);
        assert_eq!(totals.cleaning, 50.0);
        assert_eq!(totals.total(), 200.0);
    }

    #[tokio::test]
    async fn test_rent_failure_notifies_fallback() {
        let state = state().await;
        let mut notifications = state.notifier.subscribe();

        assert_eq!(rent_screen(&state).init().await, None);
        let notification = notifications.recv().await.unwrap();
        assert_eq!(notification.message, "Could not load the rent.");
    }
}
