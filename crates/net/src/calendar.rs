//! Calendar client - visits and closed slots, scoped by headquarter

use sede_core::{parse_availability, parse_entries, AvailabilitySlot, CalendarEntry, QueryParams};
use tracing::instrument;

use crate::client::ApiClient;
use crate::error::Result;

#[derive(Clone)]
pub struct CalendarClient {
    api: ApiClient,
}

impl CalendarClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Upcoming entries
    #[instrument(skip(self))]
    pub async fn entries(&self, params: Option<&QueryParams>) -> Result<Vec<CalendarEntry>> {
        let body = self
            .api
            .get_json(&self.api.urls().calendar_entries(), params)
            .await?;
        Ok(parse_entries(&body))
    }

    /// Free slots for scheduling
    #[instrument(skip(self))]
    pub async fn availability(&self, params: Option<&QueryParams>) -> Result<Vec<AvailabilitySlot>> {
        let body = self
            .api
            .get_json(&self.api.urls().calendar_availability(), params)
            .await?;
        Ok(parse_availability(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::DEFAULT_TIMEOUT;
    use crate::test_support::serve;
    use axum::extract::Query;
    use axum::routing::get;
    use axum::{Json, Router};
    use sede_core::build_query_params;
    use serde_json::json;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_entries_forward_scope() {
        let app = Router::new().route(
            "/api/calendar",
            get(|Query(query): Query<HashMap<String, String>>| async move {
                let hq = query.get("headquarterId").cloned().unwrap_or_default();
                Json(json!({ "items": [{ "id": 1, "date": "2024-06-01", "headquarterId": hq }] }))
            }),
        );
        let base = serve(app).await;
        let calendar = CalendarClient::new(ApiClient::new(&base, DEFAULT_TIMEOUT).unwrap());

        let scoped = calendar
            .entries(build_query_params(Some(2), &[]).as_ref())
            .await
            .unwrap();
        assert_eq!(scoped[0].headquarter_id, 2);

        let unscoped = calendar.entries(None).await.unwrap();
        assert_eq!(unscoped[0].headquarter_id, 0);
    }
}
