//! Headquarter directory client

use async_trait::async_trait;
use sede_core::{parse_directory, Headquarter, HeadquarterCreate};
use tracing::{info, instrument};

use crate::client::ApiClient;
use crate::error::Result;

/// Source of the headquarters directory.
///
/// Implementations do not cache; caching belongs to the selection holder.
#[async_trait]
pub trait HeadquarterDirectory: Send + Sync {
    /// Fetch every location, normalized
    async fn fetch_all(&self) -> Result<Vec<Headquarter>>;

    /// Create a location and return the normalized record
    async fn create(&self, payload: &HeadquarterCreate) -> Result<Headquarter>;
}

/// [`HeadquarterDirectory`] over the REST backend
#[derive(Clone)]
pub struct HeadquarterClient {
    api: ApiClient,
}

impl HeadquarterClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl HeadquarterDirectory for HeadquarterClient {
    #[instrument(skip(self))]
    async fn fetch_all(&self) -> Result<Vec<Headquarter>> {
        let body = self.api.get_json(&self.api.urls().headquarters(), None).await?;
        let directory = parse_directory(&body);
        info!(count = directory.len(), "Fetched headquarters directory");
        Ok(directory)
    }

    #[instrument(skip(self, payload), fields(name = %payload.name))]
    async fn create(&self, payload: &HeadquarterCreate) -> Result<Headquarter> {
        payload.validate()?;
        let body = self
            .api
            .post_json(&self.api.urls().headquarters(), payload)
            .await?;
        let created = Headquarter::from_value(&body);
        info!(id = created.id, "Created headquarter");
        Ok(created)
    }
}
