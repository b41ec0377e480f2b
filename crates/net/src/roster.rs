//! Patient, contract and employee listings

use sede_core::{
    parse_contracts, parse_employees, parse_patients, Contract, Employee, Patient, QueryParams,
};
use tracing::{debug, instrument};

use crate::client::ApiClient;
use crate::error::Result;

#[derive(Clone)]
pub struct RosterClient {
    api: ApiClient,
}

impl RosterClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[instrument(skip(self))]
    pub async fn patients(&self, params: Option<&QueryParams>) -> Result<Vec<Patient>> {
        let body = self.api.get_json(&self.api.urls().patients(), params).await?;
        let patients = parse_patients(&body);
        debug!(count = patients.len(), "Fetched patients");
        Ok(patients)
    }

    #[instrument(skip(self))]
    pub async fn contracts(&self, params: Option<&QueryParams>) -> Result<Vec<Contract>> {
        let body = self.api.get_json(&self.api.urls().contracts(), params).await?;
        Ok(parse_contracts(&body))
    }

    #[instrument(skip(self))]
    pub async fn employees(&self, params: Option<&QueryParams>) -> Result<Vec<Employee>> {
        let body = self.api.get_json(&self.api.urls().employees(), params).await?;
        Ok(parse_employees(&body))
    }
}
