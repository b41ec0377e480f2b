//! Shared HTTP client for the clinic backend

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use sede_core::QueryParams;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::urls::ApiUrls;

/// Header identifying the logged-in user on every request
pub const USER_ID_HEADER: &str = "x-user-id";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Cheap-to-clone handle over a pooled [`reqwest::Client`]
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    urls: Arc<ApiUrls>,
    user_id: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Reuse an existing [`reqwest::Client`]
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            urls: Arc::new(ApiUrls::new(base_url)),
            user_id: Arc::new(RwLock::new(None)),
        }
    }

    pub fn urls(&self) -> &ApiUrls {
        &self.urls
    }

    /// Set or clear the user id sent with every request
    pub fn set_user_id(&self, user_id: Option<String>) {
        match self.user_id.write() {
            Ok(mut guard) => *guard = user_id,
            Err(poisoned) => *poisoned.into_inner() = user_id,
        }
    }

    pub fn user_id(&self) -> Option<String> {
        match self.user_id.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// `GET` returning the decoded JSON body.
    ///
    /// `params` of `None` sends no query string at all.
    pub async fn get_json(&self, url: &str, params: Option<&QueryParams>) -> Result<Value> {
        let mut request = self.request(Method::GET, url);
        if let Some(params) = params {
            request = request.query(params);
        }
        debug!(url, params = params.map_or(0, QueryParams::len), "GET");
        Self::parse_response(request.send().await?).await
    }

    /// `POST` a JSON body and return the decoded JSON response
    pub async fn post_json<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<Value> {
        debug!(url, "POST");
        let response = self.request(Method::POST, url).json(body).send().await?;
        Self::parse_response(response).await
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let request = self.http.request(method, url);
        match self.user_id() {
            Some(user_id) => request.header(USER_ID_HEADER, user_id),
            None => request,
        }
    }

    /// Map non-2xx to [`Error::Api`]; an empty body decodes as `null`.
    async fn parse_response(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Backend returned an error status");
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}
