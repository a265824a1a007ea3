use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{BackendError, CatalogBackend};
use crate::catalog::{
    ApprovalCheckResponse, Product, ProfilePatch, SearchParams, SearchResponse, UserProfile,
};
use crate::config::BackendConfig;

/// `reqwest` client for the JSON backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
            timeout,
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            Duration::from_millis(config.timeout_ms),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Backend URL for `segments`, each percent-encoded as a single path segment.
    fn url(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| BackendError::InvalidUrl(format!("{}: {err}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| BackendError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url).timeout(self.timeout)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        builder: RequestBuilder,
    ) -> Result<T, BackendError> {
        let response = builder.send().await.map_err(|err| {
            warn!(endpoint, error = %err, "backend request failed");
            BackendError::Transport(err.to_string())
        })?;

        let status = response.status();
        debug!(endpoint, status = status.as_u16(), "backend responded");

        match status {
            StatusCode::UNAUTHORIZED => return Err(BackendError::Unauthorized),
            StatusCode::NOT_FOUND => return Err(BackendError::NotFound(endpoint.to_string())),
            status if !status.is_success() => {
                return Err(BackendError::Status {
                    status: status.as_u16(),
                })
            }
            _ => {}
        }

        response
            .json::<T>()
            .await
            .map_err(|err| BackendError::Decode(err.to_string()))
    }
}

#[async_trait::async_trait]
impl CatalogBackend for HttpBackend {
    async fn products(&self) -> Result<Vec<Product>, BackendError> {
        let url = self.url(&["api", "products"])?;
        self.send(url.path(), self.request(Method::GET, url.clone()))
            .await
    }

    async fn top10(&self) -> Result<Vec<Product>, BackendError> {
        let url = self.url(&["api", "top10"])?;
        self.send(url.path(), self.request(Method::GET, url.clone()))
            .await
    }

    async fn product(&self, id: &str) -> Result<Product, BackendError> {
        let url = self.url(&["api", "product", id])?;
        self.send(url.path(), self.request(Method::GET, url.clone()))
            .await
    }

    async fn search(&self, params: &SearchParams) -> Result<SearchResponse, BackendError> {
        let url = self.url(&["api", "search"])?;
        let builder = self.request(Method::POST, url.clone()).json(params);
        self.send(url.path(), builder).await
    }

    async fn check_approval(
        &self,
        product_id: &str,
        user_id: &str,
    ) -> Result<ApprovalCheckResponse, BackendError> {
        let url = self.url(&["api", "products", product_id, "check-approval"])?;
        let builder = self
            .request(Method::GET, url.clone())
            .query(&[("user_id", user_id)]);
        self.send(url.path(), builder).await
    }

    async fn me(&self, token: &str) -> Result<UserProfile, BackendError> {
        let url = self.url(&["api", "users", "me"])?;
        let builder = self.request(Method::GET, url.clone()).bearer_auth(token);
        self.send(url.path(), builder).await
    }

    async fn update_profile(
        &self,
        token: &str,
        patch: &ProfilePatch,
    ) -> Result<UserProfile, BackendError> {
        let url = self.url(&["api", "users", "me"])?;
        let builder = self
            .request(Method::PATCH, url.clone())
            .bearer_auth(token)
            .json(patch);
        self.send(url.path(), builder).await
    }
}
