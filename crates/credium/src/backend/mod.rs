//! Client seam for the remote catalog / user API.

mod cache;
mod fixture;
mod http;

pub use cache::CachedBackend;
pub use fixture::FixtureBackend;
pub use http::HttpBackend;

use crate::catalog::{
    ApprovalCheckResponse, Product, ProfilePatch, SearchParams, SearchResponse, UserProfile,
};

/// Operations the pages need from the backend. Implementations must be cheap
/// to share across request handlers.
#[async_trait::async_trait]
pub trait CatalogBackend: Send + Sync {
    async fn products(&self) -> Result<Vec<Product>, BackendError>;

    async fn top10(&self) -> Result<Vec<Product>, BackendError>;

    async fn product(&self, id: &str) -> Result<Product, BackendError>;

    async fn search(&self, params: &SearchParams) -> Result<SearchResponse, BackendError>;

    async fn check_approval(
        &self,
        product_id: &str,
        user_id: &str,
    ) -> Result<ApprovalCheckResponse, BackendError>;

    async fn me(&self, token: &str) -> Result<UserProfile, BackendError>;

    async fn update_profile(
        &self,
        token: &str,
        patch: &ProfilePatch,
    ) -> Result<UserProfile, BackendError>;
}

/// Failure talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend rejected the session token")]
    Unauthorized,
    #[error("backend resource not found: {0}")]
    NotFound(String),
    #[error("backend responded with status {status}")]
    Status { status: u16 },
    #[error("backend request failed: {0}")]
    Transport(String),
    #[error("backend payload could not be decoded: {0}")]
    Decode(String),
    #[error("backend url is invalid: {0}")]
    InvalidUrl(String),
}

impl BackendError {
    /// Whether the caller should treat the visitor as signed out.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, BackendError::Unauthorized)
    }
}
