use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::debug;

use super::{BackendError, CatalogBackend};
use crate::catalog::{
    ApprovalCheckResponse, Product, ProfilePatch, SearchParams, SearchResponse, UserProfile,
};

type Slot<T> = Arc<RwLock<Option<(Instant, T)>>>;

/// Keeps catalog reads for `ttl`; searches, approval checks, and user calls
/// always go to the inner backend.
pub struct CachedBackend<B> {
    inner: B,
    ttl: Duration,
    products: Slot<Vec<Product>>,
    top10: Slot<Vec<Product>>,
    by_id: Arc<RwLock<HashMap<String, (Instant, Product)>>>,
}

impl<B: CatalogBackend> CachedBackend<B> {
    pub fn new(inner: B, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            products: Arc::new(RwLock::new(None)),
            top10: Arc::new(RwLock::new(None)),
            by_id: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }

    async fn fresh<T: Clone>(&self, slot: &Slot<T>) -> Option<T> {
        let read = slot.read().await;
        match &*read {
            Some((loaded_at, value)) if loaded_at.elapsed() <= self.ttl => Some(value.clone()),
            _ => None,
        }
    }

    async fn store<T: Clone>(slot: &Slot<T>, value: &T) {
        let mut write = slot.write().await;
        *write = Some((Instant::now(), value.clone()));
    }
}

#[async_trait::async_trait]
impl<B: CatalogBackend> CatalogBackend for CachedBackend<B> {
    async fn products(&self) -> Result<Vec<Product>, BackendError> {
        if let Some(products) = self.fresh(&self.products).await {
            debug!(count = products.len(), "serving cached catalog");
            return Ok(products);
        }

        let products = self.inner.products().await?;
        Self::store(&self.products, &products).await;
        Ok(products)
    }

    async fn top10(&self) -> Result<Vec<Product>, BackendError> {
        if let Some(products) = self.fresh(&self.top10).await {
            return Ok(products);
        }

        let products = self.inner.top10().await?;
        Self::store(&self.top10, &products).await;
        Ok(products)
    }

    async fn product(&self, id: &str) -> Result<Product, BackendError> {
        {
            let read = self.by_id.read().await;
            if let Some((loaded_at, product)) = read.get(id) {
                if loaded_at.elapsed() <= self.ttl {
                    return Ok(product.clone());
                }
            }
        }

        let product = self.inner.product(id).await?;
        let mut write = self.by_id.write().await;
        write.insert(id.to_string(), (Instant::now(), product.clone()));
        Ok(product)
    }

    async fn search(&self, params: &SearchParams) -> Result<SearchResponse, BackendError> {
        self.inner.search(params).await
    }

    async fn check_approval(
        &self,
        product_id: &str,
        user_id: &str,
    ) -> Result<ApprovalCheckResponse, BackendError> {
        self.inner.check_approval(product_id, user_id).await
    }

    async fn me(&self, token: &str) -> Result<UserProfile, BackendError> {
        self.inner.me(token).await
    }

    async fn update_profile(
        &self,
        token: &str,
        patch: &ProfilePatch,
    ) -> Result<UserProfile, BackendError> {
        self.inner.update_profile(token, patch).await
    }
}
