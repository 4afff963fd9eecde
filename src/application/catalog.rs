//! Catalog orchestration over the items store and the cache-aside layer.
//!
//! Reads consult the cache first and fall through to the store; writes go to
//! the store and then invalidate the whole items namespace. The cache holds
//! already-shaped [`ItemView`] values, so a hit is returned verbatim with no
//! re-transform.

use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use crate::application::repos::{
    CreateItemParams, ItemsRepo, ItemsWriteRepo, RepoError, UpdateItemParams,
};
use crate::cache::{CacheAside, CacheStats, keys};
use crate::domain::items::ItemView;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("item not found")]
    NotFound,
    #[error("invalid catalog input: {0}")]
    Validation(String),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for CatalogError {
    fn from(error: RepoError) -> Self {
        match error {
            RepoError::NotFound => CatalogError::NotFound,
            RepoError::InvalidInput { message } => CatalogError::Validation(message),
            other => CatalogError::Repo(other),
        }
    }
}

#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn ItemsRepo>,
    write_repo: Arc<dyn ItemsWriteRepo>,
    cache: Option<Arc<CacheAside>>,
}

impl CatalogService {
    pub fn new(
        repo: Arc<dyn ItemsRepo>,
        write_repo: Arc<dyn ItemsWriteRepo>,
        cache: Option<Arc<CacheAside>>,
    ) -> Self {
        Self {
            repo,
            write_repo,
            cache,
        }
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| cache.stats())
    }

    /// Read-through list: serve the cached collection when present, else
    /// load from the store, shape, and populate the cache best-effort.
    #[instrument(skip(self))]
    pub async fn list_items(&self) -> Result<Vec<ItemView>, CatalogError> {
        if let Some(cache) = &self.cache
            && let Some(cached) = cache.read::<Vec<ItemView>>(keys::ALL_ITEMS).await
        {
            return Ok(cached);
        }

        let records = self.repo.list_all().await?;
        let shaped: Vec<ItemView> = records.into_iter().map(ItemView::from).collect();

        if let Some(cache) = &self.cache {
            // Failed population does not fail the read.
            cache.write(keys::ALL_ITEMS, &shaped).await;
        }

        Ok(shaped)
    }

    /// Single reads skip the cache; only the collection is cached.
    #[instrument(skip(self))]
    pub async fn get_item(&self, id: Uuid) -> Result<ItemView, CatalogError> {
        let record = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound)?;
        Ok(ItemView::from(record))
    }

    #[instrument(skip(self, params), fields(company = %params.company))]
    pub async fn create_item(&self, params: CreateItemParams) -> Result<ItemView, CatalogError> {
        let record = self.write_repo.create_item(params).await?;
        self.invalidate_after_write().await;
        Ok(ItemView::from(record))
    }

    /// Partial update: only fields present in `params` are applied. A zero
    /// value is a real write, not an absent field.
    #[instrument(skip(self, params))]
    pub async fn update_item(
        &self,
        id: Uuid,
        params: UpdateItemParams,
    ) -> Result<ItemView, CatalogError> {
        if params.is_empty() {
            tracing::debug!(%id, "empty patch, touching timestamps only");
        }
        let record = self.write_repo.update_item(id, params).await?;
        self.invalidate_after_write().await;
        Ok(ItemView::from(record))
    }

    /// Missing targets are reported without touching the cache.
    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: Uuid) -> Result<(), CatalogError> {
        self.write_repo.delete_item(id).await?;
        self.invalidate_after_write().await;
        Ok(())
    }

    /// Best-effort: the durable write already succeeded, so a failed
    /// invalidation only means staleness bounded by the TTL.
    async fn invalidate_after_write(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_items().await;
        }
    }
}
