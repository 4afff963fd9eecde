//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::items::ItemRecord;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Fields for a new item. The store generates the id and timestamps.
#[derive(Debug, Clone)]
pub struct CreateItemParams {
    pub image: String,
    pub company: String,
    pub item_name: String,
    pub original_price: i64,
    pub current_price: i64,
    pub discount_percentage: i32,
    pub return_period: i32,
    pub delivery_date: String,
    pub rating_stars: f64,
    pub rating_count: i64,
}

/// Partial update. `None` means "leave the column alone"; `Some(0)` is a
/// real write. Every field optional so the adapter only touches what the
/// caller sent.
#[derive(Debug, Clone, Default)]
pub struct UpdateItemParams {
    pub image: Option<String>,
    pub company: Option<String>,
    pub item_name: Option<String>,
    pub original_price: Option<i64>,
    pub current_price: Option<i64>,
    pub discount_percentage: Option<i32>,
    pub return_period: Option<i32>,
    pub delivery_date: Option<String>,
    pub rating_stars: Option<f64>,
    pub rating_count: Option<i64>,
}

impl UpdateItemParams {
    /// True when no field was supplied at all.
    pub fn is_empty(&self) -> bool {
        self.image.is_none()
            && self.company.is_none()
            && self.item_name.is_none()
            && self.original_price.is_none()
            && self.current_price.is_none()
            && self.discount_percentage.is_none()
            && self.return_period.is_none()
            && self.delivery_date.is_none()
            && self.rating_stars.is_none()
            && self.rating_count.is_none()
    }
}

#[async_trait]
pub trait ItemsRepo: Send + Sync {
    /// All items, newest first.
    async fn list_all(&self) -> Result<Vec<ItemRecord>, RepoError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<ItemRecord>, RepoError>;
}

#[async_trait]
pub trait ItemsWriteRepo: Send + Sync {
    async fn create_item(&self, params: CreateItemParams) -> Result<ItemRecord, RepoError>;

    /// Applies only the `Some` fields; returns `RepoError::NotFound` for an
    /// unknown id.
    async fn update_item(
        &self,
        id: Uuid,
        params: UpdateItemParams,
    ) -> Result<ItemRecord, RepoError>;

    /// Returns `RepoError::NotFound` for an unknown id.
    async fn delete_item(&self, id: Uuid) -> Result<(), RepoError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patch_is_detected() {
        assert!(UpdateItemParams::default().is_empty());
    }

    #[test]
    fn zero_valued_field_counts_as_present() {
        let params = UpdateItemParams {
            discount_percentage: Some(0),
            ..Default::default()
        };
        assert!(!params.is_empty());
    }
}
