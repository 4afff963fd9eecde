//! In-memory doubles for the cache client and the items store.
//!
//! Shared by several test binaries; not every helper is used by each one.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use vetrina::application::repos::{
    CreateItemParams, ItemsRepo, ItemsWriteRepo, RepoError, UpdateItemParams,
};
use vetrina::cache::{CacheClient, CacheError};
use vetrina::domain::items::ItemRecord;

/// Controllable cache backend: health and failure are flags the test flips.
#[derive(Default)]
pub struct InMemoryCache {
    healthy: AtomicBool,
    fail_ops: AtomicBool,
    pub entries: Mutex<HashMap<String, String>>,
    pub reconnect_requests: AtomicU64,
}

impl InMemoryCache {
    pub fn healthy() -> Self {
        let cache = Self::default();
        cache.healthy.store(true, Ordering::Relaxed);
        cache
    }

    pub fn unhealthy() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_ops.store(failing, Ordering::Relaxed);
    }

    /// Simulate TTL expiry by dropping every entry behind the service's back.
    pub fn expire_all(&self) {
        self.entries.lock().unwrap().clear();
    }

    pub fn entry(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn backend_error() -> CacheError {
        CacheError::Backend(redis::RedisError::from(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "simulated backend failure",
        )))
    }
}

#[async_trait]
impl CacheClient for InMemoryCache {
    fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Relaxed)
    }

    fn request_reconnect(&self) {
        self.reconnect_requests.fetch_add(1, Ordering::Relaxed);
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        if self.fail_ops.load(Ordering::Relaxed) {
            return Err(Self::backend_error());
        }
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set_ex(&self, key: &str, value: &str, _ttl_seconds: u64) -> Result<(), CacheError> {
        if self.fail_ops.load(Ordering::Relaxed) {
            return Err(Self::backend_error());
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> Result<u64, CacheError> {
        if self.fail_ops.load(Ordering::Relaxed) {
            return Err(Self::backend_error());
        }
        let mut entries = self.entries.lock().unwrap();
        let mut dropped = 0;
        for key in keys {
            if entries.remove(key).is_some() {
                dropped += 1;
            }
        }
        Ok(dropped)
    }

    async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        if self.fail_ops.load(Ordering::Relaxed) {
            return Err(Self::backend_error());
        }
        let prefix = pattern.trim_end_matches('*');
        Ok(self
            .entries
            .lock()
            .unwrap()
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn shutdown(&self) {
        self.healthy.store(false, Ordering::Relaxed);
    }
}

/// Items store double keeping records newest-first, like the SQL adapter.
#[derive(Default)]
pub struct InMemoryItems {
    records: Mutex<Vec<ItemRecord>>,
}

impl InMemoryItems {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemsRepo for InMemoryItems {
    async fn list_all(&self) -> Result<Vec<ItemRecord>, RepoError> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<ItemRecord>, RepoError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }
}

#[async_trait]
impl ItemsWriteRepo for InMemoryItems {
    async fn create_item(&self, params: CreateItemParams) -> Result<ItemRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let record = ItemRecord {
            id: Uuid::new_v4(),
            image: params.image,
            company: params.company,
            item_name: params.item_name,
            original_price: params.original_price,
            current_price: params.current_price,
            discount_percentage: params.discount_percentage,
            return_period: params.return_period,
            delivery_date: params.delivery_date,
            rating_stars: params.rating_stars,
            rating_count: params.rating_count,
            created_at: now,
            updated_at: now,
        };
        self.records.lock().unwrap().insert(0, record.clone());
        Ok(record)
    }

    async fn update_item(
        &self,
        id: Uuid,
        params: UpdateItemParams,
    ) -> Result<ItemRecord, RepoError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(RepoError::NotFound)?;

        if let Some(image) = params.image {
            record.image = image;
        }
        if let Some(company) = params.company {
            record.company = company;
        }
        if let Some(item_name) = params.item_name {
            record.item_name = item_name;
        }
        if let Some(original_price) = params.original_price {
            record.original_price = original_price;
        }
        if let Some(current_price) = params.current_price {
            record.current_price = current_price;
        }
        if let Some(discount_percentage) = params.discount_percentage {
            record.discount_percentage = discount_percentage;
        }
        if let Some(return_period) = params.return_period {
            record.return_period = return_period;
        }
        if let Some(delivery_date) = params.delivery_date {
            record.delivery_date = delivery_date;
        }
        if let Some(rating_stars) = params.rating_stars {
            record.rating_stars = rating_stars;
        }
        if let Some(rating_count) = params.rating_count {
            record.rating_count = rating_count;
        }
        record.updated_at = OffsetDateTime::now_utc();

        Ok(record.clone())
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), RepoError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

pub fn nike_shoe() -> CreateItemParams {
    CreateItemParams {
        image: "https://cdn.example.com/shoe.jpg".to_string(),
        company: "Nike".to_string(),
        item_name: "Shoe".to_string(),
        original_price: 1000,
        current_price: 800,
        discount_percentage: 20,
        return_period: 14,
        delivery_date: "2026-09-05".to_string(),
        rating_stars: 4.5,
        rating_count: 10,
    }
}
