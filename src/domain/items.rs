//! Catalog item entity and its response shape.
//!
//! Two representations exist on purpose. `ItemRecord` mirrors the `items`
//! table with flat `rating_stars` / `rating_count` columns. `ItemView` is the
//! wire shape handed to clients, with the two columns folded into a nested
//! `rating` object. The mapping is bijective and applied exactly once: cached
//! values always hold the shaped `ItemView`, so a cache hit is returned
//! verbatim without a second transform.
//!
//! Pricing fields are intentionally permissive: `current_price` may exceed
//! `original_price` and `discount_percentage` is not range-checked. Known
//! gap, preserved until product requirements say otherwise.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Days a buyer may return an item when the seller does not specify one.
pub const DEFAULT_RETURN_PERIOD_DAYS: i32 = 14;

/// Storage-shape item, one row of the `items` table.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRecord {
    pub id: Uuid,
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
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Aggregate rating as presented to clients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Rating {
    pub stars: f64,
    pub count: i64,
}

/// Client-facing item shape. This is what gets cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemView {
    pub id: Uuid,
    pub image: String,
    pub company: String,
    pub item_name: String,
    pub original_price: i64,
    pub current_price: i64,
    pub discount_percentage: i32,
    pub return_period: i32,
    pub delivery_date: String,
    pub rating: Rating,
}

impl From<ItemRecord> for ItemView {
    fn from(record: ItemRecord) -> Self {
        Self {
            id: record.id,
            image: record.image,
            company: record.company,
            item_name: record.item_name,
            original_price: record.original_price,
            current_price: record.current_price,
            discount_percentage: record.discount_percentage,
            return_period: record.return_period,
            delivery_date: record.delivery_date,
            rating: Rating {
                stars: record.rating_stars,
                count: record.rating_count,
            },
        }
    }
}
