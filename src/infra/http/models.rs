use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;
use crate::domain::items::DEFAULT_RETURN_PERIOD_DAYS;

fn default_return_period() -> i32 {
    DEFAULT_RETURN_PERIOD_DAYS
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct RatingPayload {
    #[serde(default)]
    pub stars: f64,
    #[serde(default)]
    pub count: i64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ItemCreateRequest {
    pub image: String,
    pub company: String,
    pub item_name: String,
    pub original_price: i64,
    pub current_price: i64,
    #[serde(default)]
    pub discount_percentage: i32,
    #[serde(default = "default_return_period")]
    pub return_period: i32,
    pub delivery_date: String,
    #[serde(default)]
    pub rating: RatingPayload,
}

/// Partial rating patch: either component may be updated on its own.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct RatingPatch {
    pub stars: Option<f64>,
    pub count: Option<i64>,
}

/// Every field optional; absent means "leave alone". A present zero is a
/// real update.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct ItemPatchRequest {
    pub image: Option<String>,
    pub company: Option<String>,
    pub item_name: Option<String>,
    pub original_price: Option<i64>,
    pub current_price: Option<i64>,
    pub discount_percentage: Option<i32>,
    pub return_period: Option<i32>,
    pub delivery_date: Option<String>,
    #[serde(default)]
    pub rating: Option<RatingPatch>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheStats>,
}
