//! Read-through / write-invalidate behavior of the catalog service.

mod support;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use vetrina::application::catalog::{CatalogError, CatalogService};
use vetrina::application::repos::UpdateItemParams;
use vetrina::cache::{CacheAside, CacheConfig, keys};
use uuid::Uuid;

use support::{InMemoryCache, InMemoryItems, nike_shoe};

struct Harness {
    catalog: CatalogService,
    cache: Arc<InMemoryCache>,
    store: Arc<InMemoryItems>,
    aside: Arc<CacheAside>,
}

fn harness(cache: InMemoryCache) -> Harness {
    let cache = Arc::new(cache);
    let store = Arc::new(InMemoryItems::new());
    let aside = Arc::new(CacheAside::new(cache.clone(), &CacheConfig::default()));
    let catalog = CatalogService::new(store.clone(), store.clone(), Some(aside.clone()));
    Harness {
        catalog,
        cache,
        store,
        aside,
    }
}

fn uncached_harness() -> Harness {
    let mut h = harness(InMemoryCache::unhealthy());
    h.catalog = CatalogService::new(h.store.clone(), h.store.clone(), None);
    h
}

#[tokio::test]
async fn unhealthy_cache_yields_store_identical_results() {
    let cached = harness(InMemoryCache::unhealthy());
    let plain = uncached_harness();

    cached.catalog.create_item(nike_shoe()).await.expect("create");
    plain.catalog.create_item(nike_shoe()).await.expect("create");

    let from_cached_path = cached.catalog.list_items().await.expect("list");
    let from_store_path = plain.catalog.list_items().await.expect("list");

    assert_eq!(from_cached_path.len(), 1);
    // Same shape, same field values; only ids and timestamps differ per instance.
    assert_eq!(
        serde_json::to_value(&from_cached_path[0].rating).unwrap(),
        serde_json::to_value(&from_store_path[0].rating).unwrap()
    );
    assert_eq!(from_cached_path[0].company, from_store_path[0].company);
    assert_eq!(
        from_cached_path[0].return_period,
        from_store_path[0].return_period
    );
    // And nothing was written to the unhealthy cache.
    assert!(cached.cache.entries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn list_read_populates_cache_with_shaped_values() {
    let h = harness(InMemoryCache::healthy());
    h.catalog.create_item(nike_shoe()).await.expect("create");

    let listed = h.catalog.list_items().await.expect("list");
    assert_eq!(listed.len(), 1);

    let raw = h.cache.entry(keys::ALL_ITEMS).expect("populated entry");
    let cached: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    // Cache holds the post-transform shape: nested rating, no flat columns.
    assert_eq!(cached[0]["rating"]["stars"], 4.5);
    assert_eq!(cached[0]["rating"]["count"], 10);
    assert!(cached[0].get("rating_stars").is_none());
}

#[tokio::test]
async fn second_read_is_served_from_cache() {
    let h = harness(InMemoryCache::healthy());
    h.catalog.create_item(nike_shoe()).await.expect("create");

    let first = h.catalog.list_items().await.expect("first read");
    let second = h.catalog.list_items().await.expect("second read");

    assert_eq!(first, second);
    let stats = h.aside.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}

#[tokio::test]
async fn idempotent_double_read_without_prior_population() {
    let h = harness(InMemoryCache::healthy());
    h.catalog.create_item(nike_shoe()).await.expect("create");

    let first = h.catalog.list_items().await.expect("first read");
    let second = h.catalog.list_items().await.expect("second read");
    assert_eq!(first, second);

    // A third read after invalidation round-trips to the same data again.
    h.aside.invalidate_items().await;
    let third = h.catalog.list_items().await.expect("third read");
    assert_eq!(first, third);
}

#[tokio::test]
async fn create_invalidates_the_items_namespace() {
    let h = harness(InMemoryCache::healthy());
    h.catalog.create_item(nike_shoe()).await.expect("seed");
    h.catalog.list_items().await.expect("populate cache");
    assert!(h.cache.entry(keys::ALL_ITEMS).is_some());

    let mut second = nike_shoe();
    second.item_name = "Jacket".to_string();
    h.catalog.create_item(second).await.expect("create");

    // The pre-mutation entry is gone; the next read sees both items.
    assert!(h.cache.entry(keys::ALL_ITEMS).is_none());
    let listed = h.catalog.list_items().await.expect("list");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].item_name, "Jacket");
}

#[tokio::test]
async fn failed_invalidation_bounds_staleness_to_ttl() {
    let h = harness(InMemoryCache::healthy());
    let created = h.catalog.create_item(nike_shoe()).await.expect("create");
    h.catalog.list_items().await.expect("populate cache");

    // Backend goes down for the invalidation step only.
    h.cache.set_failing(true);
    h.catalog.delete_item(created.id).await.expect("delete");
    h.cache.set_failing(false);

    // Within the TTL window the stale collection may still be served.
    let stale = h.catalog.list_items().await.expect("stale read");
    assert_eq!(stale.len(), 1);

    // After expiry the read falls through to the store and reflects the
    // mutation.
    h.cache.expire_all();
    let fresh = h.catalog.list_items().await.expect("fresh read");
    assert!(fresh.is_empty());
}

#[tokio::test]
async fn zero_valued_update_is_applied() {
    let h = harness(InMemoryCache::healthy());
    let created = h.catalog.create_item(nike_shoe()).await.expect("create");
    assert_eq!(created.discount_percentage, 20);

    let updated = h
        .catalog
        .update_item(
            created.id,
            UpdateItemParams {
                discount_percentage: Some(0),
                ..Default::default()
            },
        )
        .await
        .expect("update");

    assert_eq!(updated.discount_percentage, 0);
    // Untouched fields survive.
    assert_eq!(updated.current_price, 800);
    assert_eq!(updated.company, "Nike");
}

#[tokio::test]
async fn update_invalidates_and_next_read_sees_new_data() {
    let h = harness(InMemoryCache::healthy());
    let created = h.catalog.create_item(nike_shoe()).await.expect("create");
    h.catalog.list_items().await.expect("populate cache");

    h.catalog
        .update_item(
            created.id,
            UpdateItemParams {
                current_price: Some(700),
                ..Default::default()
            },
        )
        .await
        .expect("update");

    let listed = h.catalog.list_items().await.expect("list");
    assert_eq!(listed[0].current_price, 700);
}

#[tokio::test]
async fn delete_of_missing_item_does_not_touch_cache() {
    let h = harness(InMemoryCache::healthy());
    h.catalog.create_item(nike_shoe()).await.expect("seed");
    h.catalog.list_items().await.expect("populate cache");
    let invalidations_before = h.aside.stats().invalidations;

    let result = h.catalog.delete_item(Uuid::new_v4()).await;
    assert!(matches!(result, Err(CatalogError::NotFound)));

    assert_eq!(h.aside.stats().invalidations, invalidations_before);
    assert!(h.cache.entry(keys::ALL_ITEMS).is_some());
}

#[tokio::test]
async fn single_reads_bypass_the_cache() {
    let h = harness(InMemoryCache::healthy());
    let created = h.catalog.create_item(nike_shoe()).await.expect("create");

    let fetched = h.catalog.get_item(created.id).await.expect("get");
    assert_eq!(fetched, created);

    // No per-item entry was ever written.
    assert!(h.cache.entry(&keys::item(created.id)).is_none());
    assert_eq!(h.aside.stats().hits, 0);
}

#[tokio::test]
async fn created_item_echoes_fields_and_appears_in_list() {
    let h = harness(InMemoryCache::healthy());
    let created = h.catalog.create_item(nike_shoe()).await.expect("create");

    assert_eq!(created.company, "Nike");
    assert_eq!(created.item_name, "Shoe");
    assert_eq!(created.original_price, 1000);
    assert_eq!(created.current_price, 800);
    assert_eq!(created.discount_percentage, 20);
    assert_eq!(created.return_period, 14);
    assert_eq!(created.rating.stars, 4.5);
    assert_eq!(created.rating.count, 10);

    let listed = h.catalog.list_items().await.expect("list");
    assert!(listed.iter().any(|item| item.id == created.id));
}

#[tokio::test]
async fn unhealthy_cache_read_requests_background_reconnect() {
    let h = harness(InMemoryCache::unhealthy());
    h.catalog.create_item(nike_shoe()).await.expect("create");
    h.catalog.list_items().await.expect("list");

    assert!(h.cache.reconnect_requests.load(Ordering::Relaxed) > 0);
}
