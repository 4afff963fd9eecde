//! Cache key namespace.
//!
//! Every item-scoped key shares the `items:` prefix so a single pattern
//! delete can clear the whole namespace.

use uuid::Uuid;

/// Prefix shared by every item-scoped key.
pub const ITEMS_PREFIX: &str = "items:";

/// Key holding the shaped full-collection listing.
pub const ALL_ITEMS: &str = "items:all";

/// Key for a single item by id.
pub fn item(id: Uuid) -> String {
    format!("{ITEMS_PREFIX}{id}")
}

/// Glob pattern matching every key in the item namespace.
pub fn items_pattern() -> String {
    format!("{ITEMS_PREFIX}*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_keys_share_the_namespace_prefix() {
        let id = Uuid::nil();
        assert_eq!(item(id), "items:00000000-0000-0000-0000-000000000000");
        assert!(item(id).starts_with(ITEMS_PREFIX));
        assert!(ALL_ITEMS.starts_with(ITEMS_PREFIX));
    }

    #[test]
    fn pattern_covers_collection_and_singles() {
        assert_eq!(items_pattern(), "items:*");
    }
}
