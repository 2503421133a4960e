//! Storefront enrichment of the catalog-driven tabs
//!
//! `categories` and `featured_products` pick what to show from their
//! payload (`category_ids`/`product_ids` and `limit`); the picked rows are
//! attached under `items`.

use serde::Serialize;
use serde_json::Value;
use shared::models::{Category, HomepageSection};

const MAX_ITEMS: usize = 50;

/// Ids listed under `key`, non-integers skipped
pub fn id_list(payload: &Value, key: &str) -> Vec<i64> {
    payload
        .get(key)
        .and_then(Value::as_array)
        .map(|ids| ids.iter().filter_map(Value::as_i64).collect())
        .unwrap_or_default()
}

/// `limit` from the payload, clamped to `1..=50`
pub fn item_limit(payload: &Value, fallback: usize) -> usize {
    payload
        .get("limit")
        .and_then(Value::as_u64)
        .map(|n| n as usize)
        .unwrap_or(fallback)
        .clamp(1, MAX_ITEMS)
}

/// Keep the rows whose id is listed, in list order
pub fn order_by_ids<T>(rows: Vec<T>, ids: &[i64], id_of: impl Fn(&T) -> i64) -> Vec<T> {
    let mut rows: Vec<Option<T>> = rows.into_iter().map(Some).collect();
    ids.iter()
        .filter_map(|id| {
            rows.iter_mut()
                .find(|slot| slot.as_ref().is_some_and(|row| id_of(row) == *id))
                .and_then(Option::take)
        })
        .collect()
}

/// Active categories for the `categories` tab
pub fn select_categories(payload: &Value, active: Vec<Category>) -> Vec<Category> {
    let ids = id_list(payload, "category_ids");
    let limit = item_limit(payload, 6);
    let picked = if ids.is_empty() {
        active
    } else {
        order_by_ids(active, &ids, |c| c.id)
    };
    picked.into_iter().take(limit).collect()
}

/// Attach rows to the section payload under `items`
pub fn attach_items<T: Serialize>(section: &mut HomepageSection, items: &[T]) {
    let value = serde_json::to_value(items).unwrap_or_else(|e| {
        tracing::warn!(section_id = %section.section_id, error = %e, "Failed to serialize section items");
        Value::Array(Vec::new())
    });
    if let Some(obj) = section.payload.as_object_mut() {
        obj.insert("items".to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn category(id: i64) -> Category {
        Category {
            id,
            name: format!("C{id}"),
            slug: format!("c{id}"),
            description: None,
            image_url: None,
            sort_order: id as i32,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_id_list_and_limit() {
        let payload = json!({ "category_ids": [3, "x", 1], "limit": 500 });
        assert_eq!(id_list(&payload, "category_ids"), vec![3, 1]);
        assert!(id_list(&payload, "product_ids").is_empty());
        assert_eq!(item_limit(&payload, 6), 50);
        assert_eq!(item_limit(&json!({ "limit": 0 }), 6), 1);
        assert_eq!(item_limit(&json!({}), 8), 8);
    }

    #[test]
    fn test_order_by_ids_skips_unknown_and_duplicates() {
        let rows: Vec<i64> = vec![1, 2, 3];
        assert_eq!(order_by_ids(rows, &[3, 9, 1, 3], |n| *n), vec![3, 1]);
    }

    #[test]
    fn test_select_categories() {
        let active: Vec<_> = (1..=10).map(category).collect();

        let picked = select_categories(&json!({ "category_ids": [], "limit": 4 }), active.clone());
        assert_eq!(picked.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2, 3, 4]);

        let picked = select_categories(&json!({ "category_ids": [7, 2], "limit": 6 }), active);
        assert_eq!(picked.iter().map(|c| c.id).collect::<Vec<_>>(), vec![7, 2]);
    }

    #[test]
    fn test_attach_items() {
        let mut section = HomepageSection {
            section_id: "categories".into(),
            payload: json!({ "title": "Shop" }),
            is_visible: true,
            sort_order: 20,
            updated_at: None,
        };
        attach_items(&mut section, &[category(5)]);
        assert_eq!(section.payload["items"][0]["id"], 5);
        assert_eq!(section.payload["title"], "Shop");
    }
}
