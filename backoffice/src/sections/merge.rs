//! Merge stored section rows over defaults

use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use shared::models::{HomepageSection, SectionRecord};

use super::defaults::{DEFAULT_SECTIONS, SectionDefault, find_default};

/// Deep-merge `overlay` into `base`.
///
/// Objects merge key by key, arrays and scalars replace, `null` keeps the base.
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None if value.is_null() => {}
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

fn build(default: &SectionDefault, record: Option<&SectionRecord>) -> HomepageSection {
    let mut payload = (default.payload)();
    if let Some(record) = record {
        deep_merge(&mut payload, &record.payload);
    }
    HomepageSection {
        section_id: default.section_id.to_string(),
        payload,
        is_visible: record
            .and_then(|r| r.is_visible)
            .unwrap_or(default.is_visible),
        sort_order: record
            .and_then(|r| r.sort_order)
            .unwrap_or(default.sort_order),
        updated_at: record.map(|r| r.updated_at),
    }
}

/// Merge one tab; `None` for an unknown tab
pub fn merge_section(section_id: &str, record: Option<&SectionRecord>) -> Option<HomepageSection> {
    find_default(section_id).map(|(_, default)| build(default, record))
}

/// Merge all stored rows over the defaults, ordered by sort order then default position
pub fn merge_sections(records: &[SectionRecord]) -> Vec<HomepageSection> {
    for record in records {
        if find_default(&record.section_id).is_none() {
            tracing::warn!(section_id = %record.section_id, "Ignoring stored section for unknown tab");
        }
    }

    let mut merged: Vec<(usize, HomepageSection)> = DEFAULT_SECTIONS
        .iter()
        .enumerate()
        .map(|(index, default)| {
            let record = records.iter().find(|r| r.section_id == default.section_id);
            (index, build(default, record))
        })
        .collect();

    merged.sort_by_key(|(index, section)| (section.sort_order, *index));
    merged.into_iter().map(|(_, section)| section).collect()
}

/// Stored payloads must be JSON objects
pub fn validate_payload(payload: &Value) -> Result<(), AppError> {
    if payload.is_object() {
        Ok(())
    } else {
        Err(AppError::with_message(
            ErrorCode::SectionInvalidPayload,
            "Section payload must be a JSON object",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(section_id: &str, payload: Value) -> SectionRecord {
        SectionRecord {
            section_id: section_id.to_string(),
            payload,
            is_visible: None,
            sort_order: None,
            updated_at: 1_000,
        }
    }

    #[test]
    fn test_deep_merge_rules() {
        let mut base = json!({
            "title": "Default",
            "cta": { "label": "Shop", "href": "/products" },
            "ids": [1, 2, 3],
            "limit": 6
        });
        deep_merge(
            &mut base,
            &json!({
                "title": "Custom",
                "cta": { "label": "Browse" },
                "ids": [9],
                "limit": null,
                "extra": true,
                "missing": null
            }),
        );
        assert_eq!(
            base,
            json!({
                "title": "Custom",
                "cta": { "label": "Browse", "href": "/products" },
                "ids": [9],
                "limit": 6,
                "extra": true
            })
        );
    }

    #[test]
    fn test_scalar_over_object_replaces() {
        let mut base = json!({ "cta": { "label": "Shop" } });
        deep_merge(&mut base, &json!({ "cta": "none" }));
        assert_eq!(base, json!({ "cta": "none" }));
    }

    #[test]
    fn test_merge_sections_without_rows_returns_defaults_in_order() {
        let merged = merge_sections(&[]);
        let ids: Vec<_> = merged.iter().map(|s| s.section_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["hero", "categories", "featured_products", "brand_story", "testimonials", "newsletter"]
        );
        assert!(merged.iter().all(|s| s.updated_at.is_none()));
        assert!(!merged[4].is_visible);
    }

    #[test]
    fn test_stored_rows_override_and_reorder() {
        let mut newsletter = record("newsletter", json!({ "title": "Join us" }));
        newsletter.sort_order = Some(0);
        newsletter.is_visible = Some(false);
        // Same sort order as hero; default position breaks the tie
        let mut story = record("brand_story", json!({}));
        story.sort_order = Some(10);

        let merged = merge_sections(&[newsletter, story, record("footer", json!({ "x": 1 }))]);
        let ids: Vec<_> = merged.iter().map(|s| s.section_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["newsletter", "hero", "brand_story", "categories", "featured_products", "testimonials"]
        );
        assert_eq!(merged.len(), 6);

        let newsletter = &merged[0];
        assert!(!newsletter.is_visible);
        assert_eq!(newsletter.updated_at, Some(1_000));
        assert_eq!(newsletter.payload["title"], "Join us");
        assert_eq!(newsletter.payload["button_label"], "Subscribe");
    }

    #[test]
    fn test_merge_section_unknown_tab() {
        assert!(merge_section("footer", None).is_none());
        let hero = merge_section("hero", Some(&record("hero", json!({ "cta": { "href": "/sale" } }))))
            .unwrap();
        assert_eq!(hero.payload["cta"]["href"], "/sale");
        assert_eq!(hero.payload["cta"]["label"], "Shop now");
    }

    #[test]
    fn test_validate_payload() {
        assert!(validate_payload(&json!({})).is_ok());
        let err = validate_payload(&json!([1, 2])).unwrap_err();
        assert_eq!(err.code, ErrorCode::SectionInvalidPayload);
        assert!(validate_payload(&Value::Null).is_err());
    }
}
