//! Default homepage content per tab

use serde_json::{Value, json};

/// Hardcoded default for one tab
pub struct SectionDefault {
    pub section_id: &'static str,
    pub is_visible: bool,
    pub sort_order: i32,
    pub payload: fn() -> Value,
}

pub static DEFAULT_SECTIONS: [SectionDefault; 6] = [
    SectionDefault {
        section_id: "hero",
        is_visible: true,
        sort_order: 10,
        payload: hero,
    },
    SectionDefault {
        section_id: "categories",
        is_visible: true,
        sort_order: 20,
        payload: categories,
    },
    SectionDefault {
        section_id: "featured_products",
        is_visible: true,
        sort_order: 30,
        payload: featured_products,
    },
    SectionDefault {
        section_id: "brand_story",
        is_visible: true,
        sort_order: 40,
        payload: brand_story,
    },
    SectionDefault {
        section_id: "testimonials",
        is_visible: false,
        sort_order: 50,
        payload: testimonials,
    },
    SectionDefault {
        section_id: "newsletter",
        is_visible: true,
        sort_order: 60,
        payload: newsletter,
    },
];

/// Position and default of a known tab
pub fn find_default(section_id: &str) -> Option<(usize, &'static SectionDefault)> {
    DEFAULT_SECTIONS
        .iter()
        .enumerate()
        .find(|(_, d)| d.section_id == section_id)
}

fn hero() -> Value {
    json!({
        "title": "Handmade goods for everyday life",
        "subtitle": "Small batches, made with care.",
        "image_url": null,
        "cta": { "label": "Shop now", "href": "/products" }
    })
}

fn categories() -> Value {
    json!({
        "title": "Shop by category",
        "category_ids": [],
        "limit": 6
    })
}

fn featured_products() -> Value {
    json!({
        "title": "Featured products",
        "product_ids": [],
        "limit": 8
    })
}

fn brand_story() -> Value {
    json!({
        "title": "Our story",
        "body": "",
        "image_url": null
    })
}

fn testimonials() -> Value {
    json!({
        "title": "What our customers say",
        "items": []
    })
}

fn newsletter() -> Value {
    json!({
        "title": "Stay in the loop",
        "description": "New arrivals and offers, once a month.",
        "button_label": "Subscribe"
    })
}
