//! Product Model

use serde::{Deserialize, Serialize};

/// Product availability
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "product_status", rename_all = "snake_case"))]
pub enum ProductStatus {
    Available,
    SoldOut,
    Hidden,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::SoldOut => "sold_out",
            Self::Hidden => "hidden",
        }
    }

    /// Status after the stock level changed.
    ///
    /// Only flips between `available` and `sold_out`; `hidden` is sticky.
    pub fn for_stock(self, stock: i32) -> Self {
        match self {
            Self::Available if stock <= 0 => Self::SoldOut,
            Self::SoldOut if stock > 0 => Self::Available,
            other => other,
        }
    }
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub category_id: Option<i64>,
    pub name: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// What the shop pays per unit
    pub purchase_price: f64,
    /// Retail price per unit
    pub price: f64,
    pub stock: i32,
    pub status: ProductStatus,
    /// Product cost setting used for the suggested price
    pub cost_setting_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Storefront view of a product (no cost fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicProduct {
    pub id: i64,
    pub category_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price: f64,
    pub in_stock: bool,
}

impl From<Product> for PublicProduct {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            category_id: p.category_id,
            name: p.name,
            description: p.description,
            image_url: p.image_url,
            price: p.price,
            in_stock: p.status == ProductStatus::Available && p.stock > 0,
        }
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub category_id: Option<i64>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub purchase_price: f64,
    /// Suggested price from `cost_setting_id` when omitted
    pub price: Option<f64>,
    #[serde(default)]
    pub stock: i32,
    pub status: Option<ProductStatus>,
    pub cost_setting_id: Option<i64>,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category_id: Option<i64>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub purchase_price: Option<f64>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub status: Option<ProductStatus>,
    pub cost_setting_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_follows_stock() {
        assert_eq!(ProductStatus::Available.for_stock(0), ProductStatus::SoldOut);
        assert_eq!(ProductStatus::SoldOut.for_stock(3), ProductStatus::Available);
        assert_eq!(ProductStatus::Available.for_stock(3), ProductStatus::Available);
        assert_eq!(ProductStatus::Hidden.for_stock(0), ProductStatus::Hidden);
        assert_eq!(ProductStatus::Hidden.for_stock(9), ProductStatus::Hidden);
    }

    #[test]
    fn test_public_product_hides_costs() {
        let product = Product {
            id: 1,
            category_id: None,
            name: "Mug".into(),
            sku: Some("MUG-1".into()),
            description: None,
            image_url: None,
            purchase_price: 3.0,
            price: 9.5,
            stock: 0,
            status: ProductStatus::SoldOut,
            cost_setting_id: None,
            created_at: 0,
            updated_at: 0,
        };
        let public = PublicProduct::from(product);
        assert!(!public.in_stock);
        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("purchase_price").is_none());
        assert!(json.get("sku").is_none());
        assert_eq!(json["price"], 9.5);
    }
}
