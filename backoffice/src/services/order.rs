//! Order pricing and creation
//!
//! Loads everything an order references, validates it, prices each line and
//! hands the result to [`db::order::insert_order`].

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    CalculationSetting, Discount, Order, OrderCreate, Product, ProductStatus,
};
use sqlx::PgPool;

use crate::db;
use crate::db::order::{NewOrder, NewOrderItem};
use crate::error::ServiceResult;
use crate::pricing::{
    ItemInput, OrderCalculationResult, calculate_item, calculate_order, check_discount,
    gross_subtotal,
};
use crate::validation::{
    MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, is_valid_amount, validate_amount, validate_optional_text,
};

/// Priced order returned by the preview endpoint
#[derive(Debug, Clone, Serialize)]
pub struct OrderQuote {
    pub items: Vec<NewOrderItem>,
    #[serde(flatten)]
    pub totals: OrderCalculationResult,
}

/// Everything referenced by an order request
#[derive(Debug, Default)]
pub struct PricingContext {
    pub products: HashMap<i64, Product>,
    pub presets: HashMap<i64, CalculationSetting>,
    pub default_presets: Vec<CalculationSetting>,
    pub discounts: HashMap<i64, Discount>,
}

/// Shape checks that need no database
fn validate_request(data: &OrderCreate) -> Result<(), AppError> {
    if data.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    for (index, item) in data.items.iter().enumerate() {
        if item.quantity < 1 {
            return Err(AppError::new(ErrorCode::OrderInvalidQuantity)
                .with_detail("index", index)
                .with_detail("product_id", item.product_id));
        }
        if let Some(price) = item.unit_price
            && !is_valid_amount(price)
        {
            return Err(AppError::new(ErrorCode::ProductInvalidPrice)
                .with_detail("index", index)
                .with_detail("product_id", item.product_id));
        }
    }
    if let Some(fee) = data.shipping_fee {
        validate_amount(fee, "shipping_fee")?;
    }
    validate_optional_text(&data.payment_method, "payment_method", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.note, "note", MAX_NOTE_LEN)?;
    Ok(())
}

/// Load products, presets and discounts the request refers to
async fn load_context(pool: &PgPool, data: &OrderCreate) -> ServiceResult<PricingContext> {
    let product_ids: Vec<i64> = distinct(data.items.iter().map(|i| i.product_id));
    let preset_ids: Vec<i64> = distinct(
        data.items
            .iter()
            .filter_map(|i| i.calculation_setting_ids.as_ref())
            .flatten()
            .copied(),
    );
    let discount_ids: Vec<i64> = distinct(data.items.iter().filter_map(|i| i.discount_id));
    let needs_defaults = data
        .items
        .iter()
        .any(|i| i.calculation_setting_ids.is_none());

    let products = db::product::get_products_by_ids(pool, &product_ids).await?;
    let presets =
        db::calculation_setting::get_calculation_settings_by_ids(pool, &preset_ids).await?;
    let discounts = db::discount::get_discounts_by_ids(pool, &discount_ids).await?;
    let default_presets = if needs_defaults {
        db::calculation_setting::list_default_calculation_settings(pool).await?
    } else {
        Vec::new()
    };

    Ok(PricingContext {
        products: products.into_iter().map(|p| (p.id, p)).collect(),
        presets: presets.into_iter().map(|p| (p.id, p)).collect(),
        default_presets,
        discounts: discounts.into_iter().map(|d| (d.id, d)).collect(),
    })
}

fn distinct(ids: impl Iterator<Item = i64>) -> Vec<i64> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

/// Price a validated request against its loaded context.
///
/// Discounts are checked against the gross subtotal of the whole order.
pub fn price_order(
    data: &OrderCreate,
    ctx: &PricingContext,
    now: i64,
) -> Result<OrderQuote, AppError> {
    // Resolve products and unit prices, checking availability and stock
    let mut requested: HashMap<i64, i32> = HashMap::new();
    let mut resolved = Vec::with_capacity(data.items.len());
    for item in &data.items {
        let product = ctx.products.get(&item.product_id).ok_or_else(|| {
            AppError::new(ErrorCode::ProductNotFound).with_detail("product_id", item.product_id)
        })?;
        if product.status == ProductStatus::Hidden {
            return Err(AppError::new(ErrorCode::ProductUnavailable)
                .with_detail("product_id", product.id));
        }
        let total = requested.entry(product.id).or_insert(0);
        *total += item.quantity;
        if *total > product.stock {
            return Err(AppError::new(ErrorCode::ProductOutOfStock)
                .with_detail("product_id", product.id)
                .with_detail("available", product.stock));
        }
        resolved.push((item, product, item.unit_price.unwrap_or(product.price)));
    }

    let subtotal =
        gross_subtotal(resolved.iter().map(|(item, _, price)| (*price, item.quantity)))?;

    for discount_id in distinct(data.items.iter().filter_map(|i| i.discount_id)) {
        let discount = ctx.discounts.get(&discount_id).ok_or_else(|| {
            AppError::new(ErrorCode::DiscountNotFound).with_detail("discount_id", discount_id)
        })?;
        check_discount(discount, subtotal, now).map_err(|code| {
            AppError::new(code)
                .with_detail("discount_id", discount_id)
                .with_detail("code", discount.code.clone())
        })?;
    }

    let mut items = Vec::with_capacity(resolved.len());
    for (item, product, unit_price) in resolved {
        let presets: Vec<CalculationSetting> = match &item.calculation_setting_ids {
            None => ctx.default_presets.clone(),
            Some(ids) => ids
                .iter()
                .map(|id| {
                    ctx.presets.get(id).cloned().ok_or_else(|| {
                        AppError::new(ErrorCode::CalculationSettingNotFound)
                            .with_detail("calculation_setting_id", *id)
                    })
                })
                .collect::<Result<_, _>>()?,
        };
        let discount = item.discount_id.and_then(|id| ctx.discounts.get(&id));

        let calculation = calculate_item(&ItemInput {
            unit_price,
            unit_cost: product.purchase_price,
            quantity: item.quantity,
            discount,
            presets: &presets,
        })?;

        items.push(NewOrderItem {
            product_id: product.id,
            product_name: product.name.clone(),
            quantity: item.quantity,
            unit_price,
            unit_cost: product.purchase_price,
            discount_id: item.discount_id,
            calculation_setting_ids: presets.iter().map(|p| p.id).collect(),
            calculation,
        });
    }

    let results: Vec<_> = items.iter().map(|i| i.calculation.clone()).collect();
    let totals = calculate_order(&results, data.shipping_fee.unwrap_or(0.0))?;
    Ok(OrderQuote { items, totals })
}

async fn ensure_customer(pool: &PgPool, customer_id: Option<i64>) -> ServiceResult<()> {
    if let Some(id) = customer_id
        && !db::customer::customer_exists(pool, id).await?
    {
        return Err(AppError::new(ErrorCode::CustomerNotFound)
            .with_detail("customer_id", id)
            .into());
    }
    Ok(())
}

/// Price an order without persisting it
pub async fn quote_order(pool: &PgPool, data: &OrderCreate) -> ServiceResult<OrderQuote> {
    validate_request(data)?;
    ensure_customer(pool, data.customer_id).await?;
    let ctx = load_context(pool, data).await?;
    Ok(price_order(data, &ctx, shared::util::now_millis())?)
}

/// Validate, price and persist an order
pub async fn create_order(pool: &PgPool, data: &OrderCreate) -> ServiceResult<Order> {
    let quote = quote_order(pool, data).await?;
    let new_order = NewOrder {
        customer_id: data.customer_id,
        payment_method: crate::validation::non_blank(data.payment_method.clone()),
        note: crate::validation::non_blank(data.note.clone()),
        ordered_at: data.ordered_at.unwrap_or_else(shared::util::now_millis),
        totals: quote.totals,
        items: quote.items,
    };

    let order = db::order::insert_order(pool, &new_order).await?;
    tracing::info!(
        order_id = order.id,
        invoice_number = order.invoice_number.as_deref().unwrap_or_default(),
        items = new_order.items.len(),
        total = order.total,
        "Order created"
    );
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::fixtures::{discount, preset};
    use shared::models::{CostKind, DiscountKind, OrderItemInput, ValueType};

    const NOW: i64 = 1_700_000_000_000;

    fn product(id: i64, price: f64, stock: i32, status: ProductStatus) -> Product {
        Product {
            id,
            category_id: None,
            name: format!("Product {id}"),
            sku: None,
            description: None,
            image_url: None,
            purchase_price: price / 2.0,
            price,
            stock,
            status,
            cost_setting_id: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn line(product_id: i64, quantity: i32) -> OrderItemInput {
        OrderItemInput {
            product_id,
            quantity,
            unit_price: None,
            discount_id: None,
            calculation_setting_ids: None,
        }
    }

    fn request(items: Vec<OrderItemInput>) -> OrderCreate {
        OrderCreate {
            customer_id: None,
            items,
            shipping_fee: None,
            payment_method: None,
            note: None,
            ordered_at: None,
        }
    }

    fn context() -> PricingContext {
        let mut ctx = PricingContext::default();
        for p in [
            product(1, 20.0, 10, ProductStatus::Available),
            product(2, 8.0, 1, ProductStatus::Available),
            product(3, 5.0, 10, ProductStatus::Hidden),
        ] {
            ctx.products.insert(p.id, p);
        }
        let mut packaging = preset(10, CostKind::Packaging, ValueType::Fixed, 0.5);
        packaging.is_default = true;
        ctx.default_presets = vec![packaging.clone()];
        ctx.presets.insert(10, packaging);
        ctx.presets
            .insert(11, preset(11, CostKind::Advertising, ValueType::Percentage, 10.0));
        ctx
    }

    #[test]
    fn test_validate_request_rejects_empty_and_bad_quantity() {
        let err = validate_request(&request(vec![])).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderEmpty);

        let err = validate_request(&request(vec![line(1, 0)])).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderInvalidQuantity);

        let mut bad_price = line(1, 1);
        bad_price.unit_price = Some(-1.0);
        let err = validate_request(&request(vec![bad_price])).unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductInvalidPrice);

        let mut data = request(vec![line(1, 1)]);
        data.shipping_fee = Some(-5.0);
        assert_eq!(
            validate_request(&data).unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
    }

    #[test]
    fn test_huge_amounts_are_rejected_not_panicking() {
        let mut huge = line(1, 10);
        huge.unit_price = Some(1e28);
        let err = validate_request(&request(vec![huge])).unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductInvalidPrice);

        let mut data = request(vec![line(1, 1)]);
        data.shipping_fee = Some(1e13);
        assert_eq!(
            validate_request(&data).unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );

        // A stored price can still overflow once multiplied by the quantity
        let mut ctx = context();
        ctx.products
            .insert(4, product(4, 7e28, 10, ProductStatus::Available));
        let err = price_order(&request(vec![line(4, 2)]), &ctx, NOW).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn test_price_order_applies_default_presets() {
        let mut data = request(vec![line(1, 2)]);
        data.shipping_fee = Some(4.0);
        let quote = price_order(&data, &context(), NOW).unwrap();

        let item = &quote.items[0];
        assert_eq!(item.unit_price, 20.0);
        assert_eq!(item.unit_cost, 10.0);
        assert_eq!(item.calculation_setting_ids, vec![10]);
        assert_eq!(item.calculation.gross_amount, 40.0);
        assert_eq!(item.calculation.operating_cost, 1.0);
        assert_eq!(item.calculation.profit, 19.0);

        assert_eq!(quote.totals.subtotal, 40.0);
        assert_eq!(quote.totals.total, 44.0);
    }

    #[test]
    fn test_price_order_explicit_and_empty_presets() {
        let mut explicit = line(1, 1);
        explicit.calculation_setting_ids = Some(vec![11]);
        let mut none = line(1, 1);
        none.calculation_setting_ids = Some(vec![]);

        let quote = price_order(&request(vec![explicit, none]), &context(), NOW).unwrap();
        assert_eq!(quote.items[0].calculation.operating_cost, 2.0);
        assert_eq!(quote.items[1].calculation.operating_cost, 0.0);
        assert!(quote.items[1].calculation_setting_ids.is_empty());
    }

    #[test]
    fn test_price_order_unknown_preset() {
        let mut item = line(1, 1);
        item.calculation_setting_ids = Some(vec![99]);
        let err = price_order(&request(vec![item]), &context(), NOW).unwrap_err();
        assert_eq!(err.code, ErrorCode::CalculationSettingNotFound);
    }

    #[test]
    fn test_price_order_price_override() {
        let mut item = line(1, 1);
        item.unit_price = Some(15.0);
        let quote = price_order(&request(vec![item]), &context(), NOW).unwrap();
        assert_eq!(quote.items[0].unit_price, 15.0);
        assert_eq!(quote.totals.subtotal, 15.0);
    }

    #[test]
    fn test_price_order_product_checks() {
        let ctx = context();

        let err = price_order(&request(vec![line(42, 1)]), &ctx, NOW).unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNotFound);

        let err = price_order(&request(vec![line(3, 1)]), &ctx, NOW).unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductUnavailable);

        // Stock is checked across repeated lines of the same product
        let err = price_order(&request(vec![line(2, 1), line(2, 1)]), &ctx, NOW).unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductOutOfStock);
    }

    #[test]
    fn test_price_order_discount_minimum_uses_order_subtotal() {
        let mut ctx = context();
        let mut save = discount(DiscountKind::Percentage, 10.0);
        save.min_order_amount = 50.0;
        ctx.discounts.insert(save.id, save);

        let mut discounted = line(1, 1);
        discounted.discount_id = Some(1);

        // 20 alone is below the minimum
        let err = price_order(&request(vec![discounted.clone()]), &ctx, NOW).unwrap_err();
        assert_eq!(err.code, ErrorCode::DiscountMinAmountNotMet);

        // The other line lifts the order subtotal to 60; only the discounted line is reduced
        let quote = price_order(&request(vec![discounted, line(1, 2)]), &ctx, NOW).unwrap();
        assert_eq!(quote.items[0].calculation.discount_amount, 2.0);
        assert_eq!(quote.items[1].calculation.discount_amount, 0.0);
        assert_eq!(quote.totals.discount_total, 2.0);
        assert_eq!(quote.totals.total, 58.0);
    }

    #[test]
    fn test_price_order_unknown_or_expired_discount() {
        let mut ctx = context();
        let mut item = line(1, 1);
        item.discount_id = Some(1);

        let err = price_order(&request(vec![item.clone()]), &ctx, NOW).unwrap_err();
        assert_eq!(err.code, ErrorCode::DiscountNotFound);

        let mut expired = discount(DiscountKind::Fixed, 5.0);
        expired.ends_at = Some(NOW - 1);
        ctx.discounts.insert(expired.id, expired);
        let err = price_order(&request(vec![item]), &ctx, NOW).unwrap_err();
        assert_eq!(err.code, ErrorCode::DiscountExpired);
    }

    #[test]
    fn test_distinct_keeps_first_occurrence_order() {
        assert_eq!(distinct([3, 1, 3, 2, 1].into_iter()), vec![3, 1, 2]);
    }
}
