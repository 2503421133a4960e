//! Order database operations
//!
//! Writes that touch stock or discount usage run in one transaction with
//! the order row locked.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderDetail, OrderItem, OrderStatus, OrderUpdate};
use shared::request::Page;
use sqlx::{PgPool, Postgres, Transaction};

use super::BoxError;
use crate::error::{ServiceError, ServiceResult};
use crate::pricing::{ItemCalculationResult, OrderCalculationResult};

const ORDER_COLUMNS: &str = "id, customer_id, invoice_number, status, payment_method, shipping_fee, note, \
     subtotal, discount_total, operating_cost_total, cost_total, total, profit, \
     ordered_at, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, order_id, product_id, product_name, quantity, unit_price, unit_cost, \
     discount_id, discount_amount, calculation_setting_ids, cost_breakdown, operating_cost, \
     gross_amount, line_total, net_amount, profit";

/// Priced line item ready to persist
#[derive(Debug, Clone, Serialize)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub unit_cost: f64,
    pub discount_id: Option<i64>,
    pub calculation_setting_ids: Vec<i64>,
    #[serde(flatten)]
    pub calculation: ItemCalculationResult,
}

/// Priced order ready to persist
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: Option<i64>,
    pub payment_method: Option<String>,
    pub note: Option<String>,
    pub ordered_at: i64,
    pub totals: OrderCalculationResult,
    pub items: Vec<NewOrderItem>,
}

/// List filters
#[derive(Debug, Default, Clone, Copy)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub customer_id: Option<i64>,
    pub from: Option<i64>,
    pub to: Option<i64>,
}

/// `INV-YYYYMMDD` prefix for an order placed at `ordered_at` (UTC)
pub fn invoice_prefix(ordered_at: i64) -> String {
    let date = shared::util::utc_date(ordered_at)
        .map(|d| d.format("%Y%m%d").to_string())
        .unwrap_or_else(|| "00000000".to_string());
    format!("INV-{date}")
}

/// Postgres array literal (`{1,2,3}`) for an id list
fn array_literal(ids: &[i64]) -> String {
    let joined = ids
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("{{{joined}}}")
}

pub async fn list_orders(
    pool: &PgPool,
    filter: &OrderFilter,
    page: Page,
) -> Result<(Vec<Order>, i64), BoxError> {
    let sql = format!(
        r#"
        SELECT {ORDER_COLUMNS}
        FROM orders
        WHERE deleted_at IS NULL
          AND ($1::order_status IS NULL OR status = $1)
          AND ($2::bigint IS NULL OR customer_id = $2)
          AND ($3::bigint IS NULL OR ordered_at >= $3)
          AND ($4::bigint IS NULL OR ordered_at < $4)
        ORDER BY ordered_at DESC, id DESC
        LIMIT $5 OFFSET $6
        "#
    );
    let rows: Vec<Order> = sqlx::query_as(&sql)
        .bind(filter.status)
        .bind(filter.customer_id)
        .bind(filter.from)
        .bind(filter.to)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM orders
        WHERE deleted_at IS NULL
          AND ($1::order_status IS NULL OR status = $1)
          AND ($2::bigint IS NULL OR customer_id = $2)
          AND ($3::bigint IS NULL OR ordered_at >= $3)
          AND ($4::bigint IS NULL OR ordered_at < $4)
        "#,
    )
    .bind(filter.status)
    .bind(filter.customer_id)
    .bind(filter.from)
    .bind(filter.to)
    .fetch_one(pool)
    .await?;

    Ok((rows, total))
}

pub async fn get_order(pool: &PgPool, id: i64) -> Result<Option<Order>, BoxError> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND deleted_at IS NULL");
    let row = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row)
}

pub async fn list_items(pool: &PgPool, order_id: i64) -> Result<Vec<OrderItem>, BoxError> {
    let sql = format!("SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id");
    let rows = sqlx::query_as(&sql).bind(order_id).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn list_items_for_orders(
    pool: &PgPool,
    order_ids: &[i64],
) -> Result<Vec<OrderItem>, BoxError> {
    if order_ids.is_empty() {
        return Ok(vec![]);
    }
    let sql = format!(
        "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = ANY($1) ORDER BY order_id, id"
    );
    let rows = sqlx::query_as(&sql).bind(order_ids).fetch_all(pool).await?;
    Ok(rows)
}

/// Order with its items and the customer's name
pub async fn get_order_detail(pool: &PgPool, id: i64) -> Result<Option<OrderDetail>, BoxError> {
    let Some(order) = get_order(pool, id).await? else {
        return Ok(None);
    };
    let customer_name: Option<String> = match order.customer_id {
        Some(customer_id) => {
            sqlx::query_scalar("SELECT name FROM customers WHERE id = $1")
                .bind(customer_id)
                .fetch_optional(pool)
                .await?
        }
        None => None,
    };
    let items = list_items(pool, id).await?;
    Ok(Some(OrderDetail {
        order,
        customer_name,
        items,
    }))
}

/// Orders for invoice export, oldest first.
///
/// Without a status filter cancelled orders are skipped.
pub async fn list_orders_for_export(
    pool: &PgPool,
    from: i64,
    to: i64,
    status: Option<OrderStatus>,
) -> Result<Vec<Order>, BoxError> {
    let sql = format!(
        r#"
        SELECT {ORDER_COLUMNS}
        FROM orders
        WHERE deleted_at IS NULL
          AND ordered_at >= $1 AND ordered_at < $2
          AND (($3::order_status IS NULL AND status <> 'cancelled') OR status = $3)
        ORDER BY ordered_at, id
        "#
    );
    let rows = sqlx::query_as(&sql)
        .bind(from)
        .bind(to)
        .bind(status)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Persist a priced order.
///
/// Inserts the order and its items, stamps the invoice number, takes the
/// stock and records discount usage. Any failure rolls the whole order back.
pub async fn insert_order(pool: &PgPool, data: &NewOrder) -> ServiceResult<Order> {
    let now = shared::util::now_millis();
    let order_id = shared::util::snowflake_id();
    let totals = &data.totals;

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO orders (
            id, customer_id, status, payment_method, shipping_fee, note,
            subtotal, discount_total, operating_cost_total, cost_total, total, profit,
            ordered_at, created_at, updated_at
        )
        VALUES ($1, $2, 'pending', $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13)
        "#,
    )
    .bind(order_id)
    .bind(data.customer_id)
    .bind(data.payment_method.as_deref())
    .bind(totals.shipping_fee)
    .bind(data.note.as_deref())
    .bind(totals.subtotal)
    .bind(totals.discount_total)
    .bind(totals.operating_cost_total)
    .bind(totals.cost_total)
    .bind(totals.total)
    .bind(totals.profit)
    .bind(data.ordered_at)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    batch_insert_items(&mut tx, order_id, &data.items).await?;

    let sql = format!(
        r#"
        UPDATE orders
        SET invoice_number = $2 || '-' || nextval('invoice_number_seq')::text
        WHERE id = $1
        RETURNING {ORDER_COLUMNS}
        "#
    );
    let order: Order = sqlx::query_as(&sql)
        .bind(order_id)
        .bind(invoice_prefix(data.ordered_at))
        .fetch_one(&mut *tx)
        .await?;

    take_stock(&mut tx, &data.items, now).await?;
    record_discount_usage(&mut tx, &data.items, now).await?;

    tx.commit().await?;
    Ok(order)
}

async fn batch_insert_items(
    tx: &mut Transaction<'_, Postgres>,
    order_id: i64,
    items: &[NewOrderItem],
) -> ServiceResult<()> {
    let ids = distinct_ids(items.len());
    let product_ids: Vec<i64> = items.iter().map(|i| i.product_id).collect();
    let product_names: Vec<&str> = items.iter().map(|i| i.product_name.as_str()).collect();
    let quantities: Vec<i32> = items.iter().map(|i| i.quantity).collect();
    let unit_prices: Vec<f64> = items.iter().map(|i| i.unit_price).collect();
    let unit_costs: Vec<f64> = items.iter().map(|i| i.unit_cost).collect();
    let discount_ids: Vec<Option<i64>> = items.iter().map(|i| i.discount_id).collect();
    let discount_amounts: Vec<f64> = items.iter().map(|i| i.calculation.discount_amount).collect();
    let setting_ids: Vec<String> = items
        .iter()
        .map(|i| array_literal(&i.calculation_setting_ids))
        .collect();
    let breakdowns: Vec<String> = items
        .iter()
        .map(|i| serde_json::to_string(&i.calculation.cost_breakdown))
        .collect::<Result<_, _>>()
        .map_err(|e| ServiceError::Db(e.into()))?;
    let operating_costs: Vec<f64> = items.iter().map(|i| i.calculation.operating_cost).collect();
    let gross_amounts: Vec<f64> = items.iter().map(|i| i.calculation.gross_amount).collect();
    let line_totals: Vec<f64> = items.iter().map(|i| i.calculation.line_total).collect();
    let net_amounts: Vec<f64> = items.iter().map(|i| i.calculation.net_amount).collect();
    let profits: Vec<f64> = items.iter().map(|i| i.calculation.profit).collect();

    sqlx::query(
        r#"
        INSERT INTO order_items (
            id, order_id, product_id, product_name, quantity, unit_price, unit_cost,
            discount_id, discount_amount, calculation_setting_ids, cost_breakdown,
            operating_cost, gross_amount, line_total, net_amount, profit
        )
        SELECT t.id, $2, t.product_id, t.product_name, t.quantity, t.unit_price, t.unit_cost,
               t.discount_id, t.discount_amount, t.setting_ids::bigint[], t.breakdown::jsonb,
               t.operating_cost, t.gross_amount, t.line_total, t.net_amount, t.profit
        FROM UNNEST(
            $1::bigint[], $3::bigint[], $4::text[], $5::integer[], $6::float8[], $7::float8[],
            $8::bigint[], $9::float8[], $10::text[], $11::text[],
            $12::float8[], $13::float8[], $14::float8[], $15::float8[], $16::float8[]
        ) AS t(
            id, product_id, product_name, quantity, unit_price, unit_cost,
            discount_id, discount_amount, setting_ids, breakdown,
            operating_cost, gross_amount, line_total, net_amount, profit
        )
        "#,
    )
    .bind(&ids)
    .bind(order_id)
    .bind(&product_ids)
    .bind(&product_names)
    .bind(&quantities)
    .bind(&unit_prices)
    .bind(&unit_costs)
    .bind(&discount_ids)
    .bind(&discount_amounts)
    .bind(&setting_ids)
    .bind(&breakdowns)
    .bind(&operating_costs)
    .bind(&gross_amounts)
    .bind(&line_totals)
    .bind(&net_amounts)
    .bind(&profits)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// `n` fresh snowflake ids, regenerating any that collide within the batch
fn distinct_ids(n: usize) -> Vec<i64> {
    let mut seen = HashSet::with_capacity(n);
    let mut ids = Vec::with_capacity(n);
    while ids.len() < n {
        let id = shared::util::snowflake_id();
        if seen.insert(id) {
            ids.push(id);
        }
    }
    ids
}

/// Quantity per product, summed over repeated lines
fn quantities_by_product(items: &[NewOrderItem]) -> BTreeMap<i64, i32> {
    let mut map = BTreeMap::new();
    for item in items {
        *map.entry(item.product_id).or_insert(0) += item.quantity;
    }
    map
}

async fn take_stock(
    tx: &mut Transaction<'_, Postgres>,
    items: &[NewOrderItem],
    now: i64,
) -> ServiceResult<()> {
    for (product_id, quantity) in quantities_by_product(items) {
        let rows = sqlx::query(
            r#"
            UPDATE products SET
                stock = stock - $1,
                status = CASE
                    WHEN stock - $1 = 0 AND status = 'available' THEN 'sold_out'::product_status
                    ELSE status
                END,
                updated_at = $2
            WHERE id = $3 AND deleted_at IS NULL AND stock >= $1
            "#,
        )
        .bind(quantity)
        .bind(now)
        .bind(product_id)
        .execute(&mut **tx)
        .await?;

        if rows.rows_affected() == 0 {
            return Err(AppError::new(ErrorCode::ProductOutOfStock)
                .with_detail("product_id", product_id)
                .into());
        }
    }
    Ok(())
}

/// Distinct discounts used by the order's lines
fn discount_ids(items: &[NewOrderItem]) -> Vec<i64> {
    let mut ids: Vec<i64> = items.iter().filter_map(|i| i.discount_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

async fn record_discount_usage(
    tx: &mut Transaction<'_, Postgres>,
    items: &[NewOrderItem],
    now: i64,
) -> ServiceResult<()> {
    for discount_id in discount_ids(items) {
        let rows = sqlx::query(
            r#"
            UPDATE discounts SET used_count = used_count + 1, updated_at = $1
            WHERE id = $2 AND (usage_limit IS NULL OR used_count < usage_limit)
            "#,
        )
        .bind(now)
        .bind(discount_id)
        .execute(&mut **tx)
        .await?;

        if rows.rows_affected() == 0 {
            return Err(AppError::new(ErrorCode::DiscountUsageExceeded)
                .with_detail("discount_id", discount_id)
                .into());
        }
    }
    Ok(())
}

/// Put back the stock and discount usage an order took
async fn release_order(
    tx: &mut Transaction<'_, Postgres>,
    order_id: i64,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE products p SET
            stock = p.stock + i.quantity,
            status = CASE WHEN p.status = 'sold_out' THEN 'available'::product_status ELSE p.status END,
            updated_at = $2
        FROM (
            SELECT product_id, SUM(quantity)::integer AS quantity
            FROM order_items
            WHERE order_id = $1
            GROUP BY product_id
        ) i
        WHERE p.id = i.product_id
        "#,
    )
    .bind(order_id)
    .bind(now)
    .execute(&mut **tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE discounts SET used_count = GREATEST(used_count - 1, 0), updated_at = $2
        WHERE id IN (
            SELECT DISTINCT discount_id FROM order_items
            WHERE order_id = $1 AND discount_id IS NOT NULL
        )
        "#,
    )
    .bind(order_id)
    .bind(now)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn lock_status(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
) -> Result<Option<OrderStatus>, sqlx::Error> {
    sqlx::query_scalar("SELECT status FROM orders WHERE id = $1 AND deleted_at IS NULL FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
}

/// Apply a status transition, note and payment method change.
///
/// Setting the current status again is a no-op for the status. Moving to
/// `cancelled` releases the order's stock and discount usage.
pub async fn update_order(pool: &PgPool, id: i64, data: &OrderUpdate) -> ServiceResult<Order> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let current = lock_status(&mut tx, id)
        .await?
        .ok_or(ErrorCode::OrderNotFound)?;

    let next = match data.status {
        Some(next) if next != current => {
            if !current.can_transition_to(next) {
                return Err(AppError::with_message(
                    ErrorCode::OrderInvalidTransition,
                    format!(
                        "Cannot move order from {} to {}",
                        current.as_str(),
                        next.as_str()
                    ),
                )
                .into());
            }
            Some(next)
        }
        _ => None,
    };

    if next == Some(OrderStatus::Cancelled) {
        release_order(&mut tx, id, now).await?;
    }

    let sql = format!(
        r#"
        UPDATE orders SET
            status = COALESCE($1, status),
            payment_method = COALESCE($2, payment_method),
            note = COALESCE($3, note),
            updated_at = $4
        WHERE id = $5
        RETURNING {ORDER_COLUMNS}
        "#
    );
    let order: Order = sqlx::query_as(&sql)
        .bind(next)
        .bind(data.payment_method.as_deref())
        .bind(data.note.as_deref())
        .bind(now)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    if let Some(next) = next {
        tracing::info!(order_id = id, from = current.as_str(), to = next.as_str(), "Order status changed");
    }
    Ok(order)
}

/// Soft delete; a non-cancelled order gives its stock back first
pub async fn soft_delete_order(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let current = lock_status(&mut tx, id)
        .await?
        .ok_or(ErrorCode::OrderNotFound)?;

    if current != OrderStatus::Cancelled {
        release_order(&mut tx, id, now).await?;
    }

    sqlx::query("UPDATE orders SET deleted_at = $1, updated_at = $1 WHERE id = $2")
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}
