//! Report row loading

use sqlx::PgPool;

use super::BoxError;
use crate::reports::{ReportItem, ReportOrder, ReportRange};

/// Orders placed in the range, with the customer's name
pub async fn load_orders(pool: &PgPool, range: ReportRange) -> Result<Vec<ReportOrder>, BoxError> {
    let rows = sqlx::query_as(
        r#"
        SELECT o.id, o.customer_id, c.name AS customer_name, o.status,
               o.subtotal, o.discount_total, o.operating_cost_total, o.cost_total,
               o.total, o.profit, o.ordered_at
        FROM orders o
        LEFT JOIN customers c ON c.id = o.customer_id
        WHERE o.deleted_at IS NULL
          AND o.ordered_at >= $1 AND o.ordered_at < $2
        ORDER BY o.ordered_at, o.id
        "#,
    )
    .bind(range.from)
    .bind(range.to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Line items of the orders placed in the range
pub async fn load_items(pool: &PgPool, range: ReportRange) -> Result<Vec<ReportItem>, BoxError> {
    let rows = sqlx::query_as(
        r#"
        SELECT i.order_id, o.status AS order_status, i.product_id, i.product_name,
               i.quantity, i.line_total, i.cost_breakdown
        FROM order_items i
        JOIN orders o ON o.id = i.order_id
        WHERE o.deleted_at IS NULL
          AND o.ordered_at >= $1 AND o.ordered_at < $2
        ORDER BY i.order_id, i.id
        "#,
    )
    .bind(range.from)
    .bind(range.to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
