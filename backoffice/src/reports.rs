//! Reporting rollups
//!
//! Pure functions over order rows loaded for a `[from, to)` range.
//! Cancelled orders only count towards the cancelled figures and the
//! status breakdown.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{CostKind, OperatingCostLine, OrderStatus};
use shared::util::utc_date;

use crate::pricing::{to_decimal, to_f64};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
const DEFAULT_RANGE_DAYS: i64 = 30;
const MAX_RANGE_DAYS: i64 = 366;

/// Half-open millisecond range `[from, to)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportRange {
    pub from: i64,
    pub to: i64,
}

impl ReportRange {
    /// Defaults: `to` = now, `from` = 30 days before `to`.
    ///
    /// Both bounds must be timestamps chrono can represent.
    pub fn resolve(from: Option<i64>, to: Option<i64>, now: i64) -> Result<Self, AppError> {
        let to = representable(to.unwrap_or(now), "to")?;
        let from = match from {
            Some(from) => from,
            None => to
                .checked_sub(DEFAULT_RANGE_DAYS * DAY_MS)
                .ok_or_else(|| out_of_range("to"))?,
        };
        let from = representable(from, "from")?;
        if from >= to {
            return Err(AppError::validation("`from` must be before `to`"));
        }
        if to.checked_sub(from).is_none_or(|span| span > MAX_RANGE_DAYS * DAY_MS) {
            return Err(AppError::validation("Report range must not exceed 366 days"));
        }
        Ok(Self { from, to })
    }
}

fn out_of_range(field: &str) -> AppError {
    AppError::field_error(
        ErrorCode::ValueOutOfRange,
        field,
        format!("{field} is not a valid timestamp"),
    )
}

fn representable(millis: i64, field: &str) -> Result<i64, AppError> {
    match DateTime::from_timestamp_millis(millis) {
        Some(_) => Ok(millis),
        None => Err(out_of_range(field)),
    }
}

/// Order row as loaded for reporting
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReportOrder {
    pub id: i64,
    pub customer_id: Option<i64>,
    pub customer_name: Option<String>,
    pub status: OrderStatus,
    pub subtotal: f64,
    pub discount_total: f64,
    pub operating_cost_total: f64,
    pub cost_total: f64,
    pub total: f64,
    pub profit: f64,
    pub ordered_at: i64,
}

impl ReportOrder {
    fn counts(&self) -> bool {
        self.status != OrderStatus::Cancelled
    }
}

/// Line item row as loaded for reporting
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReportItem {
    pub order_id: i64,
    pub order_status: OrderStatus,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub line_total: f64,
    #[sqlx(json)]
    pub cost_breakdown: Vec<OperatingCostLine>,
}

impl ReportItem {
    fn counts(&self) -> bool {
        self.order_status != OrderStatus::Cancelled
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesSummary {
    pub range: ReportRange,
    pub order_count: i64,
    pub cancelled_count: i64,
    /// Σ total of non-cancelled orders
    pub revenue: f64,
    pub discount_total: f64,
    pub operating_cost_total: f64,
    pub cost_total: f64,
    pub profit: f64,
    pub average_order_value: f64,
    pub items_sold: i64,
    pub new_customers: i64,
}

pub fn summary(
    range: ReportRange,
    orders: &[ReportOrder],
    items: &[ReportItem],
    new_customers: i64,
) -> SalesSummary {
    let mut order_count = 0i64;
    let mut cancelled_count = 0i64;
    let mut revenue = Decimal::ZERO;
    let mut discount_total = Decimal::ZERO;
    let mut operating_cost_total = Decimal::ZERO;
    let mut cost_total = Decimal::ZERO;
    let mut profit = Decimal::ZERO;

    for order in orders {
        if !order.counts() {
            cancelled_count += 1;
            continue;
        }
        order_count += 1;
        revenue += to_decimal(order.total);
        discount_total += to_decimal(order.discount_total);
        operating_cost_total += to_decimal(order.operating_cost_total);
        cost_total += to_decimal(order.cost_total);
        profit += to_decimal(order.profit);
    }

    let average = if order_count > 0 {
        revenue / Decimal::from(order_count)
    } else {
        Decimal::ZERO
    };

    let items_sold = items
        .iter()
        .filter(|i| i.counts())
        .map(|i| i.quantity as i64)
        .sum();

    SalesSummary {
        range,
        order_count,
        cancelled_count,
        revenue: to_f64(revenue),
        discount_total: to_f64(discount_total),
        operating_cost_total: to_f64(operating_cost_total),
        cost_total: to_f64(cost_total),
        profit: to_f64(profit),
        average_order_value: to_f64(average),
        items_sold,
        new_customers,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    /// UTC date
    pub date: NaiveDate,
    pub orders: i64,
    pub revenue: f64,
    pub profit: f64,
}

/// One point per UTC date in the range, gaps filled with zeros
pub fn daily(range: ReportRange, orders: &[ReportOrder]) -> Vec<DailyPoint> {
    let (Some(first), Some(last)) = (utc_date(range.from), utc_date(range.to - 1)) else {
        return Vec::new();
    };

    let mut buckets: HashMap<NaiveDate, (i64, Decimal, Decimal)> = HashMap::new();
    for order in orders.iter().filter(|o| o.counts()) {
        if let Some(date) = utc_date(order.ordered_at) {
            let bucket = buckets.entry(date).or_default();
            bucket.0 += 1;
            bucket.1 += to_decimal(order.total);
            bucket.2 += to_decimal(order.profit);
        }
    }

    let mut points = Vec::new();
    let mut date = first;
    while date <= last {
        let (orders, revenue, profit) = buckets.remove(&date).unwrap_or_default();
        points.push(DailyPoint {
            date,
            orders,
            revenue: to_f64(revenue),
            profit: to_f64(profit),
        });
        date += Duration::days(1);
    }
    points
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSales {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub revenue: f64,
}

/// Best sellers by quantity, ties broken by revenue
pub fn top_products(items: &[ReportItem], limit: usize) -> Vec<ProductSales> {
    let mut by_product: HashMap<i64, (String, i64, Decimal)> = HashMap::new();
    for item in items.iter().filter(|i| i.counts()) {
        let entry = by_product
            .entry(item.product_id)
            .or_insert_with(|| (item.product_name.clone(), 0, Decimal::ZERO));
        entry.1 += item.quantity as i64;
        entry.2 += to_decimal(item.line_total);
    }

    let mut rows: Vec<_> = by_product.into_iter().collect();
    rows.sort_by(|(a_id, a), (b_id, b)| {
        b.1.cmp(&a.1)
            .then_with(|| b.2.cmp(&a.2))
            .then_with(|| a_id.cmp(b_id))
    });

    rows.into_iter()
        .take(limit)
        .map(|(product_id, (product_name, quantity, revenue))| ProductSales {
            product_id,
            product_name,
            quantity,
            revenue: to_f64(revenue),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSpend {
    pub customer_id: i64,
    pub customer_name: Option<String>,
    pub order_count: i64,
    pub total_spent: f64,
}

/// Customers by spend; walk-in orders without a customer are skipped
pub fn top_customers(orders: &[ReportOrder], limit: usize) -> Vec<CustomerSpend> {
    let mut by_customer: HashMap<i64, (Option<String>, i64, Decimal)> = HashMap::new();
    for order in orders.iter().filter(|o| o.counts()) {
        let Some(customer_id) = order.customer_id else {
            continue;
        };
        let entry = by_customer
            .entry(customer_id)
            .or_insert_with(|| (order.customer_name.clone(), 0, Decimal::ZERO));
        entry.1 += 1;
        entry.2 += to_decimal(order.total);
    }

    let mut rows: Vec<_> = by_customer.into_iter().collect();
    rows.sort_by(|(a_id, a), (b_id, b)| {
        b.2.cmp(&a.2)
            .then_with(|| b.1.cmp(&a.1))
            .then_with(|| a_id.cmp(b_id))
    });

    rows.into_iter()
        .take(limit)
        .map(|(customer_id, (customer_name, order_count, spent))| CustomerSpend {
            customer_id,
            customer_name,
            order_count,
            total_spent: to_f64(spent),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusBucket {
    pub status: OrderStatus,
    pub count: i64,
    pub total: f64,
}

/// Count and Σ total per status, every status listed
pub fn status_breakdown(orders: &[ReportOrder]) -> Vec<StatusBucket> {
    OrderStatus::ALL
        .into_iter()
        .map(|status| {
            let (count, total) = orders
                .iter()
                .filter(|o| o.status == status)
                .fold((0i64, Decimal::ZERO), |(n, sum), o| {
                    (n + 1, sum + to_decimal(o.total))
                });
            StatusBucket {
                status,
                count,
                total: to_f64(total),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatingCostReport {
    pub by_kind: Vec<KindCost>,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindCost {
    pub kind: CostKind,
    pub amount: f64,
}

/// Operating cost per calculation kind from the line items' breakdowns
pub fn operating_costs(items: &[ReportItem]) -> OperatingCostReport {
    let mut by_kind: HashMap<CostKind, Decimal> = HashMap::new();
    for line in items
        .iter()
        .filter(|i| i.counts())
        .flat_map(|i| i.cost_breakdown.iter())
    {
        *by_kind.entry(line.kind).or_default() += to_decimal(line.amount);
    }

    let total: Decimal = by_kind.values().copied().sum();
    OperatingCostReport {
        by_kind: CostKind::ALL
            .into_iter()
            .map(|kind| KindCost {
                kind,
                amount: to_f64(by_kind.get(&kind).copied().unwrap_or_default()),
            })
            .collect(),
        total: to_f64(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ValueType;

    // 2024-03-01T00:00:00Z
    const MARCH_1: i64 = 1_709_251_200_000;

    fn order(id: i64, customer: Option<i64>, status: OrderStatus, total: f64, ordered_at: i64) -> ReportOrder {
        ReportOrder {
            id,
            customer_id: customer,
            customer_name: customer.map(|c| format!("Customer {c}")),
            status,
            subtotal: total,
            discount_total: 1.0,
            operating_cost_total: 0.5,
            cost_total: total / 2.0,
            total,
            profit: total / 2.0 - 0.5,
            ordered_at,
        }
    }

    fn item(order_id: i64, status: OrderStatus, product_id: i64, quantity: i32, line_total: f64) -> ReportItem {
        ReportItem {
            order_id,
            order_status: status,
            product_id,
            product_name: format!("Product {product_id}"),
            quantity,
            line_total,
            cost_breakdown: vec![OperatingCostLine {
                setting_id: 1,
                name: "Packaging".into(),
                kind: CostKind::Packaging,
                value_type: ValueType::Fixed,
                value: 0.25,
                amount: 0.25 * quantity as f64,
            }],
        }
    }

    fn fixture() -> (Vec<ReportOrder>, Vec<ReportItem>) {
        let orders = vec![
            order(1, Some(10), OrderStatus::Paid, 40.0, MARCH_1 + 1_000),
            order(2, Some(11), OrderStatus::Completed, 60.0, MARCH_1 + DAY_MS * 2),
            order(3, Some(10), OrderStatus::Pending, 20.0, MARCH_1 + DAY_MS * 2 + 5),
            order(4, Some(12), OrderStatus::Cancelled, 99.0, MARCH_1 + DAY_MS),
            order(5, None, OrderStatus::Paid, 10.0, MARCH_1 + 2_000),
        ];
        let items = vec![
            item(1, OrderStatus::Paid, 100, 2, 40.0),
            item(2, OrderStatus::Completed, 200, 3, 60.0),
            item(3, OrderStatus::Pending, 100, 1, 20.0),
            item(4, OrderStatus::Cancelled, 300, 9, 99.0),
            item(5, OrderStatus::Paid, 300, 1, 10.0),
        ];
        (orders, items)
    }

    #[test]
    fn test_range_resolution() {
        let now = MARCH_1 + 12 * DAY_MS;
        let range = ReportRange::resolve(None, None, now).unwrap();
        assert_eq!(range.to, now);
        assert_eq!(range.to - range.from, 30 * DAY_MS);

        assert!(ReportRange::resolve(Some(5), Some(5), now).is_err());
        assert!(ReportRange::resolve(Some(0), Some(400 * DAY_MS), now).is_err());
    }

    #[test]
    fn test_range_rejects_extreme_timestamps() {
        let err = ReportRange::resolve(None, Some(i64::MIN), 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);

        let err = ReportRange::resolve(Some(i64::MIN), Some(1), 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);

        let err = ReportRange::resolve(Some(0), Some(i64::MAX), 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);

        // Both ends representable but far apart: still limited to 366 days
        let min = DateTime::<chrono::Utc>::MIN_UTC.timestamp_millis();
        let max = DateTime::<chrono::Utc>::MAX_UTC.timestamp_millis();
        let err = ReportRange::resolve(Some(min), Some(max), 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_summary_excludes_cancelled() {
        let (orders, items) = fixture();
        let range = ReportRange { from: MARCH_1, to: MARCH_1 + 3 * DAY_MS };
        let s = summary(range, &orders, &items, 2);
        assert_eq!(s.order_count, 4);
        assert_eq!(s.cancelled_count, 1);
        assert_eq!(s.revenue, 130.0);
        assert_eq!(s.discount_total, 4.0);
        assert_eq!(s.average_order_value, 32.5);
        assert_eq!(s.items_sold, 7);
        assert_eq!(s.new_customers, 2);
        // Σ (total/2 − 0.5)
        assert_eq!(s.profit, 63.0);
    }

    #[test]
    fn test_summary_of_nothing() {
        let range = ReportRange { from: 0, to: DAY_MS };
        let s = summary(range, &[], &[], 0);
        assert_eq!(s.order_count, 0);
        assert_eq!(s.average_order_value, 0.0);
    }

    #[test]
    fn test_daily_fills_gaps() {
        let (orders, _) = fixture();
        let range = ReportRange { from: MARCH_1, to: MARCH_1 + 3 * DAY_MS };
        let points = daily(range, &orders);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].date.to_string(), "2024-03-01");
        assert_eq!(points[0].orders, 2);
        assert_eq!(points[0].revenue, 50.0);
        // Only the cancelled order fell on March 2
        assert_eq!(points[1].orders, 0);
        assert_eq!(points[1].revenue, 0.0);
        assert_eq!(points[2].orders, 2);
        assert_eq!(points[2].revenue, 80.0);
    }

    #[test]
    fn test_top_products() {
        let (_, items) = fixture();
        let top = top_products(&items, 10);
        let ids: Vec<_> = top.iter().map(|p| p.product_id).collect();
        // 100 and 200 tie on quantity and revenue; lower id first
        assert_eq!(ids, vec![100, 200, 300]);
        assert_eq!(top[0].quantity, 3);
        assert_eq!(top[0].revenue, 60.0);
        assert_eq!(top[2].quantity, 1);

        assert_eq!(top_products(&items, 1).len(), 1);
    }

    #[test]
    fn test_top_customers() {
        let (orders, _) = fixture();
        let top = top_customers(&orders, 5);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].customer_id, 10);
        assert_eq!(top[0].order_count, 2);
        assert_eq!(top[0].total_spent, 60.0);
        assert_eq!(top[1].customer_id, 11);
    }

    #[test]
    fn test_status_breakdown_lists_every_status() {
        let (orders, _) = fixture();
        let breakdown = status_breakdown(&orders);
        assert_eq!(breakdown.len(), 5);
        let paid = breakdown.iter().find(|b| b.status == OrderStatus::Paid).unwrap();
        assert_eq!(paid.count, 2);
        assert_eq!(paid.total, 50.0);
        let shipped = breakdown.iter().find(|b| b.status == OrderStatus::Shipped).unwrap();
        assert_eq!(shipped.count, 0);
        let cancelled = breakdown.iter().find(|b| b.status == OrderStatus::Cancelled).unwrap();
        assert_eq!(cancelled.total, 99.0);
    }

    #[test]
    fn test_operating_costs_by_kind() {
        let (_, items) = fixture();
        let report = operating_costs(&items);
        assert_eq!(report.by_kind.len(), CostKind::ALL.len());
        let packaging = report
            .by_kind
            .iter()
            .find(|k| k.kind == CostKind::Packaging)
            .unwrap();
        // 7 units × 0.25, cancelled order excluded
        assert_eq!(packaging.amount, 1.75);
        assert_eq!(report.total, 1.75);
        assert!(report
            .by_kind
            .iter()
            .filter(|k| k.kind != CostKind::Packaging)
            .all(|k| k.amount == 0.0));
    }
}
