//! Customer database operations

use shared::models::{Customer, CustomerCreate, CustomerDetail, CustomerUpdate};
use shared::request::Page;
use sqlx::PgPool;

use super::BoxError;

pub async fn list_customers(
    pool: &PgPool,
    search: Option<&str>,
    page: Page,
) -> Result<(Vec<Customer>, i64), BoxError> {
    let rows: Vec<Customer> = sqlx::query_as(
        r#"
        SELECT id, name, email, phone, address, note, created_at, updated_at
        FROM customers
        WHERE deleted_at IS NULL
          AND ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1 OR phone ILIKE $1)
        ORDER BY created_at DESC, id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(search)
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM customers
        WHERE deleted_at IS NULL
          AND ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1 OR phone ILIKE $1)
        "#,
    )
    .bind(search)
    .fetch_one(pool)
    .await?;

    Ok((rows, total))
}

pub async fn get_customer(pool: &PgPool, id: i64) -> Result<Option<Customer>, BoxError> {
    let row = sqlx::query_as(
        r#"
        SELECT id, name, email, phone, address, note, created_at, updated_at
        FROM customers
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Customers referenced by orders, soft-deleted ones included
pub async fn get_customers_by_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<Customer>, BoxError> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let rows = sqlx::query_as(
        r#"
        SELECT id, name, email, phone, address, note, created_at, updated_at
        FROM customers
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Customer with order count and lifetime spend (cancelled orders excluded)
pub async fn get_customer_detail(pool: &PgPool, id: i64) -> Result<Option<CustomerDetail>, BoxError> {
    let Some(customer) = get_customer(pool, id).await? else {
        return Ok(None);
    };

    let (order_count, total_spent): (i64, f64) = sqlx::query_as(
        r#"
        SELECT COUNT(*), COALESCE(SUM(total), 0)::DOUBLE PRECISION
        FROM orders
        WHERE customer_id = $1 AND deleted_at IS NULL AND status <> 'cancelled'
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(Some(CustomerDetail {
        customer,
        order_count,
        total_spent,
    }))
}

pub async fn customer_exists(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1 AND deleted_at IS NULL)",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

pub async fn create_customer(pool: &PgPool, data: &CustomerCreate) -> Result<Customer, BoxError> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let row = sqlx::query_as(
        r#"
        INSERT INTO customers (id, name, email, phone, address, note, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        RETURNING id, name, email, phone, address, note, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.address)
    .bind(&data.note)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update_customer(
    pool: &PgPool,
    id: i64,
    data: &CustomerUpdate,
) -> Result<Option<Customer>, BoxError> {
    let now = shared::util::now_millis();
    let row = sqlx::query_as(
        r#"
        UPDATE customers SET
            name = COALESCE($1, name),
            email = COALESCE($2, email),
            phone = COALESCE($3, phone),
            address = COALESCE($4, address),
            note = COALESCE($5, note),
            updated_at = $6
        WHERE id = $7 AND deleted_at IS NULL
        RETURNING id, name, email, phone, address, note, created_at, updated_at
        "#,
    )
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.address)
    .bind(&data.note)
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Orders keep their `customer_id`; only the customer row is stamped.
pub async fn soft_delete_customer(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE customers SET deleted_at = $1, updated_at = $1 WHERE id = $2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Customers created within `[from, to)`
pub async fn count_created_between(pool: &PgPool, from: i64, to: i64) -> Result<i64, BoxError> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM customers WHERE deleted_at IS NULL AND created_at >= $1 AND created_at < $2",
    )
    .bind(from)
    .bind(to)
    .fetch_one(pool)
    .await?;
    Ok(count)
}
