use shared::models::{Admin, AdminRole};
use sqlx::PgPool;

/// Admin row including the password hash
#[derive(sqlx::FromRow)]
pub struct AdminAccount {
    pub id: i64,
    pub email: String,
    pub hashed_password: String,
    pub name: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub created_at: i64,
    pub last_login_at: Option<i64>,
}

impl From<AdminAccount> for Admin {
    fn from(a: AdminAccount) -> Self {
        Self {
            id: a.id,
            email: a.email,
            name: a.name,
            role: a.role,
            is_active: a.is_active,
            created_at: a.created_at,
            last_login_at: a.last_login_at,
        }
    }
}

pub async fn create(
    pool: &PgPool,
    id: i64,
    email: &str,
    hashed_password: &str,
    name: &str,
    role: AdminRole,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO admins (id, email, hashed_password, name, role, is_active, created_at)
         VALUES ($1, $2, $3, $4, $5, TRUE, $6)",
    )
    .bind(id)
    .bind(email)
    .bind(hashed_password)
    .bind(name)
    .bind(role)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<AdminAccount>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM admins WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Admin>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, email, name, role, is_active, created_at, last_login_at
         FROM admins WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM admins")
        .fetch_one(pool)
        .await
}

pub async fn set_last_login(pool: &PgPool, id: i64, now: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE admins SET last_login_at = $1 WHERE id = $2")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
