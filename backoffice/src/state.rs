//! Application state for the back-office

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::auth::rate_limit::RateLimiter;
use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// JWT secret for admin authentication
    pub jwt_secret: String,
    /// Rate limiter for the login route
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Connect, run migrations and build the state
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        let mut state = Self::with_pool(pool, config.jwt_secret.clone());
        state.rate_limiter = RateLimiter::new(config.trust_proxy);
        Ok(state)
    }

    /// Build the state around an existing pool; `X-Forwarded-For` is not trusted
    pub fn with_pool(pool: PgPool, jwt_secret: String) -> Self {
        Self {
            pool,
            jwt_secret,
            rate_limiter: RateLimiter::new(false),
        }
    }
}
