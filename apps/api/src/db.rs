use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{error, info};

/// Creates the PostgreSQL connection pool and applies migrations.
///
/// A database that is unreachable at startup is logged, not fatal: the pool
/// falls back to connecting lazily and requests fail with a storage error
/// until the database comes up. Only an unparsable URL is an error.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let options = PgPoolOptions::new().max_connections(10);

    let pool = match options.clone().connect(database_url).await {
        Ok(pool) => {
            info!("PostgreSQL connection pool established");
            pool
        }
        Err(e) => {
            error!("PostgreSQL connection failed: {e}");
            return Ok(options.connect_lazy(database_url)?);
        }
    };

    match sqlx::migrate!("./migrations").run(&pool).await {
        Ok(()) => info!("Database migrations applied"),
        Err(e) => error!("Database migrations failed: {e}"),
    }

    Ok(pool)
}
