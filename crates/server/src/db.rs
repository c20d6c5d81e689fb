use axum::extract::FromRef;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::future::Future;
use std::sync::OnceLock;
use tokio::sync::OnceCell;

/// Shared application state passed to Axum handlers via `State`.
/// Derives `FromRef` so handlers can extract `State<PgPool>` directly.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: Pool<Postgres>,
}

/// Pool created lazily; no connections are opened until the first query,
/// so it is not bound to whichever tokio runtime happened to create it.
static POOL: OnceLock<Pool<Postgres>> = OnceLock::new();
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Create a new database connection pool from environment variables.
pub fn create_pool() -> Pool<Postgres> {
    // Load .env if present; production sets the variables directly.
    let _ = dotenvy::dotenv();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    pool_for_url(&database_url)
}

/// Lazy pool for an explicit URL, sized by `DATABASE_MAX_CONNECTIONS`.
pub fn pool_for_url(database_url: &str) -> Pool<Postgres> {
    let max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_lazy(database_url)
        .expect("Failed to create database pool")
}

/// Run database migrations against the given pool.
pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Run `migrate` unless it already succeeded on `cell`. A failure leaves
/// the cell empty so the next caller tries again.
async fn migrate_once<F, Fut, E>(cell: &OnceCell<()>, migrate: F) -> Result<(), E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    cell.get_or_try_init(migrate).await.map(|_| ())
}

/// Get or initialize the database connection pool.
/// Migrations run on the first call and again after any failed attempt.
///
/// Used by Dioxus server functions, which share a single long-lived runtime.
/// REST handlers use `State<PgPool>` from `AppState` instead.
pub async fn get_db() -> &'static Pool<Postgres> {
    let pool = POOL.get_or_init(create_pool);

    if let Err(e) = migrate_once(&MIGRATED, || run_migrations(pool)).await {
        tracing::error!(error = %e, "database migrations failed, retrying on next call");
    }

    pool
}
