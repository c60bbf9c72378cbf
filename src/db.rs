use crate::config::DatabaseConfig;
use rocket::fairing::AdHoc;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::str::FromStr;
use std::time::Duration;

fn connect_options(db_config: &DatabaseConfig) -> Result<PgConnectOptions, sqlx::Error> {
    let ssl_mode = PgSslMode::from_str(&db_config.sslmode)?;

    Ok(PgConnectOptions::new()
        .host(&db_config.host)
        .port(db_config.port)
        .username(&db_config.user)
        .password(&db_config.password)
        .database(&db_config.dbname)
        .ssl_mode(ssl_mode))
}

/// Builds the pool without opening a connection; the first query (or the
/// migration run) establishes one.
fn init_pool(db_config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let options = connect_options(db_config)?;

    Ok(PgPoolOptions::new()
        .max_connections(db_config.max_connections)
        .min_connections(db_config.min_connections)
        .acquire_timeout(Duration::from_secs(db_config.acquire_timeout))
        .idle_timeout(Duration::from_secs(30))
        .max_lifetime(Duration::from_secs(1800))
        .connect_lazy_with(options))
}

async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

pub fn stage_db(db_config: DatabaseConfig) -> AdHoc {
    AdHoc::try_on_ignite("Postgres (sqlx)", |rocket| async move {
        let pool = match init_pool(&db_config) {
            Ok(pool) => pool,
            Err(e) => {
                tracing::error!("Failed to initialize database pool: {}", e);
                return Err(rocket);
            }
        };
        tracing::info!(host = %db_config.host, dbname = %db_config.dbname, "Database pool initialized");

        if db_config.auto_migrate {
            if let Err(e) = run_migrations(&pool).await {
                tracing::error!("Failed to run database migrations: {}", e);
                return Err(rocket);
            }
            tracing::info!("Database migrations applied");
        }

        Ok(rocket.manage(pool))
    })
}
