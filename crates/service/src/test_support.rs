#![cfg(test)]
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// DB-backed tests run only when a database is reachable and not opted out.
pub fn skip_db_tests() -> bool {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return true;
    }
    let _ = dotenvy::dotenv();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing; skipping db test");
        return true;
    }
    false
}

pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    // Run migrations exactly once, with a throwaway connection
    MIGRATED
        .get_or_init(|| async {
            let cfg = load_config();
            let db = connect_with_config(&cfg).await.expect("connect db for migration");
            migration::Migrator::up(&db, None).await.expect("migrate up");
            drop(db);
        })
        .await;

    // Return a fresh connection for the current test's runtime
    let mut cfg = load_config();
    cfg.max_connections = cfg.max_connections.max(20);
    cfg.min_connections = cfg.min_connections.min(1);
    cfg.acquire_timeout_secs = 10;
    let db = connect_with_config(&cfg).await?;
    Ok(db)
}

fn load_config() -> DatabaseConfig {
    DatabaseConfig::from_file().unwrap_or_else(|_| DatabaseConfig::from_env())
}
