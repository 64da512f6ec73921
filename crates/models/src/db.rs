use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

pub use configs::DatabaseConfig;

/// Resolve database settings: `config.toml` first, env vars second.
pub fn load_config() -> DatabaseConfig {
    // Load .env if present so DATABASE_URL is visible
    let _ = dotenvy::dotenv();
    DatabaseConfig::from_file().unwrap_or_else(|_| DatabaseConfig::from_env())
}

/// Connect with default settings resolution.
pub async fn connect() -> anyhow::Result<DatabaseConnection> {
    let cfg = load_config();
    connect_with_config(&cfg).await
}

/// Connect with explicit pool settings.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(opts).await?;
    Ok(db)
}
