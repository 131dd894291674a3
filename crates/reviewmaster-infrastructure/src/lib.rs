// SPDX-License-Identifier: GPL-3.0-or-later
pub mod json_store;
pub mod memory_store;
pub mod repositories;
pub mod sqlite_adapters;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use reviewmaster_config::{AppConfig, DatabaseConfig, StorageBackend};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::info;

pub use json_store::JsonFileCatalogStore;
pub use memory_store::MemoryCatalogStore;
pub use repositories::CatalogStore;
pub use sqlite_adapters::SqliteCatalogStore;

/// Open the store selected by `storage.backend`.
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn CatalogStore>> {
    let store: Arc<dyn CatalogStore> = match config.storage.backend {
        StorageBackend::Memory => {
            info!(target: "infrastructure", "using in-memory catalog store");
            Arc::new(MemoryCatalogStore::new())
        }
        StorageBackend::Json => Arc::new(JsonFileCatalogStore::new(&config.storage.data_dir)),
        StorageBackend::Sqlite => {
            let pool = init_database(&config.database).await?;
            Arc::new(SqliteCatalogStore::new(pool))
        }
    };
    Ok(store)
}

pub async fn init_database(config: &DatabaseConfig) -> Result<SqlitePool> {
    info!(target: "infrastructure", "initializing database");

    let in_memory = is_in_memory(&config.url);
    let db_url = if config.url.starts_with("sqlite://") && !in_memory {
        let db_path = config.url.trim_start_matches("sqlite://");
        let path = Path::new(db_path);

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
                info!(target: "infrastructure", path = %parent.display(), "created database directory");
            }
        }

        let absolute_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        // SQLite accepts forward slashes on every platform
        let path_str = absolute_path.to_string_lossy().replace('\\', "/");

        format!("sqlite://{}?mode=rwc", path_str)
    } else {
        config.url.clone()
    };

    info!(target: "infrastructure", db_url = %db_url, "connecting to database");

    let pool = pool_options(in_memory, config.pool_max_size)
        .connect(&db_url)
        .await?;

    info!(target: "infrastructure", db_url = %config.url, "running migrations");
    sqlx::migrate!("../../migrations").run(&pool).await?;

    info!(target: "infrastructure", "database initialized successfully");
    Ok(pool)
}

/// Every connection to an in-memory database gets its own empty database, so
/// such pools hold exactly one connection that is never reaped.
fn pool_options(in_memory: bool, pool_max_size: u32) -> SqlitePoolOptions {
    if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(pool_max_size)
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
