//! Cat catalog: records, storage backends, seeding and the catalog service.

mod json_store;
mod seed;
mod service;
mod sqlite_store;
mod store;
mod types;

pub use json_store::JsonCatStore;
pub use seed::{parse_seed, parse_seed_str, seed_store, SeedLoader};
pub use service::{CatService, CatalogService};
pub use sqlite_store::SqliteCatStore;
pub use store::CatStore;
pub use types::*;

use std::sync::Arc;

use tracing::info;

use crate::config::{StorageBackend, StorageConfig};

/// Open the record store selected by `storage.backend`.
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn CatStore>, CatError> {
    match config.backend {
        StorageBackend::Json => {
            info!(path = %config.json_path.display(), "Opening JSON cat store");
            Ok(Arc::new(JsonCatStore::open(&config.json_path)?))
        }
        StorageBackend::Sqlite => {
            info!(path = %config.database_path.display(), "Opening SQLite cat store");
            Ok(Arc::new(SqliteCatStore::new(&config.database_path)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_json_store() {
        let dir = TempDir::new().unwrap();
        let config = StorageConfig {
            backend: StorageBackend::Json,
            json_path: dir.path().join("cats.json"),
            ..Default::default()
        };

        let store = open_store(&config).unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_open_sqlite_store() {
        let dir = TempDir::new().unwrap();
        let config = StorageConfig {
            backend: StorageBackend::Sqlite,
            database_path: dir.path().join("catapi.db"),
            ..Default::default()
        };

        let store = open_store(&config).unwrap();
        store
            .insert(&Cat::create(NewCat::new("http://x/a.jpg", None, "A")))
            .unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }
}
