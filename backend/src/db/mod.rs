pub mod collection;
pub mod memory;
pub mod postgres;
pub mod store;

pub use collection::{Collection, Document};
pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;
pub use store::{DocumentStore, Filter, StoreError};

#[cfg(test)]
pub use store::MockDocumentStore;

use std::sync::Arc;

const MEMORY_SCHEME: &str = "memory://";

/// Opens the document store named by `database_url`.
///
/// `memory://` selects the in-process store; `postgres://` and `postgresql://`
/// connect to PostgreSQL and run migrations.
pub async fn connect(database_url: &str) -> anyhow::Result<Arc<dyn DocumentStore>> {
    if database_url.starts_with(MEMORY_SCHEME) {
        tracing::warn!("Using in-memory document store; data is lost on restart");
        return Ok(Arc::new(MemoryDocumentStore::new()));
    }

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        let store = PgDocumentStore::connect(database_url).await?;
        tracing::info!("Connected to PostgreSQL document store");
        return Ok(Arc::new(store));
    }

    anyhow::bail!("Unsupported DATABASE_URL scheme: {}", database_url)
}
