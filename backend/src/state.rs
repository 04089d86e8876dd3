use std::sync::Arc;

use crate::{
    config::Config,
    db::{self, Collection, Document, DocumentStore},
};

/// Shared context handed to every router constructor and handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: Config) -> Self {
        Self { store, config }
    }

    /// Opens the configured document store and verifies it responds.
    pub async fn init(config: Config) -> anyhow::Result<Self> {
        let store = db::connect(&config.database_url).await?;
        store.ping().await?;
        Ok(Self::new(store, config))
    }

    /// Releases the document store. Call once, after the server stops accepting requests.
    pub async fn shutdown(&self) {
        self.store.close().await;
        tracing::info!("Document store closed");
    }

    pub fn collection<T: Document>(&self) -> Collection<T> {
        Collection::new(Arc::clone(&self.store))
    }
}
