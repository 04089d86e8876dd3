//! Typed access to a collection of documents.

use serde::{de::DeserializeOwned, Serialize};
use std::{marker::PhantomData, sync::Arc};

use super::store::{DocumentStore, Filter, StoreError};

/// A record persisted as a JSON document.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    /// Collection the record is stored in.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
}

pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _marker: PhantomData,
        }
    }
}

impl<T: Document> Collection<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub async fn insert(&self, document: &T) -> Result<(), StoreError> {
        let body = serde_json::to_value(document)?;
        self.store.insert(T::COLLECTION, document.id(), body).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<T>, StoreError> {
        match self.store.get(T::COLLECTION, id).await? {
            Some(body) => Ok(Some(serde_json::from_value(body)?)),
            None => Ok(None),
        }
    }

    pub async fn replace(&self, document: &T) -> Result<bool, StoreError> {
        let body = serde_json::to_value(document)?;
        self.store.replace(T::COLLECTION, document.id(), body).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.store.delete(T::COLLECTION, id).await
    }

    pub async fn find(&self, filter: Filter) -> Result<Vec<T>, StoreError> {
        self.store
            .find(T::COLLECTION, &filter)
            .await?
            .into_iter()
            .map(|body| serde_json::from_value(body).map_err(StoreError::from))
            .collect()
    }

    pub async fn find_one(&self, filter: Filter) -> Result<Option<T>, StoreError> {
        Ok(self.find(filter).await?.into_iter().next())
    }

    pub async fn all(&self) -> Result<Vec<T>, StoreError> {
        self.find(Filter::new()).await
    }

    pub async fn count(&self, filter: Filter) -> Result<u64, StoreError> {
        self.store.count(T::COLLECTION, &filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryDocumentStore;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Widget {
        id: String,
        color: String,
    }

    impl Document for Widget {
        const COLLECTION: &'static str = "widgets";

        fn id(&self) -> &str {
            &self.id
        }
    }

    fn widget(id: &str, color: &str) -> Widget {
        Widget {
            id: id.to_string(),
            color: color.to_string(),
        }
    }

    #[tokio::test]
    async fn typed_collection_roundtrips_documents() {
        let widgets: Collection<Widget> = Collection::new(Arc::new(MemoryDocumentStore::new()));
        widgets.insert(&widget("w1", "red")).await.expect("insert");
        widgets.insert(&widget("w2", "blue")).await.expect("insert");

        assert_eq!(widgets.get("w1").await.expect("get"), Some(widget("w1", "red")));

        let blue = widgets
            .find_one(Filter::new().eq("color", "blue"))
            .await
            .expect("find");
        assert_eq!(blue, Some(widget("w2", "blue")));

        let updated = widget("w1", "green");
        assert!(widgets.replace(&updated).await.expect("replace"));
        assert_eq!(widgets.get("w1").await.expect("get"), Some(updated));
        assert_eq!(widgets.count(Filter::new()).await.expect("count"), 2);
    }

    #[tokio::test]
    async fn malformed_stored_document_surfaces_serialization_error() {
        let store = Arc::new(MemoryDocumentStore::new());
        store
            .insert("widgets", "bad", serde_json::json!({"id": "bad"}))
            .await
            .expect("insert raw");
        let widgets: Collection<Widget> = Collection::new(store);

        let err = widgets.get("bad").await.expect_err("missing color");
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
