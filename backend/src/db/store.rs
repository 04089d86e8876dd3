//! Storage abstraction for JSON documents grouped into named collections.
//!
//! Every record in the service is a JSON object with an `id` field. Backends only
//! need to support insert/get/replace/delete by id and equality filtering on
//! top-level fields; range queries and aggregation happen in the handlers.

use async_trait::async_trait;
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document {id} already exists in {collection}")]
    Duplicate { collection: String, id: String },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("document (de)serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Equality filter over top-level document fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    fields: Map<String, Value>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    /// Adds the condition only when a value is present.
    pub fn eq_opt<V: Into<Value>>(self, field: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.eq(field, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// JSON object used for containment queries (`body @> filter`).
    pub fn to_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    pub fn matches(&self, document: &Value) -> bool {
        self.fields
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores a new document. Fails with [`StoreError::Duplicate`] when the id is taken.
    async fn insert(&self, collection: &str, id: &str, body: Value) -> Result<(), StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Replaces an existing document. Returns `false` when nothing matched.
    async fn replace(&self, collection: &str, id: &str, body: Value) -> Result<bool, StoreError>;

    /// Removes a document. Returns `false` when nothing matched.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    /// Returns matching documents in insertion order.
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, StoreError>;

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    /// Releases backend resources. Further calls may fail.
    async fn close(&self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_matches_all_fields() {
        let filter = Filter::new().eq("status", "active").eq("department_id", "d1");
        assert!(filter.matches(&json!({"status": "active", "department_id": "d1", "x": 1})));
        assert!(!filter.matches(&json!({"status": "active", "department_id": "d2"})));
        assert!(!filter.matches(&json!({"status": "active"})));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = Filter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&json!({"anything": true})));
        assert_eq!(filter.to_json(), json!({}));
    }

    #[test]
    fn eq_opt_skips_missing_values() {
        let filter = Filter::new()
            .eq_opt("status", None::<String>)
            .eq_opt("employee_id", Some("e1"));
        assert_eq!(filter.to_json(), json!({"employee_id": "e1"}));
    }
}
