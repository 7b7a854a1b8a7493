//! Resolved-name cache Trait

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Maps a validation name to the name its TXT record was actually placed at.
///
/// Written by `perform`, read by `cleanup`.
#[async_trait]
pub trait NameCache: Send + Sync {
    async fn get(&self, validation_name: &str) -> Option<String>;

    async fn insert(&self, validation_name: String, resolved_name: String);
}

/// In-memory name cache
#[derive(Clone, Default)]
pub struct InMemoryNameCache {
    names: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryNameCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache pre-seeded with entries resolved elsewhere (e.g. by an earlier process).
    #[must_use]
    pub fn with_entries(entries: HashMap<String, String>) -> Self {
        Self {
            names: Arc::new(RwLock::new(entries)),
        }
    }
}

#[async_trait]
impl NameCache for InMemoryNameCache {
    async fn get(&self, validation_name: &str) -> Option<String> {
        self.names.read().await.get(validation_name).cloned()
    }

    async fn insert(&self, validation_name: String, resolved_name: String) {
        self.names.write().await.insert(validation_name, resolved_name);
    }
}
