//! Namespace-prefix persistence
//!
//! The dataset carries a prefix store alongside its tables but only drives
//! its `sync`/`close` lifecycle; reading and writing prefixes is the query
//! and loader layers' business.

use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Persistent mapping of namespace prefixes to IRIs.
pub trait DatasetPrefixStorage: Send + Sync {
    /// Register or replace a prefix
    fn insert_prefix(&self, prefix: &str, iri: &str);

    /// Look up the IRI for a prefix
    fn get(&self, prefix: &str) -> Option<String>;

    /// Flush pending prefix state
    fn sync(&self);

    /// Release resources. Called from dataset shutdown.
    fn close(&self);
}

/// In-memory prefix storage
pub struct InMemoryPrefixStorage {
    prefixes: RwLock<HashMap<String, String>>,
}

impl InMemoryPrefixStorage {
    pub fn new() -> Self {
        InMemoryPrefixStorage {
            prefixes: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryPrefixStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetPrefixStorage for InMemoryPrefixStorage {
    fn insert_prefix(&self, prefix: &str, iri: &str) {
        self.prefixes
            .write()
            .insert(prefix.to_string(), iri.to_string());
    }

    fn get(&self, prefix: &str) -> Option<String> {
        self.prefixes.read().get(prefix).cloned()
    }

    fn sync(&self) {}

    fn close(&self) {
        debug!("prefix storage closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_roundtrip() {
        let store = InMemoryPrefixStorage::new();
        store.insert_prefix("foaf", "http://xmlns.com/foaf/0.1/");

        assert_eq!(
            store.get("foaf"),
            Some("http://xmlns.com/foaf/0.1/".to_string())
        );
        assert_eq!(store.get("rdf"), None);

        store.insert_prefix("foaf", "http://example.org/other");
        assert_eq!(
            store.get("foaf"),
            Some("http://example.org/other".to_string())
        );
    }
}
