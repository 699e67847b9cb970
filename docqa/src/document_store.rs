use crate::error::StoreError;
use crate::models::Document;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-lifetime map from filename to the latest uploaded document.
///
/// Writes are a single insert under the lock, so concurrent uploads of the same filename resolve
/// to whichever finished last. Readers get a clone and never hold the lock across I/O.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: RwLock<HashMap<String, Document>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Returns the revision that was replaced, if any.
    pub async fn put(&self, document: Document) -> Option<Document> {
        let mut documents = self.documents.write().await;
        documents.insert(document.filename.clone(), document)
    }

    pub async fn get(&self, filename: &str) -> Result<Document, StoreError> {
        self.documents
            .read()
            .await
            .get(filename)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(filename.to_string()))
    }

    /// Number of distinct filenames currently stored.
    pub async fn count(&self) -> usize {
        self.documents.read().await.len()
    }

    #[cfg(test)]
    async fn contains(&self, filename: &str) -> bool {
        self.documents.read().await.contains_key(filename)
    }
}
