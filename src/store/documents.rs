use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use super::{Collection, StoreResult, require_text};
use crate::models::{Document, DocumentPatch, NewDocument, new_id};
use crate::storage::KeyValueStore;

pub struct DocumentStore {
    documents: Collection<Document>,
}

impl DocumentStore {
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            documents: Collection::load(kv),
        }
    }

    pub fn list(&self) -> &[Document] {
        self.documents.list()
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn add(&mut self, new_document: NewDocument) -> StoreResult<Document> {
        require_text("name", &new_document.name)?;

        let document = new_document.into_document(new_id(), Utc::now());
        self.documents.push(document.clone())?;
        info!(id = %document.id, kind = %document.kind, "document added");
        Ok(document)
    }

    /// Register a picked file by name and size.
    pub fn add_upload(&mut self, name: impl Into<String>, size: u64) -> StoreResult<Document> {
        self.add(NewDocument::from_upload(name, size))
    }

    pub fn update(&mut self, id: &str, patch: DocumentPatch) -> StoreResult<bool> {
        if let Some(name) = &patch.name {
            require_text("name", name)?;
        }
        Ok(self.documents.update(id, |document| patch.apply(document))?)
    }

    /// Store the result of a completed analysis.
    pub fn attach_summary(&mut self, id: &str, summary: String) -> StoreResult<bool> {
        self.update(
            id,
            DocumentPatch {
                summary: Some(Some(summary)),
                ..DocumentPatch::default()
            },
        )
    }

    pub fn delete(&mut self, id: &str) -> StoreResult<bool> {
        Ok(self.documents.remove(id)?)
    }
}
