//! Local document repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use defter_core::types::DbId;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::kv::{KeyValueStore, KeyValueStoreExt};
use crate::models::{ArchivalDocument, DocumentFilter, DocumentPatch, NewDocument};
use crate::repositories::DocumentRepository;

use super::records::StoredDocument;
use super::DOCUMENTS_KEY;

pub struct LocalDocumentRepo {
    store: Arc<dyn KeyValueStore>,
}

impl LocalDocumentRepo {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn load(&self) -> Vec<ArchivalDocument> {
        self.store
            .get_or::<Vec<StoredDocument>>(DOCUMENTS_KEY, Vec::new())
            .into_iter()
            .map(Into::into)
            .collect()
    }

    fn save(&self, docs: &[ArchivalDocument]) -> StoreResult<()> {
        let records: Vec<StoredDocument> = docs.iter().map(Into::into).collect();
        self.store.set(DOCUMENTS_KEY, &records)
    }
}

#[async_trait]
impl DocumentRepository for LocalDocumentRepo {
    async fn list(&self, filter: &DocumentFilter) -> StoreResult<Vec<ArchivalDocument>> {
        // Full read, then client-side filtering; semantics match the remote
        // query filters exactly.
        let mut docs: Vec<_> = self
            .load()
            .into_iter()
            .filter(|d| filter.matches(d))
            .collect();
        docs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(docs)
    }

    async fn get(&self, id: DbId) -> StoreResult<Option<ArchivalDocument>> {
        Ok(self.load().into_iter().find(|d| d.id == id))
    }

    async fn create(&self, input: NewDocument) -> StoreResult<ArchivalDocument> {
        let doc = ArchivalDocument {
            id: Uuid::now_v7(),
            title: input.title,
            category: input.category,
            difficulty: input.difficulty,
            year: input.year,
            image_url: input.image_url,
            words: input.words,
            created_at: Utc::now(),
        };
        let mut docs = self.load();
        docs.push(doc.clone());
        self.save(&docs)?;
        Ok(doc)
    }

    async fn update(&self, id: DbId, patch: DocumentPatch) -> StoreResult<ArchivalDocument> {
        let mut docs = self.load();
        let doc = docs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| StoreError::not_found("document", id))?;

        if let Some(title) = patch.title {
            doc.title = title;
        }
        if let Some(category) = patch.category {
            doc.category = category;
        }
        if let Some(difficulty) = patch.difficulty {
            doc.difficulty = difficulty;
        }
        if let Some(year) = patch.year {
            doc.year = year;
        }
        if let Some(image_url) = patch.image_url {
            doc.image_url = image_url;
        }
        if let Some(words) = patch.words {
            doc.words = words;
        }
        let updated = doc.clone();
        self.save(&docs)?;
        Ok(updated)
    }

    async fn delete(&self, id: DbId) -> StoreResult<()> {
        let mut docs = self.load();
        let before = docs.len();
        docs.retain(|d| d.id != id);
        if docs.len() != before {
            self.save(&docs)?;
        }
        Ok(())
    }
}
