use crate::model::{Collection, CollectionId, Document, DocumentId};
use anyhow::{anyhow, bail, Result};
use std::collections::{BTreeMap, BTreeSet};

/// In-memory view of documents and their collection membership.
///
/// This is the caller's side of the engine: it owns texts and membership and
/// hands out owned corpora for each computation.
#[derive(Debug, Default, Clone)]
pub struct Library {
    documents: BTreeMap<DocumentId, Document>,
    collections: BTreeMap<CollectionId, BTreeSet<DocumentId>>,
}

impl Library {
    pub fn new() -> Self { Self::default() }

    pub fn add_document(&mut self, document: Document) -> Result<()> {
        if self.documents.contains_key(&document.id) {
            bail!("document {} already exists", document.id);
        }
        self.documents.insert(document.id.clone(), document);
        Ok(())
    }

    /// Create an empty collection. Creating an existing one is a no-op.
    pub fn create_collection(&mut self, id: impl Into<CollectionId>) {
        self.collections.entry(id.into()).or_default();
    }

    /// Delete a document and its memberships. Returns the collections it
    /// belonged to, which the caller refreshes with [`crate::CorpusEvent::DocumentDeleted`].
    pub fn remove_document(&mut self, id: &str) -> Result<Vec<CollectionId>> {
        if self.documents.remove(id).is_none() {
            bail!("unknown document {id}");
        }
        let mut former = Vec::new();
        for (collection, members) in self.collections.iter_mut() {
            if members.remove(id) {
                former.push(collection.clone());
            }
        }
        Ok(former)
    }

    /// Returns false when the document was already a member.
    pub fn add_to_collection(&mut self, collection: &str, document: &str) -> Result<bool> {
        if !self.documents.contains_key(document) {
            bail!("unknown document {document}");
        }
        let members = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| anyhow!("unknown collection {collection}"))?;
        Ok(members.insert(document.to_string()))
    }

    /// Returns false when the document was not a member.
    pub fn remove_from_collection(&mut self, collection: &str, document: &str) -> Result<bool> {
        let members = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| anyhow!("unknown collection {collection}"))?;
        Ok(members.remove(document))
    }

    pub fn document(&self, id: &str) -> Result<&Document> {
        self.documents.get(id).ok_or_else(|| anyhow!("unknown document {id}"))
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> { self.documents.values() }

    pub fn collection_ids(&self) -> impl Iterator<Item = &CollectionId> { self.collections.keys() }

    /// Materialize a collection with owned copies of its members.
    pub fn collection(&self, id: &str) -> Result<Collection> {
        let members = self.collections.get(id).ok_or_else(|| anyhow!("unknown collection {id}"))?;
        let documents = members
            .iter()
            .filter_map(|d| self.documents.get(d).cloned())
            .collect();
        Ok(Collection::new(id, documents))
    }

    /// Ids of every collection containing `document`, in id order.
    pub fn collections_of(&self, document: &str) -> Vec<CollectionId> {
        self.collections
            .iter()
            .filter(|(_, members)| members.contains(document))
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// The corpus a document's idf is computed over: the document alone when
    /// it belongs to no collection, else every member of every collection it
    /// belongs to, each once.
    pub fn corpus_for(&self, document: &str) -> Result<Vec<Document>> {
        let target = self.document(document)?;
        let mut ids: BTreeSet<&DocumentId> = BTreeSet::new();
        for members in self.collections.values().filter(|m| m.contains(document)) {
            ids.extend(members.iter());
        }
        if ids.is_empty() {
            return Ok(vec![target.clone()]);
        }
        Ok(ids.into_iter().filter_map(|id| self.documents.get(id).cloned()).collect())
    }
}
