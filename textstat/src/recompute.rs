use crate::corpus::Library;
use crate::metrics::{self, ProcessingMetrics};
use crate::model::{CollectionId, DocumentId, StatisticsRecord, Subject};
use crate::store::StatisticsStore;
use crate::tfidf::TfIdfEngine;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Corpus mutations that invalidate statistics. The caller applies the
/// mutation to its [`Library`] first, then hands the event to [`Recomputer::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CorpusEvent {
    DocumentCreated { document: DocumentId },
    DocumentAdded { document: DocumentId, collection: CollectionId },
    DocumentRemoved { document: DocumentId, collection: CollectionId },
    /// The document is gone from the library; `collections` are the ones it
    /// belonged to, as returned by [`Library::remove_document`].
    DocumentDeleted { document: DocumentId, collections: Vec<CollectionId> },
}

impl CorpusEvent {
    pub fn document(&self) -> &DocumentId {
        match self {
            CorpusEvent::DocumentCreated { document }
            | CorpusEvent::DocumentAdded { document, .. }
            | CorpusEvent::DocumentRemoved { document, .. }
            | CorpusEvent::DocumentDeleted { document, .. } => document,
        }
    }
}

/// What one event caused in the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecomputeReport {
    pub replaced: Vec<Subject>,
    /// Subjects whose records were dropped: emptied collections or a deleted document.
    pub cleared: Vec<Subject>,
}

/// Runs the synchronous recomputation for each corpus event.
pub struct Recomputer<'m> {
    engine: TfIdfEngine,
    metrics: &'m ProcessingMetrics,
}

impl Recomputer<'static> {
    /// Records timings into the process-wide metrics.
    pub fn new(engine: TfIdfEngine) -> Self {
        Self { engine, metrics: metrics::global() }
    }
}

impl<'m> Recomputer<'m> {
    pub fn with_metrics(engine: TfIdfEngine, metrics: &'m ProcessingMetrics) -> Self {
        Self { engine, metrics }
    }

    pub fn engine(&self) -> &TfIdfEngine { &self.engine }

    /// Recompute the event's document, then every affected collection.
    /// Each record fully replaces the previous one for its subject; a deleted
    /// document's record is cleared instead.
    pub fn apply<S: StatisticsStore>(&self, event: &CorpusEvent, library: &Library, store: &mut S) -> Result<RecomputeReport> {
        let mut report = RecomputeReport::default();
        let doc_subject = Subject::Document(event.document().clone());

        if let CorpusEvent::DocumentDeleted { .. } = event {
            store.clear(&doc_subject)?;
            report.cleared.push(doc_subject);
        } else {
            self.refresh_document(event.document(), library, store)?;
            report.replaced.push(doc_subject);
        }

        let affected: Vec<CollectionId> = match event {
            CorpusEvent::DocumentCreated { document } => library.collections_of(document),
            CorpusEvent::DocumentAdded { collection, .. } | CorpusEvent::DocumentRemoved { collection, .. } => {
                vec![collection.clone()]
            }
            CorpusEvent::DocumentDeleted { collections, .. } => collections.clone(),
        };
        for collection in affected {
            let subject = Subject::Collection(collection.clone());
            if self.refresh_collection(&collection, library, store)? {
                report.replaced.push(subject);
            } else {
                report.cleared.push(subject);
            }
        }

        tracing::info!(?event, replaced = report.replaced.len(), cleared = report.cleared.len(), "statistics recomputed");
        Ok(report)
    }

    pub fn refresh_document<S: StatisticsStore>(&self, document: &str, library: &Library, store: &mut S) -> Result<()> {
        let target = library.document(document)?;
        let corpus = library.corpus_for(document)?;
        let data = self.metrics.track(|| self.engine.statistics_for_document(target, &corpus));
        store.put(StatisticsRecord::new(Subject::Document(target.id.clone()), data))
    }

    /// Returns false when the collection is empty and its record was cleared.
    pub fn refresh_collection<S: StatisticsStore>(&self, collection: &str, library: &Library, store: &mut S) -> Result<bool> {
        let materialized = library.collection(collection)?;
        let subject = Subject::Collection(materialized.id.clone());
        match self.metrics.track(|| self.engine.statistics_for_collection(&materialized)) {
            Some(data) => {
                store.put(StatisticsRecord::new(subject, data))?;
                Ok(true)
            }
            None => {
                tracing::debug!(collection, "collection empty, nothing to compute");
                store.clear(&subject)?;
                Ok(false)
            }
        }
    }
}
