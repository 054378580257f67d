//! Text statistics for a document store: TF-IDF term rankings over documents
//! and collections, and Huffman prefix coding of raw text.
//!
//! Every computation is a pure function of owned, in-memory input. Callers
//! own storage and membership; they feed mutations through
//! [`recompute::Recomputer`] and persist the returned records.

pub mod corpus;
pub mod huffman;
pub mod metrics;
pub mod model;
pub mod persist;
pub mod recompute;
pub mod store;
pub mod tfidf;
pub mod tokenizer;

pub use corpus::Library;
pub use huffman::{huffman_encode, HuffmanResult};
pub use model::{Collection, CollectionId, Document, DocumentId, StatisticsRecord, Subject, TermStat};
pub use recompute::{CorpusEvent, RecomputeReport, Recomputer};
pub use store::{MemoryStore, StatisticsStore};
pub use tfidf::{EngineConfig, RankOrder, TfIdfEngine};
