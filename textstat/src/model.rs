use serde::{Deserialize, Serialize};

pub type DocumentId = String;
pub type CollectionId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    /// Already-decoded text; the caller substitutes "" for unreadable files.
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<DocumentId>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into() }
    }
}

/// A materialized collection: its id plus owned copies of the member documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub documents: Vec<Document>,
}

impl Collection {
    pub fn new(id: impl Into<CollectionId>, documents: Vec<Document>) -> Self {
        Self { id: id.into(), documents }
    }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }
}

/// Per-word statistics as handed to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermStat {
    pub word: String,
    pub tf: f64,
    pub idf: f64,
    pub tfidf: f64,
}

impl TermStat {
    pub fn new(word: impl Into<String>, tf: f64, idf: f64) -> Self {
        Self { word: word.into(), tf, idf, tfidf: tf * idf }
    }

    /// Copy with every number rounded to `places` decimals. Presentation only.
    pub fn rounded(&self, places: u32) -> Self {
        Self {
            word: self.word.clone(),
            tf: round_to(self.tf, places),
            idf: round_to(self.idf, places),
            tfidf: round_to(self.tfidf, places),
        }
    }
}

pub(crate) fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Owner of a statistics record: exactly one document or one collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Subject {
    Document(DocumentId),
    Collection(CollectionId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsRecord {
    pub subject: Subject,
    pub data: Vec<TermStat>,
    pub created_at: String,
}

impl StatisticsRecord {
    pub fn new(subject: Subject, data: Vec<TermStat>) -> Self {
        let created_at = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "".into());
        Self { subject, data, created_at }
    }

    pub fn rounded(&self, places: u32) -> Self {
        Self {
            subject: self.subject.clone(),
            data: self.data.iter().map(|s| s.rounded(places)).collect(),
            created_at: self.created_at.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_is_presentation_only() {
        let s = TermStat::new("cat", 1.0 / 3.0, (1.5f64).ln());
        let r = s.rounded(3);
        assert_eq!(r.tf, 0.333);
        assert_eq!(r.idf, 0.405);
        assert!((s.tf - 1.0 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn subject_serializes_as_tagged_union() {
        let json = serde_json::to_string(&Subject::Collection("c1".into())).unwrap();
        assert_eq!(json, r#"{"kind":"collection","id":"c1"}"#);
    }
}
